//! Adapters implementing the port traits in `src/ports/`.

pub mod live;
