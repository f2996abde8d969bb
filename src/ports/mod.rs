//! Port traits defining the boundary between the substitution core and the
//! code units it patches.
//!
//! Implementations live in `src/adapters/`.

pub mod id_gen;
pub mod registry;

pub use id_gen::UuidFactory;
pub use registry::{Binding, ModuleRegistry};
