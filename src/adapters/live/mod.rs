//! Live adapters: the real UUID factories and the in-process unit registry.

pub mod id_gen;
pub mod registry;

pub use id_gen::{LiveUuid1, LiveUuid4};
pub use registry::{global, UnitRegistry, STDLIB_UUID_UNIT};
