//! Finds every live binding of a target attribute among the loaded units.
//!
//! A UUID factory can be reached through its defining unit (`uuid.uuid4()`)
//! or through any unit that imported it by value (`from uuid import uuid4`).
//! Both show up as a binding named after the attribute whose origin is the
//! defining unit, so one scan over all loaded units finds them all.

use tracing::debug;

use crate::path::TargetPath;
use crate::ports::ModuleRegistry;

/// One binding that a patch scope must redirect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocatedReference {
    /// Unit holding the binding.
    pub unit: String,
    /// Attribute name of the binding.
    pub attribute: String,
}

/// Lists the bindings of `target` across `registry`, in load order.
///
/// With a `namespace`, only units whose name contains it as a substring are
/// considered. An empty result is not an error: the target may simply not be
/// imported anywhere yet.
pub fn locate(
    registry: &dyn ModuleRegistry,
    target: &TargetPath,
    namespace: Option<&str>,
) -> Vec<LocatedReference> {
    let found: Vec<LocatedReference> = registry
        .loaded_units()
        .into_iter()
        .filter(|unit| namespace.map_or(true, |ns| unit.contains(ns)))
        .filter(|unit| {
            registry
                .attribute_origin(unit, &target.attribute)
                .is_some_and(|origin| origin == target.unit)
        })
        .map(|unit| LocatedReference { unit, attribute: target.attribute.clone() })
        .collect();

    debug!(obj_path = %target, ?namespace, count = found.len(), "located references");
    found
}
