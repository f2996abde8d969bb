//! Registry port over the set of loaded code units.

use std::fmt;
use std::sync::Arc;

use crate::error::FreezeError;
use crate::identifier::Identifier;
use crate::ports::id_gen::UuidFactory;

/// One attribute binding inside a code unit: a UUID factory plus the unit
/// that originally declared it.
///
/// Importing an attribute into another unit copies the binding, so the copy
/// keeps pointing at the same factory and reports the same origin.
#[derive(Clone)]
pub struct Binding {
    origin: String,
    factory: Arc<dyn UuidFactory>,
}

impl Binding {
    /// Creates a binding declared in `origin`.
    pub fn new(origin: impl Into<String>, factory: Arc<dyn UuidFactory>) -> Self {
        Self { origin: origin.into(), factory }
    }

    /// The unit that declared this attribute.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The factory this binding calls.
    #[must_use]
    pub fn factory(&self) -> &Arc<dyn UuidFactory> {
        &self.factory
    }

    /// Invokes the bound factory.
    ///
    /// # Errors
    ///
    /// Propagates the factory's error.
    pub fn call(&self) -> Result<Identifier, FreezeError> {
        self.factory.generate()
    }

    /// Whether both bindings point at the very same factory instance.
    #[must_use]
    pub fn same_factory(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.factory, &other.factory)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("origin", &self.origin)
            .field("factory", &self.factory.name())
            .finish()
    }
}

/// Capability to enumerate and rebind the loaded code units.
///
/// The reference locator and the patch lifecycle only talk to this trait, so
/// they can run against a scratch registry in tests as well as the
/// process-wide one.
pub trait ModuleRegistry: Send + Sync {
    /// Names of all loaded units, in load order.
    fn loaded_units(&self) -> Vec<String>;

    /// Looks up `attribute` in `unit`.
    fn attribute(&self, unit: &str, attribute: &str) -> Option<Binding>;

    /// Swaps the binding of an existing attribute, returning the previous one.
    ///
    /// Returns `None` and leaves the registry untouched when the unit is not
    /// loaded or has no such attribute.
    fn replace_attribute(&self, unit: &str, attribute: &str, binding: Binding) -> Option<Binding>;

    /// The declared origin of `attribute` in `unit`, if bound.
    fn attribute_origin(&self, unit: &str, attribute: &str) -> Option<String> {
        self.attribute(unit, attribute).map(|binding| binding.origin().to_string())
    }
}
