//! In-process registry of loaded code units.
//!
//! [`UnitRegistry`] holds the attribute bindings that application code calls
//! its UUID factories through. Units are kept in load order, which is the
//! order the reference locator reports them in.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use super::id_gen::{LiveUuid1, LiveUuid4};
use crate::error::FreezeError;
use crate::identifier::Identifier;
use crate::ports::{Binding, ModuleRegistry, UuidFactory};

/// Name of the standard unit that declares `uuid1` and `uuid4`.
pub const STDLIB_UUID_UNIT: &str = "uuid";

#[derive(Debug)]
struct Unit {
    name: String,
    attributes: HashMap<String, Binding>,
}

/// Registry of loaded units and their UUID factory bindings.
#[derive(Debug, Default)]
pub struct UnitRegistry {
    units: Mutex<Vec<Unit>>,
}

impl UnitRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the standard `uuid` unit loaded.
    #[must_use]
    pub fn with_stdlib() -> Self {
        let registry = Self::new();
        registry.define(STDLIB_UUID_UNIT, "uuid1", Arc::new(LiveUuid1::new()));
        registry.define(STDLIB_UUID_UNIT, "uuid4", Arc::new(LiveUuid4::new()));
        registry
    }

    /// Loads `unit` if it is not loaded yet.
    pub fn load_unit(&self, unit: &str) {
        let mut units = self.units.lock().expect("registry lock poisoned");
        if !units.iter().any(|u| u.name == unit) {
            units.push(Unit { name: unit.to_string(), attributes: HashMap::new() });
        }
    }

    /// Unloads `unit`, returning whether it was loaded.
    pub fn unload_unit(&self, unit: &str) -> bool {
        let mut units = self.units.lock().expect("registry lock poisoned");
        let before = units.len();
        units.retain(|u| u.name != unit);
        units.len() != before
    }

    /// Declares `attribute` in `unit`, loading the unit if needed.
    pub fn define(&self, unit: &str, attribute: &str, factory: Arc<dyn UuidFactory>) {
        self.bind(unit, attribute, Binding::new(unit, factory));
    }

    /// Binds `attribute` in `unit` to an arbitrary binding, loading the unit if
    /// needed.
    pub fn bind(&self, unit: &str, attribute: &str, binding: Binding) {
        let mut units = self.units.lock().expect("registry lock poisoned");
        match units.iter().position(|u| u.name == unit) {
            Some(index) => {
                units[index].attributes.insert(attribute.to_string(), binding);
            }
            None => {
                let attributes = HashMap::from([(attribute.to_string(), binding)]);
                units.push(Unit { name: unit.to_string(), attributes });
            }
        }
    }

    /// Copies the binding of `attribute` from `source` into `target`, the way
    /// `from source import attribute` would.
    ///
    /// The copy is taken as-is: importing a target while a patch scope is open
    /// copies the frozen binding, and the scope does not restore it later.
    ///
    /// # Errors
    ///
    /// Returns [`FreezeError::MissingAttribute`] if `source` has no such
    /// attribute.
    pub fn import_attribute(
        &self,
        target: &str,
        source: &str,
        attribute: &str,
    ) -> Result<(), FreezeError> {
        let binding = self
            .attribute(source, attribute)
            .ok_or_else(|| missing(source, attribute))?;
        self.bind(target, attribute, binding);
        Ok(())
    }

    /// Calls the factory currently bound to `attribute` in `unit`.
    ///
    /// The binding is looked up on every call, so patches installed after the
    /// caller obtained a reference to the registry are honoured.
    ///
    /// # Errors
    ///
    /// Returns [`FreezeError::MissingAttribute`] if nothing is bound, or the
    /// factory's own error.
    pub fn call(&self, unit: &str, attribute: &str) -> Result<Identifier, FreezeError> {
        let binding = self.attribute(unit, attribute).ok_or_else(|| missing(unit, attribute))?;
        // The lock is released before calling so a factory may use the registry.
        binding.call()
    }
}

fn missing(unit: &str, attribute: &str) -> FreezeError {
    FreezeError::MissingAttribute { unit: unit.to_string(), attribute: attribute.to_string() }
}

impl ModuleRegistry for UnitRegistry {
    fn loaded_units(&self) -> Vec<String> {
        let units = self.units.lock().expect("registry lock poisoned");
        units.iter().map(|u| u.name.clone()).collect()
    }

    fn attribute(&self, unit: &str, attribute: &str) -> Option<Binding> {
        let units = self.units.lock().expect("registry lock poisoned");
        units.iter().find(|u| u.name == unit)?.attributes.get(attribute).cloned()
    }

    fn replace_attribute(&self, unit: &str, attribute: &str, binding: Binding) -> Option<Binding> {
        let mut units = self.units.lock().expect("registry lock poisoned");
        let slot = units.iter_mut().find(|u| u.name == unit)?.attributes.get_mut(attribute)?;
        Some(std::mem::replace(slot, binding))
    }
}

/// The process-wide registry, with the standard `uuid` unit preloaded.
pub fn global() -> &'static UnitRegistry {
    static GLOBAL: OnceLock<UnitRegistry> = OnceLock::new();
    GLOBAL.get_or_init(UnitRegistry::with_stdlib)
}

/// Calls `uuid.uuid4` through the process-wide registry.
///
/// # Errors
///
/// Returns [`FreezeError::SequenceExhausted`] while a finite frozen sequence
/// is installed and has run out.
pub fn uuid4() -> Result<Identifier, FreezeError> {
    global().call(STDLIB_UUID_UNIT, "uuid4")
}

/// Calls `uuid.uuid1` through the process-wide registry.
///
/// # Errors
///
/// Same as [`uuid4`].
pub fn uuid1() -> Result<Identifier, FreezeError> {
    global().call(STDLIB_UUID_UNIT, "uuid1")
}
