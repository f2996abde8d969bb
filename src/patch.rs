//! Patch lifecycle: install frozen factories, restore the originals on drop.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::error::FreezeError;
use crate::generator::Generator;
use crate::identifier::Identifier;
use crate::locator::LocatedReference;
use crate::ports::{Binding, ModuleRegistry, UuidFactory};

/// Name reported by the factories a patch installs.
pub const MOCK_NAME: &str = "FrozenUUID";

/// Factory installed in place of the real one. Every copy in a scope shares
/// the same generator.
pub struct FrozenFactory {
    generator: Arc<Mutex<Generator>>,
}

impl UuidFactory for FrozenFactory {
    fn generate(&self) -> Result<Identifier, FreezeError> {
        self.generator.lock().expect("generator lock poisoned").draw()
    }

    fn name(&self) -> &str {
        MOCK_NAME
    }
}

/// An open set of patched bindings.
///
/// Dropping the scope puts every original binding back, newest first. That
/// also happens while a panic unwinds through the owner, so a failing test
/// never leaks a frozen factory into the next one.
pub struct PatchScope<'r> {
    registry: &'r dyn ModuleRegistry,
    generator: Arc<Mutex<Generator>>,
    references: Vec<LocatedReference>,
    originals: Vec<Binding>,
}

/// Redirects every reference in `references` to one shared frozen factory
/// drawing from `generator`.
///
/// # Errors
///
/// Returns [`FreezeError::ReferenceVanished`] if a reference is no longer
/// bound. Patches installed before the failure are rolled back.
pub fn activate<'r>(
    registry: &'r dyn ModuleRegistry,
    references: &[LocatedReference],
    generator: Generator,
) -> Result<PatchScope<'r>, FreezeError> {
    let generator = Arc::new(Mutex::new(generator));
    let factory: Arc<dyn UuidFactory> =
        Arc::new(FrozenFactory { generator: Arc::clone(&generator) });
    let mut scope = PatchScope {
        registry,
        generator,
        references: Vec::with_capacity(references.len()),
        originals: Vec::with_capacity(references.len()),
    };

    for reference in references {
        let vanished = || FreezeError::ReferenceVanished {
            unit: reference.unit.clone(),
            attribute: reference.attribute.clone(),
        };
        let origin = registry
            .attribute_origin(&reference.unit, &reference.attribute)
            .ok_or_else(vanished)?;
        let replacement = Binding::new(origin, Arc::clone(&factory));
        let original = registry
            .replace_attribute(&reference.unit, &reference.attribute, replacement)
            .ok_or_else(vanished)?;
        debug!(
            unit = %reference.unit,
            attribute = %reference.attribute,
            "installed frozen uuid factory"
        );
        scope.references.push(reference.clone());
        scope.originals.push(original);
    }

    Ok(scope)
}

impl PatchScope<'_> {
    /// The references patched by this scope, in installation order.
    #[must_use]
    pub fn references(&self) -> &[LocatedReference] {
        &self.references
    }

    /// Number of patched bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.references.len()
    }

    /// Whether the scope patched nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Draws from the shared generator directly, advancing the same sequence
    /// the patched bindings see.
    ///
    /// # Errors
    ///
    /// Same as [`Generator::draw`].
    pub fn draw(&self) -> Result<Identifier, FreezeError> {
        self.generator.lock().expect("generator lock poisoned").draw()
    }

    /// Restores all original bindings now.
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for PatchScope<'_> {
    fn drop(&mut self) {
        while let (Some(reference), Some(original)) =
            (self.references.pop(), self.originals.pop())
        {
            let restored =
                self.registry.replace_attribute(&reference.unit, &reference.attribute, original);
            if restored.is_some() {
                debug!(
                    unit = %reference.unit,
                    attribute = %reference.attribute,
                    "restored original uuid factory"
                );
            } else {
                warn!(
                    unit = %reference.unit,
                    attribute = %reference.attribute,
                    "binding disappeared while patched; nothing to restore"
                );
            }
        }
    }
}
