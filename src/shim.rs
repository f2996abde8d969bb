//! Test-facing entry points.
//!
//! A test declares its intent with [`freeze_uuids!`](crate::freeze_uuids) (or
//! [`freeze`]/[`with_frozen_uuids`]) and keeps the returned [`ScopedHandle`]
//! alive for as long as UUIDs should stay frozen:
//!
//! ```
//! let _frozen = frozen_uuids::freeze_uuids!(side_effect = "random", seed = 1337).unwrap();
//! assert_eq!(
//!     frozen_uuids::uuid4().unwrap().to_string(),
//!     "b5bab1cd-8884-47a5-acef-e37b9e250d03"
//! );
//! ```

use std::collections::HashMap;
use std::sync::{Condvar, Mutex, OnceLock};
use std::thread::{self, ThreadId};

use tracing::debug;

use crate::adapters::live::global;
use crate::config::{self, FreezeConfig, Overrides};
use crate::error::FreezeError;
use crate::generator::Generator;
use crate::identifier::Identifier;
use crate::locator::{locate, LocatedReference};
use crate::patch::{self, PatchScope};
use crate::ports::ModuleRegistry;

/// Name tests use to declare frozen UUIDs.
pub const MARKER_NAME: &str = "freeze_uuids";

/// One-line marker description, as registered with a test runner.
#[must_use]
pub fn marker_description() -> String {
    format!("{MARKER_NAME}(...): use {MARKER_NAME} to freeze UUIDs")
}

/// Keeps UUIDs frozen until dropped or released.
///
/// Only bindings that existed at activation are restored. A unit that imports
/// the target while the handle is open copies the frozen binding, and keeps it
/// after release.
///
/// Field order matters: the patch scope restores bindings before the target
/// lease is given back.
pub struct ScopedHandle<'r> {
    config: FreezeConfig,
    scope: PatchScope<'r>,
    _lease: Option<TargetLease>,
}

impl ScopedHandle<'_> {
    /// The configuration this handle was activated with.
    #[must_use]
    pub fn config(&self) -> &FreezeConfig {
        &self.config
    }

    /// Bindings redirected by this handle, in installation order.
    #[must_use]
    pub fn references(&self) -> &[LocatedReference] {
        self.scope.references()
    }

    /// Number of redirected bindings.
    #[must_use]
    pub fn patched_count(&self) -> usize {
        self.scope.len()
    }

    /// Draws the next frozen identifier without going through a binding.
    ///
    /// # Errors
    ///
    /// Returns [`FreezeError::SequenceExhausted`] when a finite sequence has
    /// run out.
    pub fn next_uuid(&self) -> Result<Identifier, FreezeError> {
        self.scope.draw()
    }

    /// Restores the original bindings now.
    pub fn release(self) {
        drop(self);
    }
}

/// Activates `config` against a caller-owned registry.
///
/// # Errors
///
/// Returns a configuration error if the generator cannot be built, or
/// [`FreezeError::ReferenceVanished`] if a binding disappears mid-install.
pub fn activate_in<'r>(
    registry: &'r dyn ModuleRegistry,
    config: &FreezeConfig,
) -> Result<ScopedHandle<'r>, FreezeError> {
    let generator = Generator::from_config(config)?;
    install(registry, config, generator, None)
}

/// Activates `config` against the process-wide registry.
///
/// Only one handle per target path may be open on the process-wide registry
/// at a time. An activation from another thread blocks until the open handle
/// is dropped; one from the thread that holds it fails instead.
///
/// # Errors
///
/// Returns [`FreezeError::ScopeAlreadyActive`] if this thread already holds a
/// handle for the same target, plus everything [`activate_in`] returns.
pub fn activate_for_test(config: &FreezeConfig) -> Result<ScopedHandle<'static>, FreezeError> {
    let generator = Generator::from_config(config)?;
    let lease = TargetLease::acquire(&config.target.to_string())?;
    install(global(), config, generator, Some(lease))
}

fn install<'r>(
    registry: &'r dyn ModuleRegistry,
    config: &FreezeConfig,
    generator: Generator,
    lease: Option<TargetLease>,
) -> Result<ScopedHandle<'r>, FreezeError> {
    let references = locate(registry, &config.target, config.namespace.as_deref());
    let scope = patch::activate(registry, &references, generator)?;
    debug!(
        obj_path = %config.target,
        strategy = %config.strategy,
        patched = scope.len(),
        "froze uuids"
    );
    Ok(ScopedHandle { config: config.clone(), scope, _lease: lease })
}

/// Resolves `overrides` and activates them on the process-wide registry.
///
/// # Errors
///
/// Configuration errors surface here, before any binding is touched.
pub fn freeze(overrides: Overrides) -> Result<ScopedHandle<'static>, FreezeError> {
    let config = config::resolve(overrides)?;
    activate_for_test(&config)
}

/// Like [`freeze`], taking the declared overrides as a JSON object.
///
/// # Errors
///
/// Returns [`FreezeError::InvalidOverrides`] for unknown fields, plus
/// everything [`freeze`] returns.
pub fn freeze_json(overrides: serde_json::Value) -> Result<ScopedHandle<'static>, FreezeError> {
    freeze(Overrides::from_json(overrides)?)
}

/// Runs `body` with UUIDs frozen, restoring the originals afterwards even if
/// `body` panics.
///
/// # Errors
///
/// Returns configuration errors without running `body`.
pub fn with_frozen_uuids<T>(
    overrides: Overrides,
    body: impl FnOnce(&ScopedHandle<'static>) -> T,
) -> Result<T, FreezeError> {
    let handle = freeze(overrides)?;
    let output = body(&handle);
    handle.release();
    Ok(output)
}

/// Freezes UUIDs on the process-wide registry for the rest of the enclosing
/// scope.
///
/// Takes the same keyword arguments as the marker: `obj_path`, `version`,
/// `namespace`, `seed`, `side_effect`, `values`. Evaluates to
/// `Result<ScopedHandle<'static>, FreezeError>`.
#[macro_export]
macro_rules! freeze_uuids {
    ($($key:ident = $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut overrides = $crate::__private::serde_json::Map::new();
        $(
            overrides.insert(
                ::std::string::String::from(stringify!($key)),
                $crate::__private::serde_json::json!($value),
            );
        )*
        $crate::shim::freeze_json($crate::__private::serde_json::Value::Object(overrides))
    }};
}

/// Exclusive claim on one target path of the process-wide registry.
struct TargetLease {
    target: String,
}

type LeaseTable = (Mutex<HashMap<String, ThreadId>>, Condvar);

fn lease_table() -> &'static LeaseTable {
    static TABLE: OnceLock<LeaseTable> = OnceLock::new();
    TABLE.get_or_init(|| (Mutex::new(HashMap::new()), Condvar::new()))
}

impl TargetLease {
    /// Waits for `target` to be free, unless the calling thread is the holder.
    fn acquire(target: &str) -> Result<Self, FreezeError> {
        let me = thread::current().id();
        let (held, released) = lease_table();
        let mut held = held.lock().expect("lease table poisoned");
        while let Some(&owner) = held.get(target) {
            if owner == me {
                return Err(FreezeError::ScopeAlreadyActive { target: target.to_string() });
            }
            held = released.wait(held).expect("lease table poisoned");
        }
        held.insert(target.to_string(), me);
        Ok(Self { target: target.to_string() })
    }
}

impl Drop for TargetLease {
    fn drop(&mut self) {
        let (held, released) = lease_table();
        held.lock().expect("lease table poisoned").remove(&self.target);
        released.notify_all();
    }
}
