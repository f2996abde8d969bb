//! UUID factory port: the callable that a registry binding points at.

use crate::error::FreezeError;
use crate::identifier::Identifier;

/// Produces UUIDs when called through a registry binding.
///
/// The live `uuid4`/`uuid1` factories and the frozen replacements installed
/// by a patch scope both implement this, so callers cannot tell them apart.
pub trait UuidFactory: Send + Sync {
    /// Generates the next identifier.
    ///
    /// # Errors
    ///
    /// Frozen factories return [`FreezeError::SequenceExhausted`] once a
    /// finite sequence runs out. Live factories never fail.
    fn generate(&self) -> Result<Identifier, FreezeError>;

    /// Short name shown in diagnostics.
    fn name(&self) -> &str;
}
