//! Error taxonomy for UUID substitution.

/// Errors raised while configuring, installing, or drawing from a frozen UUID
/// substitution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FreezeError {
    /// A UUID string is not in a recognized textual form.
    #[error("badly formed UUID string {input:?}: {reason}")]
    Format {
        /// The rejected input.
        input: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A target path has no `.` separating unit from attribute.
    #[error("invalid object path {0:?}: expected `<unit>.<attribute>`")]
    InvalidPath(String),

    /// The side effect name is not one of the supported strategies.
    #[error("unknown side effect: {0}")]
    UnknownStrategy(String),

    /// A finite sequence was drawn past its end.
    #[error("UUID sequence exhausted after {drawn} value(s)")]
    SequenceExhausted {
        /// Number of values produced before exhaustion.
        drawn: usize,
    },

    /// Predefined values are empty but the strategy needs at least one.
    #[error("side effect `{0}` requires at least one predefined value")]
    EmptySequence(String),

    /// Declared version is outside the standard 1..=5 range.
    #[error("UUID version must be between 1 and 5, got {0}")]
    InvalidVersion(u8),

    /// The declared override bundle has an unknown or mistyped field.
    #[error("invalid freeze_uuids arguments: {0}")]
    InvalidOverrides(String),

    /// A unit has no binding for the requested attribute.
    #[error("{unit} has no attribute {attribute:?}")]
    MissingAttribute {
        /// Unit that was searched.
        unit: String,
        /// Attribute that was not found.
        attribute: String,
    },

    /// The calling thread already holds an open scope for this target on the
    /// process-wide registry.
    #[error("uuids for {target} are already frozen by an open scope on this thread")]
    ScopeAlreadyActive {
        /// Target path of the open scope.
        target: String,
    },

    /// A located binding disappeared before the patch could be installed.
    #[error("binding {unit}.{attribute} vanished before it could be patched")]
    ReferenceVanished {
        /// Unit that held the binding.
        unit: String,
        /// Attribute name of the binding.
        attribute: String,
    },
}

impl FreezeError {
    /// Returns `true` for errors that describe a malformed configuration.
    ///
    /// These are all raised during resolution, before any binding is touched.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::Format { .. }
                | Self::InvalidPath(_)
                | Self::UnknownStrategy(_)
                | Self::EmptySequence(_)
                | Self::InvalidVersion(_)
                | Self::InvalidOverrides(_)
        )
    }
}
