//! Dotted target paths such as `uuid.uuid4` or `app.models.uuid4`.

use std::fmt;

use crate::error::FreezeError;

/// A target split into its defining unit and attribute name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetPath {
    /// Unit that defines the attribute, e.g. `uuid`.
    pub unit: String,
    /// Attribute name, e.g. `uuid4`.
    pub attribute: String,
}

impl fmt::Display for TargetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.unit, self.attribute)
    }
}

/// Splits `path` on its last `.`.
///
/// # Errors
///
/// Returns [`FreezeError::InvalidPath`] when there is no separator or either
/// side of it is empty.
pub fn resolve(path: &str) -> Result<TargetPath, FreezeError> {
    match path.rsplit_once('.') {
        Some((unit, attribute)) if !unit.is_empty() && !attribute.is_empty() => {
            Ok(TargetPath { unit: unit.to_string(), attribute: attribute.to_string() })
        }
        _ => Err(FreezeError::InvalidPath(path.to_string())),
    }
}
