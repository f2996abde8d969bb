//! Substitution configuration: declared overrides merged onto defaults.
//!
//! Tests declare what they want as a keyword bundle (`obj_path`, `version`,
//! `namespace`, `seed`, `side_effect`, `values`). [`resolve`] validates the
//! whole bundle up front so a bad configuration never leaves a target
//! half-patched.

use serde::{Deserialize, Serialize};

use crate::error::FreezeError;
use crate::generator::Strategy;
use crate::identifier::Identifier;
use crate::path::{self, TargetPath};

/// Default target: the standard random UUID factory.
pub const DEFAULT_OBJ_PATH: &str = "uuid.uuid4";
/// Default version stamped on random draws.
pub const DEFAULT_VERSION: u8 = 4;
/// Default random seed.
pub const DEFAULT_SEED: i64 = 42;
/// Default predefined value.
pub const DEFAULT_VALUE: &str = "00000000-0000-0000-0000-000000000000";

/// Keyword arguments a test declares. Every field is optional; unknown
/// fields are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Overrides {
    /// Dotted path of the factory to patch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obj_path: Option<String>,
    /// Version stamped on random draws (1..=5).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u8>,
    /// Only patch units whose name contains this substring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Seed for the `random` strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Strategy name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_effect: Option<String>,
    /// Predefined UUID strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

impl Overrides {
    /// Reads overrides from a JSON value such as `{"seed": 1337}`.
    ///
    /// `null` means no overrides.
    ///
    /// # Errors
    ///
    /// Returns [`FreezeError::InvalidOverrides`] for unknown fields or values
    /// of the wrong type.
    pub fn from_json(value: serde_json::Value) -> Result<Self, FreezeError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(|e| FreezeError::InvalidOverrides(e.to_string()))
    }

    /// Reads overrides from YAML (or JSON) text.
    ///
    /// # Errors
    ///
    /// Returns [`FreezeError::InvalidOverrides`] when the text does not parse
    /// into a valid bundle.
    pub fn from_yaml_str(text: &str) -> Result<Self, FreezeError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| FreezeError::InvalidOverrides(e.to_string()))
    }
}

/// A fully resolved and validated substitution configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreezeConfig {
    /// Factory to patch.
    pub target: TargetPath,
    /// Version stamped on random draws.
    pub version: u8,
    /// Substring filter on unit names.
    pub namespace: Option<String>,
    /// Seed for the `random` strategy.
    pub seed: i64,
    /// Sequencing strategy.
    pub strategy: Strategy,
    /// Predefined values; non-empty unless the strategy is `random`.
    pub values: Vec<Identifier>,
}

impl Default for FreezeConfig {
    fn default() -> Self {
        Self {
            target: TargetPath { unit: "uuid".to_string(), attribute: "uuid4".to_string() },
            version: DEFAULT_VERSION,
            namespace: None,
            seed: DEFAULT_SEED,
            strategy: Strategy::default(),
            values: vec![Identifier::NIL],
        }
    }
}

impl From<&FreezeConfig> for Overrides {
    fn from(config: &FreezeConfig) -> Self {
        Self {
            obj_path: Some(config.target.to_string()),
            version: Some(config.version),
            namespace: config.namespace.clone(),
            seed: Some(config.seed),
            side_effect: Some(config.strategy.to_string()),
            values: Some(config.values.iter().map(ToString::to_string).collect()),
        }
    }
}

/// Merges `overrides` onto the defaults and validates the result.
///
/// # Errors
///
/// Fails fast with [`FreezeError::InvalidPath`], [`FreezeError::InvalidVersion`],
/// [`FreezeError::UnknownStrategy`], [`FreezeError::Format`] or
/// [`FreezeError::EmptySequence`].
pub fn resolve(overrides: Overrides) -> Result<FreezeConfig, FreezeError> {
    let defaults = FreezeConfig::default();

    let target = match overrides.obj_path.as_deref() {
        Some(obj_path) => path::resolve(obj_path)?,
        None => defaults.target,
    };

    let version = overrides.version.unwrap_or(defaults.version);
    if !(1..=5).contains(&version) {
        return Err(FreezeError::InvalidVersion(version));
    }

    let strategy = match overrides.side_effect.as_deref() {
        Some(name) => name.parse::<Strategy>()?,
        None => defaults.strategy,
    };

    let values = match overrides.values {
        Some(values) => {
            values.iter().map(String::as_str).map(Identifier::parse).collect::<Result<Vec<_>, _>>()?
        }
        None => defaults.values,
    };
    if values.is_empty() && strategy.requires_values() {
        return Err(FreezeError::EmptySequence(strategy.to_string()));
    }

    Ok(FreezeConfig {
        target,
        version,
        namespace: overrides.namespace.or(defaults.namespace),
        seed: overrides.seed.unwrap_or(defaults.seed),
        strategy,
        values,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_overrides_resolve_to_defaults() {
        let config = resolve(Overrides::default()).unwrap();
        assert_eq!(config, FreezeConfig::default());
        assert_eq!(config.target.to_string(), DEFAULT_OBJ_PATH);
        assert_eq!(config.values, vec![Identifier::parse(DEFAULT_VALUE).unwrap()]);
        assert_eq!(config.strategy, Strategy::AutoIncrement);
        assert_eq!(config.seed, 42);
        assert_eq!(config.version, 4);
        assert!(config.namespace.is_none());
    }

    #[test]
    fn overrides_replace_defaults_field_by_field() {
        let overrides = Overrides::from_json(json!({
            "obj_path": "uuid.uuid1",
            "version": 1,
            "seed": 1337,
            "side_effect": "random",
        }))
        .unwrap();
        let config = resolve(overrides).unwrap();
        assert_eq!(config.target.attribute, "uuid1");
        assert_eq!(config.version, 1);
        assert_eq!(config.seed, 1337);
        assert_eq!(config.strategy, Strategy::Random);
        assert_eq!(config.values, vec![Identifier::NIL]);
    }

    #[test]
    fn unknown_strategy_fails_resolution() {
        let overrides = Overrides { side_effect: Some("foobar".into()), ..Overrides::default() };
        assert_eq!(resolve(overrides), Err(FreezeError::UnknownStrategy("foobar".into())));
    }

    #[test]
    fn malformed_value_fails_resolution() {
        let overrides = Overrides { values: Some(vec!["nope".into()]), ..Overrides::default() };
        assert!(matches!(resolve(overrides), Err(FreezeError::Format { .. })));
    }

    #[test]
    fn empty_values_fail_unless_random() {
        let overrides = Overrides { values: Some(vec![]), ..Overrides::default() };
        assert_eq!(resolve(overrides), Err(FreezeError::EmptySequence("auto_increment".into())));

        let overrides = Overrides {
            values: Some(vec![]),
            side_effect: Some("random".into()),
            ..Overrides::default()
        };
        assert!(resolve(overrides).is_ok());
    }

    #[test]
    fn out_of_range_version_fails_resolution() {
        let overrides = Overrides { version: Some(7), ..Overrides::default() };
        assert_eq!(resolve(overrides), Err(FreezeError::InvalidVersion(7)));
    }

    #[test]
    fn bad_obj_path_fails_resolution() {
        let overrides = Overrides { obj_path: Some("uuid4".into()), ..Overrides::default() };
        assert_eq!(resolve(overrides), Err(FreezeError::InvalidPath("uuid4".into())));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = Overrides::from_json(json!({"side_effects": "cycle"})).unwrap_err();
        assert!(matches!(
            err,
            FreezeError::InvalidOverrides(ref msg) if msg.contains("side_effects")
        ));
    }

    #[test]
    fn legacy_boolean_flags_are_not_accepted() {
        // Older marker revisions used `cycle=False` / `random=True`; only
        // `side_effect` selects a strategy now.
        assert!(Overrides::from_json(json!({"random": true})).is_err());
        assert!(Overrides::from_json(json!({"cycle": false})).is_err());
    }

    #[test]
    fn null_json_means_no_overrides() {
        assert_eq!(Overrides::from_json(serde_json::Value::Null).unwrap(), Overrides::default());
    }

    #[test]
    fn yaml_overrides_parse() {
        let overrides = Overrides::from_yaml_str(
            "side_effect: values\nvalues:\n  - 11111111-0000-0000-0000-000000000000\n",
        )
        .unwrap();
        let config = resolve(overrides).unwrap();
        assert_eq!(config.strategy, Strategy::Values);
        assert_eq!(config.values.len(), 1);
    }

    #[test]
    fn resolved_config_converts_back_to_overrides() {
        let config = resolve(Overrides {
            namespace: Some("myapp".into()),
            ..Overrides::default()
        })
        .unwrap();
        let overrides = Overrides::from(&config);
        assert_eq!(resolve(overrides).unwrap(), config);
    }
}
