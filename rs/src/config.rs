//! Engine configuration loaded from TOML
//!
//! Every section falls back to the built-in defaults, so a config file only
//! needs the values it changes:
//!
//! ```toml
//! [weights]
//! budget_fit = 0.4
//! occasion_fit = 0.2
//! persona_fit = 0.3
//! trend_score = 0.1
//!
//! [budget]
//! overshoot_allowance = 0.1
//! ```

use crate::constants::WEIGHT_SUM_TOLERANCE;
use crate::filter::{BudgetPolicy, GateTables};
use crate::profile::PriceThresholds;
use crate::scoring::{ScoringWeights, TrendConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file at {path:?}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path:?}")]
    ParseConfig {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("{message}")]
    Validation { message: String },
}

/// All tunables of the engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub weights: ScoringWeights,
    pub price: PriceThresholds,
    pub budget: BudgetPolicy,
    pub gate: GateTables,
    pub trend: TrendConfig,
}

/// Read, parse and validate a TOML config file
pub fn load(path: &Path) -> Result<EngineConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;

    let config: EngineConfig = toml::from_str(&raw).map_err(|source| ConfigError::ParseConfig {
        path: path.to_path_buf(),
        source,
    })?;

    validate(&config)?;
    info!("Loaded engine config from {}", path.display());

    Ok(config)
}

pub fn validate(config: &EngineConfig) -> Result<(), ConfigError> {
    let weights = &config.weights;
    for (name, value) in [
        ("budget_fit", weights.budget_fit),
        ("occasion_fit", weights.occasion_fit),
        ("persona_fit", weights.persona_fit),
        ("trend_score", weights.trend_score),
    ] {
        if value.is_nan() || value < 0.0 {
            return Err(invalid(format!("weights.{name} must be zero or greater.")));
        }
    }
    if (weights.sum() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(invalid(format!(
            "weights must sum to 1.0, got {}.",
            weights.sum()
        )));
    }

    let price = &config.price;
    if price.budget >= price.premium || price.premium >= price.luxury {
        return Err(invalid(
            "price thresholds must satisfy budget < premium < luxury.".to_string(),
        ));
    }

    for (name, value) in [
        ("overshoot_allowance", config.budget.overshoot_allowance),
        ("undershoot_allowance", config.budget.undershoot_allowance),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(invalid(format!("budget.{name} must be between 0 and 1.")));
        }
    }

    if config.gate.partner_markers.iter().any(|marker| marker.trim().is_empty()) {
        return Err(invalid("gate.partner_markers must not contain empty markers.".to_string()));
    }

    Ok(())
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Validation { message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&EngineConfig::default()).is_ok());
    }

    #[test]
    fn test_load_partial_config() {
        let file = write_config(
            r#"
[weights]
budget_fit = 0.4
occasion_fit = 0.2
persona_fit = 0.3
trend_score = 0.1

[budget]
overshoot_allowance = 0.1

[gate.occasions]
moederdag = ["moeder", "mama", "bloemen"]
"#,
        );

        let config = load(file.path()).unwrap();
        assert!((config.weights.budget_fit - 0.4).abs() < 1e-10);
        assert!((config.budget.overshoot_allowance - 0.1).abs() < 1e-10);
        assert_eq!(config.budget.undershoot_allowance, 0.0);
        assert_eq!(config.price, PriceThresholds::default());
        assert_eq!(config.gate.occasions.len(), 1);
        assert!(config.gate.occasions.contains_key("moederdag"));
        assert!(!config.gate.recipients.is_empty());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let file = write_config("[weights]\nbudget_fit = 0.5\n");
        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
        assert!(err.to_string().contains("sum to 1.0"));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut config = EngineConfig::default();
        config.weights.trend_score = -0.1;
        config.weights.persona_fit = 0.5;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("weights.trend_score"));
    }

    #[test]
    fn test_threshold_order_enforced() {
        let mut config = EngineConfig::default();
        config.price.premium = 150.0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_allowance_range_enforced() {
        let mut config = EngineConfig::default();
        config.budget.overshoot_allowance = 1.5;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_parse_and_read_errors() {
        let file = write_config("[weights\nbudget_fit = ");
        assert!(matches!(
            load(file.path()),
            Err(ConfigError::ParseConfig { .. })
        ));

        let missing = Path::new("/definitely/not/here/gifteez.toml");
        assert!(matches!(load(missing), Err(ConfigError::ReadConfig { .. })));
    }
}
