//! Run configuration: YAML file plus command-line overrides.

use crate::error::{AppError, AppResult};
use iv_core::{Constants, Precision};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Every field is optional; unset fields keep the standard constants.
///
/// ```yaml
/// digits: 40
/// atol: "1e-16"
/// num_pts: 100
/// output_digits: 16
/// temperature_k: "298.15"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Significant decimal digits of the arithmetic context
    pub digits: Option<usize>,
    /// Residual tolerance, as a decimal string
    pub atol: Option<String>,
    pub num_pts: Option<usize>,
    /// Fraction digits of persisted numbers
    pub output_digits: Option<usize>,
    /// Cell temperature (K), as a decimal string
    pub temperature_k: Option<String>,
}

impl RunConfig {
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigFileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse run config YAML: {}", e)))
    }

    /// Fields set in `overrides` replace ours.
    pub fn merged_with(self, overrides: RunConfig) -> Self {
        Self {
            digits: overrides.digits.or(self.digits),
            atol: overrides.atol.or(self.atol),
            num_pts: overrides.num_pts.or(self.num_pts),
            output_digits: overrides.output_digits.or(self.output_digits),
            temperature_k: overrides.temperature_k.or(self.temperature_k),
        }
    }

    pub fn precision(&self) -> AppResult<Precision> {
        match self.digits {
            Some(digits) => Ok(Precision::new(digits)?),
            None => Ok(Precision::default()),
        }
    }

    /// Validate and build the constants record for a run.
    pub fn to_constants(&self) -> AppResult<Constants> {
        let precision = self.precision()?;
        let mut constants = Constants::standard(precision)?;
        if let Some(atol) = &self.atol {
            constants = constants.with_atol(precision.parse(atol)?)?;
        }
        if let Some(num_pts) = self.num_pts {
            constants = constants.with_num_pts(num_pts)?;
        }
        if let Some(output_digits) = self.output_digits {
            constants = constants.with_output_digits(output_digits)?;
        }
        if let Some(temperature) = &self.temperature_k {
            constants = constants.with_temperature(precision.parse(temperature)?)?;
        }
        Ok(constants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_standard() {
        let constants = RunConfig::default().to_constants().unwrap();
        assert_eq!(constants.precision().digits(), 40);
        assert_eq!(constants.num_pts, 100);
        assert_eq!(constants.output_digits, 16);
        assert_eq!(constants.atol, Precision::default().parse("1e-16").unwrap());
    }

    #[test]
    fn yaml_fields() {
        let config: RunConfig =
            serde_yaml::from_str("digits: 50\natol: \"1e-20\"\nnum_pts: 10\ntemperature_k: \"300\"\n")
                .unwrap();
        let constants = config.to_constants().unwrap();
        let ctx = constants.precision();
        assert_eq!(ctx.digits(), 50);
        assert_eq!(constants.num_pts, 10);
        assert_eq!(constants.atol, ctx.parse("1e-20").unwrap());
        assert_eq!(constants.temp_cell, ctx.parse("300").unwrap());
    }

    #[test]
    fn unknown_yaml_field_is_rejected() {
        assert!(serde_yaml::from_str::<RunConfig>("precision: 40\n").is_err());
    }

    #[test]
    fn overrides_win() {
        let file = RunConfig {
            num_pts: Some(50),
            atol: Some("1e-18".into()),
            ..RunConfig::default()
        };
        let cli = RunConfig {
            num_pts: Some(10),
            ..RunConfig::default()
        };
        let merged = file.merged_with(cli);
        assert_eq!(merged.num_pts, Some(10));
        assert_eq!(merged.atol.as_deref(), Some("1e-18"));
    }

    #[test]
    fn invalid_values() {
        let bad = |config: RunConfig| config.to_constants().is_err();
        assert!(bad(RunConfig {
            digits: Some(0),
            ..RunConfig::default()
        }));
        assert!(bad(RunConfig {
            atol: Some("-1".into()),
            ..RunConfig::default()
        }));
        assert!(bad(RunConfig {
            atol: Some("tiny".into()),
            ..RunConfig::default()
        }));
        assert!(bad(RunConfig {
            num_pts: Some(1),
            ..RunConfig::default()
        }));
    }
}
