use std::collections::HashSet;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::MasterError;

/// Largest accepted `division_scale`.
pub const MAX_DIVISION_SCALE: u32 = 20;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MasterConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub price: PriceConfig,
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            pipeline: PipelineConfig::default(),
            price: PriceConfig::default(),
        }
    }
}

fn default_name() -> String {
    "default".into()
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Ordered list of plugins run against every master record.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_plugins")]
    pub plugins: Vec<PluginKind>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            plugins: default_plugins(),
        }
    }
}

fn default_plugins() -> Vec<PluginKind> {
    vec![PluginKind::FrameworkAgreement, PluginKind::RobustPrice]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginKind {
    FrameworkAgreement,
    RobustPrice,
}

impl std::fmt::Display for PluginKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FrameworkAgreement => write!(f, "framework_agreement"),
            Self::RobustPrice => write!(f, "robust_price"),
        }
    }
}

// ---------------------------------------------------------------------------
// Price reconciliation
// ---------------------------------------------------------------------------

/// Tuning of the robust price selector.
///
/// Every division performed by the engine (tender price spread, closeness
/// ratios, mean, reliability) goes through [`PriceConfig::divide`] so results
/// are reproducible for a given config.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceConfig {
    /// Observations whose closeness to the median is not strictly above this are outliers.
    #[serde(default = "default_outlier_threshold")]
    pub outlier_threshold: Decimal,
    /// Fractional digits kept after each division.
    #[serde(default = "default_division_scale")]
    pub division_scale: u32,
    #[serde(default)]
    pub rounding: Rounding,
    #[serde(default)]
    pub in_group_order: InGroupOrder,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            outlier_threshold: default_outlier_threshold(),
            division_scale: default_division_scale(),
            rounding: Rounding::default(),
            in_group_order: InGroupOrder::default(),
        }
    }
}

fn default_outlier_threshold() -> Decimal {
    Decimal::new(15, 2)
}

fn default_division_scale() -> u32 {
    6
}

impl PriceConfig {
    /// `lhs / rhs` rounded to `division_scale` digits. `None` on a zero divisor or overflow.
    pub fn divide(&self, lhs: Decimal, rhs: Decimal) -> Option<Decimal> {
        lhs.checked_div(rhs)
            .map(|q| q.round_dp_with_strategy(self.division_scale, self.rounding.strategy()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    #[default]
    HalfUp,
    HalfEven,
    HalfDown,
    Up,
    Down,
    Ceiling,
    Floor,
}

impl Rounding {
    pub fn strategy(self) -> RoundingStrategy {
        match self {
            Self::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            Self::HalfEven => RoundingStrategy::MidpointNearestEven,
            Self::HalfDown => RoundingStrategy::MidpointTowardZero,
            Self::Up => RoundingStrategy::AwayFromZero,
            Self::Down => RoundingStrategy::ToZero,
            Self::Ceiling => RoundingStrategy::ToPositiveInfinity,
            Self::Floor => RoundingStrategy::ToNegativeInfinity,
        }
    }
}

/// Order in which observations of one group are scanned for the first non-outlier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InGroupOrder {
    /// The order the group was collected in.
    #[default]
    Construction,
    /// Closest to the median first; ties keep collection order.
    Closeness,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MasterConfig {
    pub fn from_toml(input: &str) -> Result<Self, MasterError> {
        let config: MasterConfig =
            toml::from_str(input).map_err(|e| MasterError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MasterError> {
        let threshold = self.price.outlier_threshold;
        if threshold.is_sign_negative() || threshold >= Decimal::ONE {
            return Err(MasterError::ConfigValidation(format!(
                "outlier_threshold must be in [0, 1), got {threshold}"
            )));
        }

        if self.price.division_scale > MAX_DIVISION_SCALE {
            return Err(MasterError::ConfigValidation(format!(
                "division_scale must be at most {MAX_DIVISION_SCALE}, got {}",
                self.price.division_scale
            )));
        }

        if self.pipeline.plugins.is_empty() {
            return Err(MasterError::ConfigValidation(
                "pipeline must list at least one plugin".into(),
            ));
        }

        let mut seen = HashSet::new();
        for plugin in &self.pipeline.plugins {
            if !seen.insert(plugin) {
                return Err(MasterError::ConfigValidation(format!(
                    "plugin '{plugin}' listed more than once"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const FULL: &str = r#"
name = "eu-tenders"

[pipeline]
plugins = ["framework_agreement", "robust_price"]

[price]
outlier_threshold = 0.2
division_scale = 4
rounding = "half_even"
in_group_order = "closeness"
"#;

    #[test]
    fn parse_full() {
        let config = MasterConfig::from_toml(FULL).unwrap();
        assert_eq!(config.name, "eu-tenders");
        assert_eq!(
            config.pipeline.plugins,
            vec![PluginKind::FrameworkAgreement, PluginKind::RobustPrice]
        );
        assert_eq!(config.price.outlier_threshold, dec!(0.2));
        assert_eq!(config.price.division_scale, 4);
        assert_eq!(config.price.rounding, Rounding::HalfEven);
        assert_eq!(config.price.in_group_order, InGroupOrder::Closeness);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = MasterConfig::from_toml("").unwrap();
        assert_eq!(config.name, "default");
        assert_eq!(config.pipeline.plugins.len(), 2);
        assert_eq!(config.price.outlier_threshold, dec!(0.15));
        assert_eq!(config.price.division_scale, 6);
        assert_eq!(config.price.rounding, Rounding::HalfUp);
        assert_eq!(config.price.in_group_order, InGroupOrder::Construction);
    }

    #[test]
    fn threshold_accepts_string() {
        let config = MasterConfig::from_toml(
            r#"
[price]
outlier_threshold = "0.25"
"#,
        )
        .unwrap();
        assert_eq!(config.price.outlier_threshold, dec!(0.25));
    }

    #[test]
    fn reject_threshold_out_of_range() {
        let err = MasterConfig::from_toml("[price]\noutlier_threshold = 1.0\n").unwrap_err();
        assert!(err.to_string().contains("outlier_threshold"));

        let err = MasterConfig::from_toml("[price]\noutlier_threshold = -0.1\n").unwrap_err();
        assert!(matches!(err, MasterError::ConfigValidation(_)));
    }

    #[test]
    fn reject_large_scale() {
        let err = MasterConfig::from_toml("[price]\ndivision_scale = 30\n").unwrap_err();
        assert!(err.to_string().contains("division_scale"));
    }

    #[test]
    fn reject_unknown_plugin() {
        let err = MasterConfig::from_toml("[pipeline]\nplugins = [\"robust_prices\"]\n");
        assert!(matches!(err, Err(MasterError::ConfigParse(_))));
    }

    #[test]
    fn reject_empty_and_duplicate_pipeline() {
        let err = MasterConfig::from_toml("[pipeline]\nplugins = []\n").unwrap_err();
        assert!(err.to_string().contains("at least one plugin"));

        let err = MasterConfig::from_toml(
            "[pipeline]\nplugins = [\"robust_price\", \"robust_price\"]\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("'robust_price' listed more than once"));
    }

    #[test]
    fn divide_rounds_half_up_at_scale() {
        let price = PriceConfig::default();
        assert_eq!(price.divide(dec!(600), dec!(700)), Some(dec!(0.857143)));
        assert_eq!(price.divide(dec!(1), dec!(8)), Some(dec!(0.125)));
        assert_eq!(price.divide(dec!(0.0000005), dec!(1)), Some(dec!(0.000001)));
        assert_eq!(price.divide(dec!(1), Decimal::ZERO), None);
    }

    #[test]
    fn divide_honours_rounding_mode() {
        let price = PriceConfig {
            division_scale: 0,
            rounding: Rounding::HalfEven,
            ..PriceConfig::default()
        };
        assert_eq!(price.divide(dec!(5), dec!(2)), Some(dec!(2)));

        let price = PriceConfig {
            division_scale: 0,
            rounding: Rounding::Down,
            ..PriceConfig::default()
        };
        assert_eq!(price.divide(dec!(7), dec!(2)), Some(dec!(3)));
    }
}
