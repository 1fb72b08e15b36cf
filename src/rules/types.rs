//! Alert rule types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Threshold comparison applied to a product's price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// Fires when price < threshold
    Below,
    /// Fires when price > threshold
    Above,
}

impl Condition {
    /// Strict comparison of `price` against `threshold`
    pub fn is_met(self, price: Decimal, threshold: Decimal) -> bool {
        match self {
            Condition::Below => price < threshold,
            Condition::Above => price > threshold,
        }
    }

    /// Human readable description used in alert messages
    pub fn message(self) -> &'static str {
        match self {
            Condition::Below => "price dropped below threshold",
            Condition::Above => "price exceeded threshold",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Below => write!(f, "below"),
            Condition::Above => write!(f, "above"),
        }
    }
}

/// Returned when a condition string is not recognised
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown condition: {0:?}")]
pub struct UnknownCondition(pub String);

impl FromStr for Condition {
    type Err = UnknownCondition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "below" => Ok(Condition::Below),
            "above" => Ok(Condition::Above),
            _ => Err(UnknownCondition(s.to_string())),
        }
    }
}

/// A named threshold condition over one product's price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRule {
    /// Unique rule identifier
    pub id: String,
    /// Product whose price is watched
    pub product_id: String,
    /// Comparison direction
    pub condition: Condition,
    /// Comparison boundary
    pub threshold: Decimal,
    /// Inactive rules are never evaluated
    pub is_active: bool,
}

impl AlertRule {
    /// Create an active rule
    pub fn new(
        id: impl Into<String>,
        product_id: impl Into<String>,
        condition: Condition,
        threshold: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            product_id: product_id.into(),
            condition,
            threshold,
            is_active: true,
        }
    }

    /// Builder-style toggle for the active flag
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Whether this rule fires for the given price
    pub fn is_triggered_by(&self, price: Decimal) -> bool {
        self.is_active && self.condition.is_met(price, self.threshold)
    }
}

/// Rule validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// Two rules share the same id
    #[error("duplicate rule id: {0}")]
    DuplicateRuleId(String),
    /// Rule id is blank
    #[error("rule id must not be empty")]
    EmptyRuleId,
    /// Product id is blank
    #[error("rule {0} has an empty product id")]
    EmptyProductId(String),
    /// Condition string is neither "below" nor "above"
    #[error("rule {rule_id} has invalid condition {condition:?} (expected \"below\" or \"above\")")]
    InvalidCondition { rule_id: String, condition: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_condition_parse() {
        assert_eq!("below".parse::<Condition>().unwrap(), Condition::Below);
        assert_eq!("ABOVE".parse::<Condition>().unwrap(), Condition::Above);
        assert_eq!(" Below ".parse::<Condition>().unwrap(), Condition::Below);
        assert_eq!(
            "crosses".parse::<Condition>(),
            Err(UnknownCondition("crosses".to_string()))
        );
    }

    #[test]
    fn test_below_is_strict() {
        let rule = AlertRule::new("alert_1", "1", Condition::Below, dec!(40000000));
        assert!(rule.is_triggered_by(dec!(39999999)));
        assert!(!rule.is_triggered_by(dec!(40000000)));
        assert!(!rule.is_triggered_by(dec!(40000001)));
    }

    #[test]
    fn test_above_is_strict() {
        let rule = AlertRule::new("alert_2", "2", Condition::Above, dec!(32000000));
        assert!(!rule.is_triggered_by(dec!(32000000)));
        assert!(rule.is_triggered_by(dec!(32000001)));
        assert!(!rule.is_triggered_by(dec!(31999999)));
    }

    #[test]
    fn test_inactive_never_triggers() {
        let below = AlertRule::new("a", "1", Condition::Below, dec!(100)).active(false);
        let above = AlertRule::new("b", "1", Condition::Above, dec!(100)).active(false);
        for price in [dec!(-1), dec!(0), dec!(99.99), dec!(100), dec!(100.01), dec!(1000000000)] {
            assert!(!below.is_triggered_by(price));
            assert!(!above.is_triggered_by(price));
        }
    }

    #[test]
    fn test_condition_messages() {
        assert_eq!(Condition::Below.message(), "price dropped below threshold");
        assert_eq!(Condition::Above.message(), "price exceeded threshold");
        assert_eq!(Condition::Above.to_string(), "above");
    }
}
