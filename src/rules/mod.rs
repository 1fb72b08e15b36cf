//! Alert rule module
//!
//! Threshold rules and the validated, immutable rule set

mod types;

pub use types::{AlertRule, Condition, RuleError, UnknownCondition};

use crate::config::RuleConfig;
use std::collections::HashSet;

/// Ordered collection of alert rules, fixed after construction
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<AlertRule>,
}

impl RuleSet {
    /// Build a rule set, rejecting blank or duplicate ids
    pub fn new(rules: Vec<AlertRule>) -> Result<Self, RuleError> {
        let mut seen = HashSet::with_capacity(rules.len());
        for rule in &rules {
            if rule.id.trim().is_empty() {
                return Err(RuleError::EmptyRuleId);
            }
            if rule.product_id.trim().is_empty() {
                return Err(RuleError::EmptyProductId(rule.id.clone()));
            }
            if !seen.insert(rule.id.as_str()) {
                return Err(RuleError::DuplicateRuleId(rule.id.clone()));
            }
        }
        Ok(Self { rules })
    }

    /// Build a rule set from configuration entries
    ///
    /// Unknown condition strings are a configuration error rather than a
    /// rule that silently never fires.
    pub fn from_config(entries: &[RuleConfig]) -> Result<Self, RuleError> {
        let rules = entries
            .iter()
            .map(|entry| {
                let condition =
                    entry
                        .condition
                        .parse::<Condition>()
                        .map_err(|_| RuleError::InvalidCondition {
                            rule_id: entry.id.clone(),
                            condition: entry.condition.clone(),
                        })?;
                Ok(AlertRule {
                    id: entry.id.clone(),
                    product_id: entry.product_id.clone(),
                    condition,
                    threshold: entry.threshold,
                    is_active: entry.is_active,
                })
            })
            .collect::<Result<Vec<_>, RuleError>>()?;

        Self::new(rules)
    }

    /// Active rules in definition order
    pub fn active_rules(&self) -> impl Iterator<Item = &AlertRule> {
        self.rules.iter().filter(|rule| rule.is_active)
    }

    /// All rules in definition order
    pub fn rules(&self) -> &[AlertRule] {
        &self.rules
    }

    /// Look up a rule by id
    pub fn get(&self, id: &str) -> Option<&AlertRule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
