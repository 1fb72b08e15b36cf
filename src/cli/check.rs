//! Check command implementation

use crate::config::Config;
use clap::Args;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Also list inactive rules
    #[arg(short, long)]
    pub all: bool,
}

impl CheckArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let rules = config.validate()?;

        println!(
            "Configuration OK: {} rules ({} active)",
            rules.len(),
            rules.active_rules().count()
        );
        for rule in rules.rules() {
            if !rule.is_active && !self.all {
                continue;
            }
            println!(
                "  {:<16} product={:<8} {} {}{}",
                rule.id,
                rule.product_id,
                rule.condition,
                rule.threshold,
                if rule.is_active { "" } else { " (inactive)" }
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_rejects_bad_condition() {
        let config: Config = toml::from_str(
            r#"
            [[rules]]
            id = "alert_1"
            product_id = "1"
            condition = "sideways"
            threshold = 10
            "#,
        )
        .unwrap();

        let args = CheckArgs { all: false };
        assert!(args.execute(&config).is_err());
    }

    #[test]
    fn test_check_accepts_empty_config() {
        let args = CheckArgs { all: true };
        assert!(args.execute(&Config::default()).is_ok());
    }
}
