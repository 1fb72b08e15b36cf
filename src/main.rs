use anyhow::Context;
use clap::Parser;
use price_alert::cli::{Cli, Commands};
use price_alert::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load_optional(&cli.config)? {
        Some(config) => config,
        None => {
            eprintln!("Warning: Config file {} not found", cli.config);
            eprintln!("Using default configuration");
            toml::from_str(include_str!("../config.toml.example"))
                .context("Invalid default config")?
        }
    };

    // Initialize telemetry
    price_alert::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!(config = %cli.config, "Starting price alert engine");
            args.execute(&config).await?;
        }
        Commands::Check(args) => {
            args.execute(&config)?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Engine: tick={}s grace={}ms",
                config.engine.tick_interval_secs, config.engine.grace_period_ms
            );
            println!(
                "  Queue: capacity={} overflow={:?}",
                config.queue.capacity,
                config.queue.policy()
            );
            println!(
                "  Telemetry: level={} format={:?} metrics_port={:?}",
                config.telemetry.log_level,
                config.telemetry.log_format,
                config.telemetry.metrics_port
            );
            println!("  Rules: {}", config.rules.len());
            println!("  Seed prices: {}", config.prices.len());
        }
    }

    Ok(())
}
