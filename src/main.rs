use clap::Parser;
use momentum_price::cli::{Cli, Commands};
use momentum_price::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize telemetry
    let _telemetry = momentum_price::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Price(args) => args.execute(&config).await?,
        Commands::Rank(args) => args.execute(&config).await?,
        Commands::Flow(args) => args.execute(&config).await?,
        Commands::Config => {
            println!("Current configuration:");
            println!("  Provider: {:?}", config.provider.kind);
            if let Some(path) = &config.provider.fixture_path {
                println!("  Fixtures: {}", path.display());
            }
            println!("  Engine: min_usable_days={}", config.engine.min_usable_days);
            println!(
                "  Batch: concurrency={}, timeout={}s, years={}, min_year_bars={}",
                config.batch.concurrency,
                config.batch.symbol_timeout_secs,
                config.batch.default_years,
                config.batch.min_year_bars
            );
            println!(
                "  Telemetry: level={}, format={:?}",
                config.telemetry.log_level, config.telemetry.log_format
            );
        }
    }

    Ok(())
}
