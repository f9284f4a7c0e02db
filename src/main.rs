use clap::Parser;
use oracle_edge::cli::{Cli, Commands};
use oracle_edge::config::Config;

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
    let _guard = oracle_edge::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting trading engine");
            args.execute(config).await?;
        }
        Commands::Monitor(args) => {
            tracing::info!("Starting feed monitor");
            args.execute(config).await?;
        }
        Commands::Predict(args) => {
            tracing::info!("Starting predictor paper run");
            args.execute(config).await?;
        }
        Commands::Status => {
            println!("oracle-edge status");
            println!("  Mode: {:?}", config.execution.mode);
            println!("  Status: Not running");
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Reference: {} {}",
                config.reference_feed.base_url, config.reference_feed.symbol
            );
            println!(
                "  Oracle: {} @ {}",
                config.oracle_feed.contract, config.oracle_feed.rpc_url
            );
            println!(
                "  Entry window: {}-{}s of {}s",
                config.window.entry_start_secs, config.window.entry_end_secs, config.window.length_secs
            );
            println!(
                "  Edge: gap>={}, staleness>={}s",
                config.edge.min_gap_pct, config.edge.min_staleness_secs
            );
            println!(
                "  Risk: MaxLoss=${}, Streak={}, Cooldown={}s",
                config.risk.max_daily_loss, config.risk.loss_streak_limit, config.risk.cooldown_secs
            );
            println!(
                "  Execution: {:?}, ${} per trade",
                config.execution.mode, config.execution.position_size
            );
        }
    }

    Ok(())
}
