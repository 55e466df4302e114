use clap::Parser;
use sports_lines::cli::{Cli, Commands};
use sports_lines::config::Config;
use sports_lines::sport::Sport;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load_or_example(&cli.config)?;

    match cli.command {
        Commands::Run(args) => {
            let telemetry = sports_lines::telemetry::init_telemetry(&config.telemetry)?;
            tracing::info!(config = %cli.config, "Starting sports-lines");
            args.execute(config, Some(telemetry.metrics)).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  Stream server: {}", config.server.stream_addr);
            println!("  Health server: {}", config.server.http_addr);
            for worker in config.feed_workers() {
                println!(
                    "  Feed {}: {} every {}s",
                    worker.sport,
                    worker.url,
                    worker.interval.as_secs()
                );
            }
            println!("  Channel capacity: {}", config.ingest.channel_capacity);
            println!("  Sports: {}", Sport::ALL.map(|s| s.as_str()).join(", "));
        }
    }

    Ok(())
}
