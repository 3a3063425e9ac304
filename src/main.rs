//! cloudspend - Summarize cloud storage usage and spend from exported account data

use cloudspend::{
    aggregation::UsageAggregator,
    billing::CostReportAggregator,
    cli::{Cli, Command},
    cost_calculator::TieredCostModel,
    error::Result,
    output::get_formatter,
    timezone::TimezoneConfig,
};
use cloudspend_provider_local::{BillingExport, StorageExport, resolve_data_dir};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Quiet unless --verbose; RUST_LOG only applies in verbose mode.
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cloudspend=info"))
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let data_dir = resolve_data_dir(cli.data_dir.clone())?;
    info!("Reading exported data from {}", data_dir.display());

    let formatter = get_formatter(cli.json);

    match cli.command {
        Command::Storage => {
            info!("Running storage usage report");

            let show_progress = !cli.json && is_terminal::is_terminal(std::io::stdout());
            let provider = StorageExport::new(&data_dir);
            let aggregator = UsageAggregator::new(Arc::new(TieredCostModel::default()))
                .with_progress(show_progress);

            let report = aggregator.aggregate(&provider).await?;
            println!("{}", formatter.format_usage(&report));
        }
        Command::Billing(args) => {
            info!("Running billing report");

            let tz_config = TimezoneConfig::from_cli(cli.timezone.as_deref(), cli.utc)?;
            info!("Using timezone: {}", tz_config.display_name());

            let query = BillingExport::new(&data_dir);
            let aggregator = CostReportAggregator::new(tz_config);

            let report = aggregator.report(&query, &args.to_request()).await?;
            println!("{}", formatter.format_cost(&report));
        }
    }

    Ok(())
}
