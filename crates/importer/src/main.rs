use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ga4-import")]
#[command(about = "Import a GA4 export CSV into a PostgreSQL table")]
struct Cli {
    /// CSV file produced by the exporter
    #[arg(long)]
    csv: PathBuf,

    /// Destination table (created if absent)
    #[arg(long, default_value = "ga4_export_data")]
    table: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ga4_importer=info,ga4_import=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let summary = ga4_importer::import_csv(&cli.database_url, &cli.csv, &cli.table)
        .await
        .with_context(|| format!("Importing '{}' failed", cli.csv.display()))?;

    tracing::info!(
        table = %summary.table,
        rows = summary.rows_inserted,
        "Data imported successfully"
    );
    Ok(())
}
