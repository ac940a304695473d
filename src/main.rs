use anyhow::Context;
use clap::Parser;
use fcc477_loader::{logging, metrics::LoadMetrics, LoaderConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "fcc477-loader")]
#[command(about = "Load an FCC Form 477 broadband CSV into an indexed SQLite table")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the Form 477 CSV export
    input: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _log_guard = logging::init_logging();
    LoadMetrics::register_metrics();
    let config = LoaderConfig::default();

    // anyhow reports the failure on exit
    let summary = fcc477_loader::load_file(&cli.input, &config).with_context(|| {
        format!(
            "loading {} into {}",
            cli.input.display(),
            config.db_path.display()
        )
    })?;

    info!(
        summary = %serde_json::to_string(&summary).unwrap_or_default(),
        "load complete"
    );
    println!("\n📊 Load Results for {}:", cli.input.display());
    println!("   Records read: {}", summary.records_read);
    println!("   Filtered (non-consumer): {}", summary.records_filtered);
    println!("   Rows written: {}", summary.rows_written);
    println!("   Elapsed: {:.1}s", summary.elapsed.as_secs_f64());

    Ok(())
}
