use std::io;

use miette::{IntoDiagnostic, Result};
use record_temps::{chart, config::Config, Climatology, Dataset};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = Config::default();

    info!("opening {}", config.data_path.display());
    let dataset = Dataset::load(&config.data_path).into_diagnostic()?;
    info!(
        observations = dataset.observations.len(),
        skipped = dataset.skipped,
        years = ?dataset.years(),
        "loaded dataset"
    );

    let climatology = Climatology::compute(&dataset, config.target_year).into_diagnostic()?;
    info!(
        baseline = %climatology.baseline_label(),
        baseline_days = climatology.baseline_high.len(),
        target_days = climatology.target_high.len(),
        "{}",
        climatology.summary()
    );

    info!("showing chart, close the window or press Escape to exit");
    chart::show(&config.station, &climatology, &config.chart).into_diagnostic()?;

    Ok(())
}
