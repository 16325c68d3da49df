mod bootstrap;

use anyhow::{Context, Result};
use keystats_core::settings::Settings;
use keystats_data::reader::{load_key_stats, LoadOptions};
use keystats_data::report::{render_report, ReportOptions};

fn main() -> Result<()> {
    let settings = Settings::load().context("failed to load settings")?;

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("keystats v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        "Store: {}, current: {}, on-error: {:?}, top: {}",
        settings.store_dir.display(),
        settings.current_file.display(),
        settings.on_error,
        settings.top
    );

    let outcome = load_key_stats(&LoadOptions::from(&settings)).with_context(|| {
        format!(
            "failed to load key logs from {} and {}",
            settings.store_dir.display(),
            settings.current_file.display()
        )
    })?;

    print!("{}", render_report(&outcome.stats, &ReportOptions::from(&settings)));

    Ok(())
}
