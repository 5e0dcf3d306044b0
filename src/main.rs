use anyhow::{Context, Result};
use chrono::Local;
use portreport::{
    pipeline::{self, timestamped_output_path},
    ReportConfig,
};
use std::{env, fs, path::Path};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,portreport=debug"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) load config ──────────────────────────────────────────────
    let config = match env::args().nth(1) {
        Some(path) => ReportConfig::from_yaml_file(Path::new(&path))
            .with_context(|| format!("loading config {}", path))?,
        None => {
            info!("no config file given; using defaults");
            ReportConfig::default()
        }
    };
    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating {}", config.output_dir.display()))?;

    // ─── 3) run ──────────────────────────────────────────────────────
    let destination = timestamped_output_path(
        &config.output_dir,
        Local::now().naive_local(),
        &config.output_extension,
    );
    let summary = pipeline::run(&config, &destination)
        .with_context(|| format!("building report from {}", config.input_dir.display()))?;

    for path in &summary.skipped {
        info!("skipped {}", path.display());
    }
    info!(
        "wrote {} rows from {} files to {}",
        summary.rows,
        summary.processed.len(),
        summary.destination.display()
    );
    Ok(())
}
