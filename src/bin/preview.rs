use anyhow::{Context, Result};
use arrow::util::pretty::pretty_format_batches;
use portreport::{pipeline::process_file, ReportConfig};
use std::{env, path::Path, process::exit};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Expect one input file and an optional config file.
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <INPUT_FILE> [REPORT_CONFIG.yaml]", args[0]);
        exit(1);
    }

    let config = match args.get(2) {
        Some(path) => ReportConfig::from_yaml_file(Path::new(path))
            .with_context(|| format!("loading config {}", path))?,
        None => ReportConfig::default(),
    };

    let table = process_file(Path::new(&args[1]), &config)
        .with_context(|| format!("processing {}", args[1]))?;
    let rows = table.num_rows();
    println!("{}", pretty_format_batches(&[table])?);
    println!("{} rows", rows);
    Ok(())
}
