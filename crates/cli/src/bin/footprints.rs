use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Parser;
use parker_footprint::config::load_config;
use parker_footprint::export::{curve, footprints, metadata, writer_for_path};
use parker_footprint::pipeline::SpacecraftData;
use parker_footprint::series::CsvTelemetrySource;
use parker_footprint::spiral::FOOTPRINT_FIELD;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Trace spacecraft positions back to the Parker spiral footprint sphere"
)]
struct Cli {
    /// Run configuration (YAML, TOML, or a directory of TOML files)
    #[arg(long)]
    config: PathBuf,

    /// Directory receiving footprint CSV and JSON files
    #[arg(long, default_value = "artifacts/footprints")]
    output: PathBuf,

    /// Also write each spacecraft's spiral at the sample nearest this RFC 3339 time
    #[arg(long)]
    snapshot: Option<DateTime<Utc>>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    let mut source = CsvTelemetrySource::new(
        &config.data_dir,
        &config.position_unit,
        &config.speed_unit,
        config.fill_value,
    );
    let data = SpacecraftData::load(&mut source, &config)?;

    for record in data.records() {
        let csv_path = cli.output.join(format!("{}_footprint.csv", record.label()));
        write_to(&csv_path, |writer| {
            footprints::write_series(writer, record, FOOTPRINT_FIELD)
        })?;
        metadata::write_sidecar(
            &cli.output.join(format!("{}_footprint.json", record.label())),
            record,
        )?;
        println!(
            "{}: {} samples -> {}",
            record.label(),
            record.len(),
            csv_path.display()
        );
    }

    if let Some(at) = cli.snapshot {
        for snapshot in data.spiral_snapshot(at, &config.spiral)? {
            let path = cli.output.join(format!("{}_spiral.csv", snapshot.spacecraft));
            write_to(&path, |writer| curve::write_rows(writer, &snapshot.curve))?;
            println!(
                "{} at {}: lat {:.3} deg, lon {:.3} deg -> {}",
                snapshot.spacecraft,
                snapshot.epoch.to_rfc3339(),
                snapshot.footprint.latitude_deg(),
                snapshot.footprint.phi_deg(),
                path.display()
            );
        }
    }
    Ok(())
}

fn write_to(
    path: &Path,
    write: impl FnOnce(&mut dyn std::io::Write) -> std::io::Result<()>,
) -> anyhow::Result<()> {
    let mut writer = writer_for_path(path)?;
    write(writer.as_mut()).with_context(|| format!("writing {}", path.display()))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
