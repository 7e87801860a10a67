//! Configuration models and loaders for footprint runs.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use solar_core::constants::DEFAULT_REFERENCE_RADIUS_SOLAR_RADII;
use thiserror::Error;

/// One footprint run: which spacecraft, when, where the telemetry lives, and
/// which sphere to trace onto.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PipelineConfig {
    pub spacecraft: Vec<String>,
    pub data_dir: PathBuf,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default = "default_reference_radius")]
    pub reference_radius_solar_radii: f64,
    /// Approximate number of samples to keep per spacecraft.
    #[serde(default)]
    pub downsample: Option<usize>,
    #[serde(default = "default_fill_value")]
    pub fill_value: f64,
    #[serde(default = "default_position_unit")]
    pub position_unit: String,
    #[serde(default = "default_speed_unit")]
    pub speed_unit: String,
    #[serde(default)]
    pub spiral: SpiralGridConfig,
}

/// Radius grid used when drawing spirals out from the footprint sphere.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SpiralGridConfig {
    #[serde(default = "default_outer_radius")]
    pub outer_radius_au: f64,
    #[serde(default = "default_samples")]
    pub samples: usize,
}

impl Default for SpiralGridConfig {
    fn default() -> Self {
        Self {
            outer_radius_au: default_outer_radius(),
            samples: default_samples(),
        }
    }
}

fn default_reference_radius() -> f64 {
    DEFAULT_REFERENCE_RADIUS_SOLAR_RADII
}

fn default_fill_value() -> f64 {
    -1.0e31
}

fn default_position_unit() -> String {
    "km".to_string()
}

fn default_speed_unit() -> String {
    "km/s".to_string()
}

fn default_outer_radius() -> f64 {
    1.1
}

fn default_samples() -> usize {
    1_000
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("no configuration found in {0}")]
    Empty(PathBuf),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl PipelineConfig {
    /// Reject configurations the pipeline cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spacecraft.is_empty() {
            return Err(ConfigError::Invalid("at least one spacecraft is required".into()));
        }
        if !(self.reference_radius_solar_radii > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "reference radius must be positive, got {}",
                self.reference_radius_solar_radii
            )));
        }
        if self.start >= self.end {
            return Err(ConfigError::Invalid(format!(
                "start {} is not before end {}",
                self.start, self.end
            )));
        }
        if !(self.spiral.outer_radius_au > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "spiral outer radius must be positive, got {}",
                self.spiral.outer_radius_au
            )));
        }
        if self.spiral.samples == 0 {
            return Err(ConfigError::Invalid("spiral grid needs at least one sample".into()));
        }
        Ok(())
    }
}

/// Load and validate a pipeline configuration from YAML, TOML, or the first
/// TOML file (by name) of a directory.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, ConfigError> {
    let path = path.as_ref();
    let config: PipelineConfig = load_records(path)?
        .into_iter()
        .next()
        .ok_or_else(|| ConfigError::Empty(path.to_path_buf()))?;
    config.validate()?;
    Ok(config)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(vec![serde_yaml::from_reader(reader)?])
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}
