//! Dashboard configuration, read from an optional JSON file.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::data::sample::RoomSampleParams;

/// Looked up in the working directory at start-up.
pub const CONFIG_FILE: &str = "dashboard.json";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Fitted model artifact, relative to the working directory.
    pub model_path: PathBuf,
    /// Initial window size in points.
    pub window_size: [f32; 2],
    /// Distribution behind the room-count histogram.
    pub room_sample: RoomSampleParams,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("RealEstates.json"),
            window_size: [1200.0, 800.0],
            room_sample: RoomSampleParams::default(),
        }
    }
}

impl DashboardConfig {
    /// Read `path` if it exists, otherwise fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No {} found, using default configuration", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let sample = &self.room_sample;
        ensure!(sample.mean.is_finite(), "room_sample.mean must be finite");
        ensure!(
            sample.std_dev.is_finite() && sample.std_dev > 0.0,
            "room_sample.std_dev must be positive, got {}",
            sample.std_dev
        );
        ensure!(sample.size > 0, "room_sample.size must be positive");
        ensure!(
            self.window_size.iter().all(|v| v.is_finite() && *v > 0.0),
            "window_size must be positive"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = DashboardConfig::load(Path::new("no/such/dashboard.json")).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.model_path, PathBuf::from("RealEstates.json"));
        assert_eq!(config.room_sample.size, 100);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = write_config(r#"{"room_sample": {"size": 250}}"#);
        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config.room_sample.size, 250);
        assert_eq!(config.room_sample.mean, 6.2);
        assert_eq!(config.window_size, [1200.0, 800.0]);
    }

    #[test]
    fn rejects_invalid_sample_params() {
        let file = write_config(r#"{"room_sample": {"std_dev": 0.0}}"#);
        assert!(DashboardConfig::load(file.path()).is_err());

        let file = write_config(r#"{"room_sample": {"size": 0}}"#);
        assert!(DashboardConfig::load(file.path()).is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        let file = write_config("{ model_path: ");
        assert!(DashboardConfig::load(file.path()).is_err());
    }
}
