//! ==============================================================================
//! sensor.rs - local temperature source
//! ==============================================================================
//!
//! purpose:
//!     reads the cpu temperature from the kernel thermal zone file, which
//!     holds millidegrees celsius as plain text (e.g., 45231 = 45.231°C).
//!
//! relationships:
//!     - used by: poller.rs (one read per cycle, on the blocking pool)
//!
//! the trait is the seam for tests and for other boards: anything that can
//! produce a celsius value (or say why it can't) plugs into the poll loop.
//!
//! ==============================================================================

use crate::error::SensorError;

use std::path::{Path, PathBuf};

pub const THERMAL_ZONE_PATH: &str = "/sys/class/thermal/thermal_zone0/temp";

pub trait SensorSource: Send + Sync {
    fn read_celsius(&self) -> Result<f64, SensorError>;
}

/// sysfs-style thermal zone file
#[derive(Debug, Clone)]
pub struct ThermalZone {
    path: PathBuf,
}

impl ThermalZone {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ThermalZone {
    fn default() -> Self {
        Self::new(THERMAL_ZONE_PATH)
    }
}

impl SensorSource for ThermalZone {
    fn read_celsius(&self) -> Result<f64, SensorError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| SensorError::Unavailable {
            path: self.path.display().to_string(),
            source,
        })?;
        parse_millidegrees(&raw)
    }
}

/// parse an integer millidegree value and convert to degrees
pub fn parse_millidegrees(raw: &str) -> Result<f64, SensorError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .map(|milli| milli as f64 / 1000.0)
        .map_err(|_| SensorError::Malformed(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_millidegrees() {
        assert_eq!(parse_millidegrees("45231").unwrap(), 45.231);
        assert_eq!(parse_millidegrees("45000\n").unwrap(), 45.0);
        assert_eq!(parse_millidegrees("-2500").unwrap(), -2.5);
        assert_eq!(parse_millidegrees("0").unwrap(), 0.0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_millidegrees(""), Err(SensorError::Malformed(_))));
        assert!(matches!(parse_millidegrees("hot"), Err(SensorError::Malformed(_))));
        assert!(matches!(parse_millidegrees("45.2"), Err(SensorError::Malformed(_))));
    }

    #[test]
    fn test_read_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "45231\n").unwrap();

        let zone = ThermalZone::new(file.path());
        assert_eq!(zone.read_celsius().unwrap(), 45.231);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let zone = ThermalZone::new(dir.path().join("temp"));
        assert!(matches!(zone.read_celsius(), Err(SensorError::Unavailable { .. })));
    }

    #[test]
    fn test_default_path() {
        assert_eq!(ThermalZone::default().path(), Path::new(THERMAL_ZONE_PATH));
    }
}
