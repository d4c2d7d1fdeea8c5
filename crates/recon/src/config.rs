use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ReconError;
use crate::model::Floor;

pub const DEFAULT_EXPORT_BASE_URL: &str = "https://ffxivteamcraft.com/import/";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Settings threaded through reconciliation, apply and overlay calls.
///
/// Every section is optional in the TOML file; an empty file yields the
/// defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReconConfig {
    #[serde(default)]
    pub tolerance: ToleranceConfig,
    #[serde(default)]
    pub apply: ApplyConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

// ---------------------------------------------------------------------------
// Tolerance
// ---------------------------------------------------------------------------

/// Scene coordinates drift slightly from stored values, so every comparison
/// against a saved pose goes through these thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct ToleranceConfig {
    /// Max Euclidean distance for `correct_location`.
    #[serde(default = "default_position_tolerance")]
    pub position: f32,
    /// Max yaw difference in radians for `correct_rotation`.
    #[serde(default = "default_rotation_tolerance")]
    pub rotation: f32,
    /// Live candidates farther than this from the saved position are never
    /// bound. `None` = unlimited.
    #[serde(default)]
    pub max_match_distance: Option<f32>,
}

fn default_position_tolerance() -> f32 {
    0.001
}

fn default_rotation_tolerance() -> f32 {
    0.001
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            position: default_position_tolerance(),
            rotation: default_rotation_tolerance(),
            max_match_distance: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Apply + Overlay + Export
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ApplyConfig {
    /// Pause between two consecutive placements. Too low and the host
    /// drops some of them.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Interior storeys a bulk apply may touch.
    #[serde(default)]
    pub floors: FloorsConfig,
}

fn default_interval_ms() -> u64 {
    400
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            floors: FloorsConfig::default(),
        }
    }
}

impl ApplyConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FloorsConfig {
    #[serde(default = "default_true")]
    pub upper: bool,
    #[serde(default = "default_true")]
    pub ground: bool,
    #[serde(default = "default_true")]
    pub basement: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FloorsConfig {
    fn default() -> Self {
        Self {
            upper: true,
            ground: true,
            basement: true,
        }
    }
}

impl FloorsConfig {
    pub fn enabled(&self, floor: Floor) -> bool {
        match floor {
            Floor::Upper => self.upper,
            Floor::Ground => self.ground,
            Floor::Basement => self.basement,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverlayConfig {
    #[serde(default)]
    pub enabled: bool,
    /// 0 = no limit.
    #[serde(default)]
    pub draw_distance: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            draw_distance: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_EXPORT_BASE_URL.to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file. A missing file yields the defaults.
    pub fn load(path: &std::path::Path) -> Result<Self, ReconError> {
        match std::fs::read_to_string(path) {
            Ok(s) => Self::from_toml(&s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(ReconError::Io(format!("{}: {e}", path.display()))),
        }
    }

    /// `<config_dir>/layoutkeeper/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("layoutkeeper").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let tol = &self.tolerance;
        if !(tol.position.is_finite() && tol.position >= 0.0) {
            return Err(ReconError::ConfigValidation(format!(
                "tolerance.position must be a non-negative number, got {}",
                tol.position
            )));
        }
        if !(tol.rotation.is_finite() && tol.rotation >= 0.0) {
            return Err(ReconError::ConfigValidation(format!(
                "tolerance.rotation must be a non-negative number, got {}",
                tol.rotation
            )));
        }
        if let Some(max) = tol.max_match_distance {
            if !(max.is_finite() && max > 0.0) {
                return Err(ReconError::ConfigValidation(format!(
                    "tolerance.max_match_distance must be positive, got {max}"
                )));
            }
            if max < tol.position {
                return Err(ReconError::ConfigValidation(
                    "tolerance.max_match_distance is smaller than tolerance.position".into(),
                ));
            }
        }

        if !(self.overlay.draw_distance.is_finite() && self.overlay.draw_distance >= 0.0) {
            return Err(ReconError::ConfigValidation(format!(
                "overlay.draw_distance must be >= 0, got {}",
                self.overlay.draw_distance
            )));
        }

        if !(self.export.base_url.starts_with("https://") || self.export.base_url.starts_with("http://")) {
            return Err(ReconError::ConfigValidation(format!(
                "export.base_url must be an http(s) URL, got '{}'",
                self.export.base_url
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
