//! Editor configuration.
//!
//! Every field has a default, so a JSON file only needs the keys it changes.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{EditorError, EditorResult, Position, Size};

/// Tunables for the editor core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Duration of newly added pages, in seconds.
    pub default_page_duration: f64,
    /// Background of newly added pages.
    pub default_background: String,
    /// Lowest zoom percentage.
    pub zoom_min: u32,
    /// Highest zoom percentage.
    pub zoom_max: u32,
    /// Zoom percentage of a fresh project.
    pub initial_zoom: u32,
    /// Position delta applied to duplicated elements.
    pub duplicate_offset: Position,
    /// Wall-clock period of a playback tick, in milliseconds.
    pub tick_interval_ms: u64,
    /// Timeline advance per tick, in seconds.
    pub tick_quantum: f64,
    /// Horizontal timeline scale.
    pub pixels_per_second: f64,
    /// Unscaled canvas size.
    pub canvas_size: Size,
    /// Defaults for elements instantiated from resources.
    pub placement: PlacementDefaults,
    /// Uploaded names longer than this are shortened for display.
    pub upload_name_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_page_duration: 180.0,
            default_background: "#FCFAFF".to_string(),
            zoom_min: 10,
            zoom_max: 200,
            initial_zoom: 60,
            duplicate_offset: Position::new(20.0, 20.0),
            tick_interval_ms: 100,
            tick_quantum: 0.1,
            pixels_per_second: 10.0,
            canvas_size: Size::new(640.0, 360.0),
            placement: PlacementDefaults::default(),
            upload_name_limit: 18,
        }
    }
}

impl EditorConfig {
    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Config`] if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> EditorResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| EditorError::Config(format!("{}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| EditorError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded editor config");
        Ok(config)
    }

    /// Reject configurations the editor cannot honour.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Config`] describing the first problem found.
    pub fn validate(&self) -> EditorResult<()> {
        if self.zoom_min == 0 || self.zoom_min > self.zoom_max {
            return Err(EditorError::Config(format!(
                "zoom bounds {}..={} are invalid",
                self.zoom_min, self.zoom_max
            )));
        }
        if self.tick_interval_ms == 0 || self.tick_quantum <= 0.0 {
            return Err(EditorError::Config("playback tick must be positive".into()));
        }
        if self.pixels_per_second <= 0.0 {
            return Err(EditorError::Config("pixelsPerSecond must be positive".into()));
        }
        if self.default_page_duration <= 0.0 {
            return Err(EditorError::Config("defaultPageDuration must be positive".into()));
        }
        Ok(())
    }

    /// Clamp a zoom percentage into the configured bounds.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: i64) -> u32 {
        let clamped = zoom.clamp(i64::from(self.zoom_min), i64::from(self.zoom_max));
        // Bounds are u32, so the clamped value always fits.
        u32::try_from(clamped).unwrap_or(self.zoom_max)
    }

    /// Wall-clock tick period.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Defaults applied when a resource becomes an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlacementDefaults {
    /// Where a clicked resource lands.
    pub position: Position,
    /// Box of a new image or video element.
    pub size: Size,
    /// Duration used when the resource has none.
    pub duration: f64,
    /// Volume of new video and audio elements.
    pub volume: u8,
    /// Fade-in of new audio elements.
    pub audio_fade_in: f64,
    /// Fade-out of new audio elements.
    pub audio_fade_out: f64,
}

impl Default for PlacementDefaults {
    fn default() -> Self {
        Self {
            position: Position::new(100.0, 100.0),
            size: Size::new(200.0, 150.0),
            duration: 10.0,
            volume: 75,
            audio_fade_in: 1.5,
            audio_fade_out: 1.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_clamp_zoom() {
        let config = EditorConfig::default();
        assert_eq!(config.clamp_zoom(-50), 10);
        assert_eq!(config.clamp_zoom(0), 10);
        assert_eq!(config.clamp_zoom(60), 60);
        assert_eq!(config.clamp_zoom(500), 200);
    }

    #[test]
    fn test_partial_json_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, r#"{{"defaultPageDuration": 60, "placement": {{"volume": 50}}}}"#)
            .expect("write");

        let config = EditorConfig::from_json_file(file.path()).expect("load");
        assert!((config.default_page_duration - 60.0).abs() < f64::EPSILON);
        assert_eq!(config.placement.volume, 50);
        assert_eq!(config.placement.size, Size::new(200.0, 150.0));
        assert_eq!(config.zoom_max, 200);
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, r#"{{"zoomMin": 300}}"#).expect("write");
        let result = EditorConfig::from_json_file(file.path());
        assert!(matches!(result, Err(EditorError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = EditorConfig::from_json_file(dir.path().join("nope.json"));
        assert!(matches!(result, Err(EditorError::Config(_))));
    }
}
