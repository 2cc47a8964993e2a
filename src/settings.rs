//! Display and layout settings for the world map.
//!
//! Settings are plain JSON so the hosting page can ship them alongside its
//! content. Every field has a default; a partial document only overrides the
//! keys it names.

use crate::animation::{TimingConfig, REFERENCE_ARC_HEIGHT};
use crate::canvas::Canvas;
use crate::layout::{layout_scale, LayoutConfig};
use serde::{Deserialize, Serialize};

/// Errors that can occur while loading settings.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// The document is not valid JSON or has the wrong shape.
    Parse(String),
    /// A value is out of its allowed range.
    Invalid(String),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Parse(msg) => write!(f, "Settings parse error: {}", msg),
            SettingsError::Invalid(msg) => write!(f, "Invalid setting: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e.to_string())
    }
}

/// Everything the map needs besides the connections themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Stroke color for arcs and markers
    pub line_color: String,
    /// Whether endpoint labels are placed and drawn
    pub show_labels: bool,
    /// Height of the arc control point above the higher endpoint
    pub arc_height: f64,
    pub timing: TimingConfig,
    pub layout: LayoutConfig,
    pub canvas: Canvas,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self::for_canvas(Canvas::WORLD)
    }
}

impl MapSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default settings with arc height and label metrics sized for `canvas`.
    pub fn for_canvas(canvas: Canvas) -> Self {
        Self {
            line_color: "#0ea5e9".to_string(),
            show_labels: true,
            arc_height: REFERENCE_ARC_HEIGHT * layout_scale(canvas),
            timing: TimingConfig::default(),
            layout: LayoutConfig::scaled_to(canvas),
            canvas,
        }
    }

    /// Parses and validates a JSON settings document.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: MapSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parses settings, falling back to defaults if the document is unusable.
    pub fn load_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded map settings");
                settings
            }
            Err(e) => {
                log::warn!("Failed to load map settings, using defaults: {}", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that every value is usable by the layout and scheduler.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let t = &self.timing;
        non_negative("timing.stagger_delay", t.stagger_delay)?;
        non_negative("timing.animation_duration", t.animation_duration)?;
        non_negative("timing.pause_time", t.pause_time)?;
        non_negative("arc_height", self.arc_height)?;

        let l = &self.layout;
        positive("layout.label_width", l.label_width)?;
        positive("layout.label_height", l.label_height)?;
        positive("layout.min_distance", l.min_distance)?;
        non_negative("layout.push_epsilon", l.push_epsilon)?;
        non_negative("layout.leader_threshold", l.leader_threshold)?;
        finite("layout.vertical_offset", l.vertical_offset)?;
        finite("layout.min_clearance", l.min_clearance)?;
        finite("layout.fallback_offset", l.fallback_offset)?;
        if l.max_attempts == 0 {
            return Err(SettingsError::Invalid(
                "layout.max_attempts must be at least 1".to_string(),
            ));
        }

        positive("canvas.width", self.canvas.width)?;
        positive("canvas.height", self.canvas.height)?;
        if l.label_width > self.canvas.width || l.label_height > self.canvas.height {
            return Err(SettingsError::Invalid(format!(
                "label box {}x{} does not fit canvas {}x{}",
                l.label_width, l.label_height, self.canvas.width, self.canvas.height
            )));
        }

        Ok(())
    }
}

fn finite(name: &str, value: f64) -> Result<(), SettingsError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SettingsError::Invalid(format!("{} must be finite", name)))
    }
}

fn non_negative(name: &str, value: f64) -> Result<(), SettingsError> {
    finite(name, value)?;
    if value < 0.0 {
        return Err(SettingsError::Invalid(format!(
            "{} must not be negative (got {})",
            name, value
        )));
    }
    Ok(())
}

fn positive(name: &str, value: f64) -> Result<(), SettingsError> {
    finite(name, value)?;
    if value <= 0.0 {
        return Err(SettingsError::Invalid(format!(
            "{} must be positive (got {})",
            name, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = MapSettings::new();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.canvas, Canvas::WORLD);
        assert!(settings.timing.looping);
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let settings =
            MapSettings::from_json(r#"{"show_labels": false, "timing": {"looping": false}}"#)
                .unwrap();

        assert!(!settings.show_labels);
        assert!(!settings.timing.looping);
        assert_eq!(settings.timing.stagger_delay, 0.2);
        assert_eq!(settings.layout.min_distance, 15.0);
        assert_eq!(settings.arc_height, 12.5);
        assert_eq!(settings.line_color, "#0ea5e9");
    }

    #[test]
    fn test_for_canvas_scales_lengths() {
        let settings = MapSettings::for_canvas(Canvas::new(800.0, 400.0));
        assert_eq!(settings.layout, LayoutConfig::reference());
        assert_eq!(settings.arc_height, REFERENCE_ARC_HEIGHT);
        assert!(settings.validate().is_ok());

        // Default label boxes leave room to separate two labels side by side
        let world = MapSettings::default();
        let l = &world.layout;
        assert!(world.canvas.width - l.label_width >= l.min_distance + l.push_epsilon);
        assert!(l.label_height < world.canvas.height / 10.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = MapSettings::from_json(r#"{"timing": {"pause_time": -1}}"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));

        let err = MapSettings::from_json(r#"{"layout": {"max_attempts": 0}}"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));

        let err = MapSettings::from_json(r#"{"layout": {"label_width": 500}}"#).unwrap_err();
        assert!(err.to_string().contains("does not fit"));
    }

    #[test]
    fn test_parse_error_falls_back() {
        let err = MapSettings::from_json("{not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));

        assert_eq!(MapSettings::load_or_default("{not json"), MapSettings::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = MapSettings::default();
        settings.line_color = "#f97316".to_string();
        let json = settings.to_json().unwrap();
        assert_eq!(MapSettings::from_json(&json).unwrap(), settings);
    }
}
