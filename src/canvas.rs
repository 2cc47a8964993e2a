//! Shared coordinate frame for the map overlay and its dotted background.
//!
//! The background is a pre-rendered dot pattern whose SVG `viewBox` is
//! `WORLD_WIDTH × WORLD_HEIGHT`. Every overlay coordinate (markers, arcs,
//! labels) is expressed in that same frame, so these two constants are the
//! only place the frame size is written down.

use serde::{Deserialize, Serialize};

/// Width of the world frame in logical units (the background's native viewBox).
pub const WORLD_WIDTH: f64 = 210.0;
/// Height of the world frame in logical units.
pub const WORLD_HEIGHT: f64 = 100.0;

/// Logical drawing area shared by the projector and the label resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::WORLD
    }
}

impl Canvas {
    /// The frame of the dotted world background.
    pub const WORLD: Canvas = Canvas {
        width: WORLD_WIDTH,
        height: WORLD_HEIGHT,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Returns true if the point lies inside the frame (edges included).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }

    /// Clamps the top-left corner of a `w × h` box so the box stays inside the frame.
    ///
    /// Boxes larger than the frame are pinned to the origin.
    pub fn clamp_box(&self, x: f64, y: f64, w: f64, h: f64) -> (f64, f64) {
        let max_x = (self.width - w).max(0.0);
        let max_y = (self.height - h).max(0.0);
        (x.clamp(0.0, max_x), y.clamp(0.0, max_y))
    }

    /// SVG `viewBox` attribute value for this frame.
    pub fn view_box(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }
}

/// Color theme of the page hosting the map.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Grid arrangement of the background dots.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DotGrid {
    Vertical,
    #[default]
    Diagonal,
}

/// Parameters handed to the dotted background generator.
///
/// `height` is the generator's row count and must equal the frame height;
/// the generator derives its width (and therefore the viewBox) from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundFrame {
    pub height: f64,
    pub grid: DotGrid,
    pub dot_radius: f64,
    pub dot_color: String,
    pub background_color: String,
}

impl BackgroundFrame {
    /// Background parameters for the given page theme.
    pub fn for_theme(theme: Theme) -> Self {
        let (dot_color, background_color) = match theme {
            Theme::Dark => ("#FFFF7F40", "black"),
            Theme::Light => ("#00000040", "white"),
        };
        Self {
            height: WORLD_HEIGHT,
            grid: DotGrid::Diagonal,
            dot_radius: 0.22,
            dot_color: dot_color.to_string(),
            background_color: background_color.to_string(),
        }
    }

    /// The frame the generated image is declared in.
    pub fn canvas(&self) -> Canvas {
        Canvas::WORLD
    }

    /// Returns true if an overlay drawn on `canvas` lines up with this background.
    pub fn matches(&self, canvas: &Canvas) -> bool {
        let own = self.canvas();
        (own.width - canvas.width).abs() < f64::EPSILON
            && (own.height - canvas.height).abs() < f64::EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_view_box() {
        assert_eq!(Canvas::WORLD.view_box(), "0 0 210 100");
        assert!((Canvas::WORLD.aspect_ratio() - 2.1).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_box() {
        let canvas = Canvas::WORLD;
        assert_eq!(canvas.clamp_box(-5.0, -5.0, 100.0, 30.0), (0.0, 0.0));
        assert_eq!(canvas.clamp_box(150.0, 90.0, 100.0, 30.0), (110.0, 70.0));
        assert_eq!(canvas.clamp_box(40.0, 20.0, 100.0, 30.0), (40.0, 20.0));

        // Oversized boxes stay pinned to the origin
        assert_eq!(canvas.clamp_box(50.0, 50.0, 300.0, 300.0), (0.0, 0.0));
    }

    #[test]
    fn test_background_shares_frame() {
        let dark = BackgroundFrame::for_theme(Theme::Dark);
        assert!(dark.matches(&Canvas::WORLD));
        assert!(!dark.matches(&Canvas::new(800.0, 400.0)));
        assert_eq!(dark.background_color, "black");

        let light = BackgroundFrame::for_theme(Theme::Light);
        assert_eq!(light.dot_color, "#00000040");
        assert_eq!(light.grid, DotGrid::Diagonal);
    }
}
