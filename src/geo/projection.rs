//! Equirectangular (Plate Carrée) projection onto the world canvas.
//!
//! Longitude maps linearly onto x and latitude onto y, with north at y = 0.
//! This is the same mapping the dotted background is rendered with, so a
//! projected point lands on the dot pattern's rendition of that place.

use super::{GeoPoint, ProjectedPoint};
use crate::canvas::Canvas;
use geo_types::Coord;

/// Projects geographic coordinates onto a fixed-size canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    canvas: Canvas,
}

impl Default for Projector {
    fn default() -> Self {
        Self::world()
    }
}

impl Projector {
    pub fn new(canvas: Canvas) -> Self {
        Self { canvas }
    }

    /// Projector for the dotted world background frame.
    pub fn world() -> Self {
        Self::new(Canvas::WORLD)
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Converts latitude/longitude (degrees) to a canvas position.
    ///
    /// Out-of-range input is clamped rather than rejected, so the result is
    /// always inside the canvas. NaN is treated as 0 degrees.
    pub fn project(&self, lat: f64, lng: f64) -> ProjectedPoint {
        let lat = finite_or_zero(lat).clamp(-90.0, 90.0);
        let lng = finite_or_zero(lng).clamp(-180.0, 180.0);

        // Normalize first so the edges land exactly on the canvas bounds
        let x = (lng + 180.0) / 360.0 * self.canvas.width;
        // Flip Y since canvas Y increases downward
        let y = (90.0 - lat) / 180.0 * self.canvas.height;

        ProjectedPoint { x, y }
    }

    pub fn project_point(&self, point: &GeoPoint) -> ProjectedPoint {
        self.project(point.lat, point.lng)
    }

    /// Projects a `geo_types` coordinate (x = longitude, y = latitude).
    pub fn project_coord(&self, coord: Coord<f64>) -> ProjectedPoint {
        self.project(coord.y, coord.x)
    }

    /// Converts a canvas position back to (latitude, longitude).
    ///
    /// Positions outside the canvas are clamped to its edges first.
    pub fn unproject(&self, point: ProjectedPoint) -> (f64, f64) {
        let x = point.x.clamp(0.0, self.canvas.width);
        let y = point.y.clamp(0.0, self.canvas.height);

        let lng = x * (360.0 / self.canvas.width) - 180.0;
        let lat = 90.0 - y * (180.0 / self.canvas.height);

        (lat, lng)
    }
}

/// ±∞ survive the clamp, NaN would not.
fn finite_or_zero(degrees: f64) -> f64 {
    if degrees.is_nan() {
        0.0
    } else {
        degrees
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: ProjectedPoint, x: f64, y: f64) -> bool {
        (a.x - x).abs() < 1e-9 && (a.y - y).abs() < 1e-9
    }

    #[test]
    fn test_world_reference_points() {
        let projector = Projector::new(Canvas::new(210.0, 100.0));

        assert!(approx(projector.project(0.0, 0.0), 105.0, 50.0));
        assert!(approx(projector.project(90.0, -180.0), 0.0, 0.0));
        assert!(approx(projector.project(-90.0, 180.0), 210.0, 100.0));
    }

    #[test]
    fn test_clamping() {
        let projector = Projector::world();

        assert_eq!(projector.project(100.0, 20.0), projector.project(90.0, 20.0));
        assert_eq!(projector.project(10.0, -200.0), projector.project(10.0, -180.0));
        assert_eq!(
            projector.project(f64::NEG_INFINITY, f64::INFINITY),
            projector.project(-90.0, 180.0)
        );
        assert_eq!(projector.project(f64::NAN, f64::NAN), projector.project(0.0, 0.0));
    }

    #[test]
    fn test_range_and_monotonicity() {
        let projector = Projector::world();
        let canvas = projector.canvas();

        let mut last_x = f64::NEG_INFINITY;
        for step in 0..=72 {
            let lng = -180.0 + step as f64 * 5.0;
            let p = projector.project(12.5, lng);
            assert!(canvas.contains(p.x, p.y));
            assert!(p.x > last_x);
            last_x = p.x;
        }

        let mut last_y = f64::INFINITY;
        for step in 0..=36 {
            let lat = -90.0 + step as f64 * 5.0;
            let p = projector.project(lat, -33.0);
            assert!(canvas.contains(p.x, p.y));
            assert!(p.y < last_y);
            last_y = p.y;
        }
    }

    #[test]
    fn test_unproject_inverts_project() {
        let projector = Projector::world();
        // Kuala Lumpur
        let p = projector.project(3.139, 101.6869);
        let (lat, lng) = projector.unproject(p);
        assert!((lat - 3.139).abs() < 1e-9);
        assert!((lng - 101.6869).abs() < 1e-9);
    }

    #[test]
    fn test_project_coord_matches_project() {
        let projector = Projector::world();
        let coord = Coord { x: 139.65, y: 35.68 };
        assert_eq!(projector.project_coord(coord), projector.project(35.68, 139.65));
        assert_eq!(
            projector.project_point(&GeoPoint::labeled(35.68, 139.65, "Tokyo")),
            projector.project(35.68, 139.65)
        );
    }
}
