//! Geographic value types.

use geo_types::Coord;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A location on the globe, optionally carrying a display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, nominally [-90, 90]
    pub lat: f64,
    /// Longitude in degrees, nominally [-180, 180]
    pub lng: f64,
    /// Text shown next to the marker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            label: None,
        }
    }

    pub fn labeled(lat: f64, lng: f64, label: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            label: Some(label.into()),
        }
    }

    /// The label, if present and not blank.
    pub fn display_label(&self) -> Option<&str> {
        self.label.as_deref().filter(|l| !l.trim().is_empty())
    }
}

impl From<GeoPoint> for Coord<f64> {
    fn from(point: GeoPoint) -> Self {
        Coord {
            x: point.lng,
            y: point.lat,
        }
    }
}

impl From<Coord<f64>> for GeoPoint {
    fn from(coord: Coord<f64>) -> Self {
        GeoPoint::new(coord.y, coord.x)
    }
}

/// One animated arc on the map.
///
/// The position of a connection in its input list is its animation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub start: GeoPoint,
    pub end: GeoPoint,
}

impl Connection {
    pub fn new(start: GeoPoint, end: GeoPoint) -> Self {
        Self { start, end }
    }

    /// Returns the point at the given end of the connection.
    pub fn endpoint(&self, which: Endpoint) -> &GeoPoint {
        match which {
            Endpoint::Start => &self.start,
            Endpoint::End => &self.end,
        }
    }
}

/// Which end of a connection a marker or label belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Start,
    End,
}

/// A position on the canvas, y growing downward.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
}

impl ProjectedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_vec2(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn distance(self, other: ProjectedPoint) -> f64 {
        self.to_vec2().distance(other.to_vec2())
    }
}

impl From<DVec2> for ProjectedPoint {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label_skips_blank() {
        assert_eq!(GeoPoint::new(1.0, 2.0).display_label(), None);
        assert_eq!(GeoPoint::labeled(1.0, 2.0, "  ").display_label(), None);
        assert_eq!(
            GeoPoint::labeled(1.0, 2.0, "Jakarta").display_label(),
            Some("Jakarta")
        );
    }

    #[test]
    fn test_coord_axis_order() {
        let coord: Coord<f64> = GeoPoint::new(-6.2, 106.8).into();
        assert_eq!(coord.x, 106.8);
        assert_eq!(coord.y, -6.2);

        let back = GeoPoint::from(coord);
        assert_eq!(back.lat, -6.2);
        assert_eq!(back.lng, 106.8);
    }

    #[test]
    fn test_connection_deserializes_without_labels() {
        let json = r#"{"start":{"lat":1.35,"lng":103.8,"label":"Singapore"},"end":{"lat":13.75,"lng":100.5}}"#;
        let conn: Connection = serde_json::from_str(json).unwrap();
        assert_eq!(conn.endpoint(Endpoint::Start).display_label(), Some("Singapore"));
        assert_eq!(conn.endpoint(Endpoint::End).label, None);
    }
}
