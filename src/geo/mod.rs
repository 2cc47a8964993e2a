//! Geographic inputs and their projection onto the map canvas.
//!
//! Callers describe connections as pairs of latitude/longitude points; this
//! module turns them into canvas coordinates that line up with the dotted
//! world background.

mod projection;
mod types;

pub use projection::Projector;
pub use types::{Connection, Endpoint, GeoPoint, ProjectedPoint};
