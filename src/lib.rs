//! Projection, label layout and arc animation for an animated world map.
//!
//! Connections between places are projected onto the frame of a dotted world
//! background, their labels are spread out so they don't collide, and the
//! arcs between them are revealed in a staggered, looping sequence.

pub mod animation;
pub mod canvas;
pub mod geo;
pub mod layout;
pub mod map;
pub mod settings;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use animation::{AnimationClock, AnimationSchedule, CurvedPath, RenderState, TimingConfig};
pub use canvas::{BackgroundFrame, Canvas, Theme, WORLD_HEIGHT, WORLD_WIDTH};
pub use geo::{Connection, Endpoint, GeoPoint, ProjectedPoint, Projector};
pub use layout::{LabelCandidate, LabelResolver, LayoutConfig, ResolvedLabel};
pub use map::WorldMap;
pub use settings::{MapSettings, SettingsError};
