//! The animated connection map.
//!
//! `WorldMap` owns the derived data for one set of connections: projected
//! endpoints, resolved labels, arc paths and the animation schedule. All of
//! it is recomputed from scratch whenever the connections or settings change
//! and reused across animation ticks otherwise.

use crate::animation::{
    compute_frame_state, curved_path, AnimationSchedule, CurvedPath, RenderState,
};
use crate::geo::{Connection, Endpoint, ProjectedPoint, Projector};
use crate::layout::{find_label, LabelCandidate, LabelResolver, ResolvedLabel};
use crate::settings::MapSettings;
use serde::{Deserialize, Serialize};

/// Projected endpoints of one connection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedConnection {
    pub start: ProjectedPoint,
    pub end: ProjectedPoint,
}

impl ProjectedConnection {
    pub fn endpoint(&self, which: Endpoint) -> ProjectedPoint {
        match which {
            Endpoint::Start => self.start,
            Endpoint::End => self.end,
        }
    }
}

/// Connection map with memoized layout.
#[derive(Debug, Clone)]
pub struct WorldMap {
    connections: Vec<Connection>,
    settings: MapSettings,
    projected: Vec<ProjectedConnection>,
    labels: Vec<ResolvedLabel>,
    /// Connection index and endpoint for each entry of `labels`
    label_owners: Vec<(usize, Endpoint)>,
    paths: Vec<CurvedPath>,
    schedule: AnimationSchedule,
}

impl Default for WorldMap {
    fn default() -> Self {
        Self::new(Vec::new(), MapSettings::default())
    }
}

impl WorldMap {
    pub fn new(connections: Vec<Connection>, settings: MapSettings) -> Self {
        let mut map = Self {
            connections,
            settings,
            projected: Vec::new(),
            labels: Vec::new(),
            label_owners: Vec::new(),
            paths: Vec::new(),
            schedule: AnimationSchedule::default(),
        };
        map.recompute();
        map
    }

    /// Replaces the connection set.
    pub fn set_connections(&mut self, connections: Vec<Connection>) {
        self.connections = connections;
        self.recompute();
    }

    /// Replaces the settings (canvas, layout, timing, display flags).
    pub fn set_settings(&mut self, settings: MapSettings) {
        self.settings = settings;
        self.recompute();
    }

    fn recompute(&mut self) {
        let projector = Projector::new(self.settings.canvas);

        self.projected = self
            .connections
            .iter()
            .map(|c| ProjectedConnection {
                start: projector.project_point(&c.start),
                end: projector.project_point(&c.end),
            })
            .collect();

        self.paths = self
            .projected
            .iter()
            .map(|p| curved_path(p.start, p.end, self.settings.arc_height))
            .collect();

        self.schedule = AnimationSchedule::new(self.connections.len(), &self.settings.timing);

        let (candidates, owners) = if self.settings.show_labels {
            self.label_candidates()
        } else {
            (Vec::new(), Vec::new())
        };
        let resolver = LabelResolver::new(self.settings.layout.clone(), self.settings.canvas);
        self.labels = resolver.resolve(&candidates);
        self.label_owners = owners;

        log::debug!(
            "WorldMap: {} connections, {} labels ({} with leader lines)",
            self.connections.len(),
            self.labels.len(),
            self.labels.iter().filter(|l| l.needs_leader_line).count()
        );
    }

    /// Label candidates for every non-blank endpoint label, start before end.
    fn label_candidates(&self) -> (Vec<LabelCandidate>, Vec<(usize, Endpoint)>) {
        let layout = &self.settings.layout;
        let mut candidates = Vec::new();
        let mut owners = Vec::new();

        for (i, (conn, proj)) in self.connections.iter().zip(&self.projected).enumerate() {
            for endpoint in [Endpoint::Start, Endpoint::End] {
                let Some(text) = conn.endpoint(endpoint).display_label() else {
                    continue;
                };
                let anchor = proj.endpoint(endpoint);
                candidates.push(LabelCandidate {
                    anchor_x: anchor.x,
                    anchor_y: anchor.y,
                    text: text.to_string(),
                    width: layout.label_width,
                    height: layout.label_height,
                });
                owners.push((i, endpoint));
            }
        }

        (candidates, owners)
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }

    /// Projected endpoints, one entry per connection.
    pub fn projected(&self) -> &[ProjectedConnection] {
        &self.projected
    }

    /// Every marker position in drawing order (start, end, start, end, ...).
    pub fn markers(&self) -> Vec<ProjectedPoint> {
        self.projected.iter().flat_map(|p| [p.start, p.end]).collect()
    }

    /// Resolved labels; empty when labels are hidden.
    pub fn labels(&self) -> &[ResolvedLabel] {
        &self.labels
    }

    /// Resolved label for one end of a connection.
    pub fn label_for(&self, index: usize, endpoint: Endpoint) -> Option<&ResolvedLabel> {
        let pos = self
            .label_owners
            .iter()
            .position(|&owner| owner == (index, endpoint))?;
        self.labels.get(pos)
    }

    /// Resolved label with the given text at a marker position.
    pub fn label_at(&self, text: &str, anchor: ProjectedPoint) -> Option<&ResolvedLabel> {
        find_label(&self.labels, text, anchor)
    }

    pub fn paths(&self) -> &[CurvedPath] {
        &self.paths
    }

    pub fn schedule(&self) -> &AnimationSchedule {
        &self.schedule
    }

    /// Animated state `time` seconds after the map appeared.
    pub fn frame_state(&self, time: f64) -> RenderState {
        compute_frame_state(&self.schedule, &self.label_owners, time)
    }

    /// Tooltip text for a hovered marker.
    pub fn hover_text(&self, index: usize, endpoint: Endpoint) -> String {
        let label = self
            .connections
            .get(index)
            .and_then(|c| c.endpoint(endpoint).display_label());

        match (label, endpoint) {
            (Some(text), _) => text.to_string(),
            (None, Endpoint::Start) => format!("Location {}", index),
            (None, Endpoint::End) => format!("Destination {}", index),
        }
    }
}
