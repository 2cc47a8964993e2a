//! Label placement with overlap resolution.
//!
//! Each label starts centered above its marker. Labels that crowd each other
//! are pushed apart by a bounded, greedy relaxation pass; labels that end up
//! far from their marker are flagged so the renderer can draw a dashed leader
//! line back to it.

use crate::canvas::Canvas;
use crate::geo::ProjectedPoint;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Frame the reference label metrics were tuned on.
///
/// Label sizes and offsets are lengths in canvas units, so they only look
/// right relative to a frame size. [`LayoutConfig::scaled_to`] carries them
/// over to other frames.
pub const REFERENCE_CANVAS: Canvas = Canvas {
    width: 800.0,
    height: 400.0,
};

/// Factor taking lengths on [`REFERENCE_CANVAS`] to lengths on `canvas`.
///
/// Uses the tighter of the two axes so label boxes keep their aspect ratio.
pub fn layout_scale(canvas: Canvas) -> f64 {
    (canvas.width / REFERENCE_CANVAS.width).min(canvas.height / REFERENCE_CANVAS.height)
}

/// Tuning parameters for label placement.
///
/// The default is [`LayoutConfig::reference`] scaled to the world frame
/// (`Canvas::WORLD`), i.e. 25x7.5 label boxes kept 15 units apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width of every label box
    pub label_width: f64,
    /// Height of every label box
    pub label_height: f64,
    /// Minimum allowed distance between label centers
    pub min_distance: f64,
    /// How far above the anchor the label box starts
    pub vertical_offset: f64,
    /// Maximum relaxation scans per label
    pub max_attempts: usize,
    /// Extra distance added to each push so labels clear the threshold
    pub push_epsilon: f64,
    /// Displacement (either axis) beyond which a leader line is drawn
    pub leader_threshold: f64,
    /// Minimum gap between a label's top edge and its anchor below it
    pub min_clearance: f64,
    /// Offset above the anchor used when a label would violate `min_clearance`
    pub fallback_offset: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::scaled_to(Canvas::WORLD)
    }
}

impl LayoutConfig {
    /// Metrics for [`REFERENCE_CANVAS`]: 100x30 labels kept 60 units apart.
    pub fn reference() -> Self {
        Self {
            label_width: 100.0,
            label_height: 30.0,
            min_distance: 60.0,
            vertical_offset: 35.0,
            max_attempts: 20,
            push_epsilon: 5.0,
            leader_threshold: 10.0,
            min_clearance: 20.0,
            fallback_offset: 45.0,
        }
    }

    /// Reference metrics scaled to fit `canvas`.
    pub fn scaled_to(canvas: Canvas) -> Self {
        let scale = layout_scale(canvas);
        let r = Self::reference();
        Self {
            label_width: r.label_width * scale,
            label_height: r.label_height * scale,
            min_distance: r.min_distance * scale,
            vertical_offset: r.vertical_offset * scale,
            max_attempts: r.max_attempts,
            push_epsilon: r.push_epsilon * scale,
            leader_threshold: r.leader_threshold * scale,
            min_clearance: r.min_clearance * scale,
            fallback_offset: r.fallback_offset * scale,
        }
    }
}

/// A label waiting to be placed next to its anchor point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelCandidate {
    pub anchor_x: f64,
    pub anchor_y: f64,
    pub text: String,
    pub width: f64,
    pub height: f64,
}

impl LabelCandidate {
    pub fn anchor(&self) -> ProjectedPoint {
        ProjectedPoint::new(self.anchor_x, self.anchor_y)
    }

    fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    /// Top-left corner of the box when centered above the anchor.
    fn ideal_position(&self, vertical_offset: f64) -> DVec2 {
        DVec2::new(
            self.anchor_x - self.width / 2.0,
            self.anchor_y - vertical_offset,
        )
    }
}

/// Final placement of a label.
///
/// `x`/`y` is the top-left corner of the label box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub width: f64,
    pub height: f64,
    pub anchor_x: f64,
    pub anchor_y: f64,
    pub needs_leader_line: bool,
}

impl ResolvedLabel {
    pub fn anchor(&self) -> ProjectedPoint {
        ProjectedPoint::new(self.anchor_x, self.anchor_y)
    }

    pub fn center(&self) -> ProjectedPoint {
        ProjectedPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Leader line endpoints, from the anchor to the label center.
    pub fn leader_line(&self) -> (ProjectedPoint, ProjectedPoint) {
        (self.anchor(), self.center())
    }
}

/// Places labels on a canvas, pushing overlapping ones apart.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelResolver {
    config: LayoutConfig,
    canvas: Canvas,
}

impl LabelResolver {
    pub fn new(config: LayoutConfig, canvas: Canvas) -> Self {
        Self { config, canvas }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Builds a candidate of the configured size anchored at `anchor`.
    pub fn candidate(&self, anchor: ProjectedPoint, text: impl Into<String>) -> LabelCandidate {
        LabelCandidate {
            anchor_x: anchor.x,
            anchor_y: anchor.y,
            text: text.into(),
            width: self.config.label_width,
            height: self.config.label_height,
        }
    }

    /// Resolves label positions, one output per candidate in input order.
    ///
    /// Labels are relaxed one at a time against the current position of every
    /// other label, so the result depends on input order. Every position the
    /// relaxation sees is already inside the canvas and clear of its anchor,
    /// so separation is measured on final positions. Each label gets at most
    /// `max_attempts` scans; if it still overlaps after that it is left where
    /// the last push put it.
    pub fn resolve(&self, candidates: &[LabelCandidate]) -> Vec<ResolvedLabel> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let cfg = &self.config;
        let mut positions: Vec<DVec2> = candidates
            .iter()
            .map(|c| self.settle(c, c.ideal_position(cfg.vertical_offset)))
            .collect();

        for i in 0..candidates.len() {
            let positioned = self.relax(i, candidates, &positions);
            positions[i] = positioned;
        }

        candidates
            .iter()
            .zip(positions)
            .map(|(candidate, pos)| self.finish(candidate, pos))
            .collect()
    }

    /// Pushes label `i` away from its neighbours until it is clear of all of
    /// them or the attempt budget runs out.
    fn relax(&self, i: usize, candidates: &[LabelCandidate], positions: &[DVec2]) -> DVec2 {
        let cfg = &self.config;
        let min_sq = cfg.min_distance * cfg.min_distance;
        let candidate = &candidates[i];
        let half = candidate.size() / 2.0;
        let mut pos = positions[i];

        for _ in 0..cfg.max_attempts {
            let mut overlapped = false;

            for (j, other) in candidates.iter().enumerate() {
                if i == j {
                    continue;
                }

                let other_center = positions[j] + other.size() / 2.0;
                let delta = (pos + half) - other_center;
                let distance_sq = delta.length_squared();

                if distance_sq < min_sq {
                    overlapped = true;
                    let distance = distance_sq.sqrt();
                    let direction = if distance > 0.0 {
                        delta / distance
                    } else if pos.x + half.x <= self.canvas.width / 2.0 {
                        // Coincident centers: head for the wider side
                        DVec2::X
                    } else {
                        DVec2::NEG_X
                    };
                    pos += direction * (cfg.min_distance - distance + cfg.push_epsilon);
                    pos = self.settle(candidate, pos);
                }
            }

            if !overlapped {
                return pos;
            }
        }

        log::debug!(
            "Label {:?} still overlapping after {} attempts",
            candidate.text,
            cfg.max_attempts
        );
        pos
    }

    fn clamp(&self, size: DVec2, pos: DVec2) -> DVec2 {
        let (x, y) = self.canvas.clamp_box(pos.x, pos.y, size.x, size.y);
        DVec2::new(x, y)
    }

    /// Keeps a position inside the canvas and above its anchor.
    ///
    /// A label that is not at least `min_clearance` above its anchor moves to
    /// the fixed `fallback_offset` above it.
    fn settle(&self, candidate: &LabelCandidate, pos: DVec2) -> DVec2 {
        let cfg = &self.config;
        let size = candidate.size();
        let mut pos = self.clamp(size, pos);

        if pos.y >= candidate.anchor_y - cfg.min_clearance {
            pos.y = candidate.anchor_y - cfg.fallback_offset;
            pos = self.clamp(size, pos);
        }

        pos
    }

    /// Decides whether the settled label needs a leader line.
    fn finish(&self, candidate: &LabelCandidate, pos: DVec2) -> ResolvedLabel {
        let cfg = &self.config;
        let offset = (pos - candidate.ideal_position(cfg.vertical_offset)).abs();

        ResolvedLabel {
            x: pos.x,
            y: pos.y,
            text: candidate.text.clone(),
            width: candidate.width,
            height: candidate.height,
            anchor_x: candidate.anchor_x,
            anchor_y: candidate.anchor_y,
            needs_leader_line: offset.x > cfg.leader_threshold || offset.y > cfg.leader_threshold,
        }
    }
}

/// Finds the label placed for `text` at `anchor` (anchors match within one unit).
pub fn find_label<'a>(
    labels: &'a [ResolvedLabel],
    text: &str,
    anchor: ProjectedPoint,
) -> Option<&'a ResolvedLabel> {
    labels.iter().find(|l| {
        l.text == text
            && (l.anchor_x - anchor.x).abs() < 1.0
            && (l.anchor_y - anchor.y).abs() < 1.0
    })
}
