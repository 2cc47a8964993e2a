//! Arc paths and the staggered animation schedule.
//!
//! Every connection is drawn as a quadratic curve that bows upward. The arcs
//! are revealed one after another (`stagger_delay` apart); in looping mode
//! the whole sequence holds for `pause_time`, retracts and starts over.
//!
//! Nothing here reads a clock. Callers pass the elapsed time to
//! [`compute_frame_state`] once per animation tick and draw the returned
//! [`RenderState`]; [`AnimationClock`] is provided for callers that want a
//! ready-made elapsed-time source.

use crate::geo::{Endpoint, ProjectedPoint};
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Height of the arc's control point above the higher endpoint on the
/// 800x400 reference frame. Settings scale it to the canvas in use.
pub const REFERENCE_ARC_HEIGHT: f64 = 50.0;

/// Marker pulse period in seconds.
const PULSE_PERIOD: f64 = 2.0;
/// End markers start pulsing this long after start markers.
const END_PULSE_BEGIN: f64 = 0.5;
const PULSE_MIN_RADIUS: f64 = 3.0;
const PULSE_MAX_RADIUS: f64 = 10.0;
const PULSE_PEAK_OPACITY: f64 = 0.6;
/// Halo opacity before its pulse begins.
const PULSE_IDLE_OPACITY: f64 = 0.4;

const LABEL_REVEAL_START_DELAY: f64 = 0.3;
const LABEL_REVEAL_END_DELAY: f64 = 0.5;
const LABEL_REVEAL_STAGGER: f64 = 0.1;
const LABEL_REVEAL_DURATION: f64 = 0.5;
/// Labels rise into place from this far below.
const LABEL_REVEAL_RISE: f64 = 5.0;

// ============================================================================
// Paths
// ============================================================================

/// Quadratic Bézier from `start` to `end` through `control`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvedPath {
    pub start: ProjectedPoint,
    pub control: ProjectedPoint,
    pub end: ProjectedPoint,
}

impl CurvedPath {
    /// SVG path data (`M sx sy Q cx cy ex ey`).
    pub fn to_svg_path(&self) -> String {
        format!(
            "M {} {} Q {} {} {} {}",
            self.start.x, self.start.y, self.control.x, self.control.y, self.end.x, self.end.y
        )
    }

    /// Point on the curve at parameter `t` in [0, 1].
    pub fn point_at(&self, t: f64) -> ProjectedPoint {
        let t = t.clamp(0.0, 1.0);
        let (p0, p1, p2) = (
            self.start.to_vec2(),
            self.control.to_vec2(),
            self.end.to_vec2(),
        );
        let u = 1.0 - t;
        (p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)).into()
    }

    /// The part of the curve between parameters 0 and `t`.
    ///
    /// Lets renderers without a path-length primitive draw a partially
    /// revealed arc.
    pub fn truncated(&self, t: f64) -> CurvedPath {
        let t = t.clamp(0.0, 1.0);
        let p0 = self.start.to_vec2();
        let p1 = self.control.to_vec2();
        let control: DVec2 = p0.lerp(p1, t);
        CurvedPath {
            start: self.start,
            control: control.into(),
            end: self.point_at(t),
        }
    }
}

/// Builds the arc between two projected points.
///
/// The control point sits midway between the endpoints horizontally and
/// `arc_height` above the higher of the two, so arcs always bow upward.
pub fn curved_path(start: ProjectedPoint, end: ProjectedPoint, arc_height: f64) -> CurvedPath {
    CurvedPath {
        start,
        control: ProjectedPoint::new((start.x + end.x) / 2.0, start.y.min(end.y) - arc_height),
        end,
    }
}

// ============================================================================
// Easing
// ============================================================================

/// CSS-style cubic Bézier easing curve through (0, 0) and (1, 1).
#[derive(Debug, Clone, Copy, PartialEq)]
struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

const EASE_IN_OUT: CubicBezier = CubicBezier {
    x1: 0.42,
    y1: 0.0,
    x2: 0.58,
    y2: 1.0,
};

const EASE_OUT: CubicBezier = CubicBezier {
    x1: 0.0,
    y1: 0.0,
    x2: 0.58,
    y2: 1.0,
};

impl CubicBezier {
    fn sample(a: f64, b: f64, t: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * t * a + 3.0 * u * t * t * b + t * t * t
    }

    /// Eased progress for linear progress `x` in [0, 1].
    fn apply(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        if x == 0.0 || x == 1.0 {
            return x;
        }

        // x(t) is monotonic for control x values in [0, 1]; bisect for t
        let (mut lo, mut hi) = (0.0, 1.0);
        let mut t = x;
        for _ in 0..40 {
            let sx = Self::sample(self.x1, self.x2, t);
            if (sx - x).abs() < 1e-9 {
                break;
            }
            if sx < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }

        Self::sample(self.y1, self.y2, t)
    }
}

/// Standard ease-in-out (`cubic-bezier(0.42, 0, 0.58, 1)`).
pub fn ease_in_out(x: f64) -> f64 {
    EASE_IN_OUT.apply(x)
}

// ============================================================================
// Schedule
// ============================================================================

/// Stagger and loop parameters, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay between the start of consecutive arcs
    pub stagger_delay: f64,
    /// Time for one arc to draw completely
    pub animation_duration: f64,
    /// Hold time after the last arc finishes (looping only)
    pub pause_time: f64,
    /// Repeat the sequence forever instead of drawing once
    pub looping: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            stagger_delay: 0.2,
            animation_duration: 2.0,
            pause_time: 1.5,
            looping: true,
        }
    }
}

/// Timing of a single arc.
///
/// `start_time`, `end_time` and `reset_time` are fractions of the full cycle;
/// `delay` and `duration` are seconds and drive the one-shot mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionTiming {
    pub index: usize,
    pub start_time: f64,
    pub end_time: f64,
    pub reset_time: f64,
    pub delay: f64,
    pub duration: f64,
    pub cycle_duration: f64,
    pub looping: bool,
}

impl ConnectionTiming {
    /// Keyframe offsets for the looping animation, paired with
    /// [`ConnectionTiming::KEYFRAME_VALUES`].
    pub fn keyframe_times(&self) -> [f64; 5] {
        [0.0, self.start_time, self.end_time, self.reset_time, 1.0]
    }

    /// Drawn fraction at each keyframe: hidden, hidden, drawn, drawn, hidden.
    pub const KEYFRAME_VALUES: [f64; 5] = [0.0, 0.0, 1.0, 1.0, 0.0];

    /// Fraction of the arc drawn `time` seconds after the animation began.
    pub fn path_fraction(&self, time: f64) -> f64 {
        let time = time.max(0.0);

        if !self.looping {
            if time < self.delay {
                return 0.0;
            }
            if self.duration <= 0.0 {
                return 1.0;
            }
            return ease_in_out((time - self.delay) / self.duration);
        }

        if self.cycle_duration <= 0.0 {
            return 1.0;
        }

        let progress = (time % self.cycle_duration) / self.cycle_duration;
        let times = self.keyframe_times();
        let values = Self::KEYFRAME_VALUES;

        for k in 0..times.len() - 1 {
            let (t0, t1) = (times[k], times[k + 1]);
            if progress <= t1 {
                let span = t1 - t0;
                let local = if span > 0.0 {
                    (progress - t0) / span
                } else {
                    1.0
                };
                return values[k] + (values[k + 1] - values[k]) * ease_in_out(local);
            }
        }

        values[values.len() - 1]
    }
}

/// Timing for every connection, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationSchedule {
    /// Seconds from the first arc starting until the last one is drawn
    pub total_animation_time: f64,
    /// `total_animation_time` plus the pause
    pub full_cycle_duration: f64,
    pub timings: Vec<ConnectionTiming>,
}

impl AnimationSchedule {
    /// Builds the schedule for `count` connections.
    pub fn new(count: usize, config: &TimingConfig) -> Self {
        if count == 0 {
            return Self::default();
        }

        let total_animation_time = count as f64 * config.stagger_delay + config.animation_duration;
        let full_cycle_duration = total_animation_time + config.pause_time;

        let timings = (0..count)
            .map(|i| {
                let delay = i as f64 * config.stagger_delay;
                ConnectionTiming {
                    index: i,
                    start_time: delay / full_cycle_duration,
                    end_time: (delay + config.animation_duration) / full_cycle_duration,
                    reset_time: total_animation_time / full_cycle_duration,
                    delay,
                    duration: config.animation_duration,
                    cycle_duration: full_cycle_duration,
                    looping: config.looping,
                }
            })
            .collect();

        Self {
            total_animation_time,
            full_cycle_duration,
            timings,
        }
    }

    pub fn len(&self) -> usize {
        self.timings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ConnectionTiming> {
        self.timings.get(index)
    }
}

// ============================================================================
// Per-frame state
// ============================================================================

/// Radius and opacity of a marker's pulsing halo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerPulse {
    pub radius: f64,
    pub opacity: f64,
}

/// Halo of a start or end marker at `time` seconds.
pub fn marker_pulse(time: f64, endpoint: Endpoint) -> MarkerPulse {
    let begin = match endpoint {
        Endpoint::Start => 0.0,
        Endpoint::End => END_PULSE_BEGIN,
    };

    if time < begin {
        return MarkerPulse {
            radius: PULSE_MIN_RADIUS,
            opacity: PULSE_IDLE_OPACITY,
        };
    }

    // Linear there and back: 0 at the ends of the period, 1 in the middle
    let phase = ((time - begin) % PULSE_PERIOD) / PULSE_PERIOD;
    let swell = 1.0 - (2.0 * phase - 1.0).abs();

    MarkerPulse {
        radius: PULSE_MIN_RADIUS + (PULSE_MAX_RADIUS - PULSE_MIN_RADIUS) * swell,
        opacity: PULSE_PEAK_OPACITY * (1.0 - swell),
    }
}

/// Fade-in progress of a label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelReveal {
    pub opacity: f64,
    /// Downward offset from the resolved position; 0 once settled
    pub offset_y: f64,
}

/// Reveal state of the label on `endpoint` of connection `index`.
pub fn label_reveal(time: f64, index: usize, endpoint: Endpoint) -> LabelReveal {
    let base = match endpoint {
        Endpoint::Start => LABEL_REVEAL_START_DELAY,
        Endpoint::End => LABEL_REVEAL_END_DELAY,
    };
    let delay = base + index as f64 * LABEL_REVEAL_STAGGER;
    let progress = EASE_OUT.apply((time - delay) / LABEL_REVEAL_DURATION);

    LabelReveal {
        opacity: progress,
        offset_y: LABEL_REVEAL_RISE * (1.0 - progress),
    }
}

/// Drawn fraction of one arc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathFrame {
    pub index: usize,
    pub fraction: f64,
}

/// Pulse of one endpoint marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerFrame {
    pub index: usize,
    pub endpoint: Endpoint,
    pub pulse: MarkerPulse,
}

/// Reveal state of one resolved label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelFrame {
    /// Position in the resolved label list
    pub label: usize,
    pub reveal: LabelReveal,
}

/// Everything that changes between animation ticks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderState {
    pub time: f64,
    pub paths: Vec<PathFrame>,
    pub markers: Vec<MarkerFrame>,
    pub labels: Vec<LabelFrame>,
}

/// Computes the animated state at `time` seconds.
///
/// `label_owners[k]` names the connection and endpoint the k-th resolved
/// label belongs to.
pub fn compute_frame_state(
    schedule: &AnimationSchedule,
    label_owners: &[(usize, Endpoint)],
    time: f64,
) -> RenderState {
    let paths = schedule
        .timings
        .iter()
        .map(|t| PathFrame {
            index: t.index,
            fraction: t.path_fraction(time),
        })
        .collect();

    let markers = schedule
        .timings
        .iter()
        .flat_map(|t| {
            [Endpoint::Start, Endpoint::End].map(|endpoint| MarkerFrame {
                index: t.index,
                endpoint,
                pulse: marker_pulse(time, endpoint),
            })
        })
        .collect();

    let labels = label_owners
        .iter()
        .enumerate()
        .map(|(label, &(index, endpoint))| LabelFrame {
            label,
            reveal: label_reveal(time, index, endpoint),
        })
        .collect();

    RenderState {
        time,
        paths,
        markers,
        labels,
    }
}

/// Elapsed-time source for driving [`compute_frame_state`].
pub struct AnimationClock {
    started: web_time::Instant,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationClock {
    pub fn new() -> Self {
        Self {
            started: web_time::Instant::now(),
        }
    }

    /// Seconds since the clock was created or last restarted.
    pub fn elapsed_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub fn restart(&mut self) {
        self.started = web_time::Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_arc_bows_above_higher_endpoint() {
        let path = curved_path(
            ProjectedPoint::new(10.0, 80.0),
            ProjectedPoint::new(50.0, 60.0),
            REFERENCE_ARC_HEIGHT,
        );
        assert_eq!(path.control, ProjectedPoint::new(30.0, 10.0));
        assert_eq!(path.to_svg_path(), "M 10 80 Q 30 10 50 60");

        // Order of endpoints does not change the bow
        let reversed = curved_path(path.end, path.start, REFERENCE_ARC_HEIGHT);
        assert_eq!(reversed.control, path.control);
    }

    #[test]
    fn test_point_at_and_truncate() {
        let path = curved_path(
            ProjectedPoint::new(0.0, 50.0),
            ProjectedPoint::new(100.0, 50.0),
            40.0,
        );
        assert_eq!(path.point_at(0.0), path.start);
        assert_eq!(path.point_at(1.0), path.end);

        let mid = path.point_at(0.5);
        assert!(close(mid.x, 50.0));
        assert!(close(mid.y, 30.0));

        let half = path.truncated(0.5);
        assert_eq!(half.start, path.start);
        assert!(close(half.end.x, mid.x) && close(half.end.y, mid.y));
        assert!(close(half.control.x, 25.0) && close(half.control.y, 30.0));
    }

    #[test]
    fn test_schedule_timing() {
        let config = TimingConfig::default();
        let schedule = AnimationSchedule::new(3, &config);

        // 3 * 0.2 + 2, then + 1.5
        assert!(close(schedule.total_animation_time, 2.6));
        assert!(close(schedule.full_cycle_duration, 4.1));
        assert_eq!(schedule.len(), 3);

        let third = schedule.get(2).unwrap();
        assert!(close(third.start_time, 0.4 / 4.1));
        assert!(close(third.end_time, 2.4 / 4.1));
        assert!(close(third.reset_time, 2.6 / 4.1));
        assert!(close(third.delay, 0.4));
    }

    #[test]
    fn test_empty_schedule() {
        let schedule = AnimationSchedule::new(0, &TimingConfig::default());
        assert!(schedule.is_empty());
        assert_eq!(schedule.full_cycle_duration, 0.0);

        let state = compute_frame_state(&schedule, &[], 1.0);
        assert!(state.paths.is_empty());
        assert!(state.markers.is_empty());
        assert!(state.labels.is_empty());
    }

    #[test]
    fn test_looping_fraction() {
        let schedule = AnimationSchedule::new(3, &TimingConfig::default());
        let first = schedule.get(0).unwrap();

        assert!(close(first.path_fraction(0.0), 0.0));
        assert!(close(first.path_fraction(1.0), 0.5));
        assert!(close(first.path_fraction(2.0), 1.0));
        // Held between end and reset
        assert!(close(first.path_fraction(2.05), 1.0));
        // Retracts during the pause, then the cycle repeats
        assert!(first.path_fraction(3.0) < 1.0);
        assert!(close(first.path_fraction(schedule.full_cycle_duration + 1.0), 0.5));

        // The last arc has not started yet at 0.3s
        let third = schedule.get(2).unwrap();
        assert!(close(third.path_fraction(0.3), 0.0));
    }

    #[test]
    fn test_one_shot_fraction() {
        let config = TimingConfig {
            looping: false,
            ..Default::default()
        };
        let schedule = AnimationSchedule::new(2, &config);
        let second = schedule.get(1).unwrap();

        assert_eq!(second.path_fraction(0.1), 0.0);
        assert!(close(second.path_fraction(0.2 + 1.0), 0.5));
        assert_eq!(second.path_fraction(10.0), 1.0);
        assert_eq!(second.path_fraction(100.0), 1.0);
    }

    #[test]
    fn test_ease_in_out_shape() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert!(close(ease_in_out(0.5), 0.5));
        assert!(ease_in_out(0.25) < 0.25);
        assert!(ease_in_out(0.75) > 0.75);
    }

    #[test]
    fn test_marker_pulse() {
        let rest = marker_pulse(0.0, Endpoint::Start);
        assert!(close(rest.radius, 3.0));
        assert!(close(rest.opacity, 0.6));

        let peak = marker_pulse(1.0, Endpoint::Start);
        assert!(close(peak.radius, 10.0));
        assert!(close(peak.opacity, 0.0));

        // End markers are idle for the first half second
        let idle = marker_pulse(0.25, Endpoint::End);
        assert!(close(idle.radius, 3.0));
        assert!(close(idle.opacity, 0.4));
        assert!(close(marker_pulse(1.5, Endpoint::End).radius, 10.0));
    }

    #[test]
    fn test_label_reveal_staggered() {
        let hidden = label_reveal(0.3, 0, Endpoint::Start);
        assert_eq!(hidden.opacity, 0.0);
        assert!(close(hidden.offset_y, 5.0));

        let shown = label_reveal(0.9, 0, Endpoint::Start);
        assert_eq!(shown.opacity, 1.0);
        assert_eq!(shown.offset_y, 0.0);

        // End label of the third connection waits 0.5 + 0.2 seconds
        assert_eq!(label_reveal(0.6, 2, Endpoint::End).opacity, 0.0);
        assert!(label_reveal(0.9, 2, Endpoint::End).opacity > 0.0);
    }

    #[test]
    fn test_frame_state_shape() {
        let schedule = AnimationSchedule::new(2, &TimingConfig::default());
        let owners = [(0, Endpoint::Start), (1, Endpoint::End)];

        let state = compute_frame_state(&schedule, &owners, 1.0);

        assert_eq!(state.paths.len(), 2);
        assert_eq!(state.markers.len(), 4);
        assert_eq!(state.markers[1].endpoint, Endpoint::End);
        assert_eq!(state.labels.len(), 2);
        assert_eq!(state.labels[1].label, 1);
    }

    #[test]
    fn test_clock_advances() {
        let mut clock = AnimationClock::new();
        assert!(clock.elapsed_seconds() >= 0.0);
        clock.restart();
        assert!(clock.elapsed_seconds() < 60.0);
    }
}
