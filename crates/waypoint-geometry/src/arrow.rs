#![forbid(unsafe_code)]

//! Pointer arrow between a tooltip and its target.
//!
//! The arrow is a single quadratic curve from the tooltip anchor to the point
//! on the target boundary facing the tooltip. The control point sits on the
//! chord's perpendicular bisector, always bowing upward, at a distance of
//! [`CURVE_BASE`] scaled by the style's curve intensity.
//!
//! Drawing is progressive: [`ArrowProgress`] yields the trim parameter for
//! [`ArrowPath::trimmed`], and the head appears once the stroke is nearly
//! complete.

use std::f64::consts::PI;
use std::time::Duration;

use crate::geometry::{Point, Rect};
use crate::placement::Direction;

/// Control-point distance for a curve intensity of `1.0`.
pub const CURVE_BASE: f64 = 30.0;

/// Trim progress after which the arrowhead is drawn.
pub const HEAD_REVEAL_PROGRESS: f64 = 0.9;

/// Point on the target's boundary that the arrow should touch for a tooltip
/// placed in `direction`. `Center` points at the target's centre.
pub fn arrow_target_point(target: Rect, direction: Direction) -> Point {
    let (sx, sy) = direction.signs();
    let x = match sx {
        -1 => target.min_x(),
        1 => target.max_x(),
        _ => target.mid_x(),
    };
    let y = match sy {
        -1 => target.min_y(),
        1 => target.max_y(),
        _ => target.mid_y(),
    };
    Point::new(x, y)
}

/// A quadratic Bézier curve from the tooltip to the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowPath {
    /// Tooltip-side endpoint.
    pub start: Point,
    pub control: Point,
    /// Target-side endpoint.
    pub end: Point,
}

impl ArrowPath {
    /// Curve from `start` to `end`, bowed by `curve_intensity`.
    ///
    /// Degenerate chords (coincident or non-finite endpoints) produce a
    /// straight segment with the control point at the midpoint.
    pub fn new(start: Point, end: Point, curve_intensity: f64) -> Self {
        let mid = start.lerp(end, 0.5);
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let len = dx.hypot(dy);
        if !len.is_finite() || len <= f64::EPSILON || !curve_intensity.is_finite() {
            return Self {
                start,
                control: mid,
                end,
            };
        }

        let (mut nx, mut ny) = (dy / len, -dx / len);
        if ny > 0.0 || (ny == 0.0 && nx > 0.0) {
            nx = -nx;
            ny = -ny;
        }
        let bow = CURVE_BASE * curve_intensity;
        Self {
            start,
            control: Point::new(mid.x + nx * bow, mid.y + ny * bow),
            end,
        }
    }

    /// Point on the curve at parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        Point::new(
            u * u * self.start.x + 2.0 * u * t * self.control.x + t * t * self.end.x,
            u * u * self.start.y + 2.0 * u * t * self.control.y + t * t * self.end.y,
        )
    }

    /// Derivative of the curve at `t`, as a direction vector.
    pub fn tangent_at(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        Point::new(
            2.0 * u * (self.control.x - self.start.x) + 2.0 * t * (self.end.x - self.control.x),
            2.0 * u * (self.control.y - self.start.y) + 2.0 * t * (self.end.y - self.control.y),
        )
    }

    /// The sub-curve covering `[0, progress]`, used for the drawing animation.
    pub fn trimmed(&self, progress: f64) -> ArrowPath {
        let t = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        let q0 = self.start.lerp(self.control, t);
        let q1 = self.control.lerp(self.end, t);
        ArrowPath {
            start: self.start,
            control: q0,
            end: q0.lerp(q1, t),
        }
    }

    /// Polyline approximation with `segments` pieces (at least one).
    pub fn flatten(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f64 / segments as f64))
            .collect()
    }

    /// Approximate arc length.
    pub fn length(&self) -> f64 {
        self.flatten(32)
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }
}

/// Two wing segments meeting at the arrow tip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrowhead {
    pub left: Point,
    pub tip: Point,
    pub right: Point,
}

impl Arrowhead {
    /// Head at the end of `path`, wings `length` long, each opened
    /// `angle_deg` away from the reversed terminal tangent.
    pub fn at_end(path: &ArrowPath, length: f64, angle_deg: f64) -> Self {
        let mut tangent = path.tangent_at(1.0);
        if tangent.x.hypot(tangent.y) <= f64::EPSILON {
            tangent = Point::new(path.end.x - path.start.x, path.end.y - path.start.y);
        }
        let heading = if tangent.x.hypot(tangent.y) <= f64::EPSILON {
            0.0
        } else {
            tangent.y.atan2(tangent.x)
        };

        let back = heading + PI;
        let spread = angle_deg.to_radians();
        let tip = path.end;
        Self {
            left: Point::new(
                tip.x + length * (back - spread).cos(),
                tip.y + length * (back - spread).sin(),
            ),
            tip,
            right: Point::new(
                tip.x + length * (back + spread).cos(),
                tip.y + length * (back + spread).sin(),
            ),
        }
    }

    /// The head as two line segments, each ending at the tip.
    pub fn segments(&self) -> [(Point, Point); 2] {
        [(self.left, self.tip), (self.right, self.tip)]
    }
}

/// Drawing progress for the arrow stroke.
///
/// Progress runs from 0 to 1 over `duration` with an ease-in-out curve and
/// restarts when it reaches the end, like a looping draw-on animation. A
/// disabled animation is always fully drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowProgress {
    duration: Duration,
    elapsed: Duration,
    enabled: bool,
    repeat: bool,
}

impl ArrowProgress {
    pub fn new(duration: Duration, enabled: bool) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
            enabled,
            repeat: true,
        }
    }

    /// Stop at full progress instead of looping.
    #[must_use]
    pub fn once(mut self) -> Self {
        self.repeat = false;
        self
    }

    pub fn advance(&mut self, delta: Duration) {
        self.elapsed = self.elapsed.saturating_add(delta);
    }

    /// Restart from an empty stroke, e.g. when the step changes.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    /// Current trim parameter in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if !self.enabled || self.duration.is_zero() {
            return 1.0;
        }
        let raw = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let t = if self.repeat {
            raw.fract()
        } else {
            raw.min(1.0)
        };
        ease_in_out(t)
    }

    pub fn head_visible(&self) -> bool {
        self.progress() > HEAD_REVEAL_PROGRESS
    }
}

fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn target_points_follow_direction() {
        let t = Rect::new(10.0, 20.0, 40.0, 20.0);
        assert_eq!(arrow_target_point(t, Direction::Top), Point::new(30.0, 20.0));
        assert_eq!(arrow_target_point(t, Direction::Bottom), Point::new(30.0, 40.0));
        assert_eq!(arrow_target_point(t, Direction::Leading), Point::new(10.0, 30.0));
        assert_eq!(arrow_target_point(t, Direction::Trailing), Point::new(50.0, 30.0));
        assert_eq!(arrow_target_point(t, Direction::TopLeading), Point::new(10.0, 20.0));
        assert_eq!(
            arrow_target_point(t, Direction::BottomTrailing),
            Point::new(50.0, 40.0)
        );
        assert_eq!(arrow_target_point(t, Direction::Center), Point::new(30.0, 30.0));
    }

    #[test]
    fn horizontal_chord_bows_upward() {
        let path = ArrowPath::new(Point::new(0.0, 100.0), Point::new(100.0, 100.0), 1.0);
        assert_eq!(path.control, Point::new(50.0, 70.0));

        let reversed = ArrowPath::new(Point::new(100.0, 100.0), Point::new(0.0, 100.0), 1.0);
        assert_eq!(reversed.control, Point::new(50.0, 70.0));
    }

    #[test]
    fn intensity_scales_bow_and_zero_is_straight() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        assert_eq!(ArrowPath::new(a, b, 2.0).control, Point::new(50.0, -60.0));
        assert_eq!(ArrowPath::new(a, b, 0.0).control, Point::new(50.0, 0.0));
    }

    #[test]
    fn degenerate_chord_is_straight() {
        let p = Point::new(5.0, 5.0);
        let path = ArrowPath::new(p, p, 1.0);
        assert_eq!(path.control, p);
        let head = Arrowhead::at_end(&path, 10.0, 30.0);
        assert!(head.left.is_finite());
        assert!(head.right.is_finite());
    }

    #[test]
    fn curve_endpoints() {
        let path = ArrowPath::new(Point::new(0.0, 0.0), Point::new(80.0, 60.0), 1.0);
        assert_eq!(path.point_at(0.0), path.start);
        assert_eq!(path.point_at(1.0), path.end);
        let flat = path.flatten(8);
        assert_eq!(flat.len(), 9);
        assert_eq!(flat[0], path.start);
        assert_eq!(flat[8], path.end);
        assert!(path.length() >= path.start.distance(path.end));
    }

    #[test]
    fn trimmed_follows_original_curve() {
        let path = ArrowPath::new(Point::new(0.0, 0.0), Point::new(100.0, 40.0), 1.5);
        let half = path.trimmed(0.5);
        let expected = path.point_at(0.5);
        assert!(approx(half.end.x, expected.x));
        assert!(approx(half.end.y, expected.y));
        // A point a quarter of the way along the trimmed curve is the
        // original curve at t = 0.125.
        let inner = half.point_at(0.25);
        let outer = path.point_at(0.125);
        assert!(approx(inner.x, outer.x));
        assert!(approx(inner.y, outer.y));

        assert_eq!(path.trimmed(0.0).end, path.start);
        assert_eq!(path.trimmed(1.0).end, path.end);
        assert_eq!(path.trimmed(f64::NAN).end, path.start);
    }

    #[test]
    fn straight_arrowhead_wings_are_symmetric() {
        let path = ArrowPath::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 0.0);
        let head = Arrowhead::at_end(&path, 10.0, 45.0);
        assert_eq!(head.tip, Point::new(100.0, 0.0));
        let offset = 10.0 * (PI / 4.0).cos();
        assert!(approx(head.left.x, 100.0 - offset));
        assert!(approx(head.right.x, 100.0 - offset));
        assert!(approx(head.left.y, -head.right.y));
        assert_eq!(head.segments()[0].1, head.tip);
    }

    #[test]
    fn progress_eases_and_loops() {
        let mut p = ArrowProgress::new(Duration::from_millis(600), true);
        assert_eq!(p.progress(), 0.0);
        assert!(!p.head_visible());

        p.advance(Duration::from_millis(300));
        assert!(approx(p.progress(), 0.5));

        p.advance(Duration::from_millis(290));
        assert!(p.head_visible());

        p.advance(Duration::from_millis(10));
        assert!(approx(p.progress(), 0.0), "loops back to the start");

        p.reset();
        assert_eq!(p.progress(), 0.0);
    }

    #[test]
    fn progress_once_holds_at_end() {
        let mut p = ArrowProgress::new(Duration::from_millis(100), true).once();
        p.advance(Duration::from_secs(5));
        assert_eq!(p.progress(), 1.0);
        assert!(p.head_visible());
    }

    #[test]
    fn disabled_progress_is_complete() {
        let p = ArrowProgress::new(Duration::from_millis(600), false);
        assert_eq!(p.progress(), 1.0);
        let zero = ArrowProgress::new(Duration::ZERO, true);
        assert_eq!(zero.progress(), 1.0);
    }
}
