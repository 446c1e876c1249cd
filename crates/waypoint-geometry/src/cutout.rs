#![forbid(unsafe_code)]

//! Spotlight cutout shapes.
//!
//! The spotlight is a full-viewport dim fill with a transparent hole over the
//! active target. This module turns a target rectangle and a
//! [`HighlightShape`] into the hole's outline, as a small path descriptor any
//! vector renderer can replay, and answers point queries against it.
//!
//! # Invariants
//!
//! 1. `Circle` is centred on the target with a diameter of
//!    `max(width, height)`, so it always covers the whole target.
//! 2. Corner radii are clamped to half the shorter side.
//! 3. `Custom` shapes fall back to a rounded rectangle of radius
//!    [`CUSTOM_FALLBACK_RADIUS`].
//! 4. Only one hole exists at a time.

use crate::geometry::{Point, Rect, Size};

/// Corner radius of the default rectangle highlight.
pub const DEFAULT_CORNER_RADIUS: f64 = 8.0;

/// Corner radius used when a custom shape has to be approximated.
pub const CUSTOM_FALLBACK_RADIUS: f64 = 8.0;

/// Control-point distance (as a fraction of the radius) for a cubic
/// quarter-circle.
const KAPPA: f64 = 0.552_284_749_830_793_4;

/// Outline of the spotlight hole.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum HighlightShape {
    Rectangle { corner_radius: f64 },
    Circle,
    RoundedRect { corner_radius: f64 },
    /// Host-drawn shape. The core only knows its bounds and approximates it.
    Custom,
}

impl Default for HighlightShape {
    fn default() -> Self {
        Self::rectangle()
    }
}

impl HighlightShape {
    /// Rectangle with the default corner radius.
    pub const fn rectangle() -> Self {
        Self::Rectangle {
            corner_radius: DEFAULT_CORNER_RADIUS,
        }
    }
}

/// A single drawing instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo { c1: Point, c2: Point, to: Point },
    Close,
}

/// Resolved hole geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cutout {
    RoundedRect { rect: Rect, radius: f64 },
    Ellipse { rect: Rect },
}

impl Cutout {
    /// Hole for `target` drawn as `shape`.
    pub fn for_target(target: Rect, shape: &HighlightShape) -> Self {
        match *shape {
            HighlightShape::Rectangle { corner_radius }
            | HighlightShape::RoundedRect { corner_radius } => Self::rounded(target, corner_radius),
            HighlightShape::Circle => {
                let diameter = target.width.max(target.height);
                Self::Ellipse {
                    rect: Rect::centered_at(target.center(), Size::new(diameter, diameter)),
                }
            }
            HighlightShape::Custom => Self::rounded(target, CUSTOM_FALLBACK_RADIUS),
        }
    }

    fn rounded(rect: Rect, radius: f64) -> Self {
        let limit = (rect.width.min(rect.height) / 2.0).max(0.0);
        let radius = if radius.is_nan() { 0.0 } else { radius.clamp(0.0, limit) };
        Self::RoundedRect { rect, radius }
    }

    /// Grow the hole by `amount` on every side ("breathing room").
    #[must_use]
    pub fn padded(self, amount: f64) -> Self {
        match self {
            Self::RoundedRect { rect, radius } => Self::rounded(rect.outset(amount), radius + amount),
            Self::Ellipse { rect } => Self::Ellipse {
                rect: rect.outset(amount),
            },
        }
    }

    /// Bounding box of the hole.
    pub fn bounds(&self) -> Rect {
        match *self {
            Self::RoundedRect { rect, .. } | Self::Ellipse { rect } => rect,
        }
    }

    /// Whether `point` lies inside the hole (boundary inclusive).
    pub fn contains(&self, point: Point) -> bool {
        match *self {
            Self::RoundedRect { rect, radius } => {
                if point.x < rect.min_x()
                    || point.x > rect.max_x()
                    || point.y < rect.min_y()
                    || point.y > rect.max_y()
                {
                    return false;
                }
                if radius <= 0.0 {
                    return true;
                }
                let cx = point.x.clamp(rect.min_x() + radius, rect.max_x() - radius);
                let cy = point.y.clamp(rect.min_y() + radius, rect.max_y() - radius);
                point.distance(Point::new(cx, cy)) <= radius
            }
            Self::Ellipse { rect } => {
                let rx = rect.width / 2.0;
                let ry = rect.height / 2.0;
                if rx <= 0.0 || ry <= 0.0 {
                    return false;
                }
                let dx = (point.x - rect.mid_x()) / rx;
                let dy = (point.y - rect.mid_y()) / ry;
                dx * dx + dy * dy <= 1.0
            }
        }
    }

    /// Outline as a closed path, clockwise from the top edge.
    pub fn to_path(&self) -> Vec<PathCommand> {
        match *self {
            Self::RoundedRect { rect, radius } => rounded_rect_path(rect, radius),
            Self::Ellipse { rect } => ellipse_path(rect),
        }
    }
}

fn rounded_rect_path(rect: Rect, r: f64) -> Vec<PathCommand> {
    let (x0, y0, x1, y1) = (rect.min_x(), rect.min_y(), rect.max_x(), rect.max_y());
    if r <= 0.0 {
        return vec![
            PathCommand::MoveTo(Point::new(x0, y0)),
            PathCommand::LineTo(Point::new(x1, y0)),
            PathCommand::LineTo(Point::new(x1, y1)),
            PathCommand::LineTo(Point::new(x0, y1)),
            PathCommand::Close,
        ];
    }

    let k = r * KAPPA;
    vec![
        PathCommand::MoveTo(Point::new(x0 + r, y0)),
        PathCommand::LineTo(Point::new(x1 - r, y0)),
        PathCommand::CubicTo {
            c1: Point::new(x1 - r + k, y0),
            c2: Point::new(x1, y0 + r - k),
            to: Point::new(x1, y0 + r),
        },
        PathCommand::LineTo(Point::new(x1, y1 - r)),
        PathCommand::CubicTo {
            c1: Point::new(x1, y1 - r + k),
            c2: Point::new(x1 - r + k, y1),
            to: Point::new(x1 - r, y1),
        },
        PathCommand::LineTo(Point::new(x0 + r, y1)),
        PathCommand::CubicTo {
            c1: Point::new(x0 + r - k, y1),
            c2: Point::new(x0, y1 - r + k),
            to: Point::new(x0, y1 - r),
        },
        PathCommand::LineTo(Point::new(x0, y0 + r)),
        PathCommand::CubicTo {
            c1: Point::new(x0, y0 + r - k),
            c2: Point::new(x0 + r - k, y0),
            to: Point::new(x0 + r, y0),
        },
        PathCommand::Close,
    ]
}

fn ellipse_path(rect: Rect) -> Vec<PathCommand> {
    let (cx, cy) = (rect.mid_x(), rect.mid_y());
    let (rx, ry) = (rect.width / 2.0, rect.height / 2.0);
    let (ox, oy) = (rx * KAPPA, ry * KAPPA);
    vec![
        PathCommand::MoveTo(Point::new(cx + rx, cy)),
        PathCommand::CubicTo {
            c1: Point::new(cx + rx, cy + oy),
            c2: Point::new(cx + ox, cy + ry),
            to: Point::new(cx, cy + ry),
        },
        PathCommand::CubicTo {
            c1: Point::new(cx - ox, cy + ry),
            c2: Point::new(cx - rx, cy + oy),
            to: Point::new(cx - rx, cy),
        },
        PathCommand::CubicTo {
            c1: Point::new(cx - rx, cy - oy),
            c2: Point::new(cx - ox, cy - ry),
            to: Point::new(cx, cy - ry),
        },
        PathCommand::CubicTo {
            c1: Point::new(cx + ox, cy - ry),
            c2: Point::new(cx + rx, cy - oy),
            to: Point::new(cx + rx, cy),
        },
        PathCommand::Close,
    ]
}

/// How the hole is composited onto the dim layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blend {
    /// Erase the dim fill wherever the hole is painted.
    #[default]
    DestinationOut,
    /// Paint the hole on top (renderers without an erase mode draw the hole
    /// in the clear color).
    SourceOver,
}

/// The complete spotlight: dim the viewport, erase the hole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotlightMask {
    pub viewport: Rect,
    pub hole: Cutout,
    pub blend: Blend,
}

impl SpotlightMask {
    pub fn new(viewport: Size, hole: Cutout) -> Self {
        Self {
            viewport: Rect::from_size(viewport),
            hole,
            blend: Blend::DestinationOut,
        }
    }

    /// Whether `point` falls on the dimmed part of the overlay.
    pub fn is_dimmed(&self, point: Point) -> bool {
        self.viewport.contains(point) && !self.hole.contains(point)
    }

    /// Path covering the whole viewport, filled with the dim color.
    pub fn dim_path(&self) -> Vec<PathCommand> {
        rounded_rect_path(self.viewport, 0.0)
    }

    /// Path of the hole, composited with [`Self::blend`].
    pub fn hole_path(&self) -> Vec<PathCommand> {
        self.hole.to_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_shape_is_rounded_rectangle() {
        assert_eq!(
            HighlightShape::default(),
            HighlightShape::Rectangle { corner_radius: 8.0 }
        );
    }

    #[test]
    fn circle_covers_target() {
        let target = Rect::new(100.0, 100.0, 60.0, 20.0);
        let cutout = Cutout::for_target(target, &HighlightShape::Circle);
        assert_eq!(
            cutout,
            Cutout::Ellipse {
                rect: Rect::new(100.0, 80.0, 60.0, 60.0)
            }
        );
        assert_eq!(cutout.bounds().center(), target.center());
        assert!(cutout.contains(target.center()));
        assert!(!cutout.contains(Point::new(100.0, 80.0)));
    }

    #[test]
    fn radius_is_clamped_to_half_short_side() {
        let target = Rect::new(0.0, 0.0, 100.0, 10.0);
        let cutout = Cutout::for_target(target, &HighlightShape::RoundedRect { corner_radius: 40.0 });
        assert_eq!(cutout, Cutout::RoundedRect { rect: target, radius: 5.0 });

        let negative = Cutout::for_target(target, &HighlightShape::Rectangle { corner_radius: -3.0 });
        assert_eq!(negative, Cutout::RoundedRect { rect: target, radius: 0.0 });
    }

    #[test]
    fn custom_falls_back_to_rounded_rect() {
        let target = Rect::new(0.0, 0.0, 50.0, 50.0);
        assert_eq!(
            Cutout::for_target(target, &HighlightShape::Custom),
            Cutout::RoundedRect {
                rect: target,
                radius: CUSTOM_FALLBACK_RADIUS
            }
        );
    }

    #[test]
    fn rounded_corners_exclude_the_corner_point() {
        let cutout = Cutout::for_target(
            Rect::new(0.0, 0.0, 40.0, 40.0),
            &HighlightShape::RoundedRect { corner_radius: 10.0 },
        );
        assert!(!cutout.contains(Point::new(0.5, 0.5)));
        assert!(cutout.contains(Point::new(10.0, 0.5)));
        assert!(cutout.contains(Point::new(20.0, 20.0)));
        assert!(!cutout.contains(Point::new(41.0, 20.0)));
    }

    #[test]
    fn padded_grows_hole() {
        let cutout = Cutout::for_target(Rect::new(10.0, 10.0, 20.0, 20.0), &HighlightShape::rectangle());
        let padded = cutout.padded(4.0);
        assert_eq!(padded.bounds(), Rect::new(6.0, 6.0, 28.0, 28.0));
        assert_eq!(
            padded,
            Cutout::RoundedRect {
                rect: Rect::new(6.0, 6.0, 28.0, 28.0),
                radius: 12.0
            }
        );
    }

    #[test]
    fn rounded_path_is_closed_and_starts_on_top_edge() {
        let path = Cutout::for_target(Rect::new(0.0, 0.0, 40.0, 20.0), &HighlightShape::rectangle())
            .to_path();
        assert_eq!(path.len(), 10);
        assert_eq!(path[0], PathCommand::MoveTo(Point::new(8.0, 0.0)));
        assert_eq!(path.last(), Some(&PathCommand::Close));
        match path[8] {
            PathCommand::CubicTo { to, .. } => assert_eq!(to, Point::new(8.0, 0.0)),
            other => panic!("expected closing corner, got {other:?}"),
        }
    }

    #[test]
    fn square_corners_emit_plain_rectangle() {
        let path = Cutout::for_target(
            Rect::new(0.0, 0.0, 40.0, 20.0),
            &HighlightShape::Rectangle { corner_radius: 0.0 },
        )
        .to_path();
        assert_eq!(path.len(), 5);
        assert_eq!(path[2], PathCommand::LineTo(Point::new(40.0, 20.0)));
    }

    #[test]
    fn ellipse_path_passes_through_extremes() {
        let path = Cutout::for_target(Rect::new(0.0, 0.0, 20.0, 20.0), &HighlightShape::Circle).to_path();
        assert_eq!(path.len(), 6);
        assert_eq!(path[0], PathCommand::MoveTo(Point::new(20.0, 10.0)));
        let ends: Vec<Point> = path
            .iter()
            .filter_map(|cmd| match cmd {
                PathCommand::CubicTo { to, .. } => Some(*to),
                _ => None,
            })
            .collect();
        assert_eq!(
            ends,
            vec![
                Point::new(10.0, 20.0),
                Point::new(0.0, 10.0),
                Point::new(10.0, 0.0),
                Point::new(20.0, 10.0),
            ]
        );
    }

    #[test]
    fn mask_dims_everything_but_the_hole() {
        let hole = Cutout::for_target(Rect::new(100.0, 100.0, 50.0, 50.0), &HighlightShape::rectangle());
        let mask = SpotlightMask::new(Size::new(400.0, 800.0), hole);
        assert_eq!(mask.blend, Blend::DestinationOut);
        assert!(mask.is_dimmed(Point::new(10.0, 10.0)));
        assert!(!mask.is_dimmed(Point::new(125.0, 125.0)));
        assert!(!mask.is_dimmed(Point::new(500.0, 10.0)));
        assert_eq!(mask.dim_path().len(), 5);
        assert_eq!(mask.hole_path(), hole.to_path());
    }
}
