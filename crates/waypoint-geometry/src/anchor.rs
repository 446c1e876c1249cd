#![forbid(unsafe_code)]

//! Tooltip anchor resolution.
//!
//! Maps a target rectangle, the viewport size, a requested [`Placement`] and
//! a tooltip footprint to the point where the tooltip's centre should sit.
//!
//! # Invariants
//!
//! 1. Directional placements start from the target's relevant edge or corner,
//!    pushed outward by the placement offset plus half the footprint.
//! 2. The resolved point always keeps the whole footprint inside
//!    `[padding, viewport - padding]` on each axis. When that band is narrower
//!    than the footprint the axis collapses to the viewport midpoint.
//! 3. `Center` is the viewport centre, unconditionally.
//! 4. `Automatic` evaluates below, above, trailing, leading (in that order),
//!    picks the largest free space (earlier candidate wins ties) and falls
//!    back to the viewport centre when no side has positive space.
//!
//! # Failure Modes
//!
//! - Non-finite target or viewport: resolves to the viewport centre (or the
//!   origin if the viewport itself is non-finite).

use crate::geometry::{Point, Rect, Size};
use crate::placement::{DEFAULT_OFFSET, Direction, Placement};

/// Edge padding kept between any tooltip and the viewport border.
pub const DEFAULT_PADDING: f64 = 16.0;

/// Footprint assumed for a tooltip that hasn't been measured yet.
pub const FALLBACK_FOOTPRINT: Size = Size::new(320.0, 150.0);

/// Tunables for anchor resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutParams {
    /// Minimum distance between a tooltip and the viewport edge.
    pub padding: f64,
    /// Footprint used until the tooltip reports its measured size. The width
    /// doubles as the maximum tooltip width.
    pub fallback_footprint: Size,
    /// Gap between target and tooltip for automatic placement.
    pub automatic_gap: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            fallback_footprint: FALLBACK_FOOTPRINT,
            automatic_gap: DEFAULT_OFFSET,
        }
    }
}

impl LayoutParams {
    /// Set edge padding.
    #[must_use]
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Set the fallback footprint.
    #[must_use]
    pub fn fallback_footprint(mut self, size: Size) -> Self {
        self.fallback_footprint = size;
        self
    }

    /// Set the automatic placement gap.
    #[must_use]
    pub fn automatic_gap(mut self, gap: f64) -> Self {
        self.automatic_gap = gap;
        self
    }
}

/// The tooltip size used for layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Footprint {
    /// Size reported by the host after the tooltip was laid out.
    Measured(Size),
    /// Not measured yet; use [`estimated_footprint`].
    #[default]
    Estimated,
}

impl Footprint {
    /// Concrete size for this footprint within `viewport`.
    pub fn resolve(self, viewport: Size, params: &LayoutParams) -> Size {
        match self {
            Self::Measured(size) => Size::new(size.width.max(0.0), size.height.max(0.0)),
            Self::Estimated => estimated_footprint(viewport, params),
        }
    }
}

impl From<Option<Size>> for Footprint {
    fn from(measured: Option<Size>) -> Self {
        measured.map_or(Self::Estimated, Self::Measured)
    }
}

/// Estimated tooltip size: as wide as the viewport allows (minus padding on
/// both sides) up to the fallback width, and the fallback height.
pub fn estimated_footprint(viewport: Size, params: &LayoutParams) -> Size {
    let available = (viewport.width - params.padding * 2.0).max(0.0);
    Size::new(
        available.min(params.fallback_footprint.width),
        params.fallback_footprint.height,
    )
}

/// A resolved tooltip position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    /// Centre of the tooltip.
    pub point: Point,
    /// Direction the tooltip ended up on. `Center` for centred and fallback
    /// placements.
    pub direction: Direction,
    /// Footprint the point was computed for.
    pub footprint: Size,
}

impl Anchor {
    fn centered(viewport: Size, footprint: Size) -> Self {
        let point = if viewport.width.is_finite() && viewport.height.is_finite() {
            viewport.center()
        } else {
            Point::ZERO
        };
        Self {
            point,
            direction: Direction::Center,
            footprint,
        }
    }

    /// The tooltip's frame, centred on the anchor point.
    pub fn tooltip_frame(&self) -> Rect {
        Rect::centered_at(self.point, self.footprint)
    }

    /// Whether the tooltip frame covers any part of `target`.
    ///
    /// Clamping can push a tooltip back over its target when the footprint
    /// exceeds the free space on the chosen side.
    pub fn overlaps(&self, target: &Rect) -> bool {
        self.tooltip_frame().intersects(target)
    }
}

/// Resolve the tooltip anchor for `placement`.
pub fn resolve_anchor(
    target: Rect,
    viewport: Size,
    placement: Placement,
    footprint: Footprint,
    params: &LayoutParams,
) -> Anchor {
    let size = footprint.resolve(viewport, params);
    if !target.is_finite() || !viewport.width.is_finite() || !viewport.height.is_finite() {
        return Anchor::centered(viewport, size);
    }

    let Some(direction) = placement.direction() else {
        return resolve_automatic(target, viewport, size, params);
    };
    if direction == Direction::Center {
        return Anchor::centered(viewport, size);
    }

    let offset = placement.offset().unwrap_or(DEFAULT_OFFSET);
    directional(target, viewport, direction, offset, size, params.padding)
}

/// Free space on each automatic candidate side, in evaluation order.
pub fn automatic_candidates(target: Rect, viewport: Size) -> [(Direction, f64); 4] {
    [
        (Direction::Bottom, viewport.height - target.max_y()),
        (Direction::Top, target.min_y()),
        (Direction::Trailing, viewport.width - target.max_x()),
        (Direction::Leading, target.min_x()),
    ]
}

/// The side automatic placement picks, or `None` when no side has room.
pub fn automatic_direction(target: Rect, viewport: Size) -> Option<Direction> {
    let candidates = automatic_candidates(target, viewport);
    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.1 > best.1 {
            best = *candidate;
        }
    }
    (best.1 > 0.0).then_some(best.0)
}

fn resolve_automatic(target: Rect, viewport: Size, size: Size, params: &LayoutParams) -> Anchor {
    match automatic_direction(target, viewport) {
        Some(direction) => directional(
            target,
            viewport,
            direction,
            params.automatic_gap,
            size,
            params.padding,
        ),
        None => Anchor::centered(viewport, size),
    }
}

fn directional(
    target: Rect,
    viewport: Size,
    direction: Direction,
    offset: f64,
    size: Size,
    padding: f64,
) -> Anchor {
    let raw = outward_point(target, direction, offset, size);
    Anchor {
        point: Point::new(
            clamp_axis(raw.x, size.width, viewport.width, padding),
            clamp_axis(raw.y, size.height, viewport.height, padding),
        ),
        direction,
        footprint: size,
    }
}

/// Unclamped tooltip centre for a directional placement.
fn outward_point(target: Rect, direction: Direction, offset: f64, size: Size) -> Point {
    let (sx, sy) = direction.signs();
    let x = match sx {
        -1 => target.min_x() - offset - size.width / 2.0,
        1 => target.max_x() + offset + size.width / 2.0,
        _ => target.mid_x(),
    };
    let y = match sy {
        -1 => target.min_y() - offset - size.height / 2.0,
        1 => target.max_y() + offset + size.height / 2.0,
        _ => target.mid_y(),
    };
    Point::new(x, y)
}

/// Keep a centre coordinate so that `[value - extent/2, value + extent/2]`
/// stays within `[padding, length - padding]`.
fn clamp_axis(value: f64, extent: f64, length: f64, padding: f64) -> f64 {
    let lo = padding + extent / 2.0;
    let hi = length - padding - extent / 2.0;
    if lo.is_nan() || hi.is_nan() || lo > hi || value.is_nan() {
        return length / 2.0;
    }
    value.clamp(lo, hi)
}
