#![forbid(unsafe_code)]

//! Geometry for guided tours: where the tooltip goes, how the arrow bends,
//! and what the spotlight cuts out.
//!
//! # Role in waypoint
//! `waypoint-geometry` is the pure layout layer. It knows nothing about
//! flows, steps or sessions; it takes a target frame, a viewport and a
//! requested [`Placement`] and returns positions and outlines. The flow
//! crate (`waypoint-flow`) decides *which* target is active and feeds its
//! frame through these functions.
//!
//! # Primary responsibilities
//! - **Anchor resolution**: [`resolve_anchor`] turns a placement into a
//!   clamped tooltip centre, including automatic side selection.
//! - **Arrow curve**: [`ArrowPath`], [`Arrowhead`] and [`ArrowProgress`]
//!   describe the animated pointer from tooltip to target.
//! - **Spotlight**: [`Cutout`] and [`SpotlightMask`] describe the dim layer
//!   and its hole for each [`HighlightShape`].
//!
//! Everything here is deterministic and allocation-light; the same inputs
//! always produce the same outputs.

pub mod anchor;
pub mod arrow;
pub mod cutout;
pub mod geometry;
pub mod placement;

pub use anchor::{
    Anchor, DEFAULT_PADDING, FALLBACK_FOOTPRINT, Footprint, LayoutParams, automatic_candidates,
    automatic_direction, estimated_footprint, resolve_anchor,
};
pub use arrow::{ArrowPath, ArrowProgress, Arrowhead, arrow_target_point};
pub use cutout::{Blend, Cutout, HighlightShape, PathCommand, SpotlightMask};
pub use geometry::{Point, Rect, Size};
pub use placement::{DEFAULT_OFFSET, Direction, Placement};
