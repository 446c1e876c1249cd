#![forbid(unsafe_code)]

//! Waypoint public facade crate.
//!
//! Re-exports the flow and geometry crates and adds [`OverlayPlan`], which
//! turns the coordinator's state into everything a host needs to draw one
//! frame of the tour: spotlight, tooltip position, arrow and styles.
//!
//! ```rust,ignore
//! use waypoint::prelude::*;
//!
//! let mut tour = Coordinator::new();
//! tour.start_flow(Flow::new("welcome", vec![
//!     Step::new("inbox", "inbox-button", "Your inbox", "New mail lands here."),
//! ]));
//! tour.register_target_frame("inbox-button", Rect::new(20.0, 40.0, 120.0, 44.0));
//!
//! if let Some(plan) = OverlayPlan::compute(&tour, Size::new(390.0, 844.0), None) {
//!     // draw plan.mask, plan.anchor.tooltip_frame(), plan.arrow ...
//! }
//! ```

pub mod overlay;

// --- Geometry re-exports ---------------------------------------------------

pub use waypoint_geometry::{
    Anchor, ArrowPath, ArrowProgress, Arrowhead, Blend, Cutout, Direction, Footprint,
    HighlightShape, LayoutParams, PathCommand, Placement, Point, Rect, Size, SpotlightMask,
    resolve_anchor,
};

// --- Flow re-exports -------------------------------------------------------

pub use waypoint_flow::{
    ActionOutcome, ActionRule, ActionType, ArrowPatch, ArrowStyle, Branch, ConfigError,
    Coordinator, CustomContent, DimPatch, DimStyle, Flow, FlowState, Font, FontWeight,
    PerformedAction, ResolvedStyles, Rgba, SessionToken, SkipGesture, Snapshot, Step, StepId,
    Subscription, SwipeDirection, TooltipPatch, TooltipStyle, TourConfig, TourEvent, Transition,
    TransitionKind,
};

pub use overlay::{HitRegion, OverlayPlan};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for waypoint hosts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Loading or validating a [`TourConfig`] failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Config(ConfigError::Io(err))
    }
}

/// Standard result type for waypoint APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Load and validate a TOML configuration file.
#[cfg(feature = "config")]
pub fn load_config(path: impl AsRef<std::path::Path>) -> Result<TourConfig> {
    let config = TourConfig::from_toml_file(path)?.validated()?;
    tracing::debug!(reset_delay_ms = config.reset_delay_ms, "tour config loaded");
    Ok(config)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ActionType, Coordinator, Error, Flow, FlowState, HighlightShape, HitRegion, OverlayPlan,
        PerformedAction, Placement, Point, Rect, Result, Size, Step, TourConfig, TourEvent,
    };

    pub use crate::{flow, geometry};
}

pub use waypoint_flow as flow;
pub use waypoint_geometry as geometry;
