#![forbid(unsafe_code)]

//! Per-frame overlay planning.
//!
//! [`OverlayPlan::compute`] reads the coordinator and produces one immutable
//! description of what to draw: the dimmed spotlight with its hole, the
//! tooltip anchor, the optional arrow and the resolved styles. Hosts call it
//! on every layout pass; it allocates only for the step's strings.
//!
//! # Missing data
//!
//! No plan is produced while nothing is presented, or while the current
//! step's target has no registered frame. That is a transient state: the
//! next `register_target_frame` for the key makes the plan available.

use std::time::Duration;

use tracing::trace;
use waypoint_flow::{Coordinator, CustomContent, ResolvedStyles, StepId, Transition};
use waypoint_geometry::{
    Anchor, ArrowPath, ArrowProgress, Arrowhead, Cutout, Footprint, Point, Rect, Size,
    SpotlightMask, arrow_target_point, resolve_anchor,
};

/// Where a pointer landed on the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    /// Inside the tooltip frame.
    Tooltip,
    /// Inside the spotlight hole.
    Target,
    /// On the dim layer of a step that blocks other interactions.
    Blocked,
    /// Should reach the content underneath.
    PassThrough,
}

/// Everything needed to draw the current step.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPlan {
    pub step_id: StepId,
    pub title: String,
    pub description: String,
    pub custom_content: Option<CustomContent>,
    /// Registered frame of the step's target.
    pub target: Rect,
    pub mask: SpotlightMask,
    pub anchor: Anchor,
    /// Curve from the tooltip anchor to the target. `None` when the step
    /// hides its arrow.
    pub arrow: Option<ArrowPath>,
    pub arrowhead: Option<Arrowhead>,
    pub styles: ResolvedStyles,
    pub transition: Transition,
    /// The flow can be dismissed by the user.
    pub skip_enabled: bool,
    pub blocks_interaction: bool,
    /// One-based position and step count, for "2 of 5" indicators.
    pub progress: (usize, usize),
}

impl OverlayPlan {
    /// Plan the current step inside `viewport`.
    ///
    /// `measured` is the tooltip size reported by the host after its last
    /// layout. Until then the footprint is estimated, capped by the
    /// tooltip's `max_width`.
    pub fn compute(
        coordinator: &Coordinator,
        viewport: Size,
        measured: Option<Size>,
    ) -> Option<Self> {
        if !coordinator.is_presented() {
            return None;
        }
        let flow = coordinator.current_flow()?;
        let step = coordinator.current_step()?;
        let target = coordinator.current_target_frame()?;
        let styles = coordinator.current_styles()?;
        let (index, count) = coordinator.progress()?;

        let mut params = coordinator.config().layout;
        if let Some(max_width) = styles.tooltip.max_width
            && max_width > 0.0
        {
            let fallback = params.fallback_footprint;
            params.fallback_footprint = Size::new(fallback.width.min(max_width), fallback.height);
        }
        let anchor = resolve_anchor(
            target,
            viewport,
            step.placement,
            Footprint::from(measured),
            &params,
        );

        let mask = SpotlightMask::new(viewport, Cutout::for_target(target, &step.highlight));

        // A centred tooltip points at the target's centre.
        let arrow = step.show_arrow.then(|| {
            let end = arrow_target_point(target, anchor.direction);
            ArrowPath::new(anchor.point, end, styles.arrow.curve_intensity)
        });
        let arrowhead = arrow
            .as_ref()
            .map(|path| Arrowhead::at_end(path, styles.arrow.head_length, styles.arrow.head_angle));

        trace!(
            step = %step.id,
            direction = ?anchor.direction,
            x = anchor.point.x,
            y = anchor.point.y,
            arrow = arrow.is_some(),
            "overlay planned"
        );

        Some(Self {
            step_id: step.id.clone(),
            title: step.title.clone(),
            description: step.description.clone(),
            custom_content: step.custom_content.clone(),
            target,
            mask,
            anchor,
            arrow,
            arrowhead,
            transition: coordinator.current_transition(),
            skip_enabled: flow.can_be_skipped,
            blocks_interaction: step.block_other_interactions,
            progress: (index + 1, count),
            styles,
        })
    }

    pub fn tooltip_frame(&self) -> Rect {
        self.anchor.tooltip_frame()
    }

    /// Classify a pointer position.
    pub fn hit_test(&self, point: Point) -> HitRegion {
        if self.tooltip_frame().contains(point) {
            HitRegion::Tooltip
        } else if self.mask.hole.contains(point) {
            HitRegion::Target
        } else if self.blocks_interaction && self.mask.viewport.contains(point) {
            HitRegion::Blocked
        } else {
            HitRegion::PassThrough
        }
    }

    /// A fresh draw-on animation for this plan's arrow.
    pub fn arrow_progress(&self) -> ArrowProgress {
        ArrowProgress::new(
            self.styles.arrow.animation_duration,
            self.styles.arrow.animation_enabled,
        )
    }

    pub fn transition_duration(&self) -> Duration {
        self.transition.duration
    }
}
