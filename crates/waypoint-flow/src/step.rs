#![forbid(unsafe_code)]

//! Tour steps.
//!
//! A [`Step`] is one stop of a tour: which target to spotlight, what to say
//! about it, how the user moves on, and how the callout should look. Steps
//! are plain values; once handed to a coordinator inside a
//! [`Flow`](crate::flow::Flow) they are never mutated.

use std::fmt;

use waypoint_geometry::{HighlightShape, Placement};

use crate::action::ActionType;
use crate::style::{ArrowPatch, DimPatch, StylePatches, TooltipPatch};

/// Stable identity of a step within its flow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(transparent))]
pub struct StepId(String);

impl StepId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StepId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for StepId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Host-side key for custom callout content. The core carries it through to
/// the overlay plan untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomContent(pub String);

#[derive(Debug, Clone)]
pub struct Step {
    pub id: StepId,
    /// Key into the coordinator's frame registry.
    pub target_key: String,
    pub title: String,
    pub description: String,
    pub highlight: HighlightShape,
    pub action: ActionType,
    pub placement: Placement,
    pub show_arrow: bool,
    pub block_other_interactions: bool,
    /// Per-step style overrides; unset fields fall back to the flow, then to
    /// the global defaults.
    pub styles: StylePatches,
    pub custom_content: Option<CustomContent>,
}

impl Step {
    /// A step with the default shape (rounded rectangle), tap to advance,
    /// automatic placement, an arrow, and blocking of other interactions.
    pub fn new(
        id: impl Into<StepId>,
        target_key: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            target_key: target_key.into(),
            title: title.into(),
            description: description.into(),
            highlight: HighlightShape::default(),
            action: ActionType::default(),
            placement: Placement::default(),
            show_arrow: true,
            block_other_interactions: true,
            styles: StylePatches::default(),
            custom_content: None,
        }
    }

    #[must_use]
    pub fn highlight(mut self, shape: HighlightShape) -> Self {
        self.highlight = shape;
        self
    }

    #[must_use]
    pub fn action(mut self, action: ActionType) -> Self {
        self.action = action;
        self
    }

    #[must_use]
    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub fn show_arrow(mut self, show: bool) -> Self {
        self.show_arrow = show;
        self
    }

    #[must_use]
    pub fn block_other_interactions(mut self, block: bool) -> Self {
        self.block_other_interactions = block;
        self
    }

    #[must_use]
    pub fn tooltip_style(mut self, patch: TooltipPatch) -> Self {
        self.styles.tooltip = patch;
        self
    }

    #[must_use]
    pub fn dim_style(mut self, patch: DimPatch) -> Self {
        self.styles.dim = patch;
        self
    }

    #[must_use]
    pub fn arrow_style(mut self, patch: ArrowPatch) -> Self {
        self.styles.arrow = patch;
        self
    }

    #[must_use]
    pub fn custom_content(mut self, key: impl Into<String>) -> Self {
        self.custom_content = Some(CustomContent(key.into()));
        self
    }
}
