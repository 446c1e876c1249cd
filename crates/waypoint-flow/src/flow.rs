#![forbid(unsafe_code)]

//! Flows: an ordered tour with its skip policy, callbacks and shared styles.

use std::fmt;
use std::rc::Rc;

use crate::action::ActionRule;
use crate::step::{Step, StepId};
use crate::style::{ArrowPatch, DimPatch, StylePatches, TooltipPatch, Transition};

/// Completion/skip callback. Invoked synchronously on the UI thread.
pub type Callback = Rc<dyn Fn()>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlowId(pub String);

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Gesture that dismisses the whole tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum SkipGesture {
    #[default]
    SwipeDown,
    SwipeUp,
    DoubleTap,
    LongPress,
    /// An explicit skip button in the callout.
    Button,
}

#[derive(Clone)]
pub struct Flow {
    pub id: FlowId,
    pub name: String,
    /// Must be non-empty for the flow to start.
    pub steps: Vec<Step>,
    pub can_be_skipped: bool,
    pub skip_gesture: Option<SkipGesture>,
    pub on_complete: Option<Callback>,
    pub on_skip: Option<Callback>,
    /// Flow-wide style defaults, beneath each step's own overrides.
    pub styles: StylePatches,
    /// `None` uses the coordinator's configured transition.
    pub transition: Option<Transition>,
    pub rules: Vec<ActionRule>,
}

impl Flow {
    /// A skippable flow (swipe down) whose id is its name.
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        let name = name.into();
        Self {
            id: FlowId(name.clone()),
            name,
            steps,
            can_be_skipped: true,
            skip_gesture: Some(SkipGesture::default()),
            on_complete: None,
            on_skip: None,
            styles: StylePatches::default(),
            transition: None,
            rules: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = FlowId(id.into());
        self
    }

    #[must_use]
    pub fn can_be_skipped(mut self, skippable: bool) -> Self {
        self.can_be_skipped = skippable;
        self
    }

    #[must_use]
    pub fn skip_gesture(mut self, gesture: Option<SkipGesture>) -> Self {
        self.skip_gesture = gesture;
        self
    }

    #[must_use]
    pub fn on_complete(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_complete = Some(Rc::new(callback));
        self
    }

    #[must_use]
    pub fn on_skip(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_skip = Some(Rc::new(callback));
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
    pub fn transition(mut self, transition: Transition) -> Self {
        self.transition = Some(transition);
        self
    }

    #[must_use]
    pub fn rule(mut self, rule: ActionRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Index of the first step with `id`.
    pub fn index_of(&self, id: &StepId) -> Option<usize> {
        self.steps.iter().position(|step| &step.id == id)
    }

    /// Whether `gesture` dismisses this flow.
    pub fn skips_on(&self, gesture: SkipGesture) -> bool {
        self.can_be_skipped && self.skip_gesture == Some(gesture)
    }
}

impl fmt::Debug for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flow")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("steps", &self.steps)
            .field("can_be_skipped", &self.can_be_skipped)
            .field("skip_gesture", &self.skip_gesture)
            .field("on_complete", &self.on_complete.is_some())
            .field("on_skip", &self.on_skip.is_some())
            .field("styles", &self.styles)
            .field("transition", &self.transition)
            .field("rules", &self.rules)
            .finish()
    }
}
