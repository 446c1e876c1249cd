#![forbid(unsafe_code)]

//! How a step is completed, and what happens when the user acts.
//!
//! [`ActionType`] is the step's own requirement ("tap the target", "wait two
//! seconds"). [`PerformedAction`] is what the host reports after its gesture
//! recognizers fire. A flow may also carry [`ActionRule`]s that route a
//! specific performed action on a specific step to an [`ActionOutcome`]
//! other than "next step", and [`Branch`]es that pick between two steps
//! based on a host predicate.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::step::StepId;

/// Default minimum hold for [`ActionType::long_press`].
pub const DEFAULT_LONG_PRESS: Duration = Duration::from_millis(500);

/// Host predicate evaluated by custom actions and branches.
pub type Predicate = Rc<dyn Fn() -> bool>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

/// What a step waits for before advancing.
#[derive(Clone, Default)]
pub enum ActionType {
    #[default]
    Tap,
    /// Hold for at least this long.
    LongPress(Duration),
    Swipe(SwipeDirection),
    DoubleTap,
    /// Advance on its own after the delay (driven by
    /// [`Coordinator::advance`](crate::coordinator::Coordinator::advance)).
    Automatic(Duration),
    /// Advance on any reported action once the predicate holds.
    Custom(Predicate),
}

impl ActionType {
    pub fn long_press() -> Self {
        Self::LongPress(DEFAULT_LONG_PRESS)
    }

    pub fn custom(predicate: impl Fn() -> bool + 'static) -> Self {
        Self::Custom(Rc::new(predicate))
    }

    /// Whether `performed` satisfies this requirement.
    pub fn accepts(&self, performed: &PerformedAction) -> bool {
        match (self, performed) {
            (Self::Tap, PerformedAction::Tap) | (Self::DoubleTap, PerformedAction::DoubleTap) => true,
            (Self::LongPress(min), PerformedAction::LongPress(held)) => held >= min,
            (Self::Swipe(want), PerformedAction::Swipe(got)) => want == got,
            (Self::Automatic(delay), PerformedAction::Timeout(waited)) => waited >= delay,
            (Self::Custom(predicate), _) => predicate(),
            _ => false,
        }
    }

    /// Delay after which the step advances by itself, if any.
    pub fn auto_advance_delay(&self) -> Option<Duration> {
        match self {
            Self::Automatic(delay) => Some(*delay),
            _ => None,
        }
    }
}

impl PartialEq for ActionType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Tap, Self::Tap) | (Self::DoubleTap, Self::DoubleTap) => true,
            (Self::LongPress(a), Self::LongPress(b)) | (Self::Automatic(a), Self::Automatic(b)) => {
                a == b
            }
            (Self::Swipe(a), Self::Swipe(b)) => a == b,
            // Predicates have no structural equality; compare identity.
            (Self::Custom(a), Self::Custom(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tap => f.write_str("Tap"),
            Self::LongPress(d) => f.debug_tuple("LongPress").field(d).finish(),
            Self::Swipe(dir) => f.debug_tuple("Swipe").field(dir).finish(),
            Self::DoubleTap => f.write_str("DoubleTap"),
            Self::Automatic(d) => f.debug_tuple("Automatic").field(d).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// An action the host observed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PerformedAction {
    Tap,
    DoubleTap,
    LongPress(Duration),
    Swipe(SwipeDirection),
    /// A named host condition became true.
    ConditionMet(String),
    /// A step's automatic delay elapsed.
    Timeout(Duration),
    Custom(String),
}

/// Where an [`ActionRule`] sends the tour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    NextStep,
    SkipToIndex(usize),
    SkipToStep(StepId),
    Complete,
    /// Start the current flow again from its first step.
    Restart,
    /// Start a flow previously registered under this name.
    StartFlow(String),
}

/// Routes `trigger` on `step` to `outcome`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRule {
    pub step: StepId,
    pub trigger: PerformedAction,
    pub outcome: ActionOutcome,
}

impl ActionRule {
    pub fn new(step: impl Into<StepId>, trigger: PerformedAction, outcome: ActionOutcome) -> Self {
        Self {
            step: step.into(),
            trigger,
            outcome,
        }
    }

    pub fn matches(&self, step: &StepId, performed: &PerformedAction) -> bool {
        &self.step == step && &self.trigger == performed
    }
}

/// Conditional jump between two steps.
#[derive(Clone)]
pub struct Branch {
    pub condition: Predicate,
    pub when_true: StepId,
    pub when_false: StepId,
}

impl Branch {
    pub fn new(
        condition: impl Fn() -> bool + 'static,
        when_true: impl Into<StepId>,
        when_false: impl Into<StepId>,
    ) -> Self {
        Self {
            condition: Rc::new(condition),
            when_true: when_true.into(),
            when_false: when_false.into(),
        }
    }

    /// Evaluate the condition and return the chosen step.
    pub fn target(&self) -> &StepId {
        if (self.condition)() {
            &self.when_true
        } else {
            &self.when_false
        }
    }
}

impl fmt::Debug for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Branch")
            .field("when_true", &self.when_true)
            .field("when_false", &self.when_false)
            .finish_non_exhaustive()
    }
}
