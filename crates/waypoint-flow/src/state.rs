#![forbid(unsafe_code)]

//! Observable tour state: lifecycle, events and session tokens.

use std::fmt;

use crate::action::PerformedAction;
use crate::step::StepId;

/// Lifecycle of the coordinator's current flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlowState {
    #[default]
    NotStarted,
    InProgress(usize),
    Completed,
    Skipped,
}

impl FlowState {
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::InProgress(_))
    }

    /// Completed or skipped.
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Skipped)
    }

    pub const fn step_index(self) -> Option<usize> {
        match self {
            Self::InProgress(index) => Some(index),
            _ => None,
        }
    }
}

/// Lifecycle notifications delivered to event handlers, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TourEvent {
    TutorialStarted,
    StepStarted(StepId),
    StepCompleted(StepId),
    StepSkipped(StepId),
    TutorialCompleted,
    TutorialSkipped,
    ActionPerformed(PerformedAction),
}

impl TourEvent {
    /// Short name for logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TutorialStarted => "tutorial_started",
            Self::StepStarted(_) => "step_started",
            Self::StepCompleted(_) => "step_completed",
            Self::StepSkipped(_) => "step_skipped",
            Self::TutorialCompleted => "tutorial_completed",
            Self::TutorialSkipped => "tutorial_skipped",
            Self::ActionPerformed(_) => "action_performed",
        }
    }
}

/// Identifies one started flow. Every successful start issues a fresh token;
/// deferred resets carry the token of the session that scheduled them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SessionToken(u64);

impl SessionToken {
    pub const fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    pub(crate) const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
