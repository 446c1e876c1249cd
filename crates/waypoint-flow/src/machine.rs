#![forbid(unsafe_code)]

//! The tour state machine as a pure transition function.
//!
//! [`MachineState::apply`] takes the current state and a [`Command`] and
//! returns the next state, the events to emit (in order) and the side
//! effects the owner must run. Nothing here touches listeners, callbacks or
//! timers, so every transition can be tested by value.
//!
//! # Invariants
//!
//! 1. `flow_state == InProgress(i)` implies a flow is present and `i` is a
//!    valid step index.
//! 2. `is_presented()` is true iff the flow state is `InProgress`.
//! 3. Every command other than `Start` and `Reset` requires `InProgress`.
//! 4. A `Reset` only applies when its token matches the live session and the
//!    flow has finished; anything else is ignored.
//! 5. `Start` with an empty flow is ignored and does not consume a token.
//!
//! # Failure Modes
//!
//! - **Ignored commands**: precondition failures return a transition with
//!   `applied == false`, the unchanged state and no events or effects.

use std::rc::Rc;

use crate::flow::Flow;
use crate::state::{FlowState, SessionToken, TourEvent};
use crate::step::{Step, StepId};

/// An input to the state machine.
#[derive(Debug, Clone)]
pub enum Command {
    Start(Rc<Flow>),
    Next,
    SkipToIndex(usize),
    SkipToStep(StepId),
    SkipTutorial,
    Complete,
    /// Deferred clear scheduled by the session with this token.
    Reset(SessionToken),
}

impl Command {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start(_) => "start",
            Self::Next => "next",
            Self::SkipToIndex(_) => "skip_to_index",
            Self::SkipToStep(_) => "skip_to_step",
            Self::SkipTutorial => "skip_tutorial",
            Self::Complete => "complete",
            Self::Reset(_) => "reset",
        }
    }
}

/// Work the owner of the machine performs after applying a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Call the finished flow's `on_complete`.
    InvokeOnComplete,
    /// Call the finished flow's `on_skip`.
    InvokeOnSkip,
    /// Queue a deferred reset for this session.
    ScheduleReset(SessionToken),
    /// Drop every registered target frame.
    ClearFrames,
}

/// Result of [`MachineState::apply`].
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: MachineState,
    pub events: Vec<TourEvent>,
    pub effects: Vec<Effect>,
    /// `false` when the command's preconditions failed.
    pub applied: bool,
}

impl Transition {
    fn ignored(state: &MachineState) -> Self {
        Self {
            state: state.clone(),
            events: Vec::new(),
            effects: Vec::new(),
            applied: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MachineState {
    flow: Option<Rc<Flow>>,
    index: usize,
    flow_state: FlowState,
    session: SessionToken,
}

impl MachineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flow(&self) -> Option<&Rc<Flow>> {
        self.flow.as_ref()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn flow_state(&self) -> FlowState {
        self.flow_state
    }

    pub fn is_presented(&self) -> bool {
        self.flow_state.is_in_progress()
    }

    pub fn session(&self) -> SessionToken {
        self.session
    }

    /// The step at the current index, read fresh from the flow.
    pub fn current_step(&self) -> Option<&Step> {
        self.flow.as_deref()?.step(self.index)
    }

    pub fn apply(&self, command: Command) -> Transition {
        match command {
            Command::Start(flow) => self.start(flow),
            Command::Next => self.next(),
            Command::SkipToIndex(index) => self.skip_to(index),
            Command::SkipToStep(id) => match self.active().and_then(|flow| flow.index_of(&id)) {
                Some(index) => self.skip_to(index),
                None => Transition::ignored(self),
            },
            Command::SkipTutorial => self.finish(FlowState::Skipped),
            Command::Complete => self.finish(FlowState::Completed),
            Command::Reset(token) => self.reset(token),
        }
    }

    /// The flow, only while it is in progress.
    fn active(&self) -> Option<&Flow> {
        if self.flow_state.is_in_progress() {
            self.flow.as_deref()
        } else {
            None
        }
    }

    fn step_id(flow: &Flow, index: usize) -> Option<StepId> {
        flow.step(index).map(|step| step.id.clone())
    }

    fn start(&self, flow: Rc<Flow>) -> Transition {
        let Some(first) = Self::step_id(&flow, 0) else {
            return Transition::ignored(self);
        };
        Transition {
            state: Self {
                flow: Some(flow),
                index: 0,
                flow_state: FlowState::InProgress(0),
                session: self.session.next(),
            },
            events: vec![TourEvent::TutorialStarted, TourEvent::StepStarted(first)],
            effects: Vec::new(),
            applied: true,
        }
    }

    fn next(&self) -> Transition {
        let Some(flow) = self.active() else {
            return Transition::ignored(self);
        };
        if self.index + 1 >= flow.step_count() {
            return self.finish(FlowState::Completed);
        }
        let (Some(from), Some(to)) = (
            Self::step_id(flow, self.index),
            Self::step_id(flow, self.index + 1),
        ) else {
            return Transition::ignored(self);
        };
        self.moved_to(
            self.index + 1,
            vec![TourEvent::StepCompleted(from), TourEvent::StepStarted(to)],
        )
    }

    fn skip_to(&self, index: usize) -> Transition {
        let Some(flow) = self.active() else {
            return Transition::ignored(self);
        };
        let (Some(from), Some(to)) = (Self::step_id(flow, self.index), Self::step_id(flow, index))
        else {
            return Transition::ignored(self);
        };
        self.moved_to(
            index,
            vec![TourEvent::StepSkipped(from), TourEvent::StepStarted(to)],
        )
    }

    fn moved_to(&self, index: usize, events: Vec<TourEvent>) -> Transition {
        Transition {
            state: Self {
                index,
                flow_state: FlowState::InProgress(index),
                ..self.clone()
            },
            events,
            effects: Vec::new(),
            applied: true,
        }
    }

    fn finish(&self, outcome: FlowState) -> Transition {
        let Some(current) = self.active().and_then(|flow| Self::step_id(flow, self.index)) else {
            return Transition::ignored(self);
        };
        let (events, callback) = if outcome == FlowState::Skipped {
            (
                vec![TourEvent::StepSkipped(current), TourEvent::TutorialSkipped],
                Effect::InvokeOnSkip,
            )
        } else {
            (
                vec![TourEvent::StepCompleted(current), TourEvent::TutorialCompleted],
                Effect::InvokeOnComplete,
            )
        };
        Transition {
            // Flow and index survive until the deferred reset so exit
            // animations can still read the last step.
            state: Self {
                flow_state: outcome,
                ..self.clone()
            },
            events,
            effects: vec![callback, Effect::ScheduleReset(self.session)],
            applied: true,
        }
    }

    fn reset(&self, token: SessionToken) -> Transition {
        if token != self.session || !self.flow_state.is_finished() || self.flow.is_none() {
            return Transition::ignored(self);
        }
        Transition {
            state: Self {
                flow: None,
                index: 0,
                ..self.clone()
            },
            events: Vec::new(),
            effects: vec![Effect::ClearFrames],
            applied: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow(n: usize) -> Rc<Flow> {
        let steps = (0..n)
            .map(|i| Step::new(format!("s{i}"), format!("k{i}"), "t", "d"))
            .collect();
        Rc::new(Flow::new("tour", steps))
    }

    fn id(s: &str) -> StepId {
        StepId::from(s)
    }

    fn started(n: usize) -> MachineState {
        MachineState::new().apply(Command::Start(flow(n))).state
    }

    #[test]
    fn start_emits_started_then_first_step() {
        let t = MachineState::new().apply(Command::Start(flow(3)));
        assert!(t.applied);
        assert_eq!(
            t.events,
            vec![TourEvent::TutorialStarted, TourEvent::StepStarted(id("s0"))]
        );
        assert_eq!(t.state.flow_state(), FlowState::InProgress(0));
        assert!(t.state.is_presented());
        assert_eq!(t.state.session().get(), 1);
        assert_eq!(t.state.current_step().map(|s| s.id.clone()), Some(id("s0")));
    }

    #[test]
    fn start_empty_is_ignored() {
        let before = MachineState::new();
        let t = before.apply(Command::Start(flow(0)));
        assert!(!t.applied);
        assert!(t.events.is_empty());
        assert_eq!(t.state.flow_state(), FlowState::NotStarted);
        assert_eq!(t.state.session(), before.session());
        assert!(t.state.current_step().is_none());
    }

    #[test]
    fn next_emits_completed_then_started() {
        let t = started(3).apply(Command::Next);
        assert_eq!(
            t.events,
            vec![TourEvent::StepCompleted(id("s0")), TourEvent::StepStarted(id("s1"))]
        );
        assert_eq!(t.state.flow_state(), FlowState::InProgress(1));
    }

    #[test]
    fn next_on_last_step_completes() {
        let t = started(1).apply(Command::Next);
        assert_eq!(
            t.events,
            vec![TourEvent::StepCompleted(id("s0")), TourEvent::TutorialCompleted]
        );
        assert_eq!(t.state.flow_state(), FlowState::Completed);
        assert!(!t.state.is_presented());
        assert_eq!(
            t.effects,
            vec![Effect::InvokeOnComplete, Effect::ScheduleReset(t.state.session())]
        );
        // The ended step stays readable until the reset runs.
        assert_eq!(t.state.current_step().map(|s| s.id.clone()), Some(id("s0")));
    }

    #[test]
    fn commands_without_flow_are_ignored() {
        let idle = MachineState::new();
        for cmd in [
            Command::Next,
            Command::SkipToIndex(0),
            Command::SkipToStep(id("s0")),
            Command::SkipTutorial,
            Command::Complete,
            Command::Reset(SessionToken::default()),
        ] {
            let t = idle.apply(cmd);
            assert!(!t.applied);
            assert!(t.events.is_empty() && t.effects.is_empty());
        }
    }

    #[test]
    fn skip_to_index_and_id() {
        let t = started(4).apply(Command::SkipToIndex(2));
        assert_eq!(
            t.events,
            vec![TourEvent::StepSkipped(id("s0")), TourEvent::StepStarted(id("s2"))]
        );
        assert_eq!(t.state.index(), 2);

        let t = t.state.apply(Command::SkipToStep(id("s3")));
        assert_eq!(t.state.flow_state(), FlowState::InProgress(3));

        assert!(!t.state.apply(Command::SkipToIndex(4)).applied);
        assert!(!t.state.apply(Command::SkipToStep(id("nope"))).applied);
    }

    #[test]
    fn skip_tutorial_schedules_reset() {
        let state = started(2).apply(Command::Next).state;
        let t = state.apply(Command::SkipTutorial);
        assert_eq!(
            t.events,
            vec![TourEvent::StepSkipped(id("s1")), TourEvent::TutorialSkipped]
        );
        assert_eq!(t.state.flow_state(), FlowState::Skipped);
        assert_eq!(
            t.effects,
            vec![Effect::InvokeOnSkip, Effect::ScheduleReset(state.session())]
        );
    }

    #[test]
    fn finished_flow_rejects_further_mutation() {
        let done = started(2).apply(Command::Complete).state;
        assert!(!done.apply(Command::Complete).applied);
        assert!(!done.apply(Command::Next).applied);
        assert!(!done.apply(Command::SkipTutorial).applied);
        assert!(!done.apply(Command::SkipToIndex(0)).applied);
    }

    #[test]
    fn reset_clears_matching_session() {
        let done = started(2).apply(Command::Complete).state;
        let t = done.apply(Command::Reset(done.session()));
        assert!(t.applied);
        assert!(t.state.flow().is_none());
        assert_eq!(t.state.index(), 0);
        assert_eq!(t.state.flow_state(), FlowState::Completed);
        assert_eq!(t.effects, vec![Effect::ClearFrames]);
        assert!(t.events.is_empty());
    }

    #[test]
    fn stale_reset_is_ignored() {
        let done = started(2).apply(Command::Complete).state;
        let stale = done.session();
        let restarted = done.apply(Command::Start(flow(3))).state;
        let t = restarted.apply(Command::Reset(stale));
        assert!(!t.applied);
        assert!(t.state.flow().is_some());
        assert_eq!(t.state.flow_state(), FlowState::InProgress(0));
    }

    #[test]
    fn reset_while_in_progress_is_ignored() {
        let running = started(2);
        assert!(!running.apply(Command::Reset(running.session())).applied);
    }

    #[test]
    fn restart_replaces_running_flow() {
        let running = started(2).apply(Command::Next).state;
        let t = running.apply(Command::Start(flow(5)));
        assert!(t.applied);
        assert_eq!(t.state.flow_state(), FlowState::InProgress(0));
        assert_eq!(t.state.flow().map(|f| f.step_count()), Some(5));
        assert!(t.state.session() > running.session());
    }
}
