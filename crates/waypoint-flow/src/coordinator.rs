#![forbid(unsafe_code)]

//! The flow coordinator.
//!
//! [`Coordinator`] owns the single active tour: the pure [`MachineState`],
//! the target [`FrameRegistry`], event handlers, state subscribers and the
//! queue of deferred resets. Every mutating entry point funnels through one
//! `apply` step that runs the machine, emits events in order, performs the
//! machine's effects and then notifies subscribers.
//!
//! # Deferred reset
//!
//! Completing or skipping a flow leaves the ended flow, its index and the
//! registered frames readable for [`TourConfig::reset_delay`] so exit
//! animations can finish. The host drives time through
//! [`Coordinator::advance`]; once the delay elapses the reset runs, but only
//! if its [`SessionToken`] still names the live session. A flow started in
//! the meantime is never cleared by the previous flow's reset.
//!
//! # Failure Modes
//!
//! - **Precondition failures** (no flow, empty flow, bad index, unknown id)
//!   are logged at `debug` and otherwise ignored.
//! - **Re-entrant use**: handlers, subscribers and callbacks receive values,
//!   not the coordinator. A host that shares the coordinator behind a
//!   `RefCell` and borrows it mutably from inside a callback will panic.

use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use ahash::AHashMap;
use tracing::{debug, debug_span, info, trace};
use waypoint_geometry::Rect;
use web_time::Instant;

use crate::action::{ActionOutcome, Branch, PerformedAction};
use crate::config::TourConfig;
use crate::flow::{Flow, SkipGesture};
use crate::machine::{Command, Effect, MachineState};
use crate::registry::FrameRegistry;
use crate::state::{FlowState, SessionToken, TourEvent};
use crate::step::{Step, StepId};
use crate::style::{ResolvedStyles, Transition, resolve};

type Listener = Box<dyn FnMut(&TourEvent)>;
type SubscriberRc = Rc<dyn Fn(&Snapshot)>;
type SubscriberWeak = Weak<dyn Fn(&Snapshot)>;

/// Copyable view of the coordinator state handed to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub version: u64,
    pub flow_state: FlowState,
    pub is_presented: bool,
    pub session: SessionToken,
}

/// A reset waiting for its delay to elapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingReset {
    token: SessionToken,
    remaining: Duration,
}

impl PendingReset {
    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }
}

/// RAII guard for a state subscriber. Dropping it unsubscribes.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

pub struct Coordinator {
    machine: MachineState,
    frames: FrameRegistry,
    listeners: Vec<Listener>,
    subscribers: Vec<SubscriberWeak>,
    pending_resets: Vec<PendingReset>,
    library: AHashMap<String, Rc<Flow>>,
    config: TourConfig,
    version: u64,
    step_elapsed: Duration,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Coordinator {
    pub fn new() -> Self {
        Self::with_config(TourConfig::default())
    }

    pub fn with_config(config: TourConfig) -> Self {
        Self {
            machine: MachineState::new(),
            frames: FrameRegistry::new(),
            listeners: Vec::new(),
            subscribers: Vec::new(),
            pending_resets: Vec::new(),
            library: AHashMap::new(),
            config,
            version: 0,
            step_elapsed: Duration::ZERO,
        }
    }

    pub fn config(&self) -> &TourConfig {
        &self.config
    }

    // ── Lifecycle ────────────────────────────────────────────────────────

    /// Start `flow` at its first step. Ignored if the flow has no steps.
    ///
    /// Emits `TutorialStarted` then `StepStarted(first)`. A running flow is
    /// replaced without events for the old one.
    pub fn start_flow(&mut self, flow: impl Into<Rc<Flow>>) {
        self.apply(Command::Start(flow.into()));
    }

    /// Advance by exactly one step, or complete the flow on its last step.
    pub fn next_step(&mut self) {
        self.apply(Command::Next);
    }

    /// Jump to `index`. Out-of-range indices are ignored.
    pub fn skip_to_step(&mut self, index: usize) {
        self.apply(Command::SkipToIndex(index));
    }

    /// Jump to the first step with `id`. Unknown ids are ignored.
    pub fn skip_to_step_id(&mut self, id: impl Into<StepId>) {
        self.apply(Command::SkipToStep(id.into()));
    }

    /// End the flow as skipped, run `on_skip` and schedule the reset.
    pub fn skip_tutorial(&mut self) {
        self.apply(Command::SkipTutorial);
    }

    /// End the flow as completed, run `on_complete` and schedule the reset.
    pub fn complete_tutorial(&mut self) {
        self.apply(Command::Complete);
    }

    // ── Host input ───────────────────────────────────────────────────────

    /// Record the on-screen rectangle of `key`. Never changes the step.
    pub fn register_target_frame(&mut self, key: &str, rect: Rect) {
        if self.frames.upsert(key, rect) {
            trace!(key, x = rect.x, y = rect.y, w = rect.width, h = rect.height, "target frame registered");
            self.version += 1;
            self.notify();
        }
    }

    /// Report a user or host action for the current step.
    ///
    /// Emits `ActionPerformed`, then applies the first flow rule matching
    /// the current step and action. Without a rule, the step advances if its
    /// own [`ActionType`](crate::action::ActionType) accepts the action.
    pub fn handle_action(&mut self, performed: PerformedAction) {
        let Some(step_id) = self.active_step().map(|step| step.id.clone()) else {
            debug!(action = ?performed, "action ignored: no step in progress");
            return;
        };
        self.emit(&TourEvent::ActionPerformed(performed.clone()));

        let outcome = self.machine.flow().and_then(|flow| {
            flow.rules
                .iter()
                .find(|rule| rule.matches(&step_id, &performed))
                .map(|rule| rule.outcome.clone())
        });
        match outcome {
            Some(outcome) => self.perform(outcome),
            None => {
                if self.current_step().is_some_and(|step| step.action.accepts(&performed)) {
                    self.next_step();
                }
            }
        }
    }

    /// Carry out an action outcome.
    pub fn perform(&mut self, outcome: ActionOutcome) {
        match outcome {
            ActionOutcome::NextStep => self.next_step(),
            ActionOutcome::SkipToIndex(index) => self.skip_to_step(index),
            ActionOutcome::SkipToStep(id) => self.skip_to_step_id(id),
            ActionOutcome::Complete => self.complete_tutorial(),
            ActionOutcome::Restart => match self.active_flow() {
                Some(flow) => self.start_flow(flow),
                None => debug!("restart ignored: no flow in progress"),
            },
            ActionOutcome::StartFlow(name) => {
                self.start_registered_flow(&name);
            }
        }
    }

    /// Evaluate `branch` and jump to the step it picks.
    pub fn follow_branch(&mut self, branch: &Branch) {
        if !self.is_presented() {
            debug!(?branch, "branch ignored: no flow in progress");
            return;
        }
        let target = branch.target().clone();
        self.skip_to_step_id(target);
    }

    /// Skip the flow if `gesture` is its configured skip gesture and the
    /// flow allows skipping. Returns whether the tour was dismissed.
    pub fn handle_skip_gesture(&mut self, gesture: SkipGesture) -> bool {
        let dismisses = self.active_flow().is_some_and(|flow| flow.skips_on(gesture));
        if dismisses {
            self.skip_tutorial();
        } else {
            debug!(?gesture, "skip gesture ignored");
        }
        dismisses
    }

    /// Drive time: fire due deferred resets and auto-advance steps whose
    /// action is `Automatic`.
    pub fn advance(&mut self, delta: Duration) {
        self.fire_due_resets(delta);
        self.tick_automatic(delta);
    }

    /// Run every pending reset now, regardless of remaining delay.
    pub fn flush_resets(&mut self) {
        self.fire_due_resets(Duration::MAX);
    }

    // ── Flow library ─────────────────────────────────────────────────────

    /// Make `flow` startable by name (see [`ActionOutcome::StartFlow`]).
    pub fn register_flow(&mut self, flow: impl Into<Rc<Flow>>) {
        let flow = flow.into();
        debug!(flow = %flow.name, steps = flow.step_count(), "flow registered");
        self.library.insert(flow.name.clone(), flow);
    }

    pub fn registered_flow(&self, name: &str) -> Option<&Flow> {
        self.library.get(name).map(Rc::as_ref)
    }

    /// Start a registered flow. Returns `false` for unknown names.
    pub fn start_registered_flow(&mut self, name: &str) -> bool {
        match self.library.get(name).cloned() {
            Some(flow) => {
                self.start_flow(flow);
                true
            }
            None => {
                debug!(name, "unknown flow");
                false
            }
        }
    }

    // ── Observation ──────────────────────────────────────────────────────

    /// Register an event handler. Handlers run synchronously, in
    /// registration order, for every emitted event.
    pub fn add_event_handler(&mut self, handler: impl FnMut(&TourEvent) + 'static) {
        self.listeners.push(Box::new(handler));
    }

    /// Subscribe to state changes. The callback receives a [`Snapshot`]
    /// after every applied transition and every changed frame.
    pub fn subscribe(&mut self, callback: impl Fn(&Snapshot) + 'static) -> Subscription {
        let strong: SubscriberRc = Rc::new(callback);
        self.subscribers.push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Number of registered subscribers, including dropped ones not yet
    /// pruned.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Monotonic change counter for dirty-checking.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: self.version,
            flow_state: self.machine.flow_state(),
            is_presented: self.machine.is_presented(),
            session: self.machine.session(),
        }
    }

    pub fn machine(&self) -> &MachineState {
        &self.machine
    }

    pub fn current_flow(&self) -> Option<&Flow> {
        self.machine.flow().map(Rc::as_ref)
    }

    /// The step at the current index, derived fresh on every call.
    pub fn current_step(&self) -> Option<&Step> {
        self.machine.current_step()
    }

    pub fn current_step_index(&self) -> usize {
        self.machine.index()
    }

    pub fn flow_state(&self) -> FlowState {
        self.machine.flow_state()
    }

    pub fn is_presented(&self) -> bool {
        self.machine.is_presented()
    }

    pub fn session(&self) -> SessionToken {
        self.machine.session()
    }

    pub fn target_frame(&self, key: &str) -> Option<Rect> {
        self.frames.get(key)
    }

    pub fn target_frames(&self) -> &FrameRegistry {
        &self.frames
    }

    /// Frame registered for the current step's target, if any.
    pub fn current_target_frame(&self) -> Option<Rect> {
        self.frames.get(&self.current_step()?.target_key)
    }

    /// `(index, step_count)` while a flow is in progress.
    pub fn progress(&self) -> Option<(usize, usize)> {
        let index = self.machine.flow_state().step_index()?;
        Some((index, self.current_flow()?.step_count()))
    }

    pub fn pending_resets(&self) -> &[PendingReset] {
        &self.pending_resets
    }

    /// Styles for the current step after step, flow and global resolution.
    pub fn current_styles(&self) -> Option<ResolvedStyles> {
        let flow = self.current_flow()?;
        let step = self.current_step()?;
        Some(resolve(&step.styles, &flow.styles, &self.config.styles))
    }

    /// The current flow's transition, or the configured default.
    pub fn current_transition(&self) -> Transition {
        self.current_flow()
            .and_then(|flow| flow.transition)
            .unwrap_or(self.config.transition)
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn active_flow(&self) -> Option<Rc<Flow>> {
        if self.is_presented() {
            self.machine.flow().cloned()
        } else {
            None
        }
    }

    fn active_step(&self) -> Option<&Step> {
        if self.is_presented() {
            self.current_step()
        } else {
            None
        }
    }

    fn apply(&mut self, command: Command) {
        let name = command.name();
        let _span = debug_span!("waypoint.command", command = name).entered();
        let transition = self.machine.apply(command);
        if !transition.applied {
            debug!(command = name, state = ?self.machine.flow_state(), "command ignored");
            return;
        }

        self.machine = transition.state;
        self.step_elapsed = Duration::ZERO;
        self.version += 1;
        for event in &transition.events {
            self.emit(event);
        }
        for effect in transition.effects {
            self.run_effect(effect);
        }
        self.notify();
    }

    fn emit(&mut self, event: &TourEvent) {
        self.log_event(event);
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    fn log_event(&self, event: &TourEvent) {
        let flow = self.current_flow().map_or("", |flow| flow.name.as_str());
        let session = self.machine.session().get();
        match event {
            TourEvent::TutorialStarted => info!(
                flow,
                session,
                steps = self.current_flow().map_or(0, Flow::step_count),
                "tour started"
            ),
            TourEvent::StepStarted(step) => {
                debug!(flow, step = %step, index = self.machine.index(), "step started");
            }
            TourEvent::StepCompleted(step) => debug!(flow, step = %step, "step completed"),
            TourEvent::StepSkipped(step) => debug!(flow, step = %step, "step skipped"),
            TourEvent::TutorialCompleted => info!(flow, session, "tour completed"),
            TourEvent::TutorialSkipped => info!(flow, session, "tour skipped"),
            TourEvent::ActionPerformed(action) => debug!(flow, ?action, "action performed"),
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::InvokeOnComplete => {
                if let Some(callback) = self.current_flow().and_then(|flow| flow.on_complete.clone()) {
                    callback();
                }
            }
            Effect::InvokeOnSkip => {
                if let Some(callback) = self.current_flow().and_then(|flow| flow.on_skip.clone()) {
                    callback();
                }
            }
            Effect::ScheduleReset(token) => {
                let delay = self.config.reset_delay();
                debug!(session = token.get(), delay_ms = self.config.reset_delay_ms, "deferred reset scheduled");
                self.pending_resets.push(PendingReset {
                    token,
                    remaining: delay,
                });
            }
            Effect::ClearFrames => {
                let cleared = self.frames.len();
                self.frames.clear();
                debug!(session = self.machine.session().get(), cleared, "deferred reset applied");
            }
        }
    }

    fn fire_due_resets(&mut self, delta: Duration) {
        if self.pending_resets.is_empty() {
            return;
        }
        let mut due = Vec::new();
        self.pending_resets.retain_mut(|pending| {
            pending.remaining = pending.remaining.saturating_sub(delta);
            if pending.remaining.is_zero() {
                due.push(pending.token);
                false
            } else {
                true
            }
        });
        for token in due {
            let live = self.machine.session();
            if token != live {
                debug!(stale = token.get(), live = live.get(), "stale deferred reset discarded");
                continue;
            }
            self.apply(Command::Reset(token));
        }
    }

    fn tick_automatic(&mut self, delta: Duration) {
        let Some(delay) = self
            .active_step()
            .and_then(|step| step.action.auto_advance_delay())
        else {
            return;
        };
        self.step_elapsed = self.step_elapsed.saturating_add(delta);
        if self.step_elapsed < delay {
            return;
        }
        self.step_elapsed = Duration::ZERO;
        self.handle_action(PerformedAction::Timeout(delay));
    }

    fn notify(&mut self) {
        self.subscribers.retain(|weak| weak.strong_count() > 0);
        if self.subscribers.is_empty() {
            return;
        }
        let callbacks: Vec<SubscriberRc> = self.subscribers.iter().filter_map(Weak::upgrade).collect();
        let snapshot = self.snapshot();
        let started = Instant::now();
        for callback in &callbacks {
            callback(&snapshot);
        }
        trace!(
            subscribers = callbacks.len(),
            version = snapshot.version,
            duration_us = started.elapsed().as_micros() as u64,
            "state change propagated"
        );
    }
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("flow_state", &self.machine.flow_state())
            .field("index", &self.machine.index())
            .field("session", &self.machine.session())
            .field("frames", &self.frames.len())
            .field("listeners", &self.listeners.len())
            .field("subscribers", &self.subscribers.len())
            .field("pending_resets", &self.pending_resets)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
