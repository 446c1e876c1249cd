#![forbid(unsafe_code)]

//! Flows, steps and the coordinator that walks a user through them.
//!
//! # Role in waypoint
//! `waypoint-flow` owns tour *state*. A host builds a [`Flow`] of [`Step`]s,
//! hands it to a [`Coordinator`], reports target frames and user actions,
//! and drives time with [`Coordinator::advance`]. Rendering is left to the
//! host; the `waypoint` facade turns coordinator state into an overlay plan.
//!
//! # Primary responsibilities
//! - **Lifecycle**: start, advance, jump, skip and complete, with events
//!   emitted in a fixed order ([`TourEvent`]).
//! - **Deferred reset**: finished flows stay readable for a configurable
//!   delay and are then cleared, guarded by a [`SessionToken`].
//! - **Actions**: per-step [`ActionType`]s, flow-level [`ActionRule`]s and
//!   [`Branch`]es decide where an action leads.
//! - **Styles**: step, flow and global layers resolve into
//!   [`ResolvedStyles`].
//! - **Configuration**: [`TourConfig`] loads from TOML or JSON behind the
//!   `config` feature.
//!
//! # Threading
//! Everything here is single-threaded (`Rc`, `FnMut` callbacks). The
//! coordinator is meant to live on the UI thread.

pub mod action;
pub mod config;
pub mod coordinator;
pub mod flow;
pub mod machine;
pub mod registry;
pub mod state;
pub mod step;
pub mod style;

pub use action::{
    ActionOutcome, ActionRule, ActionType, Branch, DEFAULT_LONG_PRESS, PerformedAction, Predicate,
    SwipeDirection,
};
pub use config::{ConfigError, DEFAULT_RESET_DELAY, TourConfig};
pub use coordinator::{Coordinator, PendingReset, Snapshot, Subscription};
pub use flow::{Callback, Flow, FlowId, SkipGesture};
pub use machine::{Command, Effect, MachineState};
pub use registry::FrameRegistry;
pub use state::{FlowState, SessionToken, TourEvent};
pub use step::{CustomContent, Step, StepId};
pub use style::{
    ArrowPatch, ArrowStyle, DimPatch, DimStyle, Font, FontWeight, ResolvedStyles, Rgba,
    StylePatches, TooltipPatch, TooltipStyle, Transition, TransitionKind, resolve,
};
