//! Random command sequences against the coordinator.
//!
//! After every command:
//! 1. `is_presented()` is true iff the flow state is `InProgress`.
//! 2. `InProgress(i)` names a valid index and matches `current_step_index`.
//! 3. The version never decreases.
//! 4. Every `TutorialStarted` is immediately followed by `StepStarted` of
//!    the first step.
//! 5. Completion and skip callbacks fire at most once per session.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use proptest::prelude::*;
use waypoint_flow::{
    ActionOutcome, ActionRule, Coordinator, Flow, PerformedAction, SkipGesture, Step, StepId,
    TourEvent,
};
use waypoint_geometry::Rect;

#[derive(Debug, Clone)]
enum Op {
    Start(usize),
    Next,
    SkipTo(usize),
    SkipToId(usize),
    Skip,
    Complete,
    Tap,
    Gesture,
    Frame(usize),
    Advance(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => (0usize..6).prop_map(Op::Start),
        4 => Just(Op::Next),
        2 => (0usize..8).prop_map(Op::SkipTo),
        1 => (0usize..8).prop_map(Op::SkipToId),
        1 => Just(Op::Skip),
        1 => Just(Op::Complete),
        2 => Just(Op::Tap),
        1 => Just(Op::Gesture),
        2 => (0usize..8).prop_map(Op::Frame),
        2 => (0u64..800).prop_map(Op::Advance),
    ]
}

fn flow_of(n: usize, finished: &Rc<Cell<u32>>) -> Flow {
    let steps = (0..n)
        .map(|i| Step::new(format!("s{i}"), format!("k{i}"), "t", "d"))
        .collect();
    let on_complete = Rc::clone(finished);
    let on_skip = Rc::clone(finished);
    Flow::new(format!("flow-{n}"), steps)
        .on_complete(move || on_complete.set(on_complete.get() + 1))
        .on_skip(move || on_skip.set(on_skip.get() + 1))
        .rule(ActionRule::new("s1", PerformedAction::DoubleTap, ActionOutcome::Complete))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn invariants_hold_for_any_sequence(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let finished = Rc::new(Cell::new(0u32));
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);

        let mut coordinator = Coordinator::new();
        coordinator.add_event_handler(move |event| sink.borrow_mut().push(event.clone()));

        let mut last_version = coordinator.version();
        let mut sessions_finished = 0u32;

        for op in ops {
            let was_presented = coordinator.is_presented();
            match op {
                Op::Start(n) => coordinator.start_flow(flow_of(n, &finished)),
                Op::Next => coordinator.next_step(),
                Op::SkipTo(i) => coordinator.skip_to_step(i),
                Op::SkipToId(i) => coordinator.skip_to_step_id(format!("s{i}")),
                Op::Skip => coordinator.skip_tutorial(),
                Op::Complete => coordinator.complete_tutorial(),
                Op::Tap => coordinator.handle_action(PerformedAction::Tap),
                Op::Gesture => {
                    coordinator.handle_skip_gesture(SkipGesture::SwipeDown);
                }
                Op::Frame(i) => coordinator.register_target_frame(
                    &format!("k{i}"),
                    Rect::new(i as f64, 0.0, 10.0, 10.0),
                ),
                Op::Advance(ms) => coordinator.advance(Duration::from_millis(ms)),
            }

            if was_presented && coordinator.flow_state().is_finished() {
                sessions_finished += 1;
            }

            let state = coordinator.flow_state();
            prop_assert_eq!(coordinator.is_presented(), state.is_in_progress());
            if let Some(index) = state.step_index() {
                let count = coordinator.current_flow().map_or(0, Flow::step_count);
                prop_assert!(index < count);
                prop_assert_eq!(coordinator.current_step_index(), index);
                prop_assert!(coordinator.current_step().is_some());
            }
            prop_assert!(coordinator.version() >= last_version);
            last_version = coordinator.version();
        }

        prop_assert_eq!(finished.get(), sessions_finished);

        let events = log.borrow();
        for (i, event) in events.iter().enumerate() {
            if *event == TourEvent::TutorialStarted {
                prop_assert_eq!(events.get(i + 1), Some(&TourEvent::StepStarted(StepId::from("s0"))));
            }
        }
    }
}
