#![no_main]

use std::time::Duration;

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use waypoint_flow::{Coordinator, Flow, PerformedAction, SkipGesture, Step, SwipeDirection};
use waypoint_geometry::Rect;

#[derive(Debug, Arbitrary)]
enum Op {
    Start(u8),
    Next,
    SkipTo(u8),
    SkipToId(u8),
    Skip,
    Complete,
    Tap,
    Swipe,
    Timeout(u16),
    Gesture,
    Frame(u8, f32, f32),
    Advance(u16),
    Flush,
}

fn flow(len: u8) -> Flow {
    let steps = (0..len % 12)
        .map(|i| Step::new(format!("s{i}"), format!("k{i}"), "t", "d"))
        .collect();
    Flow::new(format!("fuzz-{len}"), steps)
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let mut coordinator = Coordinator::new();
    let mut last_version = 0;

    let Ok(ops) = u.arbitrary_iter::<Op>() else {
        return;
    };
    for op in ops {
        let Ok(op) = op else { break };
        match op {
            Op::Start(len) => coordinator.start_flow(flow(len)),
            Op::Next => coordinator.next_step(),
            Op::SkipTo(i) => coordinator.skip_to_step(usize::from(i)),
            Op::SkipToId(i) => coordinator.skip_to_step_id(format!("s{i}")),
            Op::Skip => coordinator.skip_tutorial(),
            Op::Complete => coordinator.complete_tutorial(),
            Op::Tap => coordinator.handle_action(PerformedAction::Tap),
            Op::Swipe => coordinator.handle_action(PerformedAction::Swipe(SwipeDirection::Up)),
            Op::Timeout(ms) => {
                coordinator.handle_action(PerformedAction::Timeout(Duration::from_millis(u64::from(ms))))
            }
            Op::Gesture => {
                coordinator.handle_skip_gesture(SkipGesture::SwipeDown);
            }
            Op::Frame(i, x, y) => coordinator.register_target_frame(
                &format!("k{i}"),
                Rect::new(f64::from(x), f64::from(y), 40.0, 20.0),
            ),
            Op::Advance(ms) => coordinator.advance(Duration::from_millis(u64::from(ms))),
            Op::Flush => coordinator.flush_resets(),
        }

        let state = coordinator.flow_state();
        assert_eq!(coordinator.is_presented(), state.is_in_progress());
        if let Some(index) = state.step_index() {
            let count = coordinator.current_flow().map_or(0, Flow::step_count);
            assert!(index < count, "index {index} out of range {count}");
            assert!(coordinator.current_step().is_some());
        }
        assert!(coordinator.version() >= last_version, "version went backwards");
        last_version = coordinator.version();
    }
});
