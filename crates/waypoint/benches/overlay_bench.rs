//! Benchmarks for the per-frame hot path: frame registration and planning.
//!
//! Run with: cargo bench -p waypoint

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use waypoint::{Coordinator, Flow, OverlayPlan, Point, Rect, Size, Step};

fn tour() -> Coordinator {
    let steps = (0..8)
        .map(|i| Step::new(format!("s{i}"), format!("k{i}"), "Title", "Body text"))
        .collect();
    let mut coordinator = Coordinator::new();
    coordinator.start_flow(Flow::new("bench", steps));
    for i in 0..8 {
        coordinator.register_target_frame(&format!("k{i}"), Rect::new(20.0 * i as f64, 60.0, 80.0, 32.0));
    }
    coordinator
}

fn bench_register_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlay/register_frame");
    let mut coordinator = tour();
    let mut x = 0.0;
    group.bench_function("moving", |b| {
        b.iter(|| {
            x += 1.0;
            coordinator.register_target_frame(black_box("k0"), Rect::new(x, 60.0, 80.0, 32.0));
        })
    });
    group.bench_function("unchanged", |b| {
        b.iter(|| {
            coordinator.register_target_frame(black_box("k1"), Rect::new(20.0, 60.0, 80.0, 32.0));
        })
    });
    group.finish();
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlay/plan");
    let coordinator = tour();
    let viewport = Size::new(390.0, 844.0);
    group.bench_function("estimated", |b| {
        b.iter(|| black_box(OverlayPlan::compute(black_box(&coordinator), viewport, None)))
    });
    group.bench_function("measured", |b| {
        b.iter(|| {
            black_box(OverlayPlan::compute(
                black_box(&coordinator),
                viewport,
                Some(Size::new(240.0, 120.0)),
            ))
        })
    });
    if let Some(plan) = OverlayPlan::compute(&coordinator, viewport, None) {
        group.bench_function("hit_test", |b| {
            b.iter(|| black_box(plan.hit_test(black_box(Point::new(200.0, 400.0)))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_register_frame, bench_plan);
criterion_main!(benches);
