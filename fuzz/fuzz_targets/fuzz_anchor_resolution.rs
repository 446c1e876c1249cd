#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use waypoint_geometry::{
    ArrowPath, Arrowhead, Cutout, Footprint, HighlightShape, LayoutParams, Placement, Rect, Size,
    arrow_target_point, resolve_anchor,
};

#[derive(Debug, Arbitrary)]
struct Input {
    target: (f64, f64, f64, f64),
    viewport: (f64, f64),
    measured: Option<(f64, f64)>,
    placement: u8,
    offset: f64,
    shape: u8,
    radius: f64,
    curve: f64,
}

fn placement(selector: u8, offset: f64) -> Placement {
    match selector % 10 {
        0 => Placement::Top { offset },
        1 => Placement::Bottom { offset },
        2 => Placement::Leading { offset },
        3 => Placement::Trailing { offset },
        4 => Placement::TopLeading { offset },
        5 => Placement::TopTrailing { offset },
        6 => Placement::BottomLeading { offset },
        7 => Placement::BottomTrailing { offset },
        8 => Placement::Center,
        _ => Placement::Automatic,
    }
}

fn shape(selector: u8, corner_radius: f64) -> HighlightShape {
    match selector % 4 {
        0 => HighlightShape::Rectangle { corner_radius },
        1 => HighlightShape::Circle,
        2 => HighlightShape::RoundedRect { corner_radius },
        _ => HighlightShape::Custom,
    }
}

fuzz_target!(|input: Input| {
    let (x, y, w, h) = input.target;
    let target = Rect::new(x, y, w, h);
    let viewport = Size::new(input.viewport.0, input.viewport.1);
    let footprint = Footprint::from(input.measured.map(|(w, h)| Size::new(w, h)));
    let params = LayoutParams::default();

    let anchor = resolve_anchor(
        target,
        viewport,
        placement(input.placement, input.offset),
        footprint,
        &params,
    );

    // Resolution never produces NaN for a finite viewport.
    if viewport.width.is_finite() && viewport.height.is_finite() {
        assert!(!anchor.point.x.is_nan(), "anchor x is NaN: {input:?}");
        assert!(!anchor.point.y.is_nan(), "anchor y is NaN: {input:?}");
    }

    let end = arrow_target_point(target, anchor.direction);
    let path = ArrowPath::new(anchor.point, end, input.curve);
    let _ = path.flatten(16);
    let _ = Arrowhead::at_end(&path, 10.0, 30.0);

    let cutout = Cutout::for_target(target, &shape(input.shape, input.radius));
    let commands = cutout.to_path();
    assert!(!commands.is_empty(), "empty cutout path");
    let _ = cutout.contains(anchor.point);
});
