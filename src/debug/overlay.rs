use bevy::prelude::*;

use super::FlowDebugState;
use crate::core::components::FlowBody;
use crate::physics::flow::{FlowField, FlowSample};

const LINE_COLOR: Color = Color::srgb(0.2, 0.8, 1.0);
const HARPOON_COLOR: Color = Color::srgb(1.0, 0.45, 0.2);
const POLYGON_COLOR: Color = Color::srgb(0.3, 1.0, 0.6);
const SAMPLE_COLOR: Color = Color::srgb(1.0, 1.0, 0.2);
const ARROW_LEN: f32 = 30.0;
/// Sampled force is drawn at this many pixels per unit so small forces stay visible.
const SAMPLE_ARROW_SCALE: f32 = 0.5;

/// Segments with direction arrows, plus polygon outlines.
pub fn draw_flow_regions(
    state: Res<FlowDebugState>,
    field: Option<Res<FlowField>>,
    mut gizmos: Gizmos,
) {
    if !state.draw_regions {
        return;
    }
    let Some(field) = field else {
        return;
    };
    for seg in field.segments() {
        let color = if seg.harpoon_only() { HARPOON_COLOR } else { LINE_COLOR };
        gizmos.line_2d(seg.start(), seg.end(), color);
        let mid = (seg.start() + seg.end()) * 0.5;
        gizmos.arrow_2d(mid, mid + seg.direction() * ARROW_LEN, color);
    }
    for poly in field.polygons() {
        let color = if poly.harpoon_only() { HARPOON_COLOR } else { POLYGON_COLOR };
        let pts = poly.points();
        for (i, a) in pts.iter().enumerate() {
            let b = pts[(i + 1) % pts.len()];
            gizmos.line_2d(*a, b, color);
        }
        let c = poly.bounds().center();
        gizmos.arrow_2d(c, c + poly.direction() * ARROW_LEN, color);
    }
}

/// Last applied force on every flow body.
pub fn draw_flow_samples(
    state: Res<FlowDebugState>,
    q: Query<(&Transform, &FlowSample), With<FlowBody>>,
    mut gizmos: Gizmos,
) {
    if !state.draw_regions {
        return;
    }
    for (tf, sample) in q.iter() {
        if !sample.affected {
            continue;
        }
        let p = tf.translation.truncate();
        gizmos.arrow_2d(p, p + sample.force * SAMPLE_ARROW_SCALE, SAMPLE_COLOR);
    }
}
