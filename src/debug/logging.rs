use bevy::prelude::*;

use super::FlowDebugState;
use crate::core::components::FlowBody;
use crate::physics::flow::{FlowField, FlowSample};

pub fn flow_logging_system(
    time: Res<Time>,
    mut state: ResMut<FlowDebugState>,
    field: Option<Res<FlowField>>,
    q: Query<(Entity, &Transform, &FlowSample), With<FlowBody>>,
) {
    state.frame_counter = state.frame_counter.wrapping_add(1);
    state.time_accum += time.delta_secs();
    if state.time_accum < state.log_interval {
        return;
    }
    state.time_accum = 0.0;
    let (segments, polygons) = field
        .as_ref()
        .map(|f| (f.segments().len(), f.polygons().len()))
        .unwrap_or((0, 0));
    let affected = q.iter().filter(|(_, _, s)| s.affected).count();
    info!(
        target: "flow",
        "FLOW frame={} t={:.3}s segments={} polygons={} bodies={} affected={}",
        state.frame_counter,
        time.elapsed_secs(),
        segments,
        polygons,
        q.iter().count(),
        affected
    );
    for (e, tf, s) in q.iter().filter(|(_, _, s)| s.affected) {
        debug!(
            target: "flow",
            "  body={e:?} pos=({:.1},{:.1}) force=({:.2},{:.2})",
            tf.translation.x,
            tf.translation.y,
            s.force.x,
            s.force.y
        );
    }
}
