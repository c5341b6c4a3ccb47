//! Ambient effect directives: the only thing cosmetic spawners (bubbles, ripples) get
//! from flow annotations. They never see or touch the force field.
use bevy::prelude::*;

use super::properties::{CompassDirection, FlowProperties};

#[derive(Debug, Clone, PartialEq)]
pub struct AmbientDirective {
    pub name: String,
    pub position: Vec2,
    pub direction: CompassDirection,
    /// Seconds between bursts.
    pub interval: f32,
    pub burst: u32,
}

/// All directives for the loaded level.
#[derive(Resource, Debug, Clone, Default)]
pub struct AmbientDirectives(pub Vec<AmbientDirective>);

/// Builds a directive at the vertex centroid. `None` when there are no vertices.
pub fn directive_for(
    name: &str,
    points: &[Vec2],
    props: &FlowProperties,
    default_direction: CompassDirection,
) -> Option<AmbientDirective> {
    if points.is_empty() {
        return None;
    }
    let centroid = points.iter().copied().sum::<Vec2>() / points.len() as f32;
    Some(AmbientDirective {
        name: name.to_string(),
        position: centroid,
        direction: props.direction.unwrap_or(default_direction),
        interval: props.interval,
        burst: props.burst,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::properties::PropertyDefaults;

    #[test]
    fn directive_sits_at_centroid_with_default_direction() {
        let props = FlowProperties::defaults(&PropertyDefaults::default());
        let d = directive_for(
            "vent",
            &[Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0), Vec2::new(0.0, 10.0)],
            &props,
            CompassDirection::Up,
        )
        .unwrap();
        assert_eq!(d.position, Vec2::new(5.0, 5.0));
        assert_eq!(d.direction, CompassDirection::Up);
        assert_eq!(d.burst, 3);
        assert!(directive_for("empty", &[], &props, CompassDirection::Up).is_none());
    }
}
