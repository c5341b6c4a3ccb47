use bevy::prelude::*;

use super::geometry::{PolygonArea, Segment};
use crate::core::config::FlowConfig;

/// Fallback per-axis bound when the configured clamp is unusable.
pub const DEFAULT_AXIS_CLAMP: f32 = 5000.0;

/// Which regions a queried body responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum FlowAffinity {
    /// Ignores harpoon-only regions.
    #[default]
    Default,
    /// Responds to every region, harpoon-only included.
    Harpoon,
}

impl FlowAffinity {
    #[inline]
    fn accepts(self, harpoon_only: bool) -> bool {
        !harpoon_only || self == FlowAffinity::Harpoon
    }
}

/// Result of one field query. Also kept on flow bodies as the last sample taken.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct FlowSample {
    pub force: Vec2,
    pub affected: bool,
}

impl FlowSample {
    pub const NONE: Self = Self {
        force: Vec2::ZERO,
        affected: false,
    };
}

/// Ingested regions, ready to be frozen into a `FlowField`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldRegions {
    pub segments: Vec<Segment>,
    pub polygons: Vec<PolygonArea>,
}

impl FieldRegions {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.polygons.is_empty()
    }
}

/// Read-only flow field for the loaded level.
#[derive(Resource, Debug, Clone)]
pub struct FlowField {
    segments: Vec<Segment>,
    polygons: Vec<PolygonArea>,
    force_scale: f32,
    axis_clamp: f32,
}

impl FlowField {
    pub fn new(regions: FieldRegions, force_scale: f32, axis_clamp: f32) -> Self {
        let axis_clamp = if axis_clamp.is_finite() && axis_clamp > 0.0 {
            axis_clamp
        } else {
            DEFAULT_AXIS_CLAMP
        };
        Self {
            segments: regions.segments,
            polygons: regions.polygons,
            force_scale: if force_scale.is_finite() { force_scale } else { 0.0 },
            axis_clamp,
        }
    }

    pub fn from_config(regions: FieldRegions, cfg: &FlowConfig) -> Self {
        Self::new(regions, cfg.force_scale(), cfg.axis_clamp)
    }

    pub fn empty(cfg: &FlowConfig) -> Self {
        Self::from_config(FieldRegions::default(), cfg)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
    pub fn polygons(&self) -> &[PolygonArea] {
        &self.polygons
    }
    pub fn force_scale(&self) -> f32 {
        self.force_scale
    }
    pub fn axis_clamp(&self) -> f32 {
        self.axis_clamp
    }
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.polygons.is_empty()
    }

    /// Force acting on a default (non-harpoon) body at `point`.
    pub fn compute_force(&self, point: Vec2) -> FlowSample {
        self.compute_force_for(point, FlowAffinity::Default)
    }

    pub fn compute_force_for(&self, point: Vec2, affinity: FlowAffinity) -> FlowSample {
        let mut force = Vec2::ZERO;
        let mut affected = false;

        // Containment beats proximity: any containing polygon suppresses the segment pass.
        for poly in self.polygons.iter().filter(|p| affinity.accepts(p.harpoon_only())) {
            if poly.contains(point) {
                affected = true;
                force += poly.direction() * (poly.strength() * self.force_scale);
            }
        }

        if !affected {
            for seg in self.segments.iter().filter(|s| affinity.accepts(s.harpoon_only())) {
                if let Some(factor) = seg.influence_at(point) {
                    affected = true;
                    force += seg.direction() * (seg.strength() * factor * self.force_scale);
                }
            }
        }

        FlowSample {
            force: sanitize_force(force, self.axis_clamp),
            affected,
        }
    }
}

/// Zeroes non-finite components, then clamps each axis to `[-bound, bound]`.
#[inline]
pub fn sanitize_force(v: Vec2, bound: f32) -> Vec2 {
    let axis = |c: f32| if c.is_finite() { c.clamp(-bound, bound) } else { 0.0 };
    Vec2::new(axis(v.x), axis(v.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::flow::geometry::RegionTags;

    const SCALE: f32 = 120.0;

    fn field(segments: Vec<Segment>, polygons: Vec<PolygonArea>) -> FlowField {
        FlowField::new(FieldRegions { segments, polygons }, SCALE, 5000.0)
    }

    fn seg(a: (f32, f32), b: (f32, f32), strength: f32, width: f32, dir: Vec2) -> Segment {
        Segment::try_new(a.into(), b.into(), RegionTags::new(strength, width, false), dir).unwrap()
    }

    #[test]
    fn far_from_everything_is_unaffected() {
        let f = field(vec![seg((0.0, 0.0), (100.0, 0.0), 2.0, 50.0, Vec2::X)], vec![]);
        assert_eq!(f.compute_force(Vec2::new(50.0, 500.0)), FlowSample::NONE);
    }

    #[test]
    fn harpoon_only_regions_skip_default_bodies() {
        let s = Segment::try_new(
            Vec2::ZERO,
            Vec2::new(100.0, 0.0),
            RegionTags::new(2.0, 50.0, true),
            Vec2::X,
        )
        .unwrap();
        let f = field(vec![s], vec![]);
        let p = Vec2::new(50.0, 0.0);
        assert!(!f.compute_force(p).affected);
        let harpoon = f.compute_force_for(p, FlowAffinity::Harpoon);
        assert!(harpoon.affected);
        assert_eq!(harpoon.force, Vec2::new(2.0 * SCALE, 0.0));
    }

    #[test]
    fn harpoon_only_polygon_does_not_shadow_segments_for_default_bodies() {
        let sq = [
            Vec2::new(0.0, -50.0),
            Vec2::new(100.0, -50.0),
            Vec2::new(100.0, 50.0),
            Vec2::new(0.0, 50.0),
        ];
        let rail = PolygonArea::try_new(&sq, RegionTags::new(5.0, 80.0, true), Vec2::Y).unwrap();
        let f = field(vec![seg((0.0, 0.0), (100.0, 0.0), 2.0, 50.0, Vec2::X)], vec![rail]);
        let p = Vec2::new(50.0, 25.0);

        let s = f.compute_force(p);
        assert!(s.affected);
        assert_eq!(s.force, Vec2::new(2.0 * 0.5 * SCALE, 0.0));

        // Harpoon bodies are contained, so the segment is skipped for them.
        let h = f.compute_force_for(p, FlowAffinity::Harpoon);
        assert_eq!(h.force, Vec2::new(0.0, 5.0 * SCALE));
    }

    #[test]
    fn overlapping_polygons_add_up() {
        let sq = [
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 100.0),
            Vec2::new(0.0, 100.0),
        ];
        let a = PolygonArea::try_new(&sq, RegionTags::new(2.0, 80.0, false), Vec2::X).unwrap();
        let b = PolygonArea::try_new(&sq, RegionTags::new(3.0, 80.0, false), Vec2::Y).unwrap();
        let f = field(vec![], vec![a, b]);
        let s = f.compute_force(Vec2::new(10.0, 10.0));
        assert!(s.affected);
        assert_eq!(s.force, Vec2::new(2.0 * SCALE, 3.0 * SCALE));
    }

    #[test]
    fn axis_clamp_bounds_each_axis_independently() {
        let segs = (0..20)
            .map(|_| seg((0.0, 0.0), (100.0, 0.0), 10.0, 50.0, Vec2::new(1.0, 1.0)))
            .collect();
        let f = field(segs, vec![]);
        let s = f.compute_force(Vec2::new(50.0, 0.0));
        assert_eq!(s.force, Vec2::splat(5000.0));
    }

    #[test]
    fn sanitize_zeroes_non_finite() {
        let v = sanitize_force(Vec2::new(f32::NAN, f32::NEG_INFINITY), 10.0);
        assert_eq!(v, Vec2::ZERO);
        assert_eq!(sanitize_force(Vec2::new(-20.0, 3.0), 10.0), Vec2::new(-10.0, 3.0));
    }

    #[test]
    fn unusable_clamp_falls_back() {
        let f = FlowField::new(FieldRegions::default(), SCALE, f32::NAN);
        assert_eq!(f.axis_clamp(), DEFAULT_AXIS_CLAMP);
        let f = FlowField::new(FieldRegions::default(), SCALE, -3.0);
        assert_eq!(f.axis_clamp(), DEFAULT_AXIS_CLAMP);
    }
}
