//! Field primitives: directed segments and closed polygon areas.
//!
//! Both primitives are immutable once built. Geometry is validated in two steps so the
//! ingest pipeline can reject malformed edges before a direction is known:
//! * `SegmentShape` / `PolygonShape` check coordinates and vertex counts.
//! * `Segment` / `PolygonArea` attach the flow tags and a unit direction.
use bevy::prelude::*;
use smallvec::SmallVec;
use thiserror::Error;

/// Edges shorter than this are treated as zero-length.
pub const MIN_SEGMENT_LENGTH: f32 = 1e-4;
/// Strength tags are clamped into this range.
pub const STRENGTH_RANGE: (f32, f32) = (1.0, 10.0);

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FlowGeometryError {
    #[error("segment endpoints coincide near ({x}, {y})")]
    ZeroLength { x: f32, y: f32 },
    #[error("polygon needs at least 3 distinct vertices, got {0}")]
    TooFewVertices(usize),
    #[error("non-finite coordinate in flow geometry")]
    NonFinite,
    #[error("flow direction ({x}, {y}) is zero or non-finite")]
    InvalidDirection { x: f32, y: f32 },
}

/// Flow tags shared by every region kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionTags {
    pub strength: f32,
    pub width: f32,
    pub harpoon_only: bool,
}

impl RegionTags {
    pub fn new(strength: f32, width: f32, harpoon_only: bool) -> Self {
        Self {
            strength: clamp_strength(strength),
            width,
            harpoon_only,
        }
    }
}

pub fn clamp_strength(s: f32) -> f32 {
    if s.is_finite() {
        s.clamp(STRENGTH_RANGE.0, STRENGTH_RANGE.1)
    } else {
        STRENGTH_RANGE.0
    }
}

/// Minimum distance from `p` to the segment `a..b`, projection clamped to the segment's extent.
#[inline]
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Odd-crossings ray cast toward +x. Boundary points follow the test's own half-open convention.
pub fn point_in_polygon(p: Vec2, points: &[Vec2]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (points[i], points[j]);
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_cross = (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn finite(v: Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

/// Normalizes a push direction; zero-length or non-finite vectors are rejected.
pub fn unit_direction(d: Vec2) -> Result<Vec2, FlowGeometryError> {
    d.try_normalize()
        .ok_or(FlowGeometryError::InvalidDirection { x: d.x, y: d.y })
}

/// Validated (finite, non-degenerate) edge without flow metadata.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentShape {
    start: Vec2,
    end: Vec2,
    length: f32,
}

impl SegmentShape {
    pub fn new(start: Vec2, end: Vec2) -> Result<Self, FlowGeometryError> {
        if !finite(start) || !finite(end) {
            return Err(FlowGeometryError::NonFinite);
        }
        let length = start.distance(end);
        if length < MIN_SEGMENT_LENGTH {
            return Err(FlowGeometryError::ZeroLength {
                x: start.x,
                y: start.y,
            });
        }
        Ok(Self { start, end, length })
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }
    pub fn end(&self) -> Vec2 {
        self.end
    }
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Left-hand unit normal of `start -> end`.
    pub fn perpendicular(&self) -> Vec2 {
        (self.end - self.start).perp() / self.length
    }
}

/// Where a segment came from; boundary edges of polygons are kept for drawing and as
/// the proximity fallback outside the polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentOrigin {
    LineChain,
    PolygonBoundary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    shape: SegmentShape,
    tags: RegionTags,
    direction: Vec2,
    origin: SegmentOrigin,
}

impl Segment {
    pub fn new(
        shape: SegmentShape,
        tags: RegionTags,
        direction: Vec2,
        origin: SegmentOrigin,
    ) -> Result<Self, FlowGeometryError> {
        Ok(Self {
            shape,
            tags,
            direction: unit_direction(direction)?,
            origin,
        })
    }

    /// Builds a line-chain segment straight from endpoints.
    pub fn try_new(
        start: Vec2,
        end: Vec2,
        tags: RegionTags,
        direction: Vec2,
    ) -> Result<Self, FlowGeometryError> {
        Self::new(
            SegmentShape::new(start, end)?,
            tags,
            direction,
            SegmentOrigin::LineChain,
        )
    }

    pub fn start(&self) -> Vec2 {
        self.shape.start
    }
    pub fn end(&self) -> Vec2 {
        self.shape.end
    }
    pub fn length(&self) -> f32 {
        self.shape.length
    }
    pub fn strength(&self) -> f32 {
        self.tags.strength
    }
    pub fn influence_width(&self) -> f32 {
        self.tags.width
    }
    pub fn direction(&self) -> Vec2 {
        self.direction
    }
    pub fn harpoon_only(&self) -> bool {
        self.tags.harpoon_only
    }
    pub fn origin(&self) -> SegmentOrigin {
        self.origin
    }

    pub fn distance_to(&self, p: Vec2) -> f32 {
        distance_to_segment(p, self.shape.start, self.shape.end)
    }

    /// Linear falloff factor in (0, 1]; `None` at or beyond the influence width.
    pub fn influence_at(&self, p: Vec2) -> Option<f32> {
        let width = self.tags.width;
        if !(width > 0.0) {
            return None;
        }
        let d = self.distance_to(p);
        if d > width {
            return None;
        }
        let factor = 1.0 - d / width;
        (factor > 0.0).then_some(factor)
    }
}

/// Validated vertex ring (closure implied) with a cached bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonShape {
    points: SmallVec<[Vec2; 8]>,
    bounds: Rect,
}

impl PolygonShape {
    /// Consecutive duplicate vertices (including last == first) are collapsed before the
    /// vertex count is checked.
    pub fn new(points: &[Vec2]) -> Result<Self, FlowGeometryError> {
        if points.iter().any(|p| !finite(*p)) {
            return Err(FlowGeometryError::NonFinite);
        }
        let mut ring: SmallVec<[Vec2; 8]> = SmallVec::with_capacity(points.len());
        for &p in points {
            if ring
                .last()
                .is_some_and(|last: &Vec2| last.distance(p) < MIN_SEGMENT_LENGTH)
            {
                continue;
            }
            ring.push(p);
        }
        while ring.len() > 1 && ring[0].distance(ring[ring.len() - 1]) < MIN_SEGMENT_LENGTH {
            ring.pop();
        }
        if ring.len() < 3 {
            return Err(FlowGeometryError::TooFewVertices(ring.len()));
        }
        let mut bounds = Rect::from_corners(ring[0], ring[0]);
        for p in ring.iter().skip(1) {
            bounds = bounds.union_point(*p);
        }
        Ok(Self { points: ring, bounds })
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn contains(&self, p: Vec2) -> bool {
        // Anything outside the inclusive AABB has zero crossings anyway.
        self.bounds.contains(p) && point_in_polygon(p, &self.points)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonArea {
    shape: PolygonShape,
    tags: RegionTags,
    direction: Vec2,
}

impl PolygonArea {
    pub fn new(shape: PolygonShape, tags: RegionTags, direction: Vec2) -> Result<Self, FlowGeometryError> {
        Ok(Self {
            shape,
            tags,
            direction: unit_direction(direction)?,
        })
    }

    pub fn try_new(
        points: &[Vec2],
        tags: RegionTags,
        direction: Vec2,
    ) -> Result<Self, FlowGeometryError> {
        Self::new(PolygonShape::new(points)?, tags, direction)
    }

    pub fn points(&self) -> &[Vec2] {
        self.shape.points()
    }
    pub fn bounds(&self) -> Rect {
        self.shape.bounds()
    }
    pub fn strength(&self) -> f32 {
        self.tags.strength
    }
    pub fn direction(&self) -> Vec2 {
        self.direction
    }
    pub fn harpoon_only(&self) -> bool {
        self.tags.harpoon_only
    }
    pub fn contains(&self, p: Vec2) -> bool {
        self.shape.contains(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags() -> RegionTags {
        RegionTags::new(2.0, 50.0, false)
    }

    #[test]
    fn distance_is_zero_on_the_segment() {
        let a = Vec2::new(-20.0, 5.0);
        let b = Vec2::new(80.0, 45.0);
        assert_eq!(distance_to_segment(a, a, b), 0.0);
        assert_eq!(distance_to_segment(b, a, b), 0.0);
        for i in 1..10 {
            let p = a.lerp(b, i as f32 / 10.0);
            assert!(distance_to_segment(p, a, b) < 1e-4, "t={i} not on segment");
        }
    }

    #[test]
    fn distance_clamps_past_the_endpoints() {
        let a = Vec2::ZERO;
        let b = Vec2::new(100.0, 0.0);
        assert_eq!(distance_to_segment(Vec2::new(-30.0, 40.0), a, b), 50.0);
        assert_eq!(distance_to_segment(Vec2::new(130.0, 0.0), a, b), 30.0);
        assert_eq!(distance_to_segment(Vec2::new(50.0, -25.0), a, b), 25.0);
    }

    #[test]
    fn zero_length_shape_rejected() {
        let p = Vec2::new(3.0, 3.0);
        assert_eq!(
            SegmentShape::new(p, p),
            Err(FlowGeometryError::ZeroLength { x: 3.0, y: 3.0 })
        );
        assert_eq!(
            SegmentShape::new(Vec2::new(f32::NAN, 0.0), Vec2::ONE),
            Err(FlowGeometryError::NonFinite)
        );
    }

    #[test]
    fn influence_falls_off_linearly() {
        let s = Segment::try_new(Vec2::ZERO, Vec2::new(100.0, 0.0), tags(), Vec2::X).unwrap();
        assert_eq!(s.influence_at(Vec2::new(50.0, 0.0)), Some(1.0));
        assert_eq!(s.influence_at(Vec2::new(50.0, 25.0)), Some(0.5));
        assert_eq!(s.influence_at(Vec2::new(50.0, 50.0)), None);
        assert_eq!(s.influence_at(Vec2::new(50.0, 60.0)), None);
    }

    #[test]
    fn strength_is_clamped_and_direction_normalized() {
        let s = Segment::try_new(
            Vec2::ZERO,
            Vec2::Y,
            RegionTags::new(42.0, 10.0, false),
            Vec2::new(3.0, 4.0),
        )
        .unwrap();
        assert_eq!(s.strength(), 10.0);
        assert!((s.direction().length() - 1.0).abs() < 1e-6);
        assert_eq!(RegionTags::new(0.2, 1.0, false).strength, 1.0);
        assert_eq!(RegionTags::new(f32::NAN, 1.0, false).strength, 1.0);
    }

    #[test]
    fn degenerate_direction_is_rejected() {
        let shape = SegmentShape::new(Vec2::ZERO, Vec2::X).unwrap();
        assert_eq!(
            Segment::new(shape, tags(), Vec2::ZERO, SegmentOrigin::LineChain),
            Err(FlowGeometryError::InvalidDirection { x: 0.0, y: 0.0 })
        );
        let tri = [Vec2::ZERO, Vec2::X, Vec2::Y];
        assert!(matches!(
            PolygonArea::try_new(&tri, tags(), Vec2::new(f32::NAN, 1.0)),
            Err(FlowGeometryError::InvalidDirection { .. })
        ));
    }

    #[test]
    fn perpendicular_is_left_hand_normal() {
        let shape = SegmentShape::new(Vec2::ZERO, Vec2::new(10.0, 0.0)).unwrap();
        assert_eq!(shape.perpendicular(), Vec2::Y);
    }

    #[test]
    fn square_contains_interior_not_exterior() {
        let sq = [
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 100.0),
            Vec2::new(0.0, 100.0),
        ];
        let poly = PolygonArea::try_new(&sq, tags(), Vec2::Y).unwrap();
        assert!(poly.contains(Vec2::new(50.0, 50.0)));
        assert!(poly.contains(Vec2::new(1.0, 99.0)));
        assert!(!poly.contains(Vec2::new(150.0, 50.0)));
        assert!(!poly.contains(Vec2::new(50.0, -0.5)));
    }

    #[test]
    fn concave_polygon_uses_odd_crossings() {
        // U shape: notch between x=40..60 above y=40
        let u = [
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 100.0),
            Vec2::new(60.0, 100.0),
            Vec2::new(60.0, 40.0),
            Vec2::new(40.0, 40.0),
            Vec2::new(40.0, 100.0),
            Vec2::new(0.0, 100.0),
        ];
        let poly = PolygonShape::new(&u).unwrap();
        assert!(poly.contains(Vec2::new(20.0, 80.0)));
        assert!(poly.contains(Vec2::new(80.0, 80.0)));
        assert!(!poly.contains(Vec2::new(50.0, 80.0)));
        assert!(poly.contains(Vec2::new(50.0, 20.0)));
    }

    #[test]
    fn polygon_collapses_duplicates_before_counting() {
        let pts = [Vec2::ZERO, Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::ZERO];
        assert_eq!(
            PolygonShape::new(&pts),
            Err(FlowGeometryError::TooFewVertices(2))
        );
        let closed = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::ZERO];
        assert_eq!(PolygonShape::new(&closed).unwrap().points().len(), 3);
    }
}
