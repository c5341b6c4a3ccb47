//! Flow currents: author-placed line-chains and polygon areas turned into a force field
//! that pushes flow bodies around.
//!
//! * `geometry`: immutable segment / polygon primitives.
//! * `field`: the read-only `FlowField` resource and its per-point query.
//! * `integrator`: per-tick application of field samples to Rapier velocities.

pub mod field;
pub mod geometry;
pub mod integrator;

pub use field::{FieldRegions, FlowAffinity, FlowField, FlowSample};
pub use geometry::{PolygonArea, RegionTags, Segment, SegmentOrigin};
pub use integrator::FlowIntegratorPlugin;
