pub mod ambient;
pub mod annotations;
pub mod ingest;
pub mod loader;
pub mod properties;
pub mod registry;

// Re-export primary plugin & resources for convenience
pub use ambient::{AmbientDirective, AmbientDirectives};
pub use annotations::{AnnotationKind, FlowFile, LevelLoadError, RawAnnotation};
pub use ingest::{ingest, IngestDiagnostic, IngestOutcome, IngestSettings};
pub use loader::{build_flow_level, LevelLoaderPlugin, LevelSelection};
pub use properties::CompassDirection;
