pub mod app;
pub mod core;
pub mod debug;
pub mod gameplay;
pub mod physics;

// Curated re-exports
pub use crate::app::game::GamePlugin;
pub use crate::core::components::{FlowBody, Player};
pub use crate::core::config::{FlowConfig, GameConfig, WindowConfig};
pub use crate::physics::flow::{FlowAffinity, FlowField, FlowSample};
