pub mod config;

pub use config::{FlowConfig, GameConfig, LineDirectionMode, PlayerConfig, WindowConfig};
