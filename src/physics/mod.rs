pub mod flow;
pub mod rapier;
