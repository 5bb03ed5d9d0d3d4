pub mod events;
pub mod game;
pub mod telemetry;
pub mod types;
