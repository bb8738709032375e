pub mod telemetry;
pub mod token;
