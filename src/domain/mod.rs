// Domain layer - Turbine telemetry models and derivation rules
pub mod alert;
pub mod dashboard;
pub mod prediction;
pub mod reading;
pub mod telemetry;
pub mod turbine;
