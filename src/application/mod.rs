// Application layer - Store, feeds and use cases
pub mod prediction_repository;
pub mod prediction_service;
pub mod reading_source;
pub mod simulation_feed;
pub mod telemetry_store;
pub mod turbine_service;
