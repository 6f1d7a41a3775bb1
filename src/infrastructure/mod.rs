pub mod config;
pub mod http_prediction_repository;
