// Presentation layer - HTTP views and actions
pub mod app_state;
pub mod handlers;
