// Presentation layer - HTTP console over the monitor service
pub mod app_state;
pub mod handlers;
pub mod views;
