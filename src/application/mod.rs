// Application layer - Use cases over the status backend
pub mod error;
pub mod monitor_service;
pub mod status_backend;
