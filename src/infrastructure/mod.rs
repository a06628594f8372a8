// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod csv_input;
pub mod http_backend;
