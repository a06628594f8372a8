// Domain layer - URL status models and the pure logic over them
pub mod analytics;
pub mod filter;
pub mod input;
pub mod status;
pub mod tracker;
