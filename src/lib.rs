pub mod app;
pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod fetch;
pub mod metrics;
pub mod server;

pub use error::{AppError, Result};
