pub mod api;
pub mod config;
pub mod error;
pub mod executor;
pub mod observability;
pub mod query;
pub mod transform;

pub use config::Config;
pub use error::{Error, Result};
