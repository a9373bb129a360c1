pub mod config;
pub mod error;
pub mod record;

pub use config::{AppConfig, InferenceConfig, ResolverConfig};
pub use error::{CoreError, Result};
pub use record::{Database, Record};
