pub mod config;
pub mod context;
pub mod error;
pub mod runtime;

pub use config::{ModelMode, RuntimeConfig};
pub use error::{Result, RuntimeError};
pub use runtime::{build_registry, create_provider, Runtime, SqlSource, TurnOutcome};
