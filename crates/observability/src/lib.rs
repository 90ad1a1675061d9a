//! hrchat observability: tracing setup plus span helpers for the question
//! pipeline.
//!
//! Log lines go to stderr so answers printed on stdout stay clean. When an
//! OTLP endpoint is configured, spans are also exported over gRPC.
//!
//! # Quick Start
//!
//! ```no_run
//! use hrchat_observability::{init, ObservabilityConfig};
//!
//! let config = ObservabilityConfig::new("hrchat").with_log_level("debug");
//! init(config).unwrap();
//!
//! tracing::info!("ready");
//! ```
//!
//! # Environment Variables
//!
//! - `OTEL_SERVICE_NAME` or `SERVICE_NAME` - Service name
//! - `OTEL_SERVICE_VERSION` or `SERVICE_VERSION` - Service version
//! - `OTEL_EXPORTER_OTLP_ENDPOINT` - OTLP endpoint
//! - `OTEL_LOG_LEVEL` or `RUST_LOG` - Log level filter

pub mod config;
pub mod error;
pub mod telemetry;
pub mod tracing;

pub use config::ObservabilityConfig;
pub use error::ObservabilityError;
pub use telemetry::{init, init_from_env, shutdown};
pub use tracing::{record_duration, record_error};

// pipeline_span!, llm_span! and sql_span! are exported at the crate root
// through #[macro_export].
