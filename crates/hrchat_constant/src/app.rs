//! Application metadata constants

pub const NAME: &str = "hrchat";
pub const DISPLAY_NAME: &str = "HR Dataset Chatbot";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = "Ask questions about the HR dataset in plain English";

/// Service name reported to tracing / OTLP
pub const SERVICE_NAME: &str = "hrchat";
