pub mod db;
pub mod error;
pub mod session;
pub mod transcript;
pub mod turn;

pub use db::{QueryResult, TableColumn};
pub use error::{CoreError, Result};
pub use session::{Session, SessionId};
pub use transcript::{export_json, export_paginated, export_text, write_transcript, TranscriptFormat};
pub use turn::{ConversationTurn, Role};
