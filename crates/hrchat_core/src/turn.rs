use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Upper-case label used in memory context and transcripts.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Assistant => "ASSISTANT",
        }
    }
}

/// One answered question: what was asked, the SQL that ran, and the summary
/// shown to the user. Built once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub question: String,
    pub sql: String,
    pub summary: String,
    pub row_count: usize,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(
        question: impl Into<String>,
        sql: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            sql: sql.into(),
            summary: summary.into(),
            row_count: 0,
            timestamp: Utc::now(),
        }
    }

    pub fn with_row_count(mut self, rows: usize) -> Self {
        self.row_count = rows;
        self
    }

    /// The turn as a (user, assistant) message pair.
    pub fn messages(&self) -> [(Role, &str); 2] {
        [
            (Role::User, self.question.as_str()),
            (Role::Assistant, self.summary.as_str()),
        ]
    }
}
