//! Transcript export: plain text, paginated text and JSON.

use std::path::Path;
use std::str::FromStr;

use crate::error::{CoreError, Result};
use crate::session::Session;

/// Characters kept per line in the paginated layout.
pub const PAGE_WIDTH: usize = 120;
/// Content lines per page in the paginated layout.
pub const PAGE_HEIGHT: usize = 52;

const PAGE_BREAK: char = '\u{000C}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptFormat {
    Text,
    Pages,
    Json,
}

impl TranscriptFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptFormat::Text => "txt",
            TranscriptFormat::Pages => "pages",
            TranscriptFormat::Json => "json",
        }
    }
}

impl FromStr for TranscriptFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "txt" | "text" => Ok(TranscriptFormat::Text),
            "pages" | "paged" => Ok(TranscriptFormat::Pages),
            "json" => Ok(TranscriptFormat::Json),
            other => Err(CoreError::Session(format!(
                "unknown transcript format '{}' (expected txt, pages or json)",
                other
            ))),
        }
    }
}

/// `ROLE: content` blocks separated by a blank line.
pub fn export_text(session: &Session) -> String {
    session
        .turns
        .iter()
        .flat_map(|turn| turn.messages())
        .map(|(role, content)| format!("{}: {}", role.label(), content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fixed-height pages with a header line, separated by form feeds.
/// Lines longer than [`PAGE_WIDTH`] are truncated.
pub fn export_paginated(session: &Session) -> String {
    let mut lines: Vec<String> = Vec::new();
    for (role, content) in session.turns.iter().flat_map(|turn| turn.messages()) {
        let block = format!("{}: {}", role.label(), content);
        lines.extend(block.split('\n').map(|l| l.chars().take(PAGE_WIDTH).collect()));
        lines.push(String::new());
    }
    // trailing separator after the final message
    lines.pop();

    if lines.is_empty() {
        return format!("Transcript {} | page 1\n\n", session.id);
    }

    lines
        .chunks(PAGE_HEIGHT)
        .enumerate()
        .map(|(idx, page)| {
            format!(
                "Transcript {} | page {}\n\n{}\n",
                session.id,
                idx + 1,
                page.join("\n")
            )
        })
        .collect::<Vec<_>>()
        .join(&PAGE_BREAK.to_string())
}

pub fn export_json(session: &Session) -> Result<String> {
    Ok(serde_json::to_string_pretty(session)?)
}

/// Render the session in `format` and write it to `path`.
pub fn write_transcript(session: &Session, format: TranscriptFormat, path: &Path) -> Result<()> {
    let body = match format {
        TranscriptFormat::Text => export_text(session),
        TranscriptFormat::Pages => export_paginated(session),
        TranscriptFormat::Json => export_json(session)?,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, body)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turn::ConversationTurn;

    fn session_with(n: usize) -> Session {
        let mut session = Session::new();
        for i in 0..n {
            session.add_turn(ConversationTurn::new(
                format!("question {i}"),
                "SELECT 1",
                format!("answer {i}"),
            ));
        }
        session
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("txt".parse::<TranscriptFormat>().unwrap(), TranscriptFormat::Text);
        assert_eq!("PAGES".parse::<TranscriptFormat>().unwrap(), TranscriptFormat::Pages);
        assert_eq!("json".parse::<TranscriptFormat>().unwrap(), TranscriptFormat::Json);
        assert!("pdf".parse::<TranscriptFormat>().is_err());
    }

    #[test]
    fn test_export_text() {
        let text = export_text(&session_with(2));
        assert_eq!(
            text,
            "USER: question 0\n\nASSISTANT: answer 0\n\nUSER: question 1\n\nASSISTANT: answer 1"
        );
    }

    #[test]
    fn test_export_text_empty_session() {
        assert_eq!(export_text(&Session::new()), "");
    }

    #[test]
    fn test_paginated_truncates_long_lines() {
        let mut session = Session::new();
        session.add_turn(ConversationTurn::new("x".repeat(300), "SELECT 1", "ok"));

        let out = export_paginated(&session);
        assert!(out.lines().all(|l| l.chars().count() <= PAGE_WIDTH));
        assert!(out.contains(&"x".repeat(PAGE_WIDTH - "USER: ".len())));
    }

    #[test]
    fn test_paginated_breaks_pages() {
        // 2 lines + 1 separator per message, 2 messages per turn
        let out = export_paginated(&session_with(30));
        let pages: Vec<_> = out.split(PAGE_BREAK).collect();
        assert!(pages.len() > 1);
        assert!(pages[0].starts_with("Transcript "));
        assert!(pages[1].contains("| page 2"));
    }

    #[test]
    fn test_paginated_empty_session_has_one_page() {
        let out = export_paginated(&Session::new());
        assert!(out.contains("page 1"));
        assert!(!out.contains(PAGE_BREAK));
    }

    #[test]
    fn test_export_json_round_trip() {
        let session = session_with(1);
        let json = export_json(&session).unwrap();
        let decoded: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.turns.len(), 1);
    }

    #[test]
    fn test_write_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("transcript.txt");

        write_transcript(&session_with(1), TranscriptFormat::Text, &path).unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.starts_with("USER: question 0"));
    }
}
