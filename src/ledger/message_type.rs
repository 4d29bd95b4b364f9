use serde::{Deserialize, Serialize};

/// Classification of a ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

const ERROR_WORDS: &[&str] = &["error", "failed", "failure", "panic", "fatal"];
const WARNING_WORDS: &[&str] = &["warning", "warn", "deprecated"];
const SUCCESS_WORDS: &[&str] = &["success", "successful", "completed", "done", "ok"];

impl MessageType {
    /// Classifies free text by keyword. Error wins over warning, warning over success.
    pub fn detect(text: &str) -> Self {
        let lower = text.to_lowercase();
        let has = |words: &[&str]| {
            lower
                .split(|c: char| !c.is_alphanumeric())
                .any(|token| words.contains(&token))
        };

        if has(ERROR_WORDS) {
            MessageType::Error
        } else if has(WARNING_WORDS) {
            MessageType::Warning
        } else if has(SUCCESS_WORDS) {
            MessageType::Success
        } else {
            MessageType::Info
        }
    }

    fn severity(self) -> u8 {
        match self {
            MessageType::Info => 0,
            MessageType::Success => 1,
            MessageType::Warning => 2,
            MessageType::Error => 3,
        }
    }

    pub fn is_error(self) -> bool {
        self == MessageType::Error
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::Info => "info",
            MessageType::Success => "success",
            MessageType::Warning => "warning",
            MessageType::Error => "error",
        }
    }
}

/// One piece of a progress report. `kind` is `None` when the producer left it unclassified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub kind: Option<MessageType>,
    pub text: String,
}

impl Fragment {
    pub fn new(kind: MessageType, text: impl Into<String>) -> Self {
        Self {
            kind: Some(kind),
            text: text.into(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            kind: None,
            text: text.into(),
        }
    }
}

impl From<&str> for Fragment {
    fn from(text: &str) -> Self {
        Fragment::plain(text)
    }
}

impl From<String> for Fragment {
    fn from(text: String) -> Self {
        Fragment::plain(text)
    }
}

/// Joins fragments into one line and picks the most severe explicit kind.
/// Falls back to keyword detection when no fragment was classified.
pub fn combine(fragments: &[Fragment]) -> (MessageType, String) {
    let text = fragments
        .iter()
        .map(|f| f.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let kind = fragments
        .iter()
        .filter_map(|f| f.kind)
        .max_by_key(|k| k.severity())
        .unwrap_or_else(|| MessageType::detect(&text));

    (kind, text)
}

#[cfg(test)]
#[path = "../../tests/unit/ledger/message_type.rs"]
mod tests;
