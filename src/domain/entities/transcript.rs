use chrono::{DateTime, Utc};
use std::fmt;

/// Text produced by speech recognition for a single utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub id: String,
    pub text: String,
    pub received_at: DateTime<Utc>,
}

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            received_at: Utc::now(),
        }
    }

    /// Lower-cased form every rule is matched against
    pub fn lowered(&self) -> String {
        self.text.to_lowercase()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl From<&str> for Transcript {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Transcript {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowered_keeps_original_text() {
        let t = Transcript::new("Open YouTube");
        assert_eq!(t.lowered(), "open youtube");
        assert_eq!(t.text, "Open YouTube");
    }

    #[test]
    fn each_transcript_gets_its_own_id() {
        let a = Transcript::new("hello");
        let b = Transcript::new("hello");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn blank_detection() {
        assert!(Transcript::new("   ").is_blank());
        assert!(!Transcript::new(" hi ").is_blank());
    }
}
