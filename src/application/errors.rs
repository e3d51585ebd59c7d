//! Application layer errors

use thiserror::Error;

/// Errors surfaced by a single assistant interaction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssistantError {
    #[error("Microphone permission denied")]
    PermissionDenied,

    #[error("Speech recognition unavailable")]
    RecognitionUnavailable,

    #[error("Recognition error: {0}")]
    Recognition(#[from] RecognitionError),

    #[error("Target app unavailable: {0}")]
    TargetAppUnavailable(String),

    #[error("Dispatch failed: {0}")]
    DispatchFailed(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AssistantError {
    /// Short message shown on the display and spoken back to the user
    pub fn user_message(&self) -> String {
        match self {
            AssistantError::PermissionDenied => "Microphone permission denied".to_string(),
            AssistantError::RecognitionUnavailable | AssistantError::Recognition(RecognitionError::Unavailable) => {
                "Speech recognition not available on this device".to_string()
            }
            AssistantError::Recognition(RecognitionError::Busy) => "Already listening".to_string(),
            AssistantError::Recognition(_) => "I couldn't hear that. Try again.".to_string(),
            AssistantError::TargetAppUnavailable(target) => format!("Couldn't open {}", target),
            AssistantError::DispatchFailed(_) => "Something went wrong. Try again.".to_string(),
            AssistantError::Config(_) => "Assistant is misconfigured".to_string(),
        }
    }
}

/// Speech recognition session errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    #[error("No speech detected")]
    NoSpeech,

    #[error("Recognition timed out")]
    Timeout,

    #[error("Recognition unavailable")]
    Unavailable,

    #[error("A recognition session is already active")]
    Busy,

    #[error("Input closed")]
    Closed,

    #[error("Recognition failed: {0}")]
    Failed(String),
}

/// Platform request errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("No app available for {0}")]
    AppUnavailable(String),

    #[error("Unsupported on this platform: {0}")]
    Unsupported(String),

    #[error("Request failed: {0}")]
    Failed(String),
}

impl From<DispatchError> for AssistantError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::AppUnavailable(target) | DispatchError::Unsupported(target) => {
                AssistantError::TargetAppUnavailable(target)
            }
            DispatchError::Failed(msg) => AssistantError::DispatchFailed(msg),
        }
    }
}

/// Speech output errors
#[derive(Error, Debug)]
pub enum SpeechOutputError {
    #[error("Synthesizer unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognition_errors_ask_to_retry() {
        let err = AssistantError::from(RecognitionError::NoSpeech);
        assert_eq!(err.user_message(), "I couldn't hear that. Try again.");

        let err = AssistantError::from(RecognitionError::Timeout);
        assert_eq!(err.user_message(), "I couldn't hear that. Try again.");
    }

    #[test]
    fn unavailable_recognizer_has_its_own_message() {
        assert_eq!(
            AssistantError::RecognitionUnavailable.user_message(),
            "Speech recognition not available on this device"
        );
        assert_eq!(
            AssistantError::from(RecognitionError::Unavailable).user_message(),
            "Speech recognition not available on this device"
        );
    }

    #[test]
    fn dispatch_errors_map_into_taxonomy() {
        let err: AssistantError = DispatchError::AppUnavailable("mailto:".into()).into();
        assert_eq!(err, AssistantError::TargetAppUnavailable("mailto:".into()));
        assert_eq!(err.user_message(), "Couldn't open mailto:");

        let err: AssistantError = DispatchError::Failed("boom".into()).into();
        assert_eq!(err, AssistantError::DispatchFailed("boom".into()));
    }
}
