//! Adapters - Speech, display and permission implementations

pub mod console;
pub mod command;
pub mod scripted;

pub use console::{ConsoleDisplay, ConsolePermissions, ConsoleRecognizer, ConsoleVoice};
pub use command::{CommandRecognizer, CommandVoice};
pub use scripted::{RecordingDisplay, RecordingVoice, ScriptedRecognizer};

use crate::domain::traits::{Display, SpeechOutput};
use crate::infrastructure::config::{VoiceBackend, VoiceConfig};
use crate::infrastructure::process::ExternalCommand;

pub const TTS_INIT_FAILED: &str = "TTS initialization failed";

/// Speech output for the configured backend.
///
/// A synthesizer program that is not installed falls back to printed speech
/// and reports it on `display`.
pub fn voice_from_config(config: &VoiceConfig, display: &dyn Display) -> Box<dyn SpeechOutput> {
    let voice = match config.backend {
        VoiceBackend::Console => return Box::new(ConsoleVoice),
        VoiceBackend::Silent => return Box::new(RecordingVoice::new()),
        VoiceBackend::System => Some(CommandVoice::system()),
        VoiceBackend::Command => config.command
            .as_deref()
            .and_then(ExternalCommand::from_argv)
            .map(CommandVoice::new),
    };

    match voice {
        Some(voice) if voice.is_available() => Box::new(voice),
        _ => {
            tracing::warn!("Speech synthesizer not found, printing utterances instead");
            display.show(TTS_INIT_FAILED);
            Box::new(ConsoleVoice)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_synthesizer_falls_back_to_console() {
        let display = RecordingDisplay::new();
        let config = VoiceConfig {
            backend: VoiceBackend::Command,
            command: Some(vec!["no-such-synthesizer-5e1d".to_string(), "-v".to_string()]),
        };

        let voice = voice_from_config(&config, &display);
        assert_eq!(voice.name(), "console");
        assert_eq!(display.lines(), vec![TTS_INIT_FAILED]);
    }

    #[test]
    fn printed_and_silent_voices_need_no_program() {
        let display = RecordingDisplay::new();
        let silent = VoiceConfig { backend: VoiceBackend::Silent, command: None };
        assert_eq!(voice_from_config(&silent, &display).name(), "silent");
        assert_eq!(voice_from_config(&VoiceConfig::default(), &display).name(), "console");
        assert!(display.lines().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn installed_synthesizer_is_used() {
        let display = RecordingDisplay::new();
        let config = VoiceConfig {
            backend: VoiceBackend::Command,
            command: Some(vec!["true".to_string()]),
        };
        assert_eq!(voice_from_config(&config, &display).name(), "true");
        assert!(display.lines().is_empty());
    }
}
