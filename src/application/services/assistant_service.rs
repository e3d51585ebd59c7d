use crate::application::commands::Reply;
use crate::application::errors::{AssistantError, RecognitionError};
use crate::application::services::CommandService;
use crate::domain::entities::{Intent, Transcript};
use crate::domain::traits::{Display, Permissions, SpeechInput, SpeechOutput};

pub const LISTENING: &str = "Listening...";
pub const DEFAULT_PROMPT: &str = "Say a command, e.g. 'what's the time' or 'open youtube'";

/// Platform services owned by the assistant for its whole lifetime
pub struct Adapters {
    pub input: Box<dyn SpeechInput>,
    pub output: Box<dyn SpeechOutput>,
    pub display: Box<dyn Display>,
    pub permissions: Box<dyn Permissions>,
}

/// Result of one interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    Handled {
        transcript: String,
        intent: Intent,
        reply: Reply,
    },
    Failed {
        error: AssistantError,
        message: String,
    },
    /// The speech input has no more utterances to give
    Closed,
}

/// Top-level controller; created at startup and released at shutdown
pub struct VoiceAssistant {
    adapters: Adapters,
    commands: CommandService,
    prompt: String,
    released: bool,
}

impl VoiceAssistant {
    pub fn new(adapters: Adapters, commands: CommandService) -> Self {
        tracing::info!(
            "Voice assistant ready (input: {}, output: {})",
            adapters.input.name(),
            adapters.output.name()
        );
        Self {
            adapters,
            commands,
            prompt: DEFAULT_PROMPT.to_string(),
            released: false,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn commands(&self) -> &CommandService {
        &self.commands
    }

    /// Show a status line and speak it, replacing any utterance in progress
    pub fn show_and_speak(&self, text: &str) {
        self.adapters.display.show(text);
        if let Err(e) = self.adapters.output.speak(text) {
            tracing::warn!("Failed to speak: {}", e);
        }
    }

    /// Run one interaction: permission, recognition, interpretation, dispatch
    pub async fn trigger(&self) -> Turn {
        let permissions = &self.adapters.permissions;
        if !permissions.is_granted() && !permissions.request() {
            return self.fail(AssistantError::PermissionDenied, true);
        }

        if !self.adapters.input.is_available() {
            return self.fail(AssistantError::RecognitionUnavailable, false);
        }

        self.show_and_speak(LISTENING);
        match self.adapters.input.listen(&self.prompt).await {
            Ok(transcript) => self.handle_transcript(transcript).await,
            Err(RecognitionError::Closed) => {
                tracing::info!("Speech input closed");
                Turn::Closed
            }
            Err(RecognitionError::Unavailable) => self.fail(AssistantError::RecognitionUnavailable, false),
            Err(e) => self.fail(AssistantError::Recognition(e), true),
        }
    }

    /// Interpret and dispatch text that has already been recognized
    pub async fn handle_transcript(&self, transcript: Transcript) -> Turn {
        self.adapters.display.show(&format!("You said: {}", transcript.text));

        let (intent, reply) = self.commands.handle(&transcript).await;
        self.show_and_speak(&reply.text);

        Turn::Handled {
            transcript: transcript.text,
            intent,
            reply,
        }
    }

    fn fail(&self, error: AssistantError, speak: bool) -> Turn {
        tracing::warn!("{}", error);
        let message = error.user_message();
        if speak {
            self.show_and_speak(&message);
        } else {
            self.adapters.display.show(&message);
        }
        Turn::Failed { error, message }
    }

    /// Release the recognizer and the synthesizer
    pub fn shutdown(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.adapters.output.release();
        self.adapters.input.release();
        tracing::info!("Voice assistant shut down");
    }
}

impl Drop for VoiceAssistant {
    fn drop(&mut self) {
        self.release();
    }
}
