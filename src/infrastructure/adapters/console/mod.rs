//! Console adapter - Terminal stand-ins for the microphone, screen and speaker

use async_trait::async_trait;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use crate::application::errors::{RecognitionError, SpeechOutputError};
use crate::domain::entities::Transcript;
use crate::domain::traits::{Display, Permissions, SessionGate, SpeechInput, SpeechOutput};
use crate::infrastructure::config::MicrophonePolicy;

/// Each line read from the input is one recognized utterance
pub struct ConsoleRecognizer<R = BufReader<Stdin>> {
    lines: Mutex<Lines<R>>,
    gate: SessionGate,
    echo_prompt: bool,
}

impl ConsoleRecognizer {
    pub fn stdin() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin())).with_prompt_echo(true)
    }
}

impl<R: AsyncBufRead + Unpin + Send> ConsoleRecognizer<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: Mutex::new(reader.lines()),
            gate: SessionGate::new(),
            echo_prompt: false,
        }
    }

    pub fn with_prompt_echo(mut self, echo: bool) -> Self {
        self.echo_prompt = echo;
        self
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> SpeechInput for ConsoleRecognizer<R> {
    fn name(&self) -> &str {
        "console"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn listen(&self, prompt: &str) -> Result<Transcript, RecognitionError> {
        let _session = self.gate.begin()?;

        if self.echo_prompt {
            print!("({})\n> ", prompt);
            let _ = std::io::stdout().flush();
        }

        let line = self.lines.lock().await
            .next_line()
            .await
            .map_err(|e| RecognitionError::Failed(e.to_string()))?;

        match line {
            None => Err(RecognitionError::Closed),
            Some(text) if text.trim().is_empty() => Err(RecognitionError::NoSpeech),
            Some(text) => Ok(Transcript::new(text.trim())),
        }
    }
}

/// Prints the text area to stdout
#[derive(Debug, Default)]
pub struct ConsoleDisplay;

impl Display for ConsoleDisplay {
    fn show(&self, text: &str) {
        println!("{}", text);
    }
}

/// Prints utterances instead of synthesizing them
#[derive(Debug, Default)]
pub struct ConsoleVoice;

impl SpeechOutput for ConsoleVoice {
    fn name(&self) -> &str {
        "console"
    }

    fn speak(&self, text: &str) -> Result<(), SpeechOutputError> {
        println!("[SPEAK] {}", text);
        Ok(())
    }

    fn stop(&self) {}
}

/// Microphone permission decided by config, asking on the terminal when needed
pub struct ConsolePermissions {
    policy: MicrophonePolicy,
    granted: AtomicBool,
}

impl ConsolePermissions {
    pub fn new(policy: MicrophonePolicy) -> Self {
        Self {
            policy,
            granted: AtomicBool::new(policy == MicrophonePolicy::Granted),
        }
    }

    fn ask(&self) -> bool {
        print!("Allow microphone access? [y/N] ");
        let _ = std::io::stdout().flush();

        let mut answer = String::new();
        if std::io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

impl Permissions for ConsolePermissions {
    fn is_granted(&self) -> bool {
        self.granted.load(Ordering::Acquire)
    }

    fn request(&self) -> bool {
        let granted = match self.policy {
            MicrophonePolicy::Granted => true,
            MicrophonePolicy::Denied => false,
            MicrophonePolicy::Ask => self.ask(),
        };

        if granted {
            self.granted.store(true, Ordering::Release);
            tracing::info!("Microphone permission granted");
        } else {
            tracing::warn!("Microphone permission denied");
        }
        granted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lines_become_transcripts() {
        let recognizer = ConsoleRecognizer::from_reader("  open youtube \n\nsearch cats".as_bytes());

        assert_eq!(recognizer.listen("p").await.unwrap().text, "open youtube");
        assert_eq!(recognizer.listen("p").await.unwrap_err(), RecognitionError::NoSpeech);
        assert_eq!(recognizer.listen("p").await.unwrap().text, "search cats");
        assert_eq!(recognizer.listen("p").await.unwrap_err(), RecognitionError::Closed);
    }

    #[test]
    fn static_policies() {
        let granted = ConsolePermissions::new(MicrophonePolicy::Granted);
        assert!(granted.is_granted());

        let denied = ConsolePermissions::new(MicrophonePolicy::Denied);
        assert!(!denied.is_granted());
        assert!(!denied.request());
        assert!(!denied.is_granted());
    }
}
