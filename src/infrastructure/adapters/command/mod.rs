//! Command adapter - External speech-to-text and text-to-speech programs

use async_trait::async_trait;
use std::process::{Child, Stdio};
use std::sync::Mutex;
use std::time::Duration;
use crate::application::errors::{RecognitionError, SpeechOutputError};
use crate::domain::entities::Transcript;
use crate::domain::traits::{SessionGate, SpeechInput, SpeechOutput};
use crate::infrastructure::process::ExternalCommand;

/// Runs a recognizer program once per session; its stdout is the transcript
pub struct CommandRecognizer {
    command: ExternalCommand,
    timeout: Duration,
    gate: SessionGate,
}

impl CommandRecognizer {
    pub fn new(command: ExternalCommand, timeout: Duration) -> Self {
        Self {
            command,
            timeout,
            gate: SessionGate::new(),
        }
    }
}

#[async_trait]
impl SpeechInput for CommandRecognizer {
    fn name(&self) -> &str {
        &self.command.program
    }

    fn is_available(&self) -> bool {
        self.command.is_installed()
    }

    async fn listen(&self, prompt: &str) -> Result<Transcript, RecognitionError> {
        let _session = self.gate.begin()?;
        if !self.is_available() {
            return Err(RecognitionError::Unavailable);
        }

        tracing::debug!("Listening with {} ({})", self.command, prompt);
        let mut cmd = tokio::process::Command::new(&self.command.program);
        cmd.args(&self.command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| RecognitionError::Timeout)?
            .map_err(|e| RecognitionError::Failed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let reason = if stderr.is_empty() { output.status.to_string() } else { stderr };
            return Err(RecognitionError::Failed(reason));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(RecognitionError::NoSpeech);
        }
        Ok(Transcript::new(text))
    }
}

/// Speaks through an external program, killing the previous utterance first
pub struct CommandVoice {
    command: ExternalCommand,
    current: Mutex<Option<Child>>,
    escape_quotes: bool,
}

impl CommandVoice {
    pub fn new(command: ExternalCommand) -> Self {
        Self {
            command,
            current: Mutex::new(None),
            escape_quotes: false,
        }
    }

    /// The speech program that ships with the current OS
    pub fn system() -> Self {
        if cfg!(target_os = "windows") {
            let script = "Add-Type -AssemblyName System.Speech; \
                (New-Object System.Speech.Synthesis.SpeechSynthesizer).Speak('{}')";
            let mut voice = Self::new(ExternalCommand::new("powershell").with_args(["-Command", script]));
            voice.escape_quotes = true;
            voice
        } else if cfg!(target_os = "macos") {
            Self::new(ExternalCommand::new("say"))
        } else {
            Self::new(ExternalCommand::new("espeak"))
        }
    }

    pub fn is_available(&self) -> bool {
        self.command.is_installed()
    }

    fn kill_current(slot: &mut Option<Child>) {
        if let Some(mut child) = slot.take() {
            // Already exited is fine; wait reaps either way
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl SpeechOutput for CommandVoice {
    fn name(&self) -> &str {
        &self.command.program
    }

    fn speak(&self, text: &str) -> Result<(), SpeechOutputError> {
        let mut current = self.current.lock()
            .map_err(|_| SpeechOutputError::Unavailable("synthesizer lock poisoned".to_string()))?;
        Self::kill_current(&mut current);

        let text = if self.escape_quotes { text.replace('\'', "''") } else { text.to_string() };
        let child = std::process::Command::new(&self.command.program)
            .args(self.command.args_for(&text))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        *current = Some(child);
        Ok(())
    }

    fn stop(&self) {
        if let Ok(mut current) = self.current.lock() {
            Self::kill_current(&mut current);
        }
    }
}

impl Drop for CommandVoice {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> ExternalCommand {
        ExternalCommand::new("sh").with_args(["-c", script])
    }

    #[tokio::test]
    async fn stdout_is_the_transcript() {
        let recognizer = CommandRecognizer::new(sh("echo '  Open YouTube '"), Duration::from_secs(5));
        assert_eq!(recognizer.listen("p").await.unwrap().text, "Open YouTube");
    }

    #[tokio::test]
    async fn empty_output_is_no_speech() {
        let recognizer = CommandRecognizer::new(sh("true"), Duration::from_secs(5));
        assert_eq!(recognizer.listen("p").await.unwrap_err(), RecognitionError::NoSpeech);
    }

    #[tokio::test]
    async fn failing_program_reports_stderr() {
        let recognizer = CommandRecognizer::new(sh("echo 'mic busy' >&2; exit 3"), Duration::from_secs(5));
        assert_eq!(
            recognizer.listen("p").await.unwrap_err(),
            RecognitionError::Failed("mic busy".to_string())
        );
    }

    #[tokio::test]
    async fn slow_program_times_out() {
        let recognizer = CommandRecognizer::new(sh("sleep 5"), Duration::from_millis(100));
        assert_eq!(recognizer.listen("p").await.unwrap_err(), RecognitionError::Timeout);
    }

    #[tokio::test]
    async fn missing_program_is_unavailable() {
        let recognizer = CommandRecognizer::new(
            ExternalCommand::new("no-such-recognizer-91c2"),
            Duration::from_secs(1),
        );
        assert!(!recognizer.is_available());
        assert_eq!(recognizer.listen("p").await.unwrap_err(), RecognitionError::Unavailable);
    }

    #[tokio::test]
    async fn concurrent_session_is_busy() {
        let recognizer = CommandRecognizer::new(sh("sleep 0.3; echo hi"), Duration::from_secs(5));
        let (first, second) = tokio::join!(recognizer.listen("p"), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            recognizer.listen("p").await
        });
        assert_eq!(first.unwrap().text, "hi");
        assert_eq!(second.unwrap_err(), RecognitionError::Busy);
    }

    #[test]
    fn new_utterance_replaces_the_old_one() {
        let voice = CommandVoice::new(ExternalCommand::new("sleep").with_args(["{}"]));
        voice.speak("5").unwrap();
        let first_pid = voice.current.lock().unwrap().as_ref().map(Child::id);

        voice.speak("5").unwrap();
        let second_pid = voice.current.lock().unwrap().as_ref().map(Child::id);
        assert_ne!(first_pid, second_pid);

        voice.stop();
        assert!(voice.current.lock().unwrap().is_none());
    }
}
