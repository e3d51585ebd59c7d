//! Scripted adapter - Replayed utterances and in-memory output for dry runs and tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use crate::application::errors::{RecognitionError, SpeechOutputError};
use crate::domain::entities::Transcript;
use crate::domain::traits::{Display, SessionGate, SpeechInput, SpeechOutput};

/// Replays a fixed queue of recognition results, then reports [`RecognitionError::Closed`]
#[derive(Debug, Default)]
pub struct ScriptedRecognizer {
    queue: Mutex<VecDeque<Result<String, RecognitionError>>>,
    gate: SessionGate,
    unavailable: bool,
    delay: Option<Duration>,
    released: AtomicBool,
}

impl ScriptedRecognizer {
    pub fn new<I, S>(utterances: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_results(utterances.into_iter().map(|u| Ok(u.into())))
    }

    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = Result<String, RecognitionError>>,
    {
        Self {
            queue: Mutex::new(results.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Parse a script: one utterance per line.
    ///
    /// Blank lines and `#` comments are skipped; `!nospeech`, `!timeout`
    /// and `!error <reason>` stand for failed recognitions.
    pub fn from_script(script: &str) -> Self {
        let results = script
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| match line {
                "!nospeech" => Err(RecognitionError::NoSpeech),
                "!timeout" => Err(RecognitionError::Timeout),
                _ => match line.strip_prefix("!error") {
                    Some(reason) => Err(RecognitionError::Failed(reason.trim().to_string())),
                    None => Ok(line.to_string()),
                },
            });
        Self::from_results(results)
    }

    /// Behave like a device without a speech recognizer
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Hold each session open for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn remaining(&self) -> usize {
        self.queue.lock().map(|q| q.len()).unwrap_or(0)
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }
}

#[async_trait]
impl SpeechInput for ScriptedRecognizer {
    fn name(&self) -> &str {
        "scripted"
    }

    fn is_available(&self) -> bool {
        !self.unavailable
    }

    async fn listen(&self, _prompt: &str) -> Result<Transcript, RecognitionError> {
        let _session = self.gate.begin()?;
        if self.unavailable {
            return Err(RecognitionError::Unavailable);
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.queue.lock()
            .map_err(|_| RecognitionError::Failed("script lock poisoned".to_string()))?
            .pop_front();

        match next {
            None => Err(RecognitionError::Closed),
            Some(Ok(text)) if text.trim().is_empty() => Err(RecognitionError::NoSpeech),
            Some(Ok(text)) => Ok(Transcript::new(text)),
            Some(Err(e)) => Err(e),
        }
    }

    fn release(&self) {
        self.released.store(true, Ordering::Release);
    }
}

/// Keeps every utterance in memory
#[derive(Debug, Default)]
pub struct RecordingVoice {
    spoken: Mutex<Vec<String>>,
    speaking: Mutex<Option<String>>,
    interrupted: AtomicUsize,
    releases: AtomicUsize,
}

impl RecordingVoice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// The utterance that would still be playing
    pub fn speaking(&self) -> Option<String> {
        self.speaking.lock().ok().and_then(|s| s.clone())
    }

    /// How many utterances were cut off by a newer one
    pub fn interrupted(&self) -> usize {
        self.interrupted.load(Ordering::Acquire)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::Acquire)
    }
}

impl SpeechOutput for RecordingVoice {
    fn name(&self) -> &str {
        "silent"
    }

    fn speak(&self, text: &str) -> Result<(), SpeechOutputError> {
        let mut speaking = self.speaking.lock()
            .map_err(|_| SpeechOutputError::Unavailable("voice lock poisoned".to_string()))?;
        if speaking.replace(text.to_string()).is_some() {
            self.interrupted.fetch_add(1, Ordering::AcqRel);
        }
        if let Ok(mut spoken) = self.spoken.lock() {
            spoken.push(text.to_string());
        }
        Ok(())
    }

    fn stop(&self) {
        if let Ok(mut speaking) = self.speaking.lock() {
            speaking.take();
        }
    }

    fn release(&self) {
        self.stop();
        self.releases.fetch_add(1, Ordering::AcqRel);
    }
}

/// Keeps every status line in memory
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    lines: Mutex<Vec<String>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<String> {
        self.lines.lock().ok().and_then(|l| l.last().cloned())
    }
}

impl Display for RecordingDisplay {
    fn show(&self, text: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(text.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn script_lines_and_markers() {
        let script = "# morning routine\nwhat's the time\n\n!nospeech\n!error mic unplugged\n!timeout\nopen gmail\n";
        let recognizer = ScriptedRecognizer::from_script(script);
        assert_eq!(recognizer.remaining(), 5);

        assert_eq!(recognizer.listen("").await.unwrap().text, "what's the time");
        assert_eq!(recognizer.listen("").await.unwrap_err(), RecognitionError::NoSpeech);
        assert_eq!(
            recognizer.listen("").await.unwrap_err(),
            RecognitionError::Failed("mic unplugged".to_string())
        );
        assert_eq!(recognizer.listen("").await.unwrap_err(), RecognitionError::Timeout);
        assert_eq!(recognizer.listen("").await.unwrap().text, "open gmail");
        assert_eq!(recognizer.listen("").await.unwrap_err(), RecognitionError::Closed);
    }

    #[tokio::test]
    async fn overlapping_listen_is_busy() {
        let recognizer = ScriptedRecognizer::new(["one", "two"]).with_delay(Duration::from_millis(100));
        let (first, second) = tokio::join!(recognizer.listen(""), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            recognizer.listen("").await
        });
        assert_eq!(first.unwrap().text, "one");
        assert_eq!(second.unwrap_err(), RecognitionError::Busy);
        assert_eq!(recognizer.remaining(), 1);
    }

    #[tokio::test]
    async fn unavailable_recognizer() {
        let recognizer = ScriptedRecognizer::unavailable();
        assert!(!recognizer.is_available());
        assert_eq!(recognizer.listen("").await.unwrap_err(), RecognitionError::Unavailable);
    }

    #[test]
    fn speaking_flushes_previous_utterance() {
        let voice = RecordingVoice::new();
        voice.speak("Listening...").unwrap();
        voice.speak("Opening YouTube").unwrap();

        assert_eq!(voice.spoken(), vec!["Listening...", "Opening YouTube"]);
        assert_eq!(voice.speaking().as_deref(), Some("Opening YouTube"));
        assert_eq!(voice.interrupted(), 1);

        voice.stop();
        assert!(voice.speaking().is_none());
        voice.speak("Dialing 1").unwrap();
        assert_eq!(voice.interrupted(), 1);
    }

    #[test]
    fn display_keeps_last_line() {
        let display = RecordingDisplay::new();
        assert!(display.last().is_none());
        display.show("a");
        display.show("b");
        assert_eq!(display.last().as_deref(), Some("b"));
        assert_eq!(display.lines().len(), 2);
    }
}
