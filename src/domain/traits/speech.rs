use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use crate::domain::entities::Transcript;
use crate::application::errors::{RecognitionError, SpeechOutputError};

/// Speech-to-text abstraction
#[async_trait]
pub trait SpeechInput: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Whether a recognition session can be started at all
    fn is_available(&self) -> bool;

    /// Run one recognition session and return a non-empty transcript.
    ///
    /// Only one session may be active; a concurrent call fails with
    /// [`RecognitionError::Busy`].
    async fn listen(&self, prompt: &str) -> Result<Transcript, RecognitionError>;

    /// Release the underlying recognizer
    fn release(&self) {}
}

/// Text-to-speech abstraction
pub trait SpeechOutput: Send + Sync {
    fn name(&self) -> &str;

    /// Queue an utterance, interrupting whatever is currently being spoken
    fn speak(&self, text: &str) -> Result<(), SpeechOutputError>;

    /// Interrupt the current utterance, if any
    fn stop(&self);

    /// Stop speaking and release the synthesizer
    fn release(&self) {
        self.stop();
    }
}

#[async_trait]
impl<T: SpeechInput + ?Sized> SpeechInput for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    async fn listen(&self, prompt: &str) -> Result<Transcript, RecognitionError> {
        (**self).listen(prompt).await
    }

    fn release(&self) {
        (**self).release()
    }
}

impl<T: SpeechOutput + ?Sized> SpeechOutput for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn speak(&self, text: &str) -> Result<(), SpeechOutputError> {
        (**self).speak(text)
    }

    fn stop(&self) {
        (**self).stop()
    }

    fn release(&self) {
        (**self).release()
    }
}

/// Tracks the single active recognition session of a recognizer
#[derive(Debug, Default)]
pub struct SessionGate {
    active: AtomicBool,
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session; the returned guard closes it when dropped
    pub fn begin(&self) -> Result<SessionGuard<'_>, RecognitionError> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| RecognitionError::Busy)?;
        Ok(SessionGuard { active: &self.active })
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

pub struct SessionGuard<'a> {
    active: &'a AtomicBool,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_session_is_busy_until_first_ends() {
        let gate = SessionGate::new();
        let guard = gate.begin().unwrap();
        assert!(gate.is_active());
        assert_eq!(gate.begin().err(), Some(RecognitionError::Busy));

        drop(guard);
        assert!(!gate.is_active());
        assert!(gate.begin().is_ok());
    }
}
