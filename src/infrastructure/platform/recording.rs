//! In-memory platform for dry runs and tests

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use crate::application::errors::DispatchError;
use crate::domain::traits::Platform;

/// A request the assistant made to the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformRequest {
    OpenUrl(String),
    OpenApp(String),
    OpenMailComposer,
    OpenDialer(String),
    WebSearch(String),
}

/// Platform operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    OpenUrl,
    OpenApp,
    MailComposer,
    Dialer,
    WebSearch,
}

/// Records every request instead of performing it
#[derive(Debug, Default)]
pub struct RecordingPlatform {
    requests: Mutex<Vec<PlatformRequest>>,
    failing: HashSet<Operation>,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every request of this kind fail
    pub fn failing(mut self, operation: Operation) -> Self {
        self.failing.insert(operation);
        self
    }

    /// Requests made so far, in order
    pub fn requests(&self) -> Vec<PlatformRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn record(&self, operation: Operation, request: PlatformRequest) -> Result<(), DispatchError> {
        tracing::info!("[dry-run] {:?}", request);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if !self.failing.contains(&operation) {
            return Ok(());
        }

        Err(match request {
            PlatformRequest::OpenUrl(url) => DispatchError::AppUnavailable(url),
            PlatformRequest::OpenApp(uri) => DispatchError::AppUnavailable(uri),
            PlatformRequest::OpenMailComposer => DispatchError::AppUnavailable("mailto:".to_string()),
            PlatformRequest::OpenDialer(number) => DispatchError::AppUnavailable(format!("tel:{}", number)),
            PlatformRequest::WebSearch(_) => DispatchError::Unsupported("web search".to_string()),
        })
    }
}

#[async_trait]
impl Platform for RecordingPlatform {
    async fn open_url(&self, url: &str) -> Result<(), DispatchError> {
        self.record(Operation::OpenUrl, PlatformRequest::OpenUrl(url.to_string()))
    }

    async fn open_app(&self, uri: &str) -> Result<(), DispatchError> {
        self.record(Operation::OpenApp, PlatformRequest::OpenApp(uri.to_string()))
    }

    async fn open_mail_composer(&self) -> Result<(), DispatchError> {
        self.record(Operation::MailComposer, PlatformRequest::OpenMailComposer)
    }

    async fn open_dialer(&self, number: &str) -> Result<(), DispatchError> {
        self.record(Operation::Dialer, PlatformRequest::OpenDialer(number.to_string()))
    }

    async fn web_search(&self, query: &str) -> Result<(), DispatchError> {
        self.record(Operation::WebSearch, PlatformRequest::WebSearch(query.to_string()))
    }
}
