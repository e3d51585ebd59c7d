//! Action dispatcher - Turns an intent into a platform request and a reply

use std::sync::Arc;
use chrono::Timelike;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use url::Url;
use crate::application::errors::{AssistantError, DispatchError};
use crate::domain::entities::Intent;
use crate::domain::traits::{Clock, Platform, SystemClock};

pub const JOKE: &str = "Why don't scientists trust atoms? Because they make up everything!";
pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search?q=";

const YOUTUBE_APP: &str = "vnd.youtube:";
const YOUTUBE_WEB: &str = "https://www.youtube.com";
const GOOGLE_WEB: &str = "https://www.google.com";

static SCHEME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*://").expect("scheme pattern is valid")
});

/// Text to show and speak after dispatching an intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Why the requested effect did not happen, if it didn't
    pub error: Option<DispatchError>,
}

impl Reply {
    pub fn ok(text: impl Into<String>) -> Self {
        Self { text: text.into(), error: None }
    }

    pub fn failed(text: impl Into<String>, error: DispatchError) -> Self {
        Self { text: text.into(), error: Some(error) }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// The failure as an assistant error, for logging
    pub fn failure(&self) -> Option<AssistantError> {
        self.error.clone().map(AssistantError::from)
    }
}

/// Prefix `https://` when the target has no scheme and require a host
pub fn normalize_url(target: &str) -> Result<Url, DispatchError> {
    let candidate = if SCHEME.is_match(target) {
        target.to_string()
    } else {
        format!("https://{}", target)
    };

    let url = Url::parse(&candidate)
        .map_err(|e| DispatchError::Failed(format!("invalid url {}: {}", candidate, e)))?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(DispatchError::Failed(format!("no host in {}", candidate))),
    }
}

/// Invokes the platform capability for each intent; never fails outward
pub struct ActionDispatcher {
    platform: Arc<dyn Platform>,
    clock: Arc<dyn Clock>,
    search_url: String,
}

impl ActionDispatcher {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self {
            platform,
            clock: Arc::new(SystemClock),
            search_url: DEFAULT_SEARCH_URL.to_string(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Base URL the percent-encoded query is appended to for browser searches
    pub fn with_search_url(mut self, search_url: impl Into<String>) -> Self {
        self.search_url = search_url.into();
        self
    }

    pub async fn dispatch(&self, intent: &Intent) -> Reply {
        let reply = match intent {
            Intent::GetTime => self.tell_time(),
            Intent::OpenTarget { target } => self.open_target(target).await,
            Intent::Search { query } => self.search(query).await,
            Intent::Joke => Reply::ok(JOKE),
            Intent::Call { number } => self.call(number).await,
            Intent::Fallback { text } => {
                Reply::ok(format!("I heard: {}. Do you want me to search the web for that?", text))
            }
        };

        match reply.failure() {
            Some(e) => tracing::warn!("{} not completed: {}", intent.kind(), e),
            None => tracing::info!("Dispatched {}", intent),
        }
        reply
    }

    fn tell_time(&self) -> Reply {
        let now = self.clock.now();
        Reply::ok(format!("The time is {:02}:{:02}", now.hour(), now.minute()))
    }

    async fn open_target(&self, target: &str) -> Reply {
        if target.contains("youtube") {
            if let Err(e) = self.platform.open_app(YOUTUBE_APP).await {
                tracing::debug!("YouTube app unavailable ({}), using the website", e);
                if let Err(e) = self.platform.open_url(YOUTUBE_WEB).await {
                    return Reply::failed(format!("Couldn't open {}", target), e);
                }
            }
            return Reply::ok("Opening YouTube");
        }

        if target.contains("google") {
            return match self.platform.open_url(GOOGLE_WEB).await {
                Ok(()) => Reply::ok("Opening Google"),
                Err(e) => Reply::failed(format!("Couldn't open {}", target), e),
            };
        }

        if target.contains("gmail") || target.contains("mail") {
            return match self.platform.open_mail_composer().await {
                Ok(()) => Reply::ok("Opening mail"),
                Err(e) => Reply::failed("No mail app found", e),
            };
        }

        let opened = match normalize_url(target) {
            Ok(url) => self.platform.open_url(url.as_str()).await,
            Err(e) => Err(e),
        };
        match opened {
            Ok(()) => Reply::ok(format!("Opening {}", target)),
            Err(e) => Reply::failed(format!("Couldn't open {}", target), e),
        }
    }

    async fn search(&self, query: &str) -> Reply {
        let err = match self.platform.web_search(query).await {
            Ok(()) => return Reply::ok(format!("Searching for {}", query)),
            Err(e) => e,
        };

        tracing::debug!("Web search action unavailable ({}), using the browser", err);
        let url = format!("{}{}", self.search_url, urlencoding::encode(query));
        match self.platform.open_url(&url).await {
            Ok(()) => Reply::ok(format!("Searching for {} in browser", query)),
            Err(e) => Reply::failed(format!("Couldn't search for {}", query), e),
        }
    }

    async fn call(&self, number: &str) -> Reply {
        if number.is_empty() {
            return Reply::failed(
                "Couldn't make call",
                DispatchError::Failed("no number to dial".to_string()),
            );
        }

        match self.platform.open_dialer(number).await {
            Ok(()) => Reply::ok(format!("Dialing {}", number)),
            Err(e) => Reply::failed("Couldn't make call", e),
        }
    }
}
