//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::commands::DEFAULT_SEARCH_URL;
use crate::application::errors::ConfigError;
use crate::application::services::DEFAULT_PROMPT;

/// Assistant configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub assistant: AssistantConfig,
    pub recognizer: RecognizerConfig,
    pub voice: VoiceConfig,
    pub platform: PlatformConfig,
    pub permissions: PermissionsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AssistantConfig {
    pub name: String,
    /// Shown when a recognition session starts
    pub prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecognizerBackend {
    /// Typed lines stand in for recognized speech
    Console,
    /// An external speech-to-text program prints the transcript
    Command,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RecognizerConfig {
    pub backend: RecognizerBackend,
    pub command: Option<Vec<String>>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VoiceBackend {
    /// The OS speech program (`say`, `espeak`, PowerShell)
    System,
    /// A configured speech program
    Command,
    /// Print utterances to the terminal
    Console,
    /// Keep utterances in memory only
    Silent,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct VoiceConfig {
    pub backend: VoiceBackend,
    pub command: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PlatformConfig {
    /// Record platform requests instead of performing them
    pub dry_run: bool,
    pub opener: Option<Vec<String>>,
    pub web_search_command: Option<Vec<String>>,
    pub search_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MicrophonePolicy {
    Granted,
    Denied,
    Ask,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PermissionsConfig {
    pub microphone: MicrophonePolicy,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: "voice-assistant".to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            backend: RecognizerBackend::Console,
            command: None,
            timeout_seconds: 10,
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            backend: VoiceBackend::Console,
            command: None,
        }
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            opener: None,
            web_search_command: None,
            search_url: DEFAULT_SEARCH_URL.to_string(),
        }
    }
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            microphone: MicrophonePolicy::Granted,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assistant: AssistantConfig::default(),
            recognizer: RecognizerConfig::default(),
            voice: VoiceConfig::default(),
            platform: PlatformConfig::default(),
            permissions: PermissionsConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    /// Reject combinations that cannot start
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recognizer.backend == RecognizerBackend::Command
            && self.recognizer.command.as_ref().map_or(true, |c| c.is_empty())
        {
            return Err(ConfigError::MissingField("recognizer.command".to_string()));
        }

        if self.voice.backend == VoiceBackend::Command
            && self.voice.command.as_ref().map_or(true, |c| c.is_empty())
        {
            return Err(ConfigError::MissingField("voice.command".to_string()));
        }

        if self.recognizer.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue("recognizer.timeout-seconds must be positive".to_string()));
        }

        if !self.platform.search_url.starts_with("http") {
            return Err(ConfigError::InvalidValue(format!(
                "platform.search-url must be an http(s) URL, got {}",
                self.platform.search_url
            )));
        }

        Ok(())
    }

    /// Defaults with environment overrides, for when there is no config file
    pub fn load_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Environment variables override values from the file
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `ASSISTANT_*` overrides from `lookup`; the config is left untouched if the result is invalid
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut updated = self.clone();
        if let Some(value) = lookup("ASSISTANT_DRY_RUN") {
            updated.platform.dry_run = matches!(value.to_lowercase().as_str(), "1" | "true" | "yes");
        }

        if let Some(url) = lookup("ASSISTANT_SEARCH_URL") {
            updated.platform.search_url = url;
        }

        updated.validate()?;
        *self = updated;
        Ok(())
    }
}
