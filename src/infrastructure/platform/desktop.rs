//! Desktop platform - Hands requests to the operating system's URL opener

use async_trait::async_trait;
use crate::application::errors::DispatchError;
use crate::domain::traits::Platform;
use crate::infrastructure::process::ExternalCommand;

/// Platform backed by the system opener and an optional search command
pub struct DesktopPlatform {
    opener: ExternalCommand,
    search: Option<ExternalCommand>,
}

impl DesktopPlatform {
    pub fn new(opener: ExternalCommand) -> Self {
        Self { opener, search: None }
    }

    pub fn with_search_command(mut self, search: ExternalCommand) -> Self {
        self.search = Some(search);
        self
    }

    async fn launch(&self, command: &ExternalCommand, target: &str) -> Result<(), DispatchError> {
        if !command.is_installed() {
            tracing::warn!("{} not found in PATH", command.program);
            return Err(DispatchError::AppUnavailable(target.to_string()));
        }

        tracing::debug!("Executing: {} {:?}", command.program, command.args_for(target));
        let status = command.status(target)
            .await
            .map_err(|e| DispatchError::Failed(format!("{}: {}", command.program, e)))?;

        if status.success() {
            Ok(())
        } else {
            tracing::warn!("{} exited with {} for {}", command.program, status, target);
            Err(DispatchError::AppUnavailable(target.to_string()))
        }
    }
}

impl Default for DesktopPlatform {
    fn default() -> Self {
        Self::new(ExternalCommand::system_opener())
    }
}

#[async_trait]
impl Platform for DesktopPlatform {
    async fn open_url(&self, url: &str) -> Result<(), DispatchError> {
        self.launch(&self.opener, url).await
    }

    async fn open_app(&self, uri: &str) -> Result<(), DispatchError> {
        self.launch(&self.opener, uri).await
    }

    async fn open_mail_composer(&self) -> Result<(), DispatchError> {
        self.launch(&self.opener, "mailto:").await
    }

    async fn open_dialer(&self, number: &str) -> Result<(), DispatchError> {
        self.launch(&self.opener, &format!("tel:{}", number)).await
    }

    async fn web_search(&self, query: &str) -> Result<(), DispatchError> {
        match &self.search {
            Some(search) => self.launch(search, query).await,
            None => Err(DispatchError::Unsupported("web search".to_string())),
        }
    }
}
