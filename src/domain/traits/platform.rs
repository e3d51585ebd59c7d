use async_trait::async_trait;
use crate::application::errors::DispatchError;

/// Outbound platform requests; each is fire-and-forget with a success/failure answer
#[async_trait]
pub trait Platform: Send + Sync {
    /// Open a web page in the default browser
    async fn open_url(&self, url: &str) -> Result<(), DispatchError>;

    /// Open an app through its URI scheme (e.g. `vnd.youtube:`)
    async fn open_app(&self, uri: &str) -> Result<(), DispatchError>;

    /// Open an empty message in the mail composer
    async fn open_mail_composer(&self) -> Result<(), DispatchError>;

    /// Show the dial screen pre-filled with `number`; never places the call itself
    async fn open_dialer(&self, number: &str) -> Result<(), DispatchError>;

    /// Run the platform's own web search action
    async fn web_search(&self, query: &str) -> Result<(), DispatchError>;
}
