//! Messaging hand-off.
//!
//! Opening the pre-filled WhatsApp conversation is fire-and-forget: the
//! order is already persisted when the hand-off runs.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Url;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
#[error("hand-off failed: {0}")]
pub struct HandoffError(pub String);

#[automock]
#[async_trait]
pub trait Handoff: Send + Sync {
    /// Open `url` in a new context.
    async fn open(&self, url: &Url) -> Result<(), HandoffError>;
}

/// Hand-off that records the link for the operator to open.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogHandoff;

#[async_trait]
impl Handoff for LogHandoff {
    async fn open(&self, url: &Url) -> Result<(), HandoffError> {
        info!(%url, "whatsapp hand-off ready");

        Ok(())
    }
}
