use async_trait::async_trait;

use crate::error::ProviderError;

/// Supplies the raw splits document.
///
/// Implementations only fetch and parse JSON; schema validation happens
/// at the interchange boundary so every provider reports missing fields
/// the same way. Providers do not retry: a failed fetch is reported once
/// and the caller decides what to show.
///
/// Implementations must be `Send + Sync + 'static` to be shared in axum
/// application state.
#[async_trait]
pub trait DocumentProvider: Send + Sync + 'static {
    /// Fetch the current document.
    async fn fetch_document(&self) -> Result<serde_json::Value, ProviderError>;

    /// Human-readable location, for logs and error pages.
    fn describe(&self) -> String;
}
