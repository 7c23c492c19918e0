//! Fixed in-memory provider.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::traits::DocumentProvider;

/// Returns the same document on every fetch.
///
/// Useful for tests and for embedding the dashboard with a document
/// obtained elsewhere.
pub struct StaticProvider {
    document: serde_json::Value,
}

impl StaticProvider {
    pub fn new(document: serde_json::Value) -> Self {
        StaticProvider { document }
    }
}

#[async_trait]
impl DocumentProvider for StaticProvider {
    async fn fetch_document(&self) -> Result<serde_json::Value, ProviderError> {
        Ok(self.document.clone())
    }

    fn describe(&self) -> String {
        "static document".to_string()
    }
}
