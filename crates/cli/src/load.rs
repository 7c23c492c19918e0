//! Fetch, validate and transform: one dashboard per call.

use valruns_core::{build_dashboard, CoreError, Dashboard};
use valruns_interchange::{from_document, DocumentError};
use valruns_provider::{DocumentProvider, ProviderError};

/// Any failure between fetching the document and holding a finished
/// dashboard. The caller shows it as a single message; nothing is
/// rendered partially.
#[derive(Debug, thiserror::Error)]
pub(crate) enum LoadError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Pipeline(#[from] CoreError),
}

impl LoadError {
    /// Short category for JSON error output and logs.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            LoadError::Provider(_) => "provider",
            LoadError::Document(e) if e.is_missing_data() => "missing_data",
            LoadError::Document(_) => "invalid_document",
            LoadError::Pipeline(_) => "malformed_time",
        }
    }
}

/// Fetch the document from `provider` and run the pipeline over it.
pub(crate) async fn load_dashboard(provider: &dyn DocumentProvider) -> Result<Dashboard, LoadError> {
    let raw = provider.fetch_document().await?;
    let document = from_document(&raw)?;
    let dashboard = build_dashboard(&document)?;
    tracing::info!(
        source = %provider.describe(),
        segments = dashboard.table.columns.len(),
        rows = dashboard.table.rows.len(),
        "built dashboard"
    );
    Ok(dashboard)
}
