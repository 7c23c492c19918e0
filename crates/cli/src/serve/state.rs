//! Application state.

use std::sync::Arc;

use valruns_provider::DocumentProvider;

/// Application state shared across request handlers.
///
/// Holds no document: every page load fetches a fresh snapshot from the
/// provider.
pub(crate) struct AppState {
    /// Where the splits document comes from.
    pub(crate) provider: Arc<dyn DocumentProvider>,
    /// Optional banner shown above the table.
    pub(crate) notice: Option<String>,
}
