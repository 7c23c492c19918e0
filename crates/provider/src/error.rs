/// All errors that can be returned by a DocumentProvider implementation.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// No document exists at the configured location.
    #[error("document not found: {location}")]
    NotFound { location: String },

    /// The document exists but could not be read.
    #[error("failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// The remote request failed (connection, TLS, non-2xx status, ...).
    #[error("fetch failed for {location}: {message}")]
    Fetch { location: String, message: String },

    /// The payload is not valid JSON.
    #[error("{location} is not valid JSON: {message}")]
    Parse { location: String, message: String },
}
