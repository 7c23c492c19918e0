//! HTTP provider: fetches the document from a URL.
//!
//! Uses `ureq` (sync) wrapped in `tokio::task::spawn_blocking` to avoid
//! blocking the async runtime. Cloud drives that need credentials are
//! reached through a bearer token; obtaining that token is left to the
//! operator.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::traits::DocumentProvider;

/// Environment variable consulted when no token is configured.
pub const AUTH_TOKEN_ENV: &str = "VALRUNS_AUTH_TOKEN";

/// Provider that GETs the document over HTTP(S).
///
/// - `Authorization: Bearer <token>` is sent when a token is configured
///   or `VALRUNS_AUTH_TOKEN` is set.
/// - A 404 maps to [`ProviderError::NotFound`]; any other failure maps to
///   [`ProviderError::Fetch`]. There are no retries.
pub struct HttpProvider {
    url: String,
    auth_token: Option<String>,
}

impl HttpProvider {
    /// Create a provider for `url`.
    ///
    /// Falls back to the `VALRUNS_AUTH_TOKEN` env var when `auth_token`
    /// is `None`.
    pub fn new(url: impl Into<String>, auth_token: Option<String>) -> Self {
        let auth_token = auth_token.or_else(|| {
            std::env::var(AUTH_TOKEN_ENV)
                .ok()
                .filter(|token| !token.is_empty())
        });
        HttpProvider {
            url: url.into(),
            auth_token,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn has_auth_token(&self) -> bool {
        self.auth_token.is_some()
    }
}

#[async_trait]
impl DocumentProvider for HttpProvider {
    async fn fetch_document(&self) -> Result<serde_json::Value, ProviderError> {
        let url = self.url.clone();
        let auth_token = self.auth_token.clone();
        let location = self.describe();

        tracing::debug!(url = %url, authenticated = auth_token.is_some(), "fetching splits document");

        let result = tokio::task::spawn_blocking(move || {
            let agent = ureq::Agent::new_with_defaults();
            let mut request = agent.get(&url);

            if let Some(ref token) = auth_token {
                request = request.header("Authorization", &format!("Bearer {}", token));
            }

            let response = request.call().map_err(|e| match e {
                ureq::Error::StatusCode(404) => ProviderError::NotFound {
                    location: location.clone(),
                },
                other => ProviderError::Fetch {
                    location: location.clone(),
                    message: other.to_string(),
                },
            })?;

            let text = response
                .into_body()
                .read_to_string()
                .map_err(|e| ProviderError::Fetch {
                    location: location.clone(),
                    message: format!("failed to read response body: {}", e),
                })?;

            serde_json::from_str(&text).map_err(|e| ProviderError::Parse {
                location,
                message: e.to_string(),
            })
        })
        .await
        .map_err(|e| ProviderError::Fetch {
            location: self.describe(),
            message: format!("task join error: {}", e),
        })?;

        result
    }

    fn describe(&self) -> String {
        format!("url {}", self.url)
    }
}
