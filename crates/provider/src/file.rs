//! Local file provider.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::traits::DocumentProvider;

/// Reads the document from a JSON file on every fetch.
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileProvider { path: path.into() }
    }
}

#[async_trait]
impl DocumentProvider for FileProvider {
    async fn fetch_document(&self) -> Result<serde_json::Value, ProviderError> {
        let location = self.describe();
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ProviderError::NotFound {
                    location: location.clone(),
                },
                _ => ProviderError::Io {
                    location: location.clone(),
                    source: e,
                },
            })?;
        tracing::debug!(path = %self.path.display(), bytes = text.len(), "read splits document");

        serde_json::from_str(&text).map_err(|e| ProviderError::Parse {
            location,
            message: e.to_string(),
        })
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"GameName": "Celeste"}}"#).unwrap();

        let provider = FileProvider::new(file.path());
        let value = provider.fetch_document().await.unwrap();
        assert_eq!(value["GameName"], "Celeste");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileProvider::new(dir.path().join("splits.json"));
        let err = provider.fetch_document().await.unwrap_err();
        assert!(matches!(err, ProviderError::NotFound { .. }));
    }

    #[tokio::test]
    async fn invalid_json_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let provider = FileProvider::new(file.path());
        let err = provider.fetch_document().await.unwrap_err();
        assert!(matches!(err, ProviderError::Parse { .. }));
    }

    #[test]
    fn describe_names_the_path() {
        let provider = FileProvider::new("/data/splits.json");
        assert_eq!(provider.describe(), "file /data/splits.json");
    }
}
