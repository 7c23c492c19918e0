//! `valruns.toml` configuration.
//!
//! # Example
//!
//! ```toml
//! [source]
//! url = "https://drive.example.com/files/splits.json"
//! auth_token = "..."            # optional, VALRUNS_AUTH_TOKEN otherwise
//!
//! [server]
//! port = 8080
//!
//! [dashboard]
//! notice = "Attempts 1-32 are off by 3 minutes (timer bug)"
//! ```
//!
//! Command-line flags always win over file values.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use valruns_provider::{DocumentProvider, FileProvider, HttpProvider};

/// Env var naming the config file.
pub const CONFIG_ENV: &str = "VALRUNS_CONFIG";

/// Env var overriding the server port when no flag is given.
pub const PORT_ENV: &str = "VALRUNS_PORT";

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "valruns.toml";

pub const DEFAULT_PORT: u16 = 8080;

// ── Types ─────────────────────────────────────────────────────────────────────

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// `[source]`: where the splits document lives. `path` and `url` are
/// mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: Option<PathBuf>,
    pub url: Option<String>,
    /// Bearer token for `url`.
    pub auth_token: Option<String>,
}

/// `[server]`: dashboard server settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: Option<u16>,
}

/// `[dashboard]`: presentation settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Banner shown above the table (known data issues, etc.).
    pub notice: Option<String>,
}

/// A resolved document source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url {
        url: String,
        auth_token: Option<String>,
    },
}

impl Source {
    pub fn into_provider(self) -> Arc<dyn DocumentProvider> {
        match self {
            Source::File(path) => Arc::new(FileProvider::new(path)),
            Source::Url { url, auth_token } => Arc::new(HttpProvider::new(url, auth_token)),
        }
    }
}

// ── Functions ─────────────────────────────────────────────────────────────────

/// Read and parse a config TOML file from `path`.
///
/// Returns a human-readable error string on failure.
pub fn read_config(path: &Path) -> Result<Config, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}

/// Locate and load the configuration.
///
/// Lookup order: the explicit `--config` path, then `VALRUNS_CONFIG`,
/// then `./valruns.toml` if it exists. An explicitly named file must
/// exist; with nothing found the defaults are used.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, String> {
    if let Some(path) = explicit {
        return read_config(path);
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return read_config(Path::new(&path));
    }
    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.is_file() {
        tracing::debug!(path = DEFAULT_CONFIG_FILE, "using config from working directory");
        return read_config(default_path);
    }
    Ok(Config::default())
}

impl Config {
    /// Resolve the document source: flags first, then `[source]`.
    pub fn resolve_source(
        &self,
        document: Option<PathBuf>,
        url: Option<String>,
    ) -> Result<Source, String> {
        match (document, url) {
            (Some(_), Some(_)) => Err("a document path and --url cannot both be given".to_string()),
            (Some(path), None) => Ok(Source::File(path)),
            (None, Some(url)) => Ok(Source::Url {
                url,
                auth_token: self.source.auth_token.clone(),
            }),
            (None, None) => match (&self.source.path, &self.source.url) {
                (Some(_), Some(_)) => {
                    Err("[source] sets both 'path' and 'url'; keep only one".to_string())
                }
                (Some(path), None) => Ok(Source::File(path.clone())),
                (None, Some(url)) => Ok(Source::Url {
                    url: url.clone(),
                    auth_token: self.source.auth_token.clone(),
                }),
                (None, None) => Err(format!(
                    "no document source: pass a document path or --url, or set [source] in {}",
                    DEFAULT_CONFIG_FILE
                )),
            },
        }
    }

    /// Resolve the server port: flag, then `VALRUNS_PORT`, then `[server]`,
    /// then 8080.
    pub fn resolve_port(&self, flag: Option<u16>) -> Result<u16, String> {
        if let Some(port) = flag {
            return Ok(port);
        }
        if let Ok(value) = std::env::var(PORT_ENV) {
            return value
                .trim()
                .parse::<u16>()
                .map_err(|_| format!("{} must be a port number, got '{}'", PORT_ENV, value));
        }
        Ok(self.server.port.unwrap_or(DEFAULT_PORT))
    }

    /// Resolve the notice banner: flag first, then `[dashboard]`.
    pub fn resolve_notice(&self, flag: Option<String>) -> Option<String> {
        flag.or_else(|| self.dashboard.notice.clone())
            .filter(|n| !n.trim().is_empty())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
