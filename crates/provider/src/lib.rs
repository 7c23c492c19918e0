//! valruns-provider: where the splits document comes from.
//!
//! The transformation pipeline never fetches anything itself. Callers
//! inject a [`DocumentProvider`] and hand the fetched JSON to
//! `valruns_interchange::from_document`.

mod error;
mod file;
mod http;
mod static_provider;
mod traits;

pub use error::ProviderError;
pub use file::FileProvider;
pub use http::{HttpProvider, AUTH_TOKEN_ENV};
pub use static_provider::StaticProvider;
pub use traits::DocumentProvider;
