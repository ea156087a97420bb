use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot connect to document store at {uri}")]
    Connect {
        uri: String,
        #[source]
        source: BoxError,
    },
    #[cfg(feature = "mongo")]
    #[error("document store query failed")]
    Query(#[from] mongodb::error::Error),
    #[error("embedded document store failed")]
    Sqlite(#[from] rusqlite::Error),
    #[error("stored document does not match the quiz record shape")]
    Decode(#[source] BoxError),
    #[error("malformed JSON")]
    Json(#[from] serde_json::Error),
    #[error("cannot read {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported document store URI {0:?} (expected mongodb://, mongodb+srv:// or sqlite:)")]
    UnsupportedStore(String),
    #[error("support for {0:?} was not compiled in (enable the `mongo` feature)")]
    BackendDisabled(String),
}

impl Error {
    /// Renders the error followed by every underlying cause, `a: b: c`.
    pub fn chain(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}
