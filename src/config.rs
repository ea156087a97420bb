//! Run configuration and the command-line flags shared by both binaries.

use std::path::PathBuf;

use clap::Args;

use crate::error::{Error, Result};
use crate::render::EscapeMode;

pub const DEFAULT_STORE_URI: &str = "mongodb://localhost:27017/";
pub const DEFAULT_DATABASE: &str = "userRepository";
pub const DEFAULT_COLLECTION: &str = "qas";
pub const DEFAULT_OUTPUT: &str = "quiz_questions.tex";

/// Where quiz records are read from (or imported into).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
    /// Only read the record with this title.
    pub title: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            uri: DEFAULT_STORE_URI.to_owned(),
            database: DEFAULT_DATABASE.to_owned(),
            collection: DEFAULT_COLLECTION.to_owned(),
            title: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store: StoreConfig,
    pub output: PathBuf,
    pub escape: EscapeMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            store: StoreConfig::default(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            escape: EscapeMode::default(),
        }
    }
}

/// Backend named by a store URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUri {
    Mongo(String),
    SqliteFile(PathBuf),
    SqliteMemory,
}

impl StoreUri {
    pub fn parse(uri: &str) -> Result<StoreUri> {
        if uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://") {
            return Ok(StoreUri::Mongo(uri.to_owned()));
        }
        match uri.strip_prefix("sqlite:") {
            Some(":memory:") => Ok(StoreUri::SqliteMemory),
            Some(path) => {
                let path = path.strip_prefix("//").unwrap_or(path);
                if path.is_empty() {
                    Err(Error::UnsupportedStore(uri.to_owned()))
                } else {
                    Ok(StoreUri::SqliteFile(PathBuf::from(path)))
                }
            }
            None => Err(Error::UnsupportedStore(uri.to_owned())),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Document store to read from: mongodb://…, mongodb+srv://…, sqlite:<file> or sqlite::memory:
    #[arg(long, env = "MONDAISHUU_STORE_URI", default_value = DEFAULT_STORE_URI)]
    pub store_uri: String,
    #[arg(long, env = "MONDAISHUU_DATABASE", default_value = DEFAULT_DATABASE)]
    pub database: String,
    #[arg(long, env = "MONDAISHUU_COLLECTION", default_value = DEFAULT_COLLECTION)]
    pub collection: String,
    /// Only use the repository with this title
    #[arg(long, env = "MONDAISHUU_TITLE")]
    pub title: Option<String>,
}

impl From<StoreArgs> for StoreConfig {
    fn from(args: StoreArgs) -> Self {
        StoreConfig {
            uri: args.store_uri,
            database: args.database,
            collection: args.collection,
            title: args.title,
        }
    }
}
