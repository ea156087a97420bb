//! Document stores holding quiz repositories.

#[cfg(feature = "mongo")]
mod mongo;
mod sqlite;

use serde_json::Value;

use crate::config::{StoreConfig, StoreUri};
use crate::error::Result;
use crate::record::QuizRecord;

#[cfg(feature = "mongo")]
pub use mongo::MongoStore;
pub use sqlite::SqliteStore;

/// Lazy, forward-only view over a collection, in the store's own order.
pub type Records<'a> = Box<dyn Iterator<Item = Result<QuizRecord>> + 'a>;

pub trait DocumentStore {
    fn records(&self) -> Result<Records<'_>>;
    /// Stores raw documents as-is; returns how many were written.
    fn insert(&self, documents: &[Value]) -> Result<usize>;
    /// Empties the collection; returns how many documents were removed.
    fn clear(&self) -> Result<u64>;
    /// Whether a repository with this title is already stored.
    fn contains_title(&self, title: &str) -> Result<bool>;
}

pub fn open(config: &StoreConfig) -> Result<Box<dyn DocumentStore>> {
    match StoreUri::parse(&config.uri)? {
        StoreUri::Mongo(uri) => open_mongo(&uri, config),
        StoreUri::SqliteFile(path) => Ok(Box::new(SqliteStore::create_or_open(
            &path,
            &config.collection,
            config.title.clone(),
        )?)),
        StoreUri::SqliteMemory => Ok(Box::new(SqliteStore::open_in_memory(
            &config.collection,
            config.title.clone(),
        )?)),
    }
}

#[cfg(feature = "mongo")]
fn open_mongo(uri: &str, config: &StoreConfig) -> Result<Box<dyn DocumentStore>> {
    Ok(Box::new(MongoStore::connect(uri, config)?))
}

#[cfg(not(feature = "mongo"))]
fn open_mongo(uri: &str, _config: &StoreConfig) -> Result<Box<dyn DocumentStore>> {
    Err(crate::error::Error::BackendDisabled(uri.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    fn sqlite_config(uri: &str) -> StoreConfig {
        StoreConfig {
            uri: uri.to_owned(),
            ..StoreConfig::default()
        }
    }

    #[test]
    fn test_open_in_memory_store() {
        let store = open(&sqlite_config("sqlite::memory:")).unwrap();
        assert_eq!(store.insert(&[json!({ "questions": [] })]).unwrap(), 1);
        assert_eq!(store.records().unwrap().count(), 1);
    }

    #[test]
    fn test_open_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let uri = format!("sqlite:{}", dir.path().join("quizzes.db").display());

        let store = open(&sqlite_config(&uri)).unwrap();
        store.insert(&[json!({ "title": "kept" })]).unwrap();
        drop(store);

        let store = open(&sqlite_config(&uri)).unwrap();
        let records: Vec<QuizRecord> = store.records().unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title.as_deref(), Some("kept"));
    }

    #[test]
    fn test_open_rejects_unknown_scheme() {
        assert!(matches!(
            open(&sqlite_config("postgres://localhost/quiz")),
            Err(Error::UnsupportedStore(_))
        ));
    }
}
