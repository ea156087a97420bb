use std::time::Instant;

use log::{debug, info};
use mongodb::bson::{self, doc, Document};
use mongodb::error::ErrorKind;
use mongodb::sync::{Client, Collection};
use serde_json::Value;

use super::{DocumentStore, Records};
use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::record::QuizRecord;

/// A MongoDB collection read through the driver's blocking API.
pub struct MongoStore {
    records: Collection<QuizRecord>,
    documents: Collection<Document>,
    title: Option<String>,
}

impl MongoStore {
    /// Connects and pings the server, so an unreachable or unauthorised store
    /// fails here rather than halfway through a render.
    pub fn connect(uri: &str, config: &StoreConfig) -> Result<Self> {
        let now = Instant::now();
        let to_error = |source: mongodb::error::Error| Error::Connect {
            uri: uri.to_owned(),
            source: Box::new(source),
        };

        let client = Client::with_uri_str(uri).map_err(to_error)?;
        let database = client.database(&config.database);
        database
            .run_command(doc! { "ping": 1 })
            .run()
            .map_err(to_error)?;
        debug!("[Store] Connecting took {} ms.", now.elapsed().as_millis());
        info!(
            "[Store] Connected to {}, using {}.{}",
            uri, config.database, config.collection
        );

        Ok(MongoStore {
            records: database.collection(&config.collection),
            documents: database.collection(&config.collection),
            title: config.title.clone(),
        })
    }
}

impl DocumentStore for MongoStore {
    fn records(&self) -> Result<Records<'_>> {
        let filter = title_filter(self.title.as_deref());
        debug!("[Store] find({})", filter);
        let cursor = self.records.find(filter).run()?;
        Ok(Box::new(cursor.map(|record| record.map_err(classify))))
    }

    fn insert(&self, documents: &[Value]) -> Result<usize> {
        if documents.is_empty() {
            return Ok(0);
        }
        let documents = documents
            .iter()
            .map(|document| bson::to_document(document).map_err(|err| Error::Decode(Box::new(err))))
            .collect::<Result<Vec<_>>>()?;
        let inserted = self.documents.insert_many(documents).run()?;
        Ok(inserted.inserted_ids.len())
    }

    fn clear(&self) -> Result<u64> {
        let deleted = self.documents.delete_many(doc! {}).run()?;
        info!("[Store] Removed {} documents", deleted.deleted_count);
        Ok(deleted.deleted_count)
    }

    fn contains_title(&self, title: &str) -> Result<bool> {
        let count = self
            .documents
            .count_documents(title_filter(Some(title)))
            .run()?;
        Ok(count > 0)
    }
}

fn title_filter(title: Option<&str>) -> Document {
    match title {
        Some(title) => doc! { "title": title },
        None => doc! {},
    }
}

fn classify(err: mongodb::error::Error) -> Error {
    if matches!(*err.kind, ErrorKind::BsonDeserialization(_)) {
        Error::Decode(Box::new(err))
    } else {
        Error::Query(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_filter() {
        assert_eq!(title_filter(None), doc! {});
        assert_eq!(title_filter(Some("Arithmetic")), doc! { "title": "Arithmetic" });
    }

    #[test]
    fn test_unreachable_server_is_a_connect_error() {
        let config = StoreConfig {
            uri: "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=300".into(),
            ..StoreConfig::default()
        };
        match MongoStore::connect(&config.uri, &config) {
            Err(Error::Connect { uri, .. }) => assert_eq!(uri, config.uri),
            Err(other) => panic!("expected a connect error, got {other:?}"),
            Ok(_) => panic!("connected to a closed port"),
        }
    }

    #[test]
    fn test_classify_decode_errors() {
        let decode = bson::from_document::<QuizRecord>(doc! { "questions": 42 }).unwrap_err();
        assert!(matches!(
            classify(ErrorKind::BsonDeserialization(decode).into()),
            Error::Decode(_)
        ));

        let other = mongodb::error::Error::custom("cursor killed");
        assert!(matches!(classify(other), Error::Query(_)));
    }
}
