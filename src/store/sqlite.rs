//! Embedded document store: one table of JSON bodies per collection.

use std::collections::VecDeque;
use std::path::Path;
use std::time::Instant;

use log::{debug, info, warn};
use rusqlite::{params, Connection, Row};
use serde_json::Value;

use super::{DocumentStore, Records};
use crate::error::{Error, Result};
use crate::record::QuizRecord;

const PAGE_SIZE: usize = 256;

pub struct SqliteStore {
    conn: Connection,
    collection: String,
    table: String,
    title: Option<String>,
    page_size: usize,
}

impl SqliteStore {
    pub fn create_or_open(path: &Path, collection: &str, title: Option<String>) -> Result<Self> {
        if path.exists() {
            info!("[Store] Opening existing database {:?}", path);
        } else {
            info!("[Store] Creating new database {:?}", path);
        }
        let now = Instant::now();
        let conn = Connection::open(path)?;
        debug!("[Store] Opening took {} ms.", now.elapsed().as_millis());
        Self::init(conn, collection, title)
    }

    pub fn open_in_memory(collection: &str, title: Option<String>) -> Result<Self> {
        info!("[Store] Opening in-memory database");
        Self::init(Connection::open_in_memory()?, collection, title)
    }

    fn init(conn: Connection, collection: &str, title: Option<String>) -> Result<Self> {
        let table = quote_identifier(collection);
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                  id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
                  body TEXT NOT NULL
                )"
            ),
            (),
        )?;
        debug!("[Store] Collection '{}' ready", collection);

        Ok(SqliteStore {
            conn,
            collection: collection.to_owned(),
            table,
            title,
            page_size: PAGE_SIZE,
        })
    }

    #[cfg(test)]
    fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

impl DocumentStore for SqliteStore {
    fn records(&self) -> Result<Records<'_>> {
        debug!(
            "[Store] Reading '{}' (title filter: {:?})",
            self.collection, self.title
        );
        Ok(Box::new(SqliteRecords {
            store: self,
            last_id: 0,
            page: VecDeque::new(),
            exhausted: false,
        }))
    }

    fn insert(&self, documents: &[Value]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut statement =
                tx.prepare(&format!("INSERT INTO {} (body) VALUES (?1)", self.table))?;
            for document in documents {
                statement.execute(params![document.to_string()])?;
            }
        }
        tx.commit()?;
        debug!(
            "[Store] Inserted {} documents into '{}'",
            documents.len(),
            self.collection
        );
        Ok(documents.len())
    }

    fn clear(&self) -> Result<u64> {
        let removed = self
            .conn
            .execute(&format!("DELETE FROM {}", self.table), ())?;
        info!("[Store] Removed {} documents from '{}'", removed, self.collection);
        Ok(removed as u64)
    }

    fn contains_title(&self, title: &str) -> Result<bool> {
        let mut statement = self.conn.prepare_cached(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE json_extract(body, '$.title') = ?1)",
            self.table
        ))?;
        Ok(statement.query_row(params![title], |row| row.get(0))?)
    }
}

/// Walks a collection by primary key, one page at a time.
struct SqliteRecords<'a> {
    store: &'a SqliteStore,
    last_id: i64,
    page: VecDeque<(i64, String)>,
    exhausted: bool,
}

impl SqliteRecords<'_> {
    fn fetch_page(&mut self) -> Result<()> {
        let store = self.store;
        let limit = store.page_size as i64;
        let rows: Vec<(i64, String)> = match &store.title {
            Some(title) => {
                let mut statement = store.conn.prepare_cached(&format!(
                    "SELECT id, body FROM {} \
                     WHERE id > ?1 AND json_extract(body, '$.title') = ?2 \
                     ORDER BY id LIMIT ?3",
                    store.table
                ))?;
                let rows = statement.query_map(params![self.last_id, title, limit], id_and_body)?;
                rows.collect::<rusqlite::Result<_>>()?
            }
            None => {
                let mut statement = store.conn.prepare_cached(&format!(
                    "SELECT id, body FROM {} WHERE id > ?1 ORDER BY id LIMIT ?2",
                    store.table
                ))?;
                let rows = statement.query_map(params![self.last_id, limit], id_and_body)?;
                rows.collect::<rusqlite::Result<_>>()?
            }
        };

        if rows.len() < store.page_size {
            self.exhausted = true;
        }
        if let Some((id, _)) = rows.last() {
            self.last_id = *id;
        }
        debug!("[Store] Fetched page of {} documents", rows.len());
        self.page.extend(rows);
        Ok(())
    }
}

impl Iterator for SqliteRecords<'_> {
    type Item = Result<QuizRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.page.is_empty() && !self.exhausted {
            if let Err(err) = self.fetch_page() {
                self.exhausted = true;
                return Some(Err(err));
            }
        }

        let (id, body) = self.page.pop_front()?;
        Some(serde_json::from_str(&body).map_err(|err| {
            warn!("[Store] Document {} is not a quiz record: {}", id, err);
            Error::Decode(Box::new(err))
        }))
    }
}

fn id_and_body(row: &Row) -> rusqlite::Result<(i64, String)> {
    Ok((row.get(0)?, row.get(1)?))
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
