use std::collections::HashSet;
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use log::{error, info, warn};
use serde_json::Value;

use mondaishuu::config::{StoreArgs, StoreConfig};
use mondaishuu::store::DocumentStore;
use mondaishuu::{store, Error, QuizRecord, Result};

#[derive(Parser, Debug)]
#[command(name = "入力者 (Nyūryokusha)")]
#[command(version, about = "Imports quiz repositories from a JSON file into a document store", long_about = None)]
struct Args {
    #[command(flatten)]
    store: StoreArgs,
    #[arg(short, long, default_value = "info")]
    log_level: String,
    /// Empty the collection before importing
    #[arg(short, long, default_value = "false")]
    refresh: bool,
    /// JSON file holding one repository document or an array of them
    from: PathBuf,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    match import(&args) {
        Ok(count) => println!("{}", format!("Imported {} documents.", count).green()),
        Err(err) => {
            error!("[Import] {:?}", err);
            eprintln!("{}", err.chain().red());
            std::process::exit(1);
        }
    }
}

fn import(args: &Args) -> Result<usize> {
    info!(
        "{}",
        format!(
            "Reading from file {:?} into {}",
            args.from, args.store.store_uri
        )
        .cyan()
    );
    let json = std::fs::read_to_string(&args.from).map_err(|source| Error::Read {
        path: args.from.clone(),
        source,
    })?;
    let documents = importable_documents(serde_json::from_str(&json)?);

    let store = store::open(&StoreConfig::from(args.store.clone()))?;
    if args.refresh {
        store.clear()?;
    }
    let documents = unclaimed_documents(store.as_ref(), documents)?;
    store.insert(&documents)
}

/// Drops documents whose title is already stored or appeared earlier in the
/// same file. Repository titles are unique.
fn unclaimed_documents(store: &dyn DocumentStore, documents: Vec<Value>) -> Result<Vec<Value>> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(documents.len());
    for document in documents {
        if let Some(title) = document["title"].as_str() {
            if !seen.insert(title.to_owned()) {
                warn!("{}", format!("├ ✘ Repository {:?}: duplicated in file", title).red());
                continue;
            }
            if store.contains_title(title)? {
                warn!("{}", format!("├ ✘ Repository {:?}: already stored", title).red());
                continue;
            }
        }
        kept.push(document);
    }
    Ok(kept)
}

/// Keeps the entries that would decode as quiz records, logging the rest.
fn importable_documents(content: Value) -> Vec<Value> {
    let entries = match content {
        Value::Array(entries) => entries,
        other => vec![other],
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            if !entry.is_object() {
                warn!("{}", format!("├ ✘ Entry {}: not an object", idx).red());
                return None;
            }
            match serde_json::from_value::<QuizRecord>(entry.clone()) {
                Ok(record) => {
                    info!(
                        "{}",
                        format!(
                            "├ Repository {:?} ({} questions)",
                            record.title.as_deref().unwrap_or("untitled"),
                            record.questions.len()
                        )
                        .blue()
                    );
                    Some(entry)
                }
                Err(err) => {
                    warn!("{}", format!("├ ✘ Entry {}: {}", idx, err).red());
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_document_is_accepted() {
        let documents = importable_documents(json!({ "title": "Solo", "questions": [] }));
        assert_eq!(documents.len(), 1);
    }

    #[test]
    fn test_invalid_entries_are_skipped() {
        let documents = importable_documents(json!([
            { "title": "ok" },
            "not an object",
            { "questions": 7 },
            { "title": "also ok", "questions": [{ "question": "?" }] }
        ]));
        let titles: Vec<&str> = documents
            .iter()
            .filter_map(|d| d["title"].as_str())
            .collect();
        assert_eq!(titles, vec!["ok", "also ok"]);
    }

    #[test]
    fn test_import_into_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("repos.json");
        std::fs::write(
            &from,
            r#"[{ "title": "Arithmetic", "questions": [{ "question": "2+2?", "correctAnswer": "4" }] }]"#,
        )
        .unwrap();
        let db = dir.path().join("quizzes.db");
        let uri = format!("sqlite:{}", db.display());

        let args = Args::try_parse_from([
            "nyuuryokusha",
            "--store-uri",
            uri.as_str(),
            "--refresh",
            from.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(import(&args).unwrap(), 1);
        assert_eq!(import(&args).unwrap(), 1);

        let store = store::open(&StoreConfig::from(args.store.clone())).unwrap();
        assert_eq!(store.records().unwrap().count(), 1);
    }

    #[test]
    fn test_repeat_import_keeps_titles_unique() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("repos.json");
        std::fs::write(
            &from,
            r#"[
                { "title": "Arithmetic", "questions": [{ "question": "2+2?" }] },
                { "title": "Arithmetic", "questions": [{ "question": "3+3?" }] },
                { "title": "Geography", "questions": [] }
            ]"#,
        )
        .unwrap();
        let uri = format!("sqlite:{}", dir.path().join("quizzes.db").display());

        let args = Args::try_parse_from([
            "nyuuryokusha",
            "--store-uri",
            uri.as_str(),
            from.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(import(&args).unwrap(), 2);
        assert_eq!(import(&args).unwrap(), 0);

        let store = store::open(&StoreConfig {
            title: Some("Arithmetic".into()),
            ..StoreConfig::from(args.store.clone())
        })
        .unwrap();
        let records: Vec<QuizRecord> = store.records().unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].questions[0].question, "2+2?");
    }

    #[test]
    fn test_untitled_documents_are_not_deduplicated() {
        let store = store::SqliteStore::open_in_memory("qas", None).unwrap();
        let kept = unclaimed_documents(&store, vec![json!({}), json!({})]).unwrap();
        assert_eq!(kept.len(), 2);
    }
}
