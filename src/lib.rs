//! # mondaishuu
//!
//! Reads quiz repositories out of a document store and renders them as a
//! LaTeX answer sheet: every question, its lettered options and the correct
//! answer.
//!
//! ```rust,no_run
//! use mondaishuu::{run, Config};
//!
//! fn main() -> mondaishuu::Result<()> {
//!     let written = run(&Config::default())?;
//!     println!("LaTeX file created: {}", written.display());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod record;
pub mod render;
pub mod sink;
pub mod store;

use std::path::PathBuf;

use log::info;

pub use config::{Config, StoreConfig};
pub use error::{Error, Result};
pub use record::{Question, QuizOption, QuizRecord};
pub use render::EscapeMode;

/// Reads every record from the configured store, renders the document and
/// writes it out. Returns the path that was written.
pub fn run(config: &Config) -> Result<PathBuf> {
    let store = store::open(&config.store)?;
    let document = render::render_records(store.records()?, config.escape)?;
    sink::write_document(&config.output, &document)?;
    info!("[Run] Document written to {:?}", config.output);
    Ok(config.output.clone())
}
