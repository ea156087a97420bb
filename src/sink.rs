use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use log::{debug, info};

use crate::error::{Error, Result};

/// Writes `contents` to `path` as UTF-8, replacing whatever was there.
///
/// The file is closed when this returns, on success and on error alike. A
/// failed write may leave a truncated file behind.
pub fn write_document(path: &Path, contents: &str) -> Result<()> {
    let now = Instant::now();
    let to_error = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(to_error)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(contents.as_bytes()).map_err(to_error)?;
    writer.flush().map_err(to_error)?;

    info!("[Sink] Wrote {} bytes to {:?}", contents.len(), path);
    debug!("[Sink] Writing took {} ms.", now.elapsed().as_millis());
    Ok(())
}
