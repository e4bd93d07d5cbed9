//! The intermediate `recipes.json` file handed from `collect` to `import`.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::model::RawRecord;

pub const DEFAULT_PATH: &str = "recipes.json";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("{0} not found; run `collect` first to scrape recipes")]
    NotFound(PathBuf),

    #[error("{path} is not a valid recipe list: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The file must be a JSON array. Entries that are not objects are skipped
/// with a warning; off-type fields inside an object read as absent.
pub fn load_raw(path: &Path) -> Result<Vec<RawRecord>, DatasetError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DatasetError::NotFound(path.to_path_buf()),
        _ => DatasetError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    let entries: Vec<serde_json::Value> =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| DatasetError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut records = Vec::with_capacity(entries.len());
    for (i, entry) in entries.into_iter().enumerate() {
        match RawRecord::deserialize(entry) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping entry {} in {}: {}", i, path.display(), e),
        }
    }
    Ok(records)
}

/// Pretty-printed UTF-8; Korean text is written verbatim, not `\u`-escaped.
pub fn save_raw(path: &Path, records: &[RawRecord]) -> Result<(), DatasetError> {
    let io_err = |e: std::io::Error| DatasetError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    serde_json::to_writer_pretty(&mut writer, records).map_err(|e| DatasetError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    writer.write_all(b"\n").map_err(io_err)?;
    writer.flush().map_err(io_err)?;
    Ok(())
}
