//! JSON artifacts passed between pipeline stages
//!
//! Every stage reads its input from, and writes its output to, a plain JSON
//! file so stages can be run and inspected independently.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures reading or writing artifact files
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: invalid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: CSV error: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl ArtifactError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True when the file simply does not exist yet
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Writes `value` as pretty-printed JSON, replacing the file
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let file = File::create(path).map_err(|e| ArtifactError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|e| ArtifactError::io(path, e))?;

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

/// Reads a JSON artifact
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let file = File::open(path).map_err(|e| ArtifactError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })
}
