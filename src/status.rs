//! Completion markers for pipeline artifacts.
//!
//! Next to every finished artifact sits `<artifact>.done`, a small JSON file
//! recording the SHA-256 of the artifact and, where the artifact was derived
//! from another file, of that input. An artifact counts as complete only while
//! both digests still match what is on disk, so truncated outputs and changed
//! inputs are redone on the next run.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const BUFFER_SIZE: usize = 64 * 1024;
const MARKER_EXTENSION: &str = "done";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMarker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_sha256: Option<String>,
    pub output_sha256: String,
    pub completed_at: String,
}

/// `dataset/csv/abc01.csv` -> `dataset/csv/abc01.csv.done`
pub fn marker_path(artifact: &Path) -> PathBuf {
    let mut name = artifact.as_os_str().to_os_string();
    name.push(".");
    name.push(MARKER_EXTENSION);
    PathBuf::from(name)
}

/// Hex SHA-256 of a file's contents.
pub fn file_digest(path: &Path) -> Result<String, AppError> {
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

pub fn read_marker(artifact: &Path) -> Option<StatusMarker> {
    let path = marker_path(artifact);
    let content = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&content) {
        Ok(marker) => Some(marker),
        Err(e) => {
            warn!("Ignoring unreadable status marker {}: {e}", path.display());
            None
        }
    }
}

/// Whether `artifact` is recorded complete and unchanged.
///
/// With `input`, the recorded input digest must also match the current input.
pub fn is_complete(artifact: &Path, input: Option<&Path>) -> bool {
    let Some(marker) = read_marker(artifact) else {
        return false;
    };

    match file_digest(artifact) {
        Ok(digest) if digest == marker.output_sha256 => {}
        Ok(_) => {
            debug!("{} changed since it was marked complete", artifact.display());
            return false;
        }
        Err(_) => return false,
    }

    match input {
        None => true,
        Some(input) => match (file_digest(input), marker.input_sha256) {
            (Ok(current), Some(recorded)) if current == recorded => true,
            _ => {
                debug!("Input {} changed since last run", input.display());
                false
            }
        },
    }
}

/// Records `artifact` (derived from `input`, if any) as complete.
pub fn mark_complete(artifact: &Path, input: Option<&Path>) -> Result<StatusMarker, AppError> {
    let marker = StatusMarker {
        input_sha256: input.map(file_digest).transpose()?,
        output_sha256: file_digest(artifact)?,
        completed_at: chrono::Utc::now().to_rfc3339(),
    };
    std::fs::write(marker_path(artifact), serde_json::to_string_pretty(&marker)?)?;
    Ok(marker)
}

/// Removes the marker of `artifact`; a missing marker is not an error.
pub fn clear_marker(artifact: &Path) -> Result<(), AppError> {
    match std::fs::remove_file(marker_path(artifact)) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
