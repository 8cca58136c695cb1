//! GeneratedArtifact - Binary presentation returned by the generation endpoint

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::PathBuf;

pub const ARTIFACT_PREFIX: &str = "Presentation_";
pub const ARTIFACT_EXTENSION: &str = "pptx";

/// Opaque payload plus the file name it will be saved under.
///
/// Handed to the downloader by value, so the controller keeps no copy
/// once the download has been triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl GeneratedArtifact {
    pub fn new(bytes: Vec<u8>, generated_at: DateTime<Utc>) -> Self {
        Self {
            file_name: artifact_file_name(generated_at),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// `Presentation_<timestamp>.pptx`
///
/// The timestamp is the millisecond ISO-8601 instant with `:` and `.`
/// replaced by `-`, minus the trailing `-mmmZ`.
pub fn artifact_file_name(at: DateTime<Utc>) -> String {
    let iso = at.to_rfc3339_opts(SecondsFormat::Millis, true);
    let replaced: String = iso
        .chars()
        .map(|c| if c == ':' || c == '.' { '-' } else { c })
        .collect();
    let keep = replaced.len().saturating_sub(5);
    format!("{}{}.{}", ARTIFACT_PREFIX, &replaced[..keep], ARTIFACT_EXTENSION)
}

/// Receipt for a completed download
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadedFile {
    pub file_name: String,
    pub location: PathBuf,
    pub size: usize,
}
