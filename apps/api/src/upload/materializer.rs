//! File Materializer: turns an upload into [`ParsedData`] for the prompt builder.
//!
//! Branches on the declared type (see [`FileKind::detect`]):
//! - zip: extract to a scratch dir, parse the first top-level `.csv`; for
//!   assignment 4 a top-level `.txt` replaces it
//! - csv: parse the buffer directly
//! - json: parse, falling back to the raw text when the JSON is invalid
//! - text: decode as UTF-8
//! - anything else: no data, no error
//!
//! Everything here is blocking; async callers go through
//! [`materialize_in_background`].

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::assignment::Assignment;
use crate::upload::archive::{extract_archive, first_with_suffix, ScratchDir};
use crate::upload::models::{FileKind, ParsedData, UploadedFile};
use crate::upload::tabular::parse_csv;

#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("invalid zip archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),

    #[error("file processing task failed: {0}")]
    Background(String),
}

/// Materializes `file` on the blocking pool.
pub async fn materialize_in_background(
    file: UploadedFile,
    assignment: Assignment,
    scratch_root: PathBuf,
) -> Result<ParsedData, MaterializeError> {
    tokio::task::spawn_blocking(move || materialize(&file, assignment, &scratch_root))
        .await
        .map_err(|e| MaterializeError::Background(e.to_string()))?
}

pub fn materialize(
    file: &UploadedFile,
    assignment: Assignment,
    scratch_root: &Path,
) -> Result<ParsedData, MaterializeError> {
    let kind = file.kind();
    debug!(
        "Materializing '{}' ({}, {} bytes) as {:?}",
        file.file_name,
        file.content_type,
        file.buffer.len(),
        kind
    );

    match kind {
        FileKind::Zip => materialize_archive(&file.buffer, assignment, scratch_root),
        FileKind::Csv => Ok(ParsedData::Rows(parse_csv(file.buffer.as_ref())?)),
        FileKind::Json => {
            let text = decode_text(&file.buffer);
            Ok(match serde_json::from_str(&text) {
                Ok(value) => ParsedData::Json(value),
                Err(_) => ParsedData::Text(text),
            })
        }
        FileKind::Text => Ok(ParsedData::Text(decode_text(&file.buffer))),
        FileKind::Unsupported => Ok(ParsedData::Absent),
    }
}

fn materialize_archive(
    buffer: &[u8],
    assignment: Assignment,
    scratch_root: &Path,
) -> Result<ParsedData, MaterializeError> {
    // Dropped on every return path below, including `?` exits.
    let scratch = ScratchDir::create_in(scratch_root)?;
    let files = extract_archive(buffer, &scratch)?;

    let mut data = ParsedData::Absent;

    if let Some(csv_path) = first_with_suffix(&files, ".csv") {
        data = ParsedData::Rows(parse_csv(File::open(csv_path)?)?);
    }

    // Text corpora take precedence over tables for the NLP assignment.
    if assignment == Assignment::Four {
        if let Some(text_path) = first_with_suffix(&files, ".txt") {
            data = ParsedData::Text(decode_text(&fs::read(text_path)?));
        }
    }

    Ok(data)
}

fn decode_text(buffer: &[u8]) -> String {
    String::from_utf8_lossy(buffer).into_owned()
}
