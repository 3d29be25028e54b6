use bytes::Bytes;
use indexmap::IndexMap;
use serde_json::Value;

/// One CSV record keyed by header column, in header order.
pub type Row = IndexMap<String, String>;

/// The single file accepted with a question.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub buffer: Bytes,
    pub content_type: String,
    pub file_name: String,
}

/// How an upload is interpreted, decided from its declared type and name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Zip,
    Csv,
    Json,
    Text,
    Unsupported,
}

impl FileKind {
    /// Matching is case-sensitive on both the MIME type and the file suffix.
    /// Earlier arms win: a `.zip` named `text/csv` upload is still a zip.
    pub fn detect(content_type: &str, file_name: &str) -> Self {
        if content_type == "application/zip" || file_name.ends_with(".zip") {
            FileKind::Zip
        } else if content_type == "text/csv" || file_name.ends_with(".csv") {
            FileKind::Csv
        } else if content_type == "application/json" || file_name.ends_with(".json") {
            FileKind::Json
        } else if content_type == "text/plain" || file_name.ends_with(".txt") {
            FileKind::Text
        } else {
            FileKind::Unsupported
        }
    }
}

impl UploadedFile {
    pub fn kind(&self) -> FileKind {
        FileKind::detect(&self.content_type, &self.file_name)
    }
}

/// Structured view of an upload handed to the prompt builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ParsedData {
    Rows(Vec<Row>),
    Text(String),
    Json(Value),
    #[default]
    Absent,
}

impl ParsedData {
    /// Short label used in logs.
    pub fn shape(&self) -> &'static str {
        match self {
            ParsedData::Rows(_) => "rows",
            ParsedData::Text(_) => "text",
            ParsedData::Json(_) => "json",
            ParsedData::Absent => "absent",
        }
    }
}
