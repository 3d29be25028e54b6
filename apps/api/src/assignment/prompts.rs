//! Prompt Builder: system framing per assignment plus a user message that
//! embeds (a summary of) the uploaded data.

use serde_json::Value;

use crate::assignment::Assignment;
use crate::llm_client::prompts::{ANSWER_ONLY_RULES, GENERAL_SYSTEM};
use crate::llm_client::PromptPair;
use crate::upload::{ParsedData, Row};

/// Tables up to this many rows are inlined in full (outside assignments 1 and 2).
pub const FULL_DATA_MAX_ROWS: usize = 100;
/// Rows shown when a table is summarised instead of inlined.
pub const SAMPLE_ROWS: usize = 5;
/// Text and JSON payloads longer than this many characters are cut to an excerpt.
pub const MAX_INLINE_CHARS: usize = 20_000;

/// Builds the system/user instructions. Pure: same inputs, same prompt.
pub fn build_prompt(question: &str, assignment: Assignment, data: &ParsedData) -> PromptPair {
    let mut user = format!("Question: {question}");

    match data {
        ParsedData::Absent => {}
        _ if is_blank(data) => {}
        ParsedData::Rows(rows) => user.push_str(&describe_rows(rows, assignment)),
        ParsedData::Text(text) => user.push_str(&describe_inline(text)),
        ParsedData::Json(value) => user.push_str(&describe_inline(&value.to_string())),
    }

    PromptPair {
        system: system_prompt(assignment),
        user,
    }
}

/// Payloads that carry nothing worth quoting: empty text, and the JSON
/// scalars `null`, `false`, `0` and `""`. An empty table still counts.
fn is_blank(data: &ParsedData) -> bool {
    match data {
        ParsedData::Text(text) => text.is_empty(),
        ParsedData::Json(Value::Null) | ParsedData::Json(Value::Bool(false)) => true,
        ParsedData::Json(Value::Number(n)) => n.as_f64() == Some(0.0),
        ParsedData::Json(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}

fn system_prompt(assignment: Assignment) -> String {
    match assignment {
        Assignment::General => GENERAL_SYSTEM.to_string(),
        other => format!(
            "You are an expert in data science specializing in graded assignment {} \
             for IIT Madras' Online Degree in Data Science.\n\
             Your task is to provide accurate and concise answers to questions from this assignment.\n\
             {ANSWER_ONLY_RULES}",
            other.number()
        ),
    }
}

fn describe_rows(rows: &[Row], assignment: Assignment) -> String {
    match assignment {
        Assignment::One => summary_with_sample(rows),
        Assignment::Two => format!(
            "\n\nData contains {} rows with columns: {}",
            rows.len(),
            column_list(rows)
        ),
        _ if rows.len() <= FULL_DATA_MAX_ROWS => format!("\n\nData: {}", rows_json(rows)),
        _ => summary_with_sample(rows),
    }
}

fn summary_with_sample(rows: &[Row]) -> String {
    let sample = &rows[..rows.len().min(SAMPLE_ROWS)];
    format!(
        "\n\nData contains {} rows with columns: {}\n\nSample data: {}",
        rows.len(),
        column_list(rows),
        rows_json(sample)
    )
}

/// Column names taken from the first row.
fn column_list(rows: &[Row]) -> String {
    rows.first()
        .map(|row| row.keys().map(String::as_str).collect::<Vec<_>>().join(", "))
        .unwrap_or_default()
}

fn rows_json(rows: &[Row]) -> String {
    serde_json::to_string(rows).unwrap_or_else(|_| "[]".to_string())
}

fn describe_inline(content: &str) -> String {
    let total = content.chars().count();
    if total <= MAX_INLINE_CHARS {
        return format!("\n\nData: {content}");
    }
    let excerpt: String = content.chars().take(MAX_INLINE_CHARS).collect();
    format!(
        "\n\nData contains {total} characters (first {MAX_INLINE_CHARS} shown):\n{excerpt}"
    )
}
