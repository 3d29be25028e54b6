//! Assignment Classifier: maps a question to one of five graded assignments
//! (or the general bucket) by keyword.

use std::fmt;

/// Assignment bucket a question belongs to. `General` means no keyword matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Assignment {
    General,
    One,
    Two,
    Three,
    Four,
    Five,
}

impl Assignment {
    /// Assignment number, with 0 for the general bucket.
    pub fn number(self) -> u8 {
        match self {
            Assignment::General => 0,
            Assignment::One => 1,
            Assignment::Two => 2,
            Assignment::Three => 3,
            Assignment::Four => 4,
            Assignment::Five => 5,
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assignment::General => f.write_str("general"),
            other => write!(f, "assignment {}", other.number()),
        }
    }
}

/// Keyword phrases per assignment, checked in this order.
const KEYWORDS: [(Assignment, &[&str]); 5] = [
    (
        Assignment::One,
        &[
            "assignment 1",
            "graded assignment 1",
            "pandas",
            "dataframe",
            "series",
            "data manipulation",
        ],
    ),
    (
        Assignment::Two,
        &[
            "assignment 2",
            "graded assignment 2",
            "matplotlib",
            "visualization",
            "plot",
            "chart",
            "graph",
        ],
    ),
    (
        Assignment::Three,
        &[
            "assignment 3",
            "graded assignment 3",
            "sklearn",
            "machine learning",
            "regression",
            "classification",
        ],
    ),
    (
        Assignment::Four,
        &[
            "assignment 4",
            "graded assignment 4",
            "natural language processing",
            "nlp",
            "text analysis",
            "tokenization",
        ],
    ),
    (
        Assignment::Five,
        &[
            "assignment 5",
            "graded assignment 5",
            "deep learning",
            "neural networks",
            "tensorflow",
            "pytorch",
        ],
    ),
];

/// Case-insensitive substring match against [`KEYWORDS`].
///
/// The lowest-numbered assignment with any matching phrase wins, regardless of
/// how many or how long the matches in later assignments are.
pub fn classify(question: &str) -> Assignment {
    let lowered = question.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|phrase| lowered.contains(phrase)))
        .map(|(assignment, _)| *assignment)
        .unwrap_or(Assignment::General)
}
