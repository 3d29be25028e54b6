// Question answering: classify the question into an assignment bucket,
// build the prompt around any uploaded data, and ask the completion service.

pub mod classifier;
pub mod handlers;
pub mod prompts;

pub use classifier::{classify, Assignment};
