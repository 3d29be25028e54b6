// Uploaded-file handling: sniff the declared type, then turn the raw buffer into
// rows, text, or a JSON value for the prompt builder.
// Zip archives are unpacked into a per-request scratch directory that is removed on drop.

pub mod archive;
pub mod materializer;
pub mod models;
pub mod tabular;

pub use materializer::{materialize_in_background, MaterializeError};
pub use models::{ParsedData, Row, UploadedFile};
