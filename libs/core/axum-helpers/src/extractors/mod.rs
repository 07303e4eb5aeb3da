//! Extractors that turn malformed input into [`AppError`](crate::AppError)
//! responses before a handler runs.

pub mod parsed_path;
pub mod validated_json;

pub use parsed_path::ParsedPath;
pub use validated_json::ValidatedJson;
