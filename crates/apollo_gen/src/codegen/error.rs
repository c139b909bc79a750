use std::path::PathBuf;
use thiserror::Error;

/// Errors specific to header generation. I/O failures aren't represented here, they're propagated
/// as they are (with the offending path attached as context).
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("could not find {pattern} in {}", path.display())]
    PatternNotFound { pattern: String, path: PathBuf },
    #[error("malformed `enum class {enum_name}` in {}: {reason}", path.display())]
    MalformedEnum {
        enum_name: String,
        path: PathBuf,
        reason: String,
    },
    #[error("type `{name}` is listed more than once")]
    DuplicateType { name: String },
    #[error("template {} doesn't contain the {placeholder} placeholder", path.display())]
    PlaceholderMissing {
        placeholder: &'static str,
        path: PathBuf,
    },
    #[error("can't derive an output path from {} (expected a `.in` suffix); specify `output`", path.display())]
    NoOutputPath { path: PathBuf },
    #[error("include pattern `{pattern}` doesn't contain `{{name}}`")]
    InvalidPattern { pattern: String },
    #[error("header {} (for type `{name}`) doesn't exist", path.display())]
    MissingHeader { name: String, path: PathBuf },
    #[error("generator `{name}` is defined more than once")]
    DuplicateGenerator { name: String },
    #[error("no generator named `{name}`")]
    UnknownGenerator { name: String },
    #[error("generated headers are out of date: {}; rerun the build", names.join(", "))]
    OutOfDate { names: Vec<String> },
}
