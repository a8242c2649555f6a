//! Error taxonomy for the compilation pipeline.
//!
//! Every error carries enough context to locate the offending schema path or
//! identifier. Errors are fatal: a failed compile produces no output file and
//! nothing in the pipeline retries.

use std::path::PathBuf;

/// Error produced anywhere in the parse → analyze → emit → write pipeline.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// The parser met a schema fragment it cannot classify.
    #[error("unrecognized schema construct at {path}: {detail}")]
    SchemaShape { path: String, detail: String },

    /// A `$ref` or base class resolved to a name with no known body.
    #[error("definition `{referenced}` not found (referenced from `{referrer}`)")]
    MissingDefinition { referrer: String, referenced: String },

    /// A legal but unhandled schema combination (e.g. incompatible
    /// heterogeneous tuple items without the super-type escape hatch).
    #[error("unsupported schema shape at {path}: {detail}")]
    UnsupportedShape { path: String, detail: String },

    /// Merging generated code into an existing file is impossible.
    #[error("cannot merge generated code into existing file: {0}")]
    CodeMerge(String),

    /// Generated source failed the sanity checks run before writing.
    #[error("generated {language} code failed validation: {detail}")]
    InvalidOutput { language: String, detail: String },

    /// The destination exists and the output mode forbids overwriting.
    #[error(
        "output file already exists: {0}; use force mode to overwrite or merge mode to preserve custom code"
    )]
    OutputExists(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CodegenError {
    pub fn schema_shape(path: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::SchemaShape {
            path: path.into(),
            detail: detail.into(),
        }
    }

    pub fn unsupported(path: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::UnsupportedShape {
            path: path.into(),
            detail: detail.into(),
        }
    }

    pub fn missing_definition(referrer: impl Into<String>, referenced: impl Into<String>) -> Self {
        Self::MissingDefinition {
            referrer: referrer.into(),
            referenced: referenced.into(),
        }
    }
}
