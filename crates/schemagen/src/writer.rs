//! Output file writing.
//!
//! The only externally visible side effect of a compile. Writes go through a
//! temporary file in the destination directory, are sanity-checked, and are
//! atomically renamed into place: on any failure path the destination holds
//! either the previous complete content or the new complete content, never a
//! partial write.

use std::io::Write;
use std::path::Path;

use crate::config::{OutputConfig, OutputMode, TargetLanguage};
use crate::error::CodegenError;

/// Language-aware merge collaborator for [`OutputMode::Merge`].
///
/// Implementations must preserve user-added top-level symbols (imports,
/// constants, extra methods, extra enum members) and fail with a merge error
/// rather than guess when a structural conflict is irreconcilable. No merger
/// ships in this crate.
pub trait CodeMerger {
    /// Merge freshly generated code with the existing file contents.
    fn merge(&self, generated: &str, existing: &str) -> Result<String, CodegenError>;
}

/// Write generated source to `path` according to the output config.
pub fn write_output(
    path: &Path,
    content: &str,
    language: TargetLanguage,
    output: &OutputConfig,
    merger: Option<&dyn CodeMerger>,
) -> Result<(), CodegenError> {
    let final_content = match output.mode {
        OutputMode::ErrorIfExists => {
            if path.exists() {
                return Err(CodegenError::OutputExists(path.to_path_buf()));
            }
            content.to_string()
        }
        OutputMode::Force => content.to_string(),
        OutputMode::Merge => {
            if path.exists() {
                let merger = merger.ok_or_else(|| {
                    CodegenError::CodeMerge("merge mode requires a merger collaborator".to_string())
                })?;
                let existing = std::fs::read_to_string(path)?;
                merger.merge(content, &existing)?
            } else {
                content.to_string()
            }
        }
    };

    if output.validate_before_write {
        validate_content(&final_content, language)?;
    }

    if output.atomic_write {
        write_atomic(path, &final_content)?;
    } else {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &final_content)?;
    }

    log::debug!("wrote {}", path.display());
    Ok(())
}

fn write_atomic(path: &Path, content: &str) -> Result<(), CodegenError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    // Same directory keeps the rename on one filesystem, which makes it
    // atomic on POSIX.
    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{}.", file_name(path)))
        .suffix(".tmp")
        .tempfile_in(parent)?;
    temp.write_all(content.as_bytes())?;
    temp.persist(path).map_err(|e| CodegenError::Io(e.error))?;

    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string())
}

/// Sanity-check generated text before it reaches the destination. Cheap
/// structural checks only; the point is to abort the write on obviously
/// broken output, not to fully parse the target language.
fn validate_content(content: &str, language: TargetLanguage) -> Result<(), CodegenError> {
    let fail = |detail: &str| {
        Err(CodegenError::InvalidOutput {
            language: language.to_string(),
            detail: detail.to_string(),
        })
    };

    if content.trim().is_empty() {
        return fail("output is empty");
    }

    match language {
        TargetLanguage::Python => {
            if !balanced(content, '(', ')') || !balanced(content, '[', ']') {
                return fail("unbalanced brackets");
            }
        }
        TargetLanguage::CSharp => {
            if !balanced(content, '{', '}') {
                return fail("unbalanced braces");
            }
            if !content.contains("using ") {
                return fail("missing using statements");
            }
            if !content.contains("class ") && !content.contains("enum ") {
                return fail("no type definitions");
            }
        }
    }

    Ok(())
}

/// Bracket balance ignoring characters inside string literals.
fn balanced(content: &str, open: char, close: char) -> bool {
    let mut depth: i64 = 0;
    let mut in_string = false;
    let mut escape = false;

    for c in content.chars() {
        if escape {
            escape = false;
            continue;
        }
        match c {
            '\\' if in_string => escape = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }

    depth == 0 && !in_string
}
