//! JSON Schema to typed source code generation.
//!
//! `schemagen` compiles a JSON Schema document (with vendor extensions for
//! inheritance, discriminated unions, and naming overrides) into statically
//! typed classes for Python or C#.
//!
//! # Architecture
//!
//! ```text
//! JSON Schema          AST                 IR               Backends
//! ───────────     ─────────────     ──────────────     ─────────────────
//! definitions ──> SchemaNode   ──>  ClassDef      ┌──> Python dataclasses
//! $refs           (ast/)            FieldDef   ───┤    (dataclasses-json)
//! allOf           │                 TypeRef       └──> C# classes
//! oneOf/anyOf     │ NameResolver    (ir.rs)            (Newtonsoft.Json)
//!                 │ RefResolver
//!                 └ Analyzer (analyzer/)
//! ```
//!
//! The pipeline is strictly staged: the parser builds an unresolved AST, the
//! analyzer resolves names, references and inheritance into a fully typed IR,
//! and a backend serializes the IR for one target language. No stage revisits
//! an earlier stage's output, and every stage's state is scoped to one
//! compile.
//!
//! # Example
//!
//! ```
//! use schemagen::{Config, TargetLanguage, generate};
//!
//! let schema = serde_json::json!({
//!     "definitions": {
//!         "Point": {
//!             "type": "object",
//!             "properties": {
//!                 "x": { "type": "integer" },
//!                 "y": { "type": "integer", "default": 0 }
//!             },
//!             "required": ["x"]
//!         }
//!     }
//! });
//!
//! let code = generate(&schema, "Point", TargetLanguage::Python, &Config::default()).unwrap();
//! assert!(code.contains("class Point:"));
//! assert!(code.contains("x: int"));
//! ```

pub mod analyzer;
pub mod ast;
pub mod config;
pub mod error;
pub mod ir;
pub mod output;
pub mod writer;

use std::path::Path;

use serde_json::Value;

pub use analyzer::analyze;
pub use ast::parse;
pub use config::{Config, OutputConfig, OutputMode, TargetLanguage};
pub use error::CodegenError;
pub use output::{Backend, CSharpBackend, PythonBackend, generate_source};
pub use writer::{CodeMerger, write_output};

/// Compile one schema document into source text for one target language.
pub fn generate(
    schema: &Value,
    root_name: &str,
    language: TargetLanguage,
    config: &Config,
) -> Result<String, CodegenError> {
    let ast = ast::parse(schema, root_name)?;
    let ir = analyzer::analyze(&ast, language, config)?;
    output::generate_source(&ir, language, config)
}

/// Compile one schema document and write the result to `path`.
///
/// A failed compile or a failed validation produces no output file; an
/// existing destination is left exactly as it was.
pub fn generate_to_file(
    schema: &Value,
    root_name: &str,
    language: TargetLanguage,
    config: &Config,
    path: &Path,
    merger: Option<&dyn CodeMerger>,
) -> Result<(), CodegenError> {
    let source = generate(schema, root_name, language, config)?;
    writer::write_output(path, &source, language, &config.output, merger)
}
