//! Output backends.
//!
//! Each backend takes the resolved [`Ir`](crate::ir::Ir) and produces source
//! text for its language: first a language-native syntax tree, then an
//! order-preserving serialization into formatted source. Backends make all
//! language-specific decisions (primitive names, union representation,
//! optional-field defaults, enum encoding, polymorphism encoding); the IR
//! never changes shape for them.

pub mod csharp;
pub mod python;

pub use csharp::CSharpBackend;
pub use python::PythonBackend;

use crate::config::{Config, TargetLanguage};
use crate::error::CodegenError;
use crate::ir::Ir;

/// A code generation backend for one target language.
pub trait Backend {
    /// Target language identifier.
    fn language(&self) -> TargetLanguage;

    /// File extension for generated sources (e.g. "py", "cs").
    fn extension(&self) -> &'static str;

    /// Emit source text for the IR.
    fn generate(&self, ir: &Ir) -> Result<String, CodegenError>;
}

/// Emit source for the IR with the built-in backend for `language`.
pub fn generate_source(
    ir: &Ir,
    language: TargetLanguage,
    config: &Config,
) -> Result<String, CodegenError> {
    match language {
        TargetLanguage::Python => PythonBackend::new(config).generate(ir),
        TargetLanguage::CSharp => CSharpBackend::new(config).generate(ir),
    }
}

/// Banner comment placed at the top of generated files.
pub(crate) fn generation_banner(language: TargetLanguage, root_name: &str) -> String {
    format!(
        "{} Generated by schemagen v{} : {root_name}. Do not edit manually.",
        language.comment_prefix(),
        env!("CARGO_PKG_VERSION"),
    )
}
