//! Code generation configuration.
//!
//! A [`Config`] is deserialized from JSON (typically a sidecar config file
//! passed alongside the schema) and threaded by reference through the
//! analyzer, backends and writer. Defaults match the historical generator so
//! an empty config keeps previously generated output stable.

use std::collections::HashMap;

use serde::Deserialize;

/// Target language for a compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    Python,
    #[serde(rename = "cs")]
    CSharp,
}

impl TargetLanguage {
    /// File extension for generated sources.
    pub fn extension(self) -> &'static str {
        match self {
            TargetLanguage::Python => "py",
            TargetLanguage::CSharp => "cs",
        }
    }

    /// Line comment prefix.
    pub fn comment_prefix(self) -> &'static str {
        match self {
            TargetLanguage::Python => "#",
            TargetLanguage::CSharp => "//",
        }
    }

    /// Map a JSON Schema primitive type name to the language's type name.
    pub fn primitive_name(self, schema_type: &str) -> &'static str {
        match self {
            TargetLanguage::Python => match schema_type {
                "integer" => "int",
                "string" => "str",
                "boolean" => "bool",
                "number" => "float",
                "null" => "None",
                _ => "Any",
            },
            TargetLanguage::CSharp => match schema_type {
                "integer" => "int",
                "string" => "string",
                "boolean" => "bool",
                "number" => "float",
                "null" => "null",
                _ => "object",
            },
        }
    }
}

impl std::fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetLanguage::Python => write!(f, "python"),
            TargetLanguage::CSharp => write!(f, "cs"),
        }
    }
}

/// Behavior when the output file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Fail if the destination exists.
    #[default]
    #[serde(rename = "error")]
    ErrorIfExists,
    /// Overwrite the destination without looking at it.
    Force,
    /// Merge with the existing file, preserving hand-written additions.
    Merge,
}

/// Output file handling.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub mode: OutputMode,
    /// Run language sanity checks on the generated text before writing.
    pub validate_before_write: bool,
    /// Write through a temporary file and atomically rename into place.
    pub atomic_write: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mode: OutputMode::ErrorIfExists,
            validate_before_write: true,
            atomic_write: true,
        }
    }
}

/// Options recognized by the compiler core and backends.
///
/// Key names mirror the historical config files, including the one legacy
/// camelCase key.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Definitions to suppress entirely.
    pub ignore_classes: Vec<String>,

    /// Fields dropped from every class.
    pub global_ignore_fields: Vec<String>,

    /// Explicit emission-order prefix (original definition keys).
    pub order_classes: Vec<String>,

    /// When a subclass redeclares a base field, skip regenerating it.
    #[serde(rename = "ignoreSubClassOverrides")]
    pub ignore_sub_class_overrides: bool,

    /// Allow tuple item lists with unequal minItems/maxItems.
    pub drop_min_max_items: bool,

    /// Emit fixed-arity tuples for positional item lists.
    pub use_tuples: bool,

    /// Variable-length tuples fall back to a list of the items' super type.
    pub use_array_of_super_type_for_variable_length_tuple: bool,

    /// Inline union syntax instead of named type aliases (Python only).
    pub use_inline_unions: bool,

    /// Emit the generation banner comment.
    pub add_generation_comment: bool,

    /// Class names that must be quoted as forward references in Python.
    pub quoted_types_for_python: Vec<String>,

    /// Emit `from __future__ import annotations`.
    pub use_future_annotations: bool,

    /// Attach serialization-exclusion metadata to defaulted fields.
    pub exclude_default_value_from_json: bool,

    /// Emit runtime constraint checks.
    pub add_validation: bool,

    /// Base Python module for imports synthesized from external `$ref`s.
    pub external_ref_base_module: String,

    /// Explicit external schema path → Python module overrides.
    pub external_ref_schema_to_module: HashMap<String, String>,

    /// Base directory for loading external schema files.
    pub schema_base_path: String,

    /// Namespace wrapping all generated C# types.
    pub csharp_namespace: String,

    /// Extra `using` directives for C# output.
    pub csharp_additional_usings: Vec<String>,

    /// Name array-item inline classes with the parent-prefixed mapping
    /// instead of the historical bare PascalCase field name.
    pub prefix_array_item_classes: bool,

    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore_classes: Vec::new(),
            global_ignore_fields: Vec::new(),
            order_classes: Vec::new(),
            ignore_sub_class_overrides: false,
            drop_min_max_items: false,
            use_tuples: true,
            use_array_of_super_type_for_variable_length_tuple: true,
            use_inline_unions: false,
            add_generation_comment: true,
            quoted_types_for_python: Vec::new(),
            use_future_annotations: true,
            exclude_default_value_from_json: false,
            add_validation: false,
            external_ref_base_module: String::new(),
            external_ref_schema_to_module: HashMap::new(),
            schema_base_path: String::new(),
            csharp_namespace: String::new(),
            csharp_additional_usings: Vec::new(),
            prefix_array_item_classes: false,
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Build a config from an already-parsed JSON value.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value.clone())
    }
}
