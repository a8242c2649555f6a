//! Schema AST: the parsed-but-unresolved representation of a JSON Schema.
//!
//! One node per schema construct. No reference resolution and no naming
//! decisions happen at this level; nodes only record what the schema says,
//! plus the source path for diagnostics.

mod parser;

pub use parser::parse;

use indexmap::IndexMap;
use serde_json::Value;

/// A parsed schema fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Primitive(PrimitiveNode),
    Const(ConstNode),
    Enum(EnumNode),
    Ref(RefNode),
    Array(ArrayNode),
    Object(ObjectNode),
    Union(UnionNode),
    AllOf(AllOfNode),
}

impl SchemaNode {
    /// Source path of the fragment this node was parsed from.
    pub fn source_path(&self) -> &str {
        match self {
            SchemaNode::Primitive(n) => &n.source_path,
            SchemaNode::Const(n) => &n.source_path,
            SchemaNode::Enum(n) => &n.source_path,
            SchemaNode::Ref(n) => &n.source_path,
            SchemaNode::Array(n) => &n.source_path,
            SchemaNode::Object(n) => &n.source_path,
            SchemaNode::Union(n) => &n.source_path,
            SchemaNode::AllOf(n) => &n.source_path,
        }
    }

    /// Carried-over `default` value, where the construct admits one.
    pub fn default_value(&self) -> Option<&Value> {
        match self {
            SchemaNode::Primitive(n) => n.default.as_ref(),
            SchemaNode::Ref(n) => n.default.as_ref(),
            SchemaNode::Array(n) => n.default.as_ref(),
            SchemaNode::Object(n) => n.default.as_ref(),
            SchemaNode::Union(n) => n.default.as_ref(),
            _ => None,
        }
    }
}

/// Validation constraints captured from a primitive fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
    pub multiple_of: Option<f64>,
}

/// A primitive type (`string`, `integer`, `number`, `boolean`, `null`) or the
/// fallback opaque object.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveNode {
    pub type_name: String,
    pub constraints: Constraints,
    /// `enum` values attached as documentation when the fragment carried both
    /// `type` and `enum` without explicit member names.
    pub enum_values: Option<Vec<Value>>,
    pub default: Option<Value>,
    pub source_path: String,
    pub extensions: IndexMap<String, Value>,
}

/// A `const` value with its inferred primitive type.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstNode {
    pub value: Value,
    pub inferred_type: String,
    pub source_path: String,
    pub extensions: IndexMap<String, Value>,
}

/// A standalone `enum`, optionally with explicit member names from
/// `x-enum-members`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumNode {
    pub values: Vec<Value>,
    pub inferred_type: String,
    /// value key → member name (see [`value_key`]).
    pub member_names: IndexMap<String, String>,
    pub source_path: String,
    pub extensions: IndexMap<String, Value>,
}

/// An unresolved `$ref`.
#[derive(Debug, Clone, PartialEq)]
pub struct RefNode {
    pub ref_path: String,
    /// Canonical-name override from `x-ref-class-name`.
    pub class_name_override: Option<String>,
    pub default: Option<Value>,
    pub source_path: String,
    pub extensions: IndexMap<String, Value>,
}

/// Item schemas of an array: one schema for all items, or positional schemas.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayItems {
    Single(Box<SchemaNode>),
    Positional(Vec<SchemaNode>),
}

/// An `array` fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayNode {
    pub items: Option<ArrayItems>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub default: Option<Value>,
    pub source_path: String,
    pub extensions: IndexMap<String, Value>,
}

/// One property of an object fragment. Owned exclusively by its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    pub name: String,
    pub node: SchemaNode,
    pub required: bool,
    /// `Some(Value::Null)` is an explicit null default, distinct from absent.
    pub default: Option<Value>,
    pub source_path: String,
}

/// An object fragment with declared properties.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectNode {
    pub properties: Vec<PropertyDef>,
    pub required: Vec<String>,
    /// Interface conformance hint from `x-csharp-implements`.
    pub implements: Option<String>,
    /// field name → interface property name, from `x-csharp-properties`.
    pub interface_properties: IndexMap<String, String>,
    pub default: Option<Value>,
    pub source_path: String,
    pub extensions: IndexMap<String, Value>,
}

/// How a union was spelled in the schema. `["T","null"]` type arrays are NOT
/// equivalent to an explicit `oneOf` containing `T` and `null`; the spelling
/// changes the emitted type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionKind {
    OneOf,
    AnyOf,
    TypeArray,
}

/// A `oneOf`/`anyOf` union, or a multi-element `type` array.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionNode {
    pub variants: Vec<SchemaNode>,
    pub kind: UnionKind,
    pub default: Option<Value>,
    pub source_path: String,
    pub extensions: IndexMap<String, Value>,
}

/// Inheritance via `allOf`: a `$ref` to the base plus an extension object.
#[derive(Debug, Clone, PartialEq)]
pub struct AllOfNode {
    pub base: Option<RefNode>,
    pub extension: Option<ObjectNode>,
    pub source_path: String,
    pub extensions: IndexMap<String, Value>,
}

/// One top-level named schema entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionNode {
    /// Original key under `definitions`/`$defs`.
    pub original_name: String,
    pub body: SchemaNode,
    pub source_path: String,
}

/// Root of the parsed schema. Immutable once built.
#[derive(Debug, Clone)]
pub struct SchemaAst {
    pub root_name: String,
    /// Top-level schema body, when the document has inline properties.
    pub root: Option<SchemaNode>,
    pub definitions: Vec<DefinitionNode>,
    /// Raw input kept for fallback lookups.
    pub raw: Value,
}

/// Stable string key for an enum value, used to index `x-enum-members`.
pub fn value_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Infer the JSON Schema type name of a literal value.
pub fn infer_type(value: &Value) -> &'static str {
    match value {
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Null => "null",
        _ => "object",
    }
}
