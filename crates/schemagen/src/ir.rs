//! Intermediate representation.
//!
//! The analyzer resolves the schema AST into this model; backends consume it
//! without ever seeing the source schema. Once built, a [`TypeRef`] contains
//! no unresolved reference: class names are canonical names guaranteed to
//! correspond to an emitted class or a known external class.

use indexmap::IndexMap;
use serde_json::Value;

use crate::analyzer::names::pascal_case;
use crate::config::TargetLanguage;

/// The shape of a resolved type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Schema-level primitive name (`integer`, `string`, ...); backends map
    /// it to the language type.
    Primitive(String),
    /// A generated (or known external) class, by canonical name.
    Class(String),
    Array(Box<TypeRef>),
    Tuple(Vec<TypeRef>),
    Union(Vec<TypeRef>),
    /// An inline enum attached to a field (not a named enum class).
    Enum {
        value_type: String,
        values: Vec<Value>,
    },
    /// A fixed literal value.
    Const {
        value_type: String,
        value: Value,
    },
    Any,
}

/// A fully resolved field type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub kind: TypeKind,
    pub nullable: bool,
    /// Quote the rendered type as a forward reference (Python).
    pub quoted: bool,
    /// Default value carried by the type's schema fragment.
    pub default: Option<Value>,
}

impl TypeRef {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            nullable: false,
            quoted: false,
            default: None,
        }
    }

    pub fn primitive(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Primitive(name.into()))
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Class(name.into()))
    }

    pub fn any() -> Self {
        Self::new(TypeKind::Any)
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, TypeKind::Class(_))
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

impl Default for TypeRef {
    fn default() -> Self {
        Self::any()
    }
}

/// One field of a generated class.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Name used in the generated code.
    pub name: String,
    /// Property name as spelled in the schema.
    pub original_name: String,
    pub ty: TypeRef,
    pub required: bool,
    /// `Some(Value::Null)` means an explicit null default.
    pub default: Option<Value>,
    /// Language-keyword escaped spelling, when `name` collides.
    pub escaped_name: Option<String>,
    /// Fixed value excluded from constructor parameters.
    pub is_const: bool,
    /// Const redeclared by a subclass: the super-call passes the literal.
    pub overrides_base_const: bool,
    /// Interface property name from `x-csharp-properties`.
    pub interface_property: Option<String>,
    /// Trailing comment (e.g. allowed enum values).
    pub comment: Option<String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        let name = name.into();
        Self {
            original_name: name.clone(),
            name,
            ty,
            required: false,
            default: None,
            escaped_name: None,
            is_const: false,
            overrides_base_const: false,
            interface_property: None,
            comment: None,
        }
    }

    /// Whether the emitted field carries a default-value expression, which
    /// forces it after all no-default fields in keyword-unified constructors.
    pub fn takes_default(&self) -> bool {
        self.default.is_some()
            || self.ty.nullable
            || self.ty.has_default()
            || (!self.required && self.ty.is_class())
    }
}

/// A named enum.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    pub name: String,
    pub original_name: String,
    pub value_type: String,
    /// member name → JSON value, in declared-value order.
    pub members: IndexMap<String, Value>,
}

/// A named stand-in for a union of types.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    pub name: String,
    /// Language-level member type names, sorted.
    pub components: Vec<String>,
    /// References a class generated in the same unit, so emission is deferred
    /// until after the classes.
    pub has_forward_refs: bool,
}

/// Payload of a class: a data class with fields, or an enum.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassKind {
    Data { fields: Vec<FieldDef> },
    Enum(EnumDef),
}

/// A generated class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub name: String,
    pub original_name: String,
    pub kind: ClassKind,
    pub base_class: Option<String>,
    /// (subclass canonical name, discriminator value) for polymorphic bases,
    /// in declaration order.
    pub subclasses: Vec<(String, String)>,
    /// Schema property the subclasses discriminate on, when one was found.
    pub discriminator_property: Option<String>,
    /// Base-class fields duplicated for super-call composition.
    pub base_fields: Vec<FieldDef>,
    /// C# interface conformance.
    pub implements: Option<String>,
    /// Runtime-check statements, already rendered for the target language.
    pub validation: Vec<String>,
}

impl ClassDef {
    pub fn data(name: impl Into<String>, original_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            original_name: original_name.into(),
            kind: ClassKind::Data { fields: Vec::new() },
            base_class: None,
            subclasses: Vec::new(),
            discriminator_property: None,
            base_fields: Vec::new(),
            implements: None,
            validation: Vec::new(),
        }
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, ClassKind::Enum(_))
    }

    pub fn fields(&self) -> &[FieldDef] {
        match &self.kind {
            ClassKind::Data { fields } => fields,
            ClassKind::Enum(_) => &[],
        }
    }

    /// Fields eligible as constructor parameters (consts are fixed literals).
    pub fn constructor_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields().iter().filter(|f| !f.is_const)
    }
}

/// An import requirement recorded by the analyzer (external `$ref`s).
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDef {
    pub module: String,
    pub names: Vec<String>,
}

/// The complete IR for one (schema, target language) pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ir {
    pub root_name: String,
    /// Classes in generation order: configured order, then declaration order,
    /// then inline classes alphabetically.
    pub classes: Vec<ClassDef>,
    pub aliases: Vec<TypeAlias>,
    pub imports: Vec<ImportDef>,
}

/// Stable required-first ordering: all fields without a default-value
/// expression precede all fields with one, preserving relative order within
/// each group. Needed by targets whose constructors are keyword-unified.
pub fn required_first(fields: &[FieldDef]) -> Vec<&FieldDef> {
    let (with_default, without): (Vec<&FieldDef>, Vec<&FieldDef>) =
        fields.iter().partition(|f| f.takes_default());
    without.into_iter().chain(with_default).collect()
}

/// Language-level display name of a resolved type, shared by the analyzer's
/// alias registration and the backends' union rendering so both sides always
/// agree on alias identity. Nullability and quoting are layered on top by the
/// backends.
pub fn type_display(language: TargetLanguage, ty: &TypeRef) -> String {
    match &ty.kind {
        TypeKind::Primitive(name) => language.primitive_name(name).to_string(),
        TypeKind::Class(name) => name.clone(),
        TypeKind::Any => match language {
            TargetLanguage::Python => "Any".to_string(),
            TargetLanguage::CSharp => "object".to_string(),
        },
        TypeKind::Array(item) => match language {
            TargetLanguage::Python => format!("list[{}]", type_display(language, item)),
            TargetLanguage::CSharp => format!("List<{}>", type_display(language, item)),
        },
        TypeKind::Tuple(items) => {
            let inner = items
                .iter()
                .map(|t| type_display(language, t))
                .collect::<Vec<_>>()
                .join(", ");
            match language {
                TargetLanguage::Python => format!("tuple[{inner}]"),
                TargetLanguage::CSharp => format!("Tuple<{inner}>"),
            }
        }
        TypeKind::Union(members) => {
            let mut names: Vec<String> = members
                .iter()
                .map(|m| type_display(language, m))
                .collect();
            names.sort();
            match language {
                TargetLanguage::Python => names.join(" | "),
                // C# has no union syntax; the alias records the intent.
                TargetLanguage::CSharp => "object".to_string(),
            }
        }
        TypeKind::Enum { value_type, .. } => language.primitive_name(value_type).to_string(),
        TypeKind::Const { value_type, .. } => language.primitive_name(value_type).to_string(),
    }
}

/// Deterministic alias name for a union: member names sorted, each
/// PascalCased, joined with `Or` (`int` + `str` → `IntOrStr`).
pub fn union_alias_name(components: &[String]) -> String {
    let mut sorted: Vec<&String> = components.iter().collect();
    sorted.sort();
    sorted
        .iter()
        .map(|c| pascal_case(c))
        .collect::<Vec<_>>()
        .join("Or")
}
