//! C# backend.
//!
//! Emits Newtonsoft.Json-annotated classes: `[JsonProperty]` properties, a
//! composing constructor with a `base(...)` call, JsonSubTypes attributes for
//! polymorphic deserialization, and string-backed enums with explicit
//! bidirectional converter tables.

mod nodes;
mod serializer;

pub use nodes::*;

use std::collections::{BTreeSet, HashMap};

use serde_json::Value;

use crate::analyzer::names::pascal_case;
use crate::config::{Config, TargetLanguage};
use crate::error::CodegenError;
use crate::ir::{ClassDef, ClassKind, FieldDef, Ir, TypeKind, TypeRef, type_display};
use crate::output::{Backend, generation_banner};

/// Fallback discriminator property when the analyzer found no const tag.
const DISCRIMINATOR_PROPERTY: &str = "type";

pub struct CSharpBackend<'a> {
    config: &'a Config,
}

impl<'a> CSharpBackend<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }
}

impl Backend for CSharpBackend<'_> {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::CSharp
    }

    fn extension(&self) -> &'static str {
        "cs"
    }

    fn generate(&self, ir: &Ir) -> Result<String, CodegenError> {
        Emitter::new(self.config, ir).emit(ir)
    }
}

struct Emitter<'a> {
    config: &'a Config,
    usings: BTreeSet<String>,
    /// enum class name → (JSON value → member name), for enum-typed defaults.
    enum_members: HashMap<String, HashMap<String, String>>,
}

impl<'a> Emitter<'a> {
    fn new(config: &'a Config, ir: &Ir) -> Self {
        let mut enum_members: HashMap<String, HashMap<String, String>> = HashMap::new();
        for class_def in &ir.classes {
            if let ClassKind::Enum(enum_def) = &class_def.kind {
                let by_value = enum_def
                    .members
                    .iter()
                    .map(|(member, value)| (json_value_key(value), member.clone()))
                    .collect();
                enum_members.insert(class_def.name.clone(), by_value);
            }
        }

        Self {
            config,
            usings: BTreeSet::from(["System".to_string(), "Newtonsoft.Json".to_string()]),
            enum_members,
        }
    }

    fn emit(mut self, ir: &Ir) -> Result<String, CodegenError> {
        let mut file = CsFile {
            banner: self
                .config
                .add_generation_comment
                .then(|| generation_banner(TargetLanguage::CSharp, &ir.root_name)),
            namespace: (!self.config.csharp_namespace.is_empty())
                .then(|| self.config.csharp_namespace.clone()),
            ..CsFile::default()
        };

        for alias in &ir.aliases {
            file.alias_comments
                .push(format!("// {} = object (union type)", alias.name));
        }

        for class_def in &ir.classes {
            match &class_def.kind {
                ClassKind::Enum(_) => {
                    let (cs_enum, converter) = self.emit_enum(class_def);
                    file.enums.push(cs_enum);
                    file.converters.push(converter);
                }
                ClassKind::Data { fields } => {
                    file.classes.push(self.emit_class(class_def, fields));
                }
            }
        }

        let mut usings: Vec<String> = self.usings.iter().cloned().collect();
        usings.extend(self.config.csharp_additional_usings.iter().cloned());
        file.usings = usings;

        Ok(serializer::serialize(&file))
    }

    fn emit_enum(&mut self, class_def: &ClassDef) -> (CsEnum, CsEnumConverter) {
        let ClassKind::Enum(enum_def) = &class_def.kind else {
            unreachable!("caller matched the enum kind");
        };

        self.usings.insert("System.Collections.Generic".to_string());

        let members: Vec<(String, String)> = enum_def
            .members
            .iter()
            .map(|(member, value)| (pascal_case(member), json_value_key(value)))
            .collect();

        let cs_enum = CsEnum {
            name: class_def.name.clone(),
            members: members.iter().map(|(m, _)| m.clone()).collect(),
        };
        let converter = CsEnumConverter {
            enum_name: class_def.name.clone(),
            members,
        };

        (cs_enum, converter)
    }

    fn emit_class(&mut self, class_def: &ClassDef, fields: &[FieldDef]) -> CsClass {
        let mut class = CsClass::new(&class_def.name);
        class.attributes.push(CsAttribute::new("Serializable"));

        if !class_def.subclasses.is_empty() {
            self.usings.insert("JsonSubTypes".to_string());
            let key = class_def
                .discriminator_property
                .as_deref()
                .unwrap_or(DISCRIMINATOR_PROPERTY);
            class.attributes.push(CsAttribute::with_args(
                "JsonConverter",
                vec!["typeof(JsonSubtypes)".to_string(), format!("\"{key}\"")],
            ));
            for (subclass, discriminator) in &class_def.subclasses {
                class.attributes.push(CsAttribute::with_args(
                    "JsonSubtypes.KnownSubType",
                    vec![format!("typeof({subclass})"), format!("\"{discriminator}\"")],
                ));
            }
        }

        class.base_class = class_def.base_class.clone();
        if let Some(interface) = &class_def.implements {
            class.interfaces.push(interface.clone());
        }

        for field in fields {
            if field.is_const {
                // The discriminator const must serialize, so it becomes a
                // get-only property instead of a const field.
                if field.name == DISCRIMINATOR_PROPERTY || field.overrides_base_const {
                    class.properties.push(self.emit_discriminator_property(field));
                } else {
                    class.fields.push(self.emit_const_field(field));
                }
            } else {
                class.properties.push(self.emit_property(field));
            }
        }

        class.constructors.push(self.emit_constructor(class_def));

        self.track_validation_usings(&class_def.validation);

        class
    }

    fn emit_const_field(&mut self, field: &FieldDef) -> CsField {
        CsField {
            name: field.escaped_name.clone().unwrap_or_else(|| field.name.clone()),
            type_name: self.translate_type(&field.ty),
            is_const: true,
            default_value: field
                .default
                .as_ref()
                .map(|v| self.format_default(v, &field.ty)),
            attributes: vec![CsAttribute::with_args(
                "JsonProperty",
                vec![format!("\"{}\"", field.original_name)],
            )],
            comment: field.comment.clone(),
        }
    }

    fn emit_discriminator_property(&mut self, field: &FieldDef) -> CsProperty {
        CsProperty {
            name: self.property_name(field),
            type_name: self.translate_type(&field.ty),
            has_setter: false,
            default_value: field
                .default
                .as_ref()
                .map(|v| self.format_default(v, &field.ty)),
            attributes: vec![CsAttribute::with_args(
                "JsonProperty",
                vec![format!("\"{}\"", field.original_name)],
            )],
            comment: field.comment.clone(),
        }
    }

    fn emit_property(&mut self, field: &FieldDef) -> CsProperty {
        CsProperty {
            name: self.property_name(field),
            type_name: self.translate_type(&field.ty),
            has_setter: true,
            default_value: self.property_default(field),
            attributes: vec![CsAttribute::with_args(
                "JsonProperty",
                vec![format!("\"{}\"", field.original_name)],
            )],
            comment: field.comment.clone(),
        }
    }

    fn property_default(&mut self, field: &FieldDef) -> Option<String> {
        field
            .default
            .clone()
            .or_else(|| field.ty.default.clone())
            .map(|value| self.format_default(&value, &field.ty))
    }

    fn property_name(&self, field: &FieldDef) -> String {
        if let Some(interface_property) = &field.interface_property {
            return interface_property.clone();
        }
        pascal_case(field.escaped_name.as_deref().unwrap_or(&field.name))
    }

    fn emit_constructor(&mut self, class_def: &ClassDef) -> CsConstructor {
        let mut parameters = Vec::new();
        let mut base_call_args = Vec::new();
        let mut body = Vec::new();

        for field in &class_def.base_fields {
            if field.is_const {
                if field.overrides_base_const {
                    // The subclass pinned a new literal for this base const.
                    let literal = field
                        .default
                        .as_ref()
                        .map(|v| self.format_default(v, &field.ty))
                        .unwrap_or_else(|| "null".to_string());
                    base_call_args.push(literal);
                } else {
                    base_call_args.push(field.name.clone());
                }
            } else {
                let name = field.escaped_name.clone().unwrap_or_else(|| field.name.clone());
                parameters.push(CsParameter {
                    name: name.clone(),
                    type_name: self.translate_type(&field.ty),
                });
                base_call_args.push(name);
            }
        }

        for field in class_def.constructor_fields() {
            let name = field.escaped_name.clone().unwrap_or_else(|| field.name.clone());
            let type_name = self.translate_type(&field.ty);
            parameters.push(CsParameter {
                name: name.clone(),
                type_name,
            });
            body.push(format!("this.{} = {name};", self.property_name(field)));
        }

        if !class_def.validation.is_empty() {
            body.push(String::new());
            body.push("// Validate fields".to_string());
            body.extend(class_def.validation.iter().cloned());
        }

        CsConstructor {
            class_name: class_def.name.clone(),
            parameters,
            base_call_args: if class_def.base_class.is_some() {
                base_call_args
            } else {
                Vec::new()
            },
            body,
        }
    }

    fn track_validation_usings(&mut self, validation: &[String]) {
        for line in validation {
            if line.contains("Regex.") {
                self.usings.insert("System.Text.RegularExpressions".to_string());
            }
            if line.contains(".Contains(") {
                self.usings.insert("System.Linq".to_string());
            }
        }
    }

    fn translate_type(&mut self, ty: &TypeRef) -> String {
        let rendered = self.translate_inner(ty);
        if ty.nullable && !rendered.ends_with('?') {
            return format!("{rendered}?");
        }
        rendered
    }

    fn translate_inner(&mut self, ty: &TypeRef) -> String {
        match &ty.kind {
            TypeKind::Primitive(name) => TargetLanguage::CSharp.primitive_name(name).to_string(),
            TypeKind::Class(name) => name.clone(),
            TypeKind::Any => "object".to_string(),
            TypeKind::Array(item) => {
                self.usings.insert("System.Collections.Generic".to_string());
                format!("List<{}>", self.translate_type(item))
            }
            TypeKind::Tuple(items) => {
                self.usings.insert("System.Collections.Generic".to_string());
                let inner = items
                    .iter()
                    .map(|t| self.translate_type(t))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Tuple<{inner}>")
            }
            TypeKind::Union(members) => {
                let displays: Vec<String> = members
                    .iter()
                    .map(|m| type_display(TargetLanguage::CSharp, m))
                    .collect();
                let non_null: Vec<&String> =
                    displays.iter().filter(|d| d.as_str() != "null").collect();

                if non_null.len() == 1 {
                    let base = non_null[0].clone();
                    if non_null.len() != displays.len() && !base.ends_with('?') {
                        return format!("{base}?");
                    }
                    return base;
                }
                "object".to_string()
            }
            TypeKind::Enum { value_type, .. } => {
                TargetLanguage::CSharp.primitive_name(value_type).to_string()
            }
            TypeKind::Const { value_type, .. } => {
                TargetLanguage::CSharp.primitive_name(value_type).to_string()
            }
        }
    }

    fn format_default(&mut self, value: &Value, ty: &TypeRef) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            Value::String(s) => {
                // A string default whose type is a generated enum resolves to
                // the enum member instead of a bare literal.
                if let TypeKind::Class(class_name) = &ty.kind {
                    if let Some(member) = self
                        .enum_members
                        .get(class_name)
                        .and_then(|members| members.get(s))
                    {
                        return format!("{class_name}.{member}");
                    }
                }
                format!("\"{}\"", s.replace('"', "\\\""))
            }
            Value::Number(n) => {
                let is_float_type = matches!(&ty.kind, TypeKind::Primitive(name) if name == "number");
                if n.is_f64() || is_float_type {
                    format!("{n}f")
                } else {
                    n.to_string()
                }
            }
            Value::Array(items) => {
                let type_name = self.translate_type(ty);
                if items.is_empty() {
                    return format!("new {type_name}()");
                }
                let rendered = items
                    .iter()
                    .map(|item| self.format_default(item, &TypeRef::any()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("new {type_name} {{{rendered}}}")
            }
            Value::Object(map) => {
                let type_name = self.translate_type(ty);
                if map.is_empty() {
                    return format!("new {type_name}()");
                }
                let rendered = map
                    .iter()
                    .map(|(k, v)| {
                        format!("[\"{k}\"] = {}", self.format_default(v, &TypeRef::any()))
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("new {type_name} {{{rendered}}}")
            }
        }
    }
}

/// String key a JSON enum value serializes under.
fn json_value_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
