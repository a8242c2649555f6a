//! Python backend.
//!
//! Emits `dataclasses` + `dataclasses-json` classes. Builds a small Python
//! syntax tree first, then serializes it; the serializer makes no semantic
//! decisions.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::config::{Config, TargetLanguage};
use crate::error::CodegenError;
use crate::ir::{
    ClassDef, ClassKind, FieldDef, Ir, TypeAlias, TypeKind, TypeRef, required_first, type_display,
    union_alias_name,
};
use crate::output::{Backend, generation_banner};

const STDLIB_MODULES: &[&str] = &["abc", "collections", "dataclasses", "enum", "re", "typing"];

pub struct PythonBackend<'a> {
    config: &'a Config,
}

impl<'a> PythonBackend<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }
}

impl Backend for PythonBackend<'_> {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::Python
    }

    fn extension(&self) -> &'static str {
        "py"
    }

    fn generate(&self, ir: &Ir) -> Result<String, CodegenError> {
        Emitter::new(self.config).emit(ir)
    }
}

// --- Python syntax tree ------------------------------------------------------

struct PyModule {
    banner: Option<String>,
    import_lines: Vec<String>,
    simple_aliases: Vec<String>,
    classes: Vec<PyClass>,
    forward_aliases: Vec<String>,
}

struct PyClass {
    decorators: Vec<String>,
    name: String,
    bases: Vec<String>,
    fields: Vec<PyField>,
    methods: Vec<PyMethod>,
}

struct PyField {
    name: String,
    annotation: String,
    default: Option<String>,
    comment: Option<String>,
}

struct PyMethod {
    decorators: Vec<String>,
    signature: String,
    docstring: Option<String>,
    body: Vec<String>,
}

// --- emission ----------------------------------------------------------------

struct Emitter<'a> {
    config: &'a Config,
    imports: BTreeSet<(String, String)>,
    needs_re: bool,
}

impl<'a> Emitter<'a> {
    fn new(config: &'a Config) -> Self {
        Self {
            config,
            imports: BTreeSet::new(),
            needs_re: false,
        }
    }

    fn emit(mut self, ir: &Ir) -> Result<String, CodegenError> {
        self.add_import("dataclasses", "dataclass");
        self.add_import("dataclasses_json", "dataclass_json");
        if self.config.use_future_annotations {
            self.add_import("__future__", "annotations");
        }

        for import in &ir.imports {
            for name in &import.names {
                self.add_import(&import.module, name);
            }
        }

        for class_def in &ir.classes {
            if !class_def.subclasses.is_empty() {
                self.add_import("abc", "ABC");
            }
            if class_def.is_enum() {
                self.add_import("enum", "Enum");
            }
            if class_def
                .validation
                .iter()
                .any(|line| line.contains("re.fullmatch") || line.contains("re.match"))
            {
                self.needs_re = true;
            }
        }

        let classes: Vec<PyClass> = ir.classes.iter().map(|c| self.emit_class(c)).collect();

        let mut simple_aliases = Vec::new();
        let mut forward_aliases = Vec::new();
        for alias in &ir.aliases {
            let rendered = self.render_alias(alias);
            if alias.has_forward_refs {
                forward_aliases.push(rendered);
            } else {
                simple_aliases.push(rendered);
            }
        }

        let module = PyModule {
            banner: self
                .config
                .add_generation_comment
                .then(|| generation_banner(TargetLanguage::Python, &ir.root_name)),
            import_lines: self.render_imports(),
            simple_aliases,
            classes,
            forward_aliases,
        };

        Ok(render_module(&module))
    }

    fn emit_class(&mut self, class_def: &ClassDef) -> PyClass {
        match &class_def.kind {
            ClassKind::Enum(enum_def) => {
                let value_base = match enum_def.value_type.as_str() {
                    "integer" => "int",
                    _ => "str",
                };
                PyClass {
                    decorators: Vec::new(),
                    name: class_def.name.clone(),
                    bases: vec![value_base.to_string(), "Enum".to_string()],
                    fields: enum_def
                        .members
                        .iter()
                        .map(|(name, value)| PyField {
                            name: name.clone(),
                            annotation: String::new(),
                            default: Some(py_value(value)),
                            comment: None,
                        })
                        .collect(),
                    methods: Vec::new(),
                }
            }
            ClassKind::Data { fields } => self.emit_data_class(class_def, fields),
        }
    }

    fn emit_data_class(&mut self, class_def: &ClassDef, fields: &[FieldDef]) -> PyClass {
        let is_polymorphic_base = !class_def.subclasses.is_empty();

        // Polymorphic bases are plain abstract classes; everything else is a
        // keyword-only dataclass.
        let decorators = if is_polymorphic_base {
            Vec::new()
        } else {
            vec![
                "@dataclass_json".to_string(),
                "@dataclass(kw_only=True)".to_string(),
            ]
        };

        let bases = if is_polymorphic_base {
            vec!["ABC".to_string()]
        } else if let Some(base) = &class_def.base_class {
            vec![base.clone()]
        } else {
            Vec::new()
        };

        let py_fields = required_first(fields)
            .into_iter()
            .map(|field| self.emit_field(field))
            .collect();

        let mut methods = Vec::new();
        if is_polymorphic_base {
            methods.push(self.emit_tag_dispatch(class_def));
        }
        if !class_def.validation.is_empty() {
            methods.push(PyMethod {
                decorators: Vec::new(),
                signature: "def __post_init__(self):".to_string(),
                docstring: Some("Validate the object after initialization.".to_string()),
                body: class_def.validation.clone(),
            });
        }

        PyClass {
            decorators,
            name: class_def.name.clone(),
            bases,
            fields: py_fields,
            methods,
        }
    }

    /// Manual tag dispatch on the discriminator for a polymorphic base: the
    /// concrete subclasses all carry `from_dict` from dataclasses-json.
    fn emit_tag_dispatch(&mut self, class_def: &ClassDef) -> PyMethod {
        let table = class_def
            .subclasses
            .iter()
            .map(|(name, discriminator)| format!("\"{discriminator}\": {name}"))
            .collect::<Vec<_>>()
            .join(", ");
        let key = class_def.discriminator_property.as_deref().unwrap_or("type");

        PyMethod {
            decorators: vec!["@classmethod".to_string()],
            signature: "def from_dict(cls, data):".to_string(),
            docstring: None,
            body: vec![
                format!("subtype = {{{table}}}[data[\"{key}\"]]"),
                "return subtype.from_dict(data)".to_string(),
            ],
        }
    }

    fn emit_field(&mut self, field: &FieldDef) -> PyField {
        let annotation = self.translate_type(&field.ty);
        let default = self.field_default(field);

        PyField {
            name: field.name.clone(),
            annotation,
            default,
            comment: field.comment.clone(),
        }
    }

    fn field_default(&mut self, field: &FieldDef) -> Option<String> {
        let explicit = field.default.clone().or_else(|| field.ty.default.clone());

        if let Some(value) = explicit {
            // A null default on a class reference auto-initializes the
            // nested instance instead of storing None.
            if value.is_null() && field.ty.is_class() && !field.ty.nullable {
                return Some(self.default_factory_instance(&field.ty));
            }
            return Some(self.format_default(&value));
        }

        if !field.required && field.ty.is_class() {
            if field.ty.nullable {
                return Some(self.format_default(&Value::Null));
            }
            return Some(self.default_factory_instance(&field.ty));
        }

        if field.ty.nullable {
            return Some(self.format_default(&Value::Null));
        }

        None
    }

    fn default_factory_instance(&mut self, ty: &TypeRef) -> String {
        self.add_import("dataclasses", "field");
        let class_name = match &ty.kind {
            TypeKind::Class(name) => name.clone(),
            _ => type_display(TargetLanguage::Python, ty),
        };
        format!("field(default_factory=lambda: {class_name}())")
    }

    fn format_default(&mut self, value: &Value) -> String {
        match value {
            Value::Array(items) => {
                self.add_import("dataclasses", "field");
                if items.is_empty() {
                    if self.config.exclude_default_value_from_json {
                        self.add_import("dataclasses_json", "config");
                        return "field(default_factory=list, metadata=config(exclude=lambda x: len(x) == 0))".to_string();
                    }
                    return "field(default_factory=list)".to_string();
                }
                let content = py_value(value);
                if self.config.exclude_default_value_from_json {
                    self.add_import("dataclasses_json", "config");
                    return format!(
                        "field(default_factory=lambda: {content}, metadata=config(exclude=lambda x: x == {content}))"
                    );
                }
                format!("field(default_factory=lambda: {content})")
            }
            Value::Object(map) => {
                self.add_import("dataclasses", "field");
                if map.is_empty() {
                    if self.config.exclude_default_value_from_json {
                        self.add_import("dataclasses_json", "config");
                        return "field(default_factory=dict, metadata=config(exclude=lambda x: len(x) == 0))".to_string();
                    }
                    return "field(default_factory=dict)".to_string();
                }
                let content = py_value(value);
                if self.config.exclude_default_value_from_json {
                    self.add_import("dataclasses_json", "config");
                    return format!(
                        "field(default_factory=lambda: {content}, metadata=config(exclude=lambda x: x == {content}))"
                    );
                }
                format!("field(default_factory=lambda: {content})")
            }
            scalar => {
                let literal = py_value(scalar);
                if self.config.exclude_default_value_from_json {
                    self.add_import("dataclasses", "field");
                    self.add_import("dataclasses_json", "config");
                    let condition = match scalar {
                        Value::Null => "x is None".to_string(),
                        Value::Bool(_) => format!("x is {literal}"),
                        _ => format!("x == {literal}"),
                    };
                    return format!(
                        "field(default={literal}, metadata=config(exclude=lambda x: {condition}))"
                    );
                }
                literal
            }
        }
    }

    fn translate_type(&mut self, ty: &TypeRef) -> String {
        let mut rendered = self.translate_inner(ty);

        if ty.nullable && !rendered.ends_with(" | None") {
            rendered = format!("{rendered} | None");
        }
        if ty.quoted {
            rendered = format!("\"{rendered}\"");
        }

        rendered
    }

    fn translate_inner(&mut self, ty: &TypeRef) -> String {
        match &ty.kind {
            TypeKind::Primitive(name) => {
                let mapped = TargetLanguage::Python.primitive_name(name);
                if mapped == "Any" {
                    self.add_import("typing", "Any");
                }
                mapped.to_string()
            }
            TypeKind::Class(name) => name.clone(),
            TypeKind::Any => {
                self.add_import("typing", "Any");
                "Any".to_string()
            }
            TypeKind::Array(item) => format!("list[{}]", self.translate_type(item)),
            TypeKind::Tuple(items) => {
                let inner = items
                    .iter()
                    .map(|t| self.translate_type(t))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("tuple[{inner}]")
            }
            TypeKind::Union(members) => {
                let mut displays: Vec<String> = members
                    .iter()
                    .map(|m| type_display(TargetLanguage::Python, m))
                    .collect();
                displays.sort();

                if self.config.use_inline_unions {
                    let union = displays.join(" | ");
                    if displays
                        .iter()
                        .any(|d| self.config.quoted_types_for_python.contains(d))
                    {
                        return format!("\"{union}\"");
                    }
                    return union;
                }
                union_alias_name(&displays)
            }
            TypeKind::Enum { value_type, values } => {
                if value_type == "string" && !values.is_empty() {
                    self.add_import("typing", "Literal");
                    let rendered = values.iter().map(py_value).collect::<Vec<_>>().join(", ");
                    return format!("Literal[{rendered}]");
                }
                TargetLanguage::Python.primitive_name(value_type).to_string()
            }
            TypeKind::Const { value, .. } => {
                self.add_import("typing", "Literal");
                format!("Literal[{}]", py_value(value))
            }
        }
    }

    fn render_alias(&self, alias: &TypeAlias) -> String {
        let union = alias.components.join(" | ");
        if alias
            .components
            .iter()
            .any(|c| self.config.quoted_types_for_python.contains(c))
        {
            return format!("{} = \"{union}\"", alias.name);
        }
        format!("{} = {union}", alias.name)
    }

    /// Grouped, sorted imports: `__future__` first, then `import re`, then
    /// the standard library, then third-party modules.
    fn render_imports(&self) -> Vec<String> {
        let mut groups: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for (module, name) in &self.imports {
            groups.entry(module).or_default().insert(name);
        }

        let mut lines = Vec::new();

        if let Some(names) = groups.remove("__future__") {
            lines.push(from_import("__future__", &names));
        }
        if self.needs_re {
            lines.push("import re".to_string());
        }

        let (stdlib, third_party): (Vec<_>, Vec<_>) = groups
            .into_iter()
            .partition(|(module, _)| STDLIB_MODULES.contains(module));

        for (module, names) in stdlib {
            lines.push(from_import(module, &names));
        }
        for (module, names) in third_party {
            lines.push(from_import(module, &names));
        }

        lines
    }

    fn add_import(&mut self, module: &str, name: &str) {
        self.imports.insert((module.to_string(), name.to_string()));
    }
}

fn from_import(module: &str, names: &BTreeSet<&str>) -> String {
    let joined = names.iter().copied().collect::<Vec<_>>().join(", ");
    format!("from {module} import {joined}")
}

/// Render a JSON value as a Python literal.
fn py_value(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(b) => if *b { "True" } else { "False" }.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("\"{}\"", s.replace('"', "\\\"")),
        Value::Array(items) => {
            let inner = items.iter().map(py_value).collect::<Vec<_>>().join(", ");
            format!("[{inner}]")
        }
        Value::Object(map) => {
            let inner = map
                .iter()
                .map(|(k, v)| format!("\"{}\": {}", k.replace('"', "\\\""), py_value(v)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{{{inner}}}")
        }
    }
}

// --- serialization -----------------------------------------------------------

fn render_module(module: &PyModule) -> String {
    let mut out = String::new();

    if let Some(banner) = &module.banner {
        out.push_str(banner);
        out.push('\n');
    }

    for line in &module.import_lines {
        out.push_str(line);
        out.push('\n');
    }

    if !module.simple_aliases.is_empty() {
        out.push('\n');
        for alias in &module.simple_aliases {
            out.push_str(alias);
            out.push('\n');
        }
    }

    for class in &module.classes {
        out.push('\n');
        out.push('\n');
        render_class(&mut out, class);
    }

    if !module.forward_aliases.is_empty() {
        out.push('\n');
        out.push('\n');
        for alias in &module.forward_aliases {
            out.push_str(alias);
            out.push('\n');
        }
    }

    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn render_class(out: &mut String, class: &PyClass) {
    for decorator in &class.decorators {
        out.push_str(decorator);
        out.push('\n');
    }

    if class.bases.is_empty() {
        out.push_str(&format!("class {}:\n", class.name));
    } else {
        out.push_str(&format!("class {}({}):\n", class.name, class.bases.join(", ")));
    }

    if class.fields.is_empty() && class.methods.is_empty() {
        out.push_str("    pass\n");
        return;
    }

    for field in &class.fields {
        let mut line = String::from("    ");
        line.push_str(&field.name);
        if !field.annotation.is_empty() {
            line.push_str(": ");
            line.push_str(&field.annotation);
        }
        if let Some(default) = &field.default {
            line.push_str(" = ");
            line.push_str(default);
        }
        if let Some(comment) = &field.comment {
            line.push_str(comment);
        }
        out.push_str(&line);
        out.push('\n');
    }

    for method in &class.methods {
        out.push('\n');
        for decorator in &method.decorators {
            out.push_str("    ");
            out.push_str(decorator);
            out.push('\n');
        }
        out.push_str("    ");
        out.push_str(&method.signature);
        out.push('\n');
        if let Some(docstring) = &method.docstring {
            out.push_str(&format!("        \"\"\"{docstring}\"\"\"\n"));
        }
        if method.body.is_empty() && method.docstring.is_none() {
            out.push_str("        pass\n");
        }
        for line in &method.body {
            out.push_str("        ");
            out.push_str(line);
            out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::ast::parse;
    use serde_json::json;

    fn generate(schema: &Value, config: &Config) -> String {
        let ast = parse(schema, "Root").unwrap();
        let ir = analyze(&ast, TargetLanguage::Python, config).unwrap();
        PythonBackend::new(config).generate(&ir).unwrap()
    }

    #[test]
    fn point_class_with_required_then_defaulted_field() {
        let schema = json!({
            "definitions": {
                "Point": {
                    "type": "object",
                    "properties": {
                        "x": { "type": "integer" },
                        "y": { "type": "integer", "default": 0 }
                    },
                    "required": ["x"]
                }
            }
        });

        let output = generate(&schema, &Config::default());

        assert!(output.starts_with("# Generated by schemagen"));
        assert!(output.contains("from __future__ import annotations"));
        assert!(output.contains("from dataclasses import dataclass"));
        assert!(output.contains("from dataclasses_json import dataclass_json"));
        assert!(output.contains("@dataclass_json\n@dataclass(kw_only=True)\nclass Point:\n    x: int\n    y: int = 0\n"));
    }

    #[test]
    fn required_fields_precede_defaulted_fields_in_output() {
        let schema = json!({
            "definitions": {
                "D": {
                    "type": "object",
                    "properties": {
                        "a": { "type": "string", "default": "x" },
                        "b": { "type": "integer" },
                        "c": { "type": "boolean", "default": true },
                        "d": { "type": "number" }
                    },
                    "required": ["b", "d"]
                }
            }
        });

        let output = generate(&schema, &Config::default());
        let b = output.find("    b: int").unwrap();
        let d = output.find("    d: float").unwrap();
        let a = output.find("    a: str = \"x\"").unwrap();
        let c = output.find("    c: bool = True").unwrap();
        assert!(b < d && d < a && a < c);
    }

    #[test]
    fn nullable_spelling_changes_output_shape() {
        let schema = json!({
            "definitions": {
                "D": {
                    "type": "object",
                    "properties": {
                        "via_type_array": { "type": ["string", "null"] },
                        "via_oneof": { "oneOf": [{ "type": "string" }, { "type": "null" }] }
                    },
                    "required": ["via_type_array", "via_oneof"]
                }
            }
        });

        let output = generate(&schema, &Config::default());
        assert!(output.contains("    via_type_array: str | None = None"));
        assert!(output.contains("    via_oneof: NoneOrStr"));
        assert!(output.contains("NoneOrStr = None | str"));
    }

    #[test]
    fn union_alias_defined_once_and_referenced_twice() {
        let schema = json!({
            "definitions": {
                "D": {
                    "type": "object",
                    "properties": {
                        "first": { "oneOf": [{ "type": "integer" }, { "type": "string" }] },
                        "second": { "oneOf": [{ "type": "integer" }, { "type": "string" }] }
                    },
                    "required": ["first", "second"]
                }
            }
        });

        let output = generate(&schema, &Config::default());
        assert_eq!(output.matches("IntOrStr = int | str").count(), 1);
        assert!(output.contains("    first: IntOrStr"));
        assert!(output.contains("    second: IntOrStr"));
    }

    #[test]
    fn inline_unions_bypass_the_alias() {
        let schema = json!({
            "definitions": {
                "D": {
                    "type": "object",
                    "properties": {
                        "v": { "oneOf": [{ "type": "integer" }, { "type": "string" }] }
                    },
                    "required": ["v"]
                }
            }
        });

        let config = Config {
            use_inline_unions: true,
            ..Config::default()
        };
        let output = generate(&schema, &config);
        assert!(output.contains("    v: int | str"));
        assert!(!output.contains("IntOrStr"));
    }

    #[test]
    fn polymorphic_base_is_abstract_with_tag_dispatch() {
        let schema = json!({
            "definitions": {
                "Shape": {
                    "type": "object",
                    "properties": { "type": { "type": "string" } }
                },
                "Circle": {
                    "allOf": [
                        { "$ref": "#/definitions/Shape" },
                        {
                            "properties": {
                                "type": { "const": "circle" },
                                "radius": { "type": "number" }
                            },
                            "required": ["radius"]
                        }
                    ]
                }
            }
        });

        let output = generate(&schema, &Config::default());

        assert!(output.contains("from abc import ABC"));
        assert!(output.contains("class Shape(ABC):"));
        assert!(!output.contains("@dataclass_json\n@dataclass(kw_only=True)\nclass Shape"));
        assert!(output.contains("subtype = {\"circle\": Circle}[data[\"type\"]]"));
        assert!(output.contains("class Circle(Shape):"));
        assert!(output.contains("    type: Literal[\"circle\"] = \"circle\""));
        assert!(output.contains("    radius: float"));
    }

    #[test]
    fn optional_class_reference_constructs_a_default_instance() {
        let schema = json!({
            "definitions": {
                "Config": { "type": "object", "properties": {} },
                "App": {
                    "type": "object",
                    "properties": { "config": { "$ref": "#/definitions/Config" } }
                }
            }
        });

        let output = generate(&schema, &Config::default());
        assert!(output.contains("    config: Config = field(default_factory=lambda: Config())"));
        assert!(output.contains("from dataclasses import dataclass, field"));
    }

    #[test]
    fn enum_class_members_in_declared_order() {
        let schema = json!({
            "definitions": {
                "Status": {
                    "enum": ["pending", "done"],
                    "x-enum-members": { "pending": "Pending" }
                }
            }
        });

        let output = generate(&schema, &Config::default());
        assert!(output.contains("from enum import Enum"));
        assert!(output.contains("class Status(str, Enum):\n    Pending = \"pending\"\n    DONE = \"done\"\n"));
    }

    #[test]
    fn exclude_default_metadata_wraps_defaults() {
        let schema = json!({
            "definitions": {
                "D": {
                    "type": "object",
                    "properties": {
                        "count": { "type": "integer", "default": 3 },
                        "tags": { "type": "array", "items": { "type": "string" }, "default": [] }
                    }
                }
            }
        });

        let config = Config {
            exclude_default_value_from_json: true,
            ..Config::default()
        };
        let output = generate(&schema, &config);
        assert!(output.contains(
            "count: int = field(default=3, metadata=config(exclude=lambda x: x == 3))"
        ));
        assert!(output.contains(
            "tags: list[str] = field(default_factory=list, metadata=config(exclude=lambda x: len(x) == 0))"
        ));
        assert!(output.contains("from dataclasses_json import config, dataclass_json"));
    }

    #[test]
    fn quoted_forward_references() {
        let schema = json!({
            "definitions": {
                "Node": {
                    "type": "object",
                    "properties": { "next": { "$ref": "#/definitions/Node" } }
                }
            }
        });

        let config = Config {
            quoted_types_for_python: vec!["Node".to_string()],
            ..Config::default()
        };
        let output = generate(&schema, &config);
        assert!(output.contains("    next: \"Node\" = field(default_factory=lambda: Node())"));
    }

    #[test]
    fn validation_emits_post_init() {
        let schema = json!({
            "definitions": {
                "User": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string", "minLength": 1 },
                        "code": { "type": "string", "pattern": "^[a-z]+$" }
                    },
                    "required": ["name", "code"]
                }
            }
        });

        let config = Config {
            add_validation: true,
            ..Config::default()
        };
        let output = generate(&schema, &config);
        assert!(output.contains("import re\n"));
        assert!(output.contains("    def __post_init__(self):"));
        assert!(output.contains("        \"\"\"Validate the object after initialization.\"\"\""));
        assert!(output.contains("        if not isinstance(self.name, str):"));
        assert!(output.contains("        if not re.fullmatch(r\"^[a-z]+$\", self.code):"));
    }

    #[test]
    fn forward_reference_aliases_follow_the_classes() {
        let schema = json!({
            "definitions": {
                "Cat": { "type": "object", "properties": { "type": { "const": "cat" } } },
                "Dog": { "type": "object", "properties": { "type": { "const": "dog" } } },
                "Pet": {
                    "oneOf": [
                        { "$ref": "#/definitions/Cat" },
                        { "$ref": "#/definitions/Dog" }
                    ]
                }
            }
        });

        let output = generate(&schema, &Config::default());
        let class_pos = output.find("class Dog").unwrap();
        let alias_pos = output.find("Pet = Cat | Dog").unwrap();
        assert!(alias_pos > class_pos);
    }

    #[test]
    fn standalone_enum_field_gets_a_comment() {
        let schema = json!({
            "definitions": {
                "D": {
                    "type": "object",
                    "properties": {
                        "mode": { "enum": ["a", "b"] }
                    },
                    "required": ["mode"]
                }
            }
        });

        let output = generate(&schema, &Config::default());
        assert!(output.contains("  # Allowed values: \"a\", \"b\""));
    }
}
