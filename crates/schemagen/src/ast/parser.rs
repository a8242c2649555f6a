//! JSON Schema parser.
//!
//! Front end of the pipeline: turns the raw schema document into a
//! [`SchemaAst`] without resolving references or making naming decisions.
//! The parser is a pure function of its input.

use indexmap::IndexMap;
use serde_json::Value;

use super::{
    AllOfNode, ArrayItems, ArrayNode, ConstNode, Constraints, DefinitionNode, EnumNode, ObjectNode,
    PrimitiveNode, PropertyDef, RefNode, SchemaAst, SchemaNode, UnionKind, UnionNode, infer_type,
};
use crate::error::CodegenError;

/// Keys under `definitions`/`$defs` starting with this prefix hold prose, not
/// schema fragments.
const COMMENT_KEY_PREFIX: &str = "_comment";

/// Parse a JSON Schema document into an AST.
///
/// `root_name` names the class generated from top-level `properties`, if any.
pub fn parse(schema: &Value, root_name: &str) -> Result<SchemaAst, CodegenError> {
    let parser = Parser;

    let mut ast = SchemaAst {
        root_name: root_name.to_string(),
        root: None,
        definitions: Vec::new(),
        raw: schema.clone(),
    };

    for (name, def_schema) in compilable_definitions(schema) {
        let path = format!("#/definitions/{name}");
        let body = parser.parse_node(def_schema, &path)?;
        ast.definitions.push(DefinitionNode {
            original_name: name.to_string(),
            body,
            source_path: path,
        });
    }

    if schema.get("properties").is_some() {
        ast.root = Some(parser.parse_node(schema, "#")?);
    }

    Ok(ast)
}

/// Classify the `definitions`/`$defs` entries that actually compile.
///
/// Skips prose entries (string values, `_comment*` keys) and entries that are
/// pure external `$ref` passthroughs; those only exist to re-export a class
/// from another schema file.
fn compilable_definitions(schema: &Value) -> Vec<(&String, &Value)> {
    let defs = schema
        .get("definitions")
        .or_else(|| schema.get("$defs"))
        .and_then(Value::as_object);

    let Some(defs) = defs else {
        return Vec::new();
    };

    defs.iter()
        .filter(|(name, value)| {
            if !value.is_object() || name.starts_with(COMMENT_KEY_PREFIX) {
                return false;
            }
            !is_external_ref(value)
        })
        .collect()
}

fn is_external_ref(value: &Value) -> bool {
    value
        .get("$ref")
        .and_then(Value::as_str)
        .is_some_and(|r| !r.starts_with('#'))
}

struct Parser;

impl Parser {
    /// Dispatch a schema fragment to the matching construct. First match wins;
    /// fragments can legally satisfy several rules.
    fn parse_node(&self, schema: &Value, path: &str) -> Result<SchemaNode, CodegenError> {
        let extensions = extract_extensions(schema);

        if schema.get("$ref").is_some() {
            return self.parse_ref(schema, path, extensions);
        }

        if schema.get("const").is_some() {
            return self.parse_const(schema, path, extensions);
        }

        if schema.get("oneOf").is_some() || schema.get("anyOf").is_some() {
            return self.parse_union(schema, path, extensions);
        }

        if schema.get("allOf").is_some() {
            return self.parse_allof(schema, path, extensions);
        }

        // Explicit member names force a real enum even when `type` is present.
        if schema.get("enum").is_some() && schema.get("x-enum-members").is_some() {
            return self.parse_enum(schema, path, extensions);
        }

        if let Some(type_value) = schema.get("type") {
            return self.parse_typed(schema, type_value, path, extensions);
        }

        if schema.get("enum").is_some() {
            return self.parse_enum(schema, path, extensions);
        }

        if schema.get("properties").is_some() {
            return Ok(SchemaNode::Object(self.parse_object(
                schema, path, extensions,
            )?));
        }

        // Last-resort rule: an empty or unconstrained fragment is an opaque
        // object. Anything that reaches here with unknown structure still maps
        // to `object`; a malformed fragment inside a recognized construct is
        // reported from the construct's own parser instead.
        Ok(SchemaNode::Primitive(PrimitiveNode {
            type_name: "object".to_string(),
            constraints: Constraints::default(),
            enum_values: None,
            default: schema.get("default").cloned(),
            source_path: path.to_string(),
            extensions,
        }))
    }

    fn parse_ref(
        &self,
        schema: &Value,
        path: &str,
        extensions: IndexMap<String, Value>,
    ) -> Result<SchemaNode, CodegenError> {
        let ref_path = schema
            .get("$ref")
            .and_then(Value::as_str)
            .ok_or_else(|| CodegenError::schema_shape(path, "$ref must be a string"))?;

        Ok(SchemaNode::Ref(RefNode {
            ref_path: ref_path.to_string(),
            class_name_override: schema
                .get("x-ref-class-name")
                .and_then(Value::as_str)
                .map(String::from),
            default: schema.get("default").cloned(),
            source_path: path.to_string(),
            extensions,
        }))
    }

    fn parse_const(
        &self,
        schema: &Value,
        path: &str,
        extensions: IndexMap<String, Value>,
    ) -> Result<SchemaNode, CodegenError> {
        let value = schema.get("const").cloned().unwrap_or(Value::Null);
        let inferred_type = infer_type(&value).to_string();

        Ok(SchemaNode::Const(ConstNode {
            value,
            inferred_type,
            source_path: path.to_string(),
            extensions,
        }))
    }

    fn parse_union(
        &self,
        schema: &Value,
        path: &str,
        extensions: IndexMap<String, Value>,
    ) -> Result<SchemaNode, CodegenError> {
        let (kind, key) = if schema.get("oneOf").is_some() {
            (UnionKind::OneOf, "oneOf")
        } else {
            (UnionKind::AnyOf, "anyOf")
        };

        let variants_schema = schema
            .get(key)
            .and_then(Value::as_array)
            .ok_or_else(|| CodegenError::schema_shape(path, format!("{key} must be an array")))?;

        let mut variants = Vec::with_capacity(variants_schema.len());
        for (i, variant) in variants_schema.iter().enumerate() {
            variants.push(self.parse_node(variant, &format!("{path}/{key}/{i}"))?);
        }

        Ok(SchemaNode::Union(UnionNode {
            variants,
            kind,
            default: schema.get("default").cloned(),
            source_path: path.to_string(),
            extensions,
        }))
    }

    fn parse_allof(
        &self,
        schema: &Value,
        path: &str,
        extensions: IndexMap<String, Value>,
    ) -> Result<SchemaNode, CodegenError> {
        let entries = schema
            .get("allOf")
            .and_then(Value::as_array)
            .ok_or_else(|| CodegenError::schema_shape(path, "allOf must be an array"))?;

        let base = match entries.first().and_then(|e| e.get("$ref")) {
            Some(r) => {
                let ref_path = r
                    .as_str()
                    .ok_or_else(|| CodegenError::schema_shape(path, "allOf base $ref must be a string"))?;
                Some(RefNode {
                    ref_path: ref_path.to_string(),
                    class_name_override: None,
                    default: None,
                    source_path: format!("{path}/allOf/0"),
                    extensions: IndexMap::new(),
                })
            }
            None => None,
        };

        let extension = match entries.get(1) {
            Some(ext_schema) => {
                let ext_path = format!("{path}/allOf/1");
                match self.parse_node(ext_schema, &ext_path)? {
                    SchemaNode::Object(obj) => Some(obj),
                    // A non-object extension contributes nothing beyond its
                    // vendor metadata.
                    other => Some(ObjectNode {
                        properties: Vec::new(),
                        required: Vec::new(),
                        implements: None,
                        interface_properties: IndexMap::new(),
                        default: None,
                        source_path: ext_path,
                        extensions: match other {
                            SchemaNode::Primitive(n) => n.extensions,
                            _ => IndexMap::new(),
                        },
                    }),
                }
            }
            None => None,
        };

        Ok(SchemaNode::AllOf(AllOfNode {
            base,
            extension,
            source_path: path.to_string(),
            extensions,
        }))
    }

    fn parse_enum(
        &self,
        schema: &Value,
        path: &str,
        extensions: IndexMap<String, Value>,
    ) -> Result<SchemaNode, CodegenError> {
        let values = schema
            .get("enum")
            .and_then(Value::as_array)
            .ok_or_else(|| CodegenError::schema_shape(path, "enum must be an array"))?
            .clone();

        let inferred_type = values
            .first()
            .map(|v| infer_type(v).to_string())
            .unwrap_or_else(|| "string".to_string());

        let mut member_names = IndexMap::new();
        if let Some(members) = schema.get("x-enum-members").and_then(Value::as_object) {
            for (value, name) in members {
                if let Some(name) = name.as_str() {
                    member_names.insert(value.clone(), name.to_string());
                }
            }
        }

        Ok(SchemaNode::Enum(EnumNode {
            values,
            inferred_type,
            member_names,
            source_path: path.to_string(),
            extensions,
        }))
    }

    fn parse_typed(
        &self,
        schema: &Value,
        type_value: &Value,
        path: &str,
        extensions: IndexMap<String, Value>,
    ) -> Result<SchemaNode, CodegenError> {
        let names_buf: Vec<&str>;
        let type_name = match type_value {
            Value::String(s) => s.as_str(),
            Value::Array(types) => {
                names_buf = types.iter().filter_map(Value::as_str).collect();
                if names_buf.len() != types.len() {
                    return Err(CodegenError::schema_shape(
                        path,
                        "type array entries must be strings",
                    ));
                }
                match names_buf.as_slice() {
                    [] => {
                        return Err(CodegenError::schema_shape(path, "type array is empty"));
                    }
                    // A single-element type array is not a union.
                    [single] => *single,
                    _ => return self.parse_type_array(schema, &names_buf, path, extensions),
                }
            }
            _ => {
                return Err(CodegenError::schema_shape(
                    path,
                    "type must be a string or an array of strings",
                ));
            }
        };

        match type_name {
            "array" => self.parse_array(schema, path, extensions),
            "object" => Ok(SchemaNode::Object(self.parse_object(
                schema, path, extensions,
            )?)),
            other => Ok(SchemaNode::Primitive(self.parse_primitive(
                schema, other, path, extensions,
            ))),
        }
    }

    /// A multi-element `type` array, e.g. `["string", "null"]`. Kept distinct
    /// from an explicit `oneOf`/`anyOf`: the two spellings emit differently.
    fn parse_type_array(
        &self,
        schema: &Value,
        types: &[&str],
        path: &str,
        extensions: IndexMap<String, Value>,
    ) -> Result<SchemaNode, CodegenError> {
        let mut variants = Vec::with_capacity(types.len());
        for t in types {
            let variant = serde_json::json!({ "type": t });
            variants.push(self.parse_node(&variant, &format!("{path}/type/{t}"))?);
        }

        Ok(SchemaNode::Union(UnionNode {
            variants,
            kind: UnionKind::TypeArray,
            default: schema.get("default").cloned(),
            source_path: path.to_string(),
            extensions,
        }))
    }

    fn parse_array(
        &self,
        schema: &Value,
        path: &str,
        extensions: IndexMap<String, Value>,
    ) -> Result<SchemaNode, CodegenError> {
        let items = match schema.get("items") {
            None => None,
            Some(Value::Array(list)) => {
                let mut parsed = Vec::with_capacity(list.len());
                for (i, item) in list.iter().enumerate() {
                    parsed.push(self.parse_node(item, &format!("{path}/items/{i}"))?);
                }
                Some(ArrayItems::Positional(parsed))
            }
            Some(item) if item.is_object() => Some(ArrayItems::Single(Box::new(
                self.parse_node(item, &format!("{path}/items"))?,
            ))),
            Some(_) => {
                return Err(CodegenError::schema_shape(
                    path,
                    "items must be a schema or a list of schemas",
                ));
            }
        };

        Ok(SchemaNode::Array(ArrayNode {
            items,
            min_items: schema.get("minItems").and_then(Value::as_u64),
            max_items: schema.get("maxItems").and_then(Value::as_u64),
            default: schema.get("default").cloned(),
            source_path: path.to_string(),
            extensions,
        }))
    }

    fn parse_object(
        &self,
        schema: &Value,
        path: &str,
        extensions: IndexMap<String, Value>,
    ) -> Result<ObjectNode, CodegenError> {
        let required: Vec<String> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let mut properties = Vec::new();
        if let Some(props) = schema.get("properties").and_then(Value::as_object) {
            for (prop_name, prop_schema) in props {
                let prop_path = format!("{path}/properties/{prop_name}");
                let node = self.parse_node(prop_schema, &prop_path)?;
                properties.push(PropertyDef {
                    name: prop_name.clone(),
                    node,
                    required: required.iter().any(|r| r == prop_name),
                    default: prop_schema.get("default").cloned(),
                    source_path: prop_path,
                });
            }
        }

        let mut interface_properties = IndexMap::new();
        if let Some(props) = schema.get("x-csharp-properties").and_then(Value::as_object) {
            for (field, prop) in props {
                if let Some(prop) = prop.as_str() {
                    interface_properties.insert(field.clone(), prop.to_string());
                }
            }
        }

        Ok(ObjectNode {
            properties,
            required,
            implements: schema
                .get("x-csharp-implements")
                .and_then(Value::as_str)
                .map(String::from),
            interface_properties,
            default: schema.get("default").cloned(),
            source_path: path.to_string(),
            extensions,
        })
    }

    fn parse_primitive(
        &self,
        schema: &Value,
        type_name: &str,
        path: &str,
        extensions: IndexMap<String, Value>,
    ) -> PrimitiveNode {
        let mut constraints = Constraints::default();

        if type_name == "string" {
            constraints.min_length = schema.get("minLength").and_then(Value::as_u64);
            constraints.max_length = schema.get("maxLength").and_then(Value::as_u64);
            constraints.pattern = schema
                .get("pattern")
                .and_then(Value::as_str)
                .map(String::from);
        }

        if type_name == "integer" || type_name == "number" {
            constraints.minimum = schema.get("minimum").and_then(Value::as_f64);
            constraints.maximum = schema.get("maximum").and_then(Value::as_f64);
            constraints.exclusive_minimum = schema.get("exclusiveMinimum").and_then(Value::as_f64);
            constraints.exclusive_maximum = schema.get("exclusiveMaximum").and_then(Value::as_f64);
            constraints.multiple_of = schema.get("multipleOf").and_then(Value::as_f64);
        }

        PrimitiveNode {
            type_name: type_name.to_string(),
            constraints,
            enum_values: schema
                .get("enum")
                .and_then(Value::as_array)
                .map(|v| v.to_vec()),
            default: schema.get("default").cloned(),
            source_path: path.to_string(),
            extensions,
        }
    }
}

fn extract_extensions(schema: &Value) -> IndexMap<String, Value> {
    let mut extensions = IndexMap::new();
    if let Some(obj) = schema.as_object() {
        for (key, value) in obj {
            if key.starts_with("x-") {
                extensions.insert(key.clone(), value.clone());
            }
        }
    }
    extensions
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_definitions_in_declared_order() {
        let schema = json!({
            "definitions": {
                "Zeta": { "type": "object", "properties": {} },
                "Alpha": { "type": "string" }
            }
        });

        let ast = parse(&schema, "Root").unwrap();
        assert_eq!(ast.definitions.len(), 2);
        assert_eq!(ast.definitions[0].original_name, "Zeta");
        assert_eq!(ast.definitions[1].original_name, "Alpha");
    }

    #[test]
    fn skips_comments_and_external_passthroughs() {
        let schema = json!({
            "$defs": {
                "_comment_license": "internal use only",
                "Shared": { "$ref": "/common/types#/$defs/Shared" },
                "Real": { "type": "object", "properties": {} }
            }
        });

        let ast = parse(&schema, "Root").unwrap();
        assert_eq!(ast.definitions.len(), 1);
        assert_eq!(ast.definitions[0].original_name, "Real");
    }

    #[test]
    fn dispatch_prefers_ref_over_type() {
        let schema = json!({
            "definitions": {
                "A": { "$ref": "#/definitions/B", "type": "object" },
                "B": { "type": "object", "properties": {} }
            }
        });

        let ast = parse(&schema, "Root").unwrap();
        assert!(matches!(&ast.definitions[0].body, SchemaNode::Ref(_)));
    }

    #[test]
    fn enum_with_type_stays_a_primitive() {
        let schema = json!({
            "definitions": {
                "Color": { "type": "string", "enum": ["red", "green"] }
            }
        });

        let ast = parse(&schema, "Root").unwrap();
        match &ast.definitions[0].body {
            SchemaNode::Primitive(p) => {
                assert_eq!(p.type_name, "string");
                assert_eq!(p.enum_values.as_ref().unwrap().len(), 2);
            }
            other => panic!("expected primitive, got {other:?}"),
        }
    }

    #[test]
    fn enum_members_extension_forces_real_enum() {
        let schema = json!({
            "definitions": {
                "Color": {
                    "type": "string",
                    "enum": ["red", "green"],
                    "x-enum-members": { "red": "Red", "green": "Green" }
                }
            }
        });

        let ast = parse(&schema, "Root").unwrap();
        match &ast.definitions[0].body {
            SchemaNode::Enum(e) => {
                assert_eq!(e.member_names.get("red").unwrap(), "Red");
            }
            other => panic!("expected enum, got {other:?}"),
        }
    }

    #[test]
    fn type_array_becomes_type_array_union() {
        let schema = json!({
            "definitions": {
                "D": {
                    "type": "object",
                    "properties": { "x": { "type": ["string", "null"] } }
                }
            }
        });

        let ast = parse(&schema, "Root").unwrap();
        let SchemaNode::Object(obj) = &ast.definitions[0].body else {
            panic!("expected object");
        };
        match &obj.properties[0].node {
            SchemaNode::Union(u) => assert_eq!(u.kind, UnionKind::TypeArray),
            other => panic!("expected union, got {other:?}"),
        }
    }

    #[test]
    fn single_element_type_array_is_not_a_union() {
        let schema = json!({
            "definitions": {
                "D": {
                    "type": "object",
                    "properties": { "x": { "type": ["string"] } }
                }
            }
        });

        let ast = parse(&schema, "Root").unwrap();
        let SchemaNode::Object(obj) = &ast.definitions[0].body else {
            panic!("expected object");
        };
        assert!(matches!(&obj.properties[0].node, SchemaNode::Primitive(p) if p.type_name == "string"));
    }

    #[test]
    fn positional_items_and_bounds() {
        let schema = json!({
            "definitions": {
                "D": {
                    "type": "array",
                    "items": [{ "type": "number" }, { "type": "number" }],
                    "minItems": 2,
                    "maxItems": 2
                }
            }
        });

        let ast = parse(&schema, "Root").unwrap();
        let SchemaNode::Array(arr) = &ast.definitions[0].body else {
            panic!("expected array");
        };
        assert!(matches!(&arr.items, Some(ArrayItems::Positional(v)) if v.len() == 2));
        assert_eq!(arr.min_items, Some(2));
        assert_eq!(arr.max_items, Some(2));
    }

    #[test]
    fn malformed_items_is_fatal_with_path() {
        let schema = json!({
            "definitions": {
                "D": { "type": "array", "items": 3 }
            }
        });

        let err = parse(&schema, "Root").unwrap_err();
        match err {
            CodegenError::SchemaShape { path, .. } => {
                assert_eq!(path, "#/definitions/D");
            }
            other => panic!("expected SchemaShape, got {other}"),
        }
    }

    #[test]
    fn root_properties_produce_root_node() {
        let schema = json!({
            "properties": { "x": { "type": "integer" } },
            "required": ["x"]
        });

        let ast = parse(&schema, "Point").unwrap();
        let Some(SchemaNode::Object(root)) = &ast.root else {
            panic!("expected root object");
        };
        assert_eq!(root.properties.len(), 1);
        assert!(root.properties[0].required);
    }

    #[test]
    fn allof_splits_base_and_extension() {
        let schema = json!({
            "definitions": {
                "Derived": {
                    "allOf": [
                        { "$ref": "#/definitions/Base" },
                        { "properties": { "extra": { "type": "string" } } }
                    ]
                }
            }
        });

        let ast = parse(&schema, "Root").unwrap();
        let SchemaNode::AllOf(allof) = &ast.definitions[0].body else {
            panic!("expected allOf");
        };
        assert_eq!(allof.base.as_ref().unwrap().ref_path, "#/definitions/Base");
        assert_eq!(allof.extension.as_ref().unwrap().properties.len(), 1);
    }
}
