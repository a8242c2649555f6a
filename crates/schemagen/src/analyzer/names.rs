//! Canonical naming.
//!
//! Converts definition keys to PascalCase class names and mints deterministic
//! names for anonymous inline objects by prefixing with the enclosing class's
//! canonical name. Collisions between inline objects are impossible unless
//! two objects share the same (enclosing name, field name) pair; structurally
//! identical objects under different field names deliberately get two
//! distinct classes.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::ast::{ArrayItems, ObjectNode, PropertyDef, SchemaAst, SchemaNode};
use crate::config::TargetLanguage;

/// C# reserved keywords that cannot be used as bare identifiers.
const CS_RESERVED_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked", "class",
    "const", "continue", "decimal", "default", "delegate", "do", "double", "else", "enum", "event",
    "explicit", "extern", "false", "finally", "fixed", "float", "for", "foreach", "goto", "if",
    "implicit", "in", "int", "interface", "internal", "is", "lock", "long", "namespace", "new",
    "null", "object", "operator", "out", "override", "params", "private", "protected", "public",
    "readonly", "ref", "return", "sbyte", "sealed", "short", "sizeof", "stackalloc", "static",
    "string", "struct", "switch", "this", "throw", "true", "try", "typeof", "uint", "ulong",
    "unchecked", "unsafe", "ushort", "using", "virtual", "void", "volatile", "while",
];

fn is_cs_keyword(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    CS_RESERVED_KEYWORDS.contains(&lower.as_str())
}

/// Split an identifier into words on case and separator boundaries: lowercase
/// runs, a capital with its trailing lowercase run, and digit runs. Separator
/// characters (underscores, hyphens, anything else) only break runs.
fn split_words(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut words = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let start = i;
        if c.is_ascii_lowercase() {
            while i < chars.len() && chars[i].is_ascii_lowercase() {
                i += 1;
            }
        } else if c.is_ascii_uppercase() {
            i += 1;
            while i < chars.len() && chars[i].is_ascii_lowercase() {
                i += 1;
            }
        } else if c.is_ascii_digit() {
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
        } else {
            i += 1;
            continue;
        }
        words.push(chars[start..i].iter().collect());
    }

    words
}

/// PascalCase an identifier: split into words, capitalize each, concatenate.
pub fn pascal_case(text: &str) -> String {
    split_words(text)
        .into_iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Result of name resolution.
#[derive(Debug, Clone, Default)]
pub struct NameMapping {
    /// Original definition key → canonical class name.
    pub definitions: IndexMap<String, String>,
    /// (enclosing canonical name, field name) → inline class name.
    pub inline_classes: HashMap<(String, String), String>,
}

/// Assigns canonical names for one target language.
pub struct NameResolver {
    language: TargetLanguage,
}

impl NameResolver {
    pub fn new(language: TargetLanguage) -> Self {
        Self { language }
    }

    /// Canonical class name for an identifier, disambiguating target-language
    /// reserved words with a suffix.
    pub fn class_name(&self, text: &str) -> String {
        let name = pascal_case(text);
        if self.language == TargetLanguage::CSharp && is_cs_keyword(&name) {
            return name + "Type";
        }
        name
    }

    /// Escape a field name that collides with a reserved word.
    pub fn escape_keyword(&self, name: &str) -> String {
        if self.language == TargetLanguage::CSharp && is_cs_keyword(name) {
            return format!("@{name}");
        }
        name.to_string()
    }

    /// Resolve every name in the AST. Pure and deterministic.
    pub fn resolve_names(&self, ast: &SchemaAst) -> NameMapping {
        let mut mapping = NameMapping::default();

        for def in &ast.definitions {
            mapping
                .definitions
                .insert(def.original_name.clone(), self.class_name(&def.original_name));
        }

        for def in &ast.definitions {
            let parent = mapping
                .definitions
                .get(&def.original_name)
                .cloned()
                .unwrap_or_else(|| def.original_name.clone());
            self.collect_inline(&def.body, &parent, &mut mapping);
        }

        if let Some(root) = &ast.root {
            let root_name = ast.root_name.clone();
            self.collect_inline(root, &root_name, &mut mapping);
        }

        mapping
    }

    fn collect_inline(&self, node: &SchemaNode, parent: &str, mapping: &mut NameMapping) {
        match node {
            SchemaNode::Object(obj) => {
                for prop in &obj.properties {
                    self.collect_inline_from_property(prop, parent, mapping);
                }
            }
            SchemaNode::AllOf(allof) => {
                if let Some(extension) = &allof.extension {
                    for prop in &extension.properties {
                        self.collect_inline_from_property(prop, parent, mapping);
                    }
                }
            }
            _ => {}
        }
    }

    fn collect_inline_from_property(
        &self,
        prop: &PropertyDef,
        parent: &str,
        mapping: &mut NameMapping,
    ) {
        match &prop.node {
            SchemaNode::Object(obj) if !obj.properties.is_empty() => {
                let inline = self.mint_inline_name(parent, &prop.name);
                mapping
                    .inline_classes
                    .insert((parent.to_string(), prop.name.clone()), inline.clone());
                self.collect_inline_object(obj, &inline, mapping);
            }
            SchemaNode::Array(arr) => {
                if let Some(ArrayItems::Single(item)) = &arr.items {
                    if let SchemaNode::Object(obj) = item.as_ref() {
                        if !obj.properties.is_empty() {
                            let inline = self.mint_inline_name(parent, &prop.name);
                            mapping
                                .inline_classes
                                .insert((parent.to_string(), prop.name.clone()), inline.clone());
                            self.collect_inline_object(obj, &inline, mapping);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn collect_inline_object(&self, obj: &ObjectNode, parent: &str, mapping: &mut NameMapping) {
        for prop in &obj.properties {
            self.collect_inline_from_property(prop, parent, mapping);
        }
    }

    fn mint_inline_name(&self, parent: &str, field_name: &str) -> String {
        format!("{parent}{}", self.class_name(field_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse;
    use serde_json::json;

    #[test]
    fn pascal_case_boundaries() {
        assert_eq!(pascal_case("snake_case_name"), "SnakeCaseName");
        assert_eq!(pascal_case("kebab-case-name"), "KebabCaseName");
        assert_eq!(pascal_case("camelCaseName"), "CamelCaseName");
        assert_eq!(pascal_case("point2d"), "Point2D");
        assert_eq!(pascal_case("HTTPServer"), "HTTPServer");
        assert_eq!(pascal_case(""), "");
    }

    #[test]
    fn cs_keywords_get_a_suffix() {
        let resolver = NameResolver::new(TargetLanguage::CSharp);
        assert_eq!(resolver.class_name("event"), "EventType");
        assert_eq!(resolver.class_name("widget"), "Widget");

        let python = NameResolver::new(TargetLanguage::Python);
        assert_eq!(python.class_name("event"), "Event");
    }

    #[test]
    fn cs_field_names_escape_with_at() {
        let resolver = NameResolver::new(TargetLanguage::CSharp);
        assert_eq!(resolver.escape_keyword("params"), "@params");
        assert_eq!(resolver.escape_keyword("count"), "count");
    }

    #[test]
    fn inline_objects_are_parent_prefixed_recursively() {
        let schema = json!({
            "definitions": {
                "game_config": {
                    "type": "object",
                    "properties": {
                        "display": {
                            "type": "object",
                            "properties": {
                                "resolution": {
                                    "type": "object",
                                    "properties": { "width": { "type": "integer" } }
                                }
                            }
                        }
                    }
                }
            }
        });

        let ast = parse(&schema, "Root").unwrap();
        let mapping = NameResolver::new(TargetLanguage::Python).resolve_names(&ast);

        assert_eq!(mapping.definitions.get("game_config").unwrap(), "GameConfig");
        assert_eq!(
            mapping.inline_classes[&("GameConfig".to_string(), "display".to_string())],
            "GameConfigDisplay"
        );
        assert_eq!(
            mapping.inline_classes[&("GameConfigDisplay".to_string(), "resolution".to_string())],
            "GameConfigDisplayResolution"
        );
    }

    #[test]
    fn array_item_objects_register_the_mapping_too() {
        let schema = json!({
            "definitions": {
                "Board": {
                    "type": "object",
                    "properties": {
                        "cells": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": { "x": { "type": "integer" } }
                            }
                        }
                    }
                }
            }
        });

        let ast = parse(&schema, "Root").unwrap();
        let mapping = NameResolver::new(TargetLanguage::Python).resolve_names(&ast);
        assert_eq!(
            mapping.inline_classes[&("Board".to_string(), "cells".to_string())],
            "BoardCells"
        );
    }

    #[test]
    fn identical_shapes_under_different_fields_get_distinct_names() {
        let schema = json!({
            "definitions": {
                "Doc": {
                    "type": "object",
                    "properties": {
                        "header": { "type": "object", "properties": { "text": { "type": "string" } } },
                        "footer": { "type": "object", "properties": { "text": { "type": "string" } } }
                    }
                }
            }
        });

        let ast = parse(&schema, "Root").unwrap();
        let mapping = NameResolver::new(TargetLanguage::Python).resolve_names(&ast);
        assert_eq!(
            mapping.inline_classes[&("Doc".to_string(), "header".to_string())],
            "DocHeader"
        );
        assert_eq!(
            mapping.inline_classes[&("Doc".to_string(), "footer".to_string())],
            "DocFooter"
        );
    }
}
