//! `$ref` resolution.
//!
//! Distinguishes in-document references (resolved against a name →
//! definition cache built once per resolver) from external-schema references
//! (resolved by loading the referenced schema file, when a base directory is
//! configured). Both the definition cache and the external-file cache are
//! scoped to one resolver instance; a fresh resolver is constructed per
//! compile.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;

use crate::ast::{DefinitionNode, RefNode, SchemaAst};

/// Outcome of resolving one `$ref`.
#[derive(Debug, Clone)]
pub struct ResolvedRef<'a> {
    /// Canonical name of the referenced class.
    pub target_name: String,
    /// The referenced definition, when it lives in this document.
    pub target: Option<&'a DefinitionNode>,
    pub is_external: bool,
    /// Schema path portion of an external reference.
    pub external_path: String,
    /// Raw definition extracted from the external schema file, when found.
    pub external_definition: Option<Value>,
}

/// Extract the definition key a local `$ref` points at:
/// `#/definitions/Name`, `#/$defs/Name`, or the trailing segment.
pub fn local_definition_key(ref_path: &str) -> &str {
    let parts: Vec<&str> = ref_path.split('/').collect();
    match parts.as_slice() {
        [_, "definitions" | "$defs", name, ..] => name,
        _ => parts.last().copied().unwrap_or(ref_path),
    }
}

/// Resolves `$ref` paths against the current document and external files.
pub struct ReferenceResolver<'a> {
    definitions: HashMap<&'a str, &'a DefinitionNode>,
    name_mapping: IndexMap<String, String>,
    schema_base_path: Option<PathBuf>,
    external_schemas: HashMap<PathBuf, Value>,
    /// Memoized resolutions, keyed by ref path (overrides applied on top).
    resolved: HashMap<String, ResolvedRef<'a>>,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(
        ast: &'a SchemaAst,
        name_mapping: IndexMap<String, String>,
        schema_base_path: &str,
    ) -> Self {
        let definitions = ast
            .definitions
            .iter()
            .map(|def| (def.original_name.as_str(), def))
            .collect();

        Self {
            definitions,
            name_mapping,
            schema_base_path: if schema_base_path.is_empty() {
                None
            } else {
                Some(PathBuf::from(schema_base_path))
            },
            external_schemas: HashMap::new(),
            resolved: HashMap::new(),
        }
    }

    /// Resolve a `$ref` node. Absence of a local target is not fatal here;
    /// the analyzer fails later if it needs the body and finds none.
    pub fn resolve(&mut self, ref_node: &RefNode) -> ResolvedRef<'a> {
        let mut resolved = match self.resolved.get(&ref_node.ref_path) {
            Some(hit) => hit.clone(),
            None => {
                let computed = if ref_node.ref_path.starts_with('#') {
                    self.resolve_local(&ref_node.ref_path)
                } else {
                    self.resolve_external(&ref_node.ref_path)
                };
                self.resolved
                    .insert(ref_node.ref_path.clone(), computed.clone());
                computed
            }
        };

        if let Some(override_name) = &ref_node.class_name_override {
            resolved.target_name = override_name.clone();
        }

        resolved
    }

    fn resolve_local(&self, ref_path: &str) -> ResolvedRef<'a> {
        let def_name = local_definition_key(ref_path);

        let target_name = self
            .name_mapping
            .get(def_name)
            .cloned()
            .unwrap_or_else(|| def_name.to_string());

        ResolvedRef {
            target_name,
            target: self.definitions.get(def_name).copied(),
            is_external: false,
            external_path: String::new(),
            external_definition: None,
        }
    }

    fn resolve_external(&mut self, ref_path: &str) -> ResolvedRef<'a> {
        let (path_part, class_name) = if let Some((p, c)) = ref_path.split_once("#/$defs/") {
            (p, c.to_string())
        } else if let Some((p, c)) = ref_path.split_once("#/definitions/") {
            (p, c.to_string())
        } else {
            // A bare schema reference without a fragment.
            let name = ref_path
                .rsplit('/')
                .next()
                .unwrap_or(ref_path)
                .trim_end_matches(".json");
            (ref_path, name.to_string())
        };

        let external_definition = self.load_external_definition(path_part, &class_name);

        ResolvedRef {
            target_name: class_name.clone(),
            target: None,
            is_external: true,
            external_path: path_part.to_string(),
            external_definition,
        }
    }

    /// Look up a definition by its original key.
    pub fn get_definition(&self, name: &str) -> Option<&'a DefinitionNode> {
        self.definitions.get(name).copied()
    }

    /// Load the named raw definition out of an external schema file, trying
    /// the conventional filename variants. A miss is non-fatal: the caller
    /// still emits a forward reference by name.
    fn load_external_definition(&mut self, schema_path: &str, class_name: &str) -> Option<Value> {
        let base = self.schema_base_path.clone()?;
        let relative = schema_path.trim_start_matches('/');

        let candidates = [
            base.join(format!("{relative}.jinja.json")),
            base.join(format!("{relative}.json")),
            base.join(format!("{relative}_schema.jinja.json")),
            base.join(format!("{relative}_schema.json")),
        ];

        for candidate in candidates {
            if let Some(schema) = self.load_schema_file(&candidate) {
                let defs = schema.get("$defs").or_else(|| schema.get("definitions"))?;
                return defs.get(class_name).cloned();
            }
        }

        log::debug!("external schema not found under any variant: {schema_path}");
        None
    }

    fn load_schema_file(&mut self, path: &Path) -> Option<Value> {
        if let Some(cached) = self.external_schemas.get(path) {
            return Some(cached.clone());
        }

        let content = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str::<Value>(&content) {
            Ok(schema) => {
                self.external_schemas.insert(path.to_path_buf(), schema.clone());
                Some(schema)
            }
            Err(err) => {
                log::warn!("ignoring unparseable external schema {}: {err}", path.display());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse;
    use crate::config::TargetLanguage;
    use crate::analyzer::names::NameResolver;
    use serde_json::json;
    use std::io::Write;

    fn ref_node(path: &str) -> RefNode {
        RefNode {
            ref_path: path.to_string(),
            class_name_override: None,
            default: None,
            source_path: String::new(),
            extensions: IndexMap::new(),
        }
    }

    #[test]
    fn local_ref_resolves_to_canonical_name_and_body() {
        let schema = json!({
            "definitions": {
                "my_class": { "type": "object", "properties": {} }
            }
        });
        let ast = parse(&schema, "Root").unwrap();
        let mapping = NameResolver::new(TargetLanguage::Python).resolve_names(&ast);

        let mut resolver = ReferenceResolver::new(&ast, mapping.definitions.clone(), "");
        let resolved = resolver.resolve(&ref_node("#/definitions/my_class"));

        assert_eq!(resolved.target_name, "MyClass");
        assert!(!resolved.is_external);
        assert!(resolved.target.is_some());
    }

    #[test]
    fn missing_local_target_is_not_fatal_at_resolution_time() {
        let schema = json!({ "definitions": {} });
        let ast = parse(&schema, "Root").unwrap();
        let mapping = NameResolver::new(TargetLanguage::Python).resolve_names(&ast);

        let mut resolver = ReferenceResolver::new(&ast, mapping.definitions.clone(), "");
        let resolved = resolver.resolve(&ref_node("#/definitions/DoesNotExist"));

        assert_eq!(resolved.target_name, "DoesNotExist");
        assert!(resolved.target.is_none());
    }

    #[test]
    fn class_name_override_wins() {
        let schema = json!({ "definitions": {} });
        let ast = parse(&schema, "Root").unwrap();
        let mapping = NameResolver::new(TargetLanguage::Python).resolve_names(&ast);

        let mut resolver = ReferenceResolver::new(&ast, mapping.definitions.clone(), "");
        let mut node = ref_node("#/definitions/Thing");
        node.class_name_override = Some("RenamedThing".to_string());

        assert_eq!(resolver.resolve(&node).target_name, "RenamedThing");
    }

    #[test]
    fn external_ref_without_base_path_is_a_forward_reference() {
        let schema = json!({ "definitions": {} });
        let ast = parse(&schema, "Root").unwrap();
        let mapping = NameResolver::new(TargetLanguage::Python).resolve_names(&ast);

        let mut resolver = ReferenceResolver::new(&ast, mapping.definitions.clone(), "");
        let resolved = resolver.resolve(&ref_node("/shared/common#/$defs/Money"));

        assert!(resolved.is_external);
        assert_eq!(resolved.target_name, "Money");
        assert_eq!(resolved.external_path, "/shared/common");
        assert!(resolved.external_definition.is_none());
    }

    #[test]
    fn external_ref_loads_definition_from_file_variant() {
        let dir = tempfile::TempDir::new().unwrap();
        let schema_dir = dir.path().join("shared");
        std::fs::create_dir_all(&schema_dir).unwrap();

        let mut file = std::fs::File::create(schema_dir.join("common_schema.json")).unwrap();
        write!(
            file,
            "{}",
            json!({ "$defs": { "Money": { "type": "object", "properties": {} } } })
        )
        .unwrap();

        let schema = json!({ "definitions": {} });
        let ast = parse(&schema, "Root").unwrap();
        let mapping = NameResolver::new(TargetLanguage::Python).resolve_names(&ast);

        let base = dir.path().to_string_lossy().to_string();
        let mut resolver = ReferenceResolver::new(&ast, mapping.definitions.clone(), &base);
        let resolved = resolver.resolve(&ref_node("/shared/common#/$defs/Money"));

        assert!(resolved.is_external);
        assert!(resolved.external_definition.is_some());
    }
}
