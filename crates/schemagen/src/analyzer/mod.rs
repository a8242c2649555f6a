//! The middle end: schema AST → IR.
//!
//! Consumes the parsed AST plus the name and reference resolvers, builds the
//! inheritance graph, decides discriminated-union relationships, and produces
//! a fully resolved IR. All analysis state (subclass graph, alias table,
//! import set) is scoped to one [`analyze`] call; nothing leaks across
//! compiles. The same AST produces different IRs for different target
//! languages because nullability and union-representation rules differ.

pub mod names;
pub mod refs;
pub mod validation;

pub use names::{NameMapping, NameResolver};
pub use refs::{ReferenceResolver, ResolvedRef};
pub use validation::ValidationGenerator;

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use indexmap::IndexMap;
use serde_json::Value;

use crate::ast::{
    AllOfNode, ArrayItems, ArrayNode, DefinitionNode, EnumNode, ObjectNode, PropertyDef, SchemaAst,
    SchemaNode, UnionKind, UnionNode, value_key,
};
use crate::config::{Config, TargetLanguage};
use crate::error::CodegenError;
use crate::ir::{
    ClassDef, ClassKind, EnumDef, FieldDef, ImportDef, Ir, TypeAlias, TypeKind, TypeRef,
    type_display, union_alias_name,
};
use refs::local_definition_key;

/// Analyze a parsed schema into the IR for one target language.
///
/// Deterministic given `(ast, language, config)`: running it twice yields
/// identical IR.
pub fn analyze(
    ast: &SchemaAst,
    language: TargetLanguage,
    config: &Config,
) -> Result<Ir, CodegenError> {
    let names = NameResolver::new(language);
    let mapping = names.resolve_names(ast);
    let resolver = ReferenceResolver::new(ast, mapping.definitions.clone(), &config.schema_base_path);

    let analyzer = Analyzer {
        ast,
        language,
        config,
        names,
        mapping,
        resolver,
        subclasses: IndexMap::new(),
        discriminator_props: HashMap::new(),
        base_class: HashMap::new(),
        aliases: IndexMap::new(),
        python_imports: BTreeSet::new(),
        validator: config.add_validation.then(|| ValidationGenerator::new(language)),
    };

    analyzer.run()
}

struct Analyzer<'a> {
    ast: &'a SchemaAst,
    language: TargetLanguage,
    config: &'a Config,
    names: NameResolver,
    mapping: NameMapping,
    resolver: ReferenceResolver<'a>,

    /// base canonical name → (subclass canonical name, discriminator value).
    subclasses: IndexMap<String, Vec<(String, String)>>,
    /// base canonical name → schema property carrying the discriminator.
    discriminator_props: HashMap<String, String>,
    /// subclass canonical name → base canonical name.
    base_class: HashMap<String, String>,
    /// alias name → alias, registered idempotently.
    aliases: IndexMap<String, TypeAlias>,
    /// (module, name) pairs synthesized from external `$ref`s (Python).
    python_imports: BTreeSet<(String, String)>,
    validator: Option<ValidationGenerator>,
}

impl<'a> Analyzer<'a> {
    fn run(mut self) -> Result<Ir, CodegenError> {
        self.build_inheritance_graph()?;

        let mut classes = Vec::new();
        for def in self.generation_order() {
            if let Some(class_def) = self.analyze_definition(def)? {
                classes.push(class_def);
            }
        }

        let inline = self.collect_inline_classes()?;
        classes.extend(inline);

        if let Some(root_class) = self.analyze_root()? {
            classes.insert(0, root_class);
        }

        let class_names: HashSet<&str> = classes.iter().map(|c| c.name.as_str()).collect();
        let mut simple = Vec::new();
        let mut forward = Vec::new();
        for (_, mut alias) in std::mem::take(&mut self.aliases) {
            alias.has_forward_refs = alias
                .components
                .iter()
                .any(|c| class_names.iter().any(|n| c.contains(n)));
            if alias.has_forward_refs {
                forward.push(alias);
            } else {
                simple.push(alias);
            }
        }
        simple.sort_by(|a, b| a.name.cmp(&b.name));
        forward.sort_by(|a, b| a.name.cmp(&b.name));

        let mut aliases = simple;
        aliases.extend(forward);

        Ok(Ir {
            root_name: self.ast.root_name.clone(),
            classes,
            aliases,
            imports: self.build_imports(),
        })
    }

    // --- inheritance graph ---------------------------------------------------

    fn build_inheritance_graph(&mut self) -> Result<(), CodegenError> {
        for def in &self.ast.definitions {
            match &def.body {
                SchemaNode::AllOf(allof) => self.register_allof_subclass(def, allof),
                // A oneOf/anyOf of local $refs is a discriminated-union base
                // for C#; Python represents it purely as a type alias.
                SchemaNode::Union(union) if self.language == TargetLanguage::CSharp => {
                    self.register_union_subtypes(def, union);
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn register_allof_subclass(&mut self, def: &DefinitionNode, allof: &AllOfNode) {
        let Some(base_ref) = &allof.base else { return };

        let base_name = self.resolver.resolve(base_ref).target_name;
        let class_name = self.canonical_name(&def.original_name);
        let (disc_prop, discriminator) = match allof.extension.as_ref().and_then(discriminator_const)
        {
            Some((prop, value)) => (Some(prop), value),
            None => (None, class_name.clone()),
        };

        if let Some(prop) = disc_prop {
            self.discriminator_props
                .entry(base_name.clone())
                .or_insert(prop);
        }

        let ignored = self.is_ignored(&class_name, &def.original_name);
        let entry = self.subclasses.entry(base_name.clone()).or_default();
        if !ignored {
            entry.push((class_name.clone(), discriminator));
        }
        self.base_class.insert(class_name, base_name);
    }

    fn register_union_subtypes(&mut self, def: &DefinitionNode, union: &UnionNode) {
        let refs: Vec<_> = union
            .variants
            .iter()
            .filter_map(|v| match v {
                SchemaNode::Ref(r) => Some(r),
                _ => None,
            })
            .collect();

        if refs.len() != union.variants.len() || refs.len() < 2 {
            return;
        }

        // Only a union whose every member exists locally can become a base.
        if refs
            .iter()
            .any(|r| self.resolver.get_definition(local_definition_key(&r.ref_path)).is_none())
        {
            return;
        }

        let base_name = self.canonical_name(&def.original_name);
        self.subclasses.entry(base_name.clone()).or_default();

        for r in refs {
            let subtype_name = self.resolver.resolve(r).target_name;
            let subtype_def = self.resolver.get_definition(local_definition_key(&r.ref_path));

            let discriminator = match subtype_def.and_then(|d| match &d.body {
                SchemaNode::Object(obj) => discriminator_const(obj),
                _ => None,
            }) {
                Some((prop, value)) => {
                    self.discriminator_props
                        .entry(base_name.clone())
                        .or_insert(prop);
                    value
                }
                None => subtype_name.clone(),
            };

            if !self.is_ignored(&subtype_name, &subtype_name) {
                self.subclasses
                    .entry(base_name.clone())
                    .or_default()
                    .push((subtype_name.clone(), discriminator));
                self.base_class.insert(subtype_name, base_name.clone());
            }
        }
    }

    // --- generation order ----------------------------------------------------

    /// Configured order first, then remaining definitions in declaration
    /// order. Inline classes are appended later, alphabetically.
    fn generation_order(&self) -> Vec<&'a DefinitionNode> {
        let mut remaining: IndexMap<&str, &DefinitionNode> = self
            .ast
            .definitions
            .iter()
            .map(|d| (d.original_name.as_str(), d))
            .collect();

        let mut ordered = Vec::with_capacity(remaining.len());
        for name in &self.config.order_classes {
            if let Some(def) = remaining.shift_remove(name.as_str()) {
                ordered.push(def);
            }
        }
        ordered.extend(remaining.into_values());
        ordered
    }

    // --- per-definition analysis ---------------------------------------------

    fn analyze_definition(
        &mut self,
        def: &'a DefinitionNode,
    ) -> Result<Option<ClassDef>, CodegenError> {
        let class_name = self.canonical_name(&def.original_name);
        if self.is_ignored(&class_name, &def.original_name) {
            return Ok(None);
        }

        match &def.body {
            SchemaNode::Enum(e) => self.analyze_enum_definition(def, e, class_name).map(Some),
            SchemaNode::Union(u) => self.analyze_union_definition(def, u, class_name),
            SchemaNode::AllOf(a) => self.analyze_allof_definition(def, a, class_name).map(Some),
            SchemaNode::Object(o) => self.analyze_object_definition(def, o, class_name).map(Some),
            SchemaNode::Primitive(p) => {
                // A string definition carrying enum values is a real enum for
                // both targets; other primitive definitions emit nothing.
                if p.type_name == "string" {
                    if let Some(values) = &p.enum_values {
                        let enum_node = EnumNode {
                            values: values.clone(),
                            inferred_type: "string".to_string(),
                            member_names: IndexMap::new(),
                            source_path: p.source_path.clone(),
                            extensions: p.extensions.clone(),
                        };
                        return self
                            .analyze_enum_definition(def, &enum_node, class_name)
                            .map(Some);
                    }
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn analyze_enum_definition(
        &mut self,
        def: &DefinitionNode,
        enum_node: &EnumNode,
        class_name: String,
    ) -> Result<ClassDef, CodegenError> {
        let mut members: IndexMap<String, Value> = IndexMap::new();

        for value in &enum_node.values {
            let key = value_key(value);
            let member_name = enum_node
                .member_names
                .get(&key)
                .cloned()
                .unwrap_or_else(|| self.enum_member_name(&key));

            if members.contains_key(&member_name) {
                return Err(CodegenError::unsupported(
                    &def.source_path,
                    format!("duplicate enum member name `{member_name}`"),
                ));
            }
            members.insert(member_name, value.clone());
        }

        Ok(ClassDef {
            name: class_name.clone(),
            original_name: def.original_name.clone(),
            kind: ClassKind::Enum(EnumDef {
                name: class_name,
                original_name: def.original_name.clone(),
                value_type: enum_node.inferred_type.clone(),
                members,
            }),
            base_class: None,
            subclasses: Vec::new(),
            discriminator_property: None,
            base_fields: Vec::new(),
            implements: None,
            validation: Vec::new(),
        })
    }

    fn analyze_union_definition(
        &mut self,
        def: &DefinitionNode,
        union: &UnionNode,
        class_name: String,
    ) -> Result<Option<ClassDef>, CodegenError> {
        let refs: Vec<_> = union
            .variants
            .iter()
            .filter_map(|v| match v {
                SchemaNode::Ref(r) => Some(r),
                _ => None,
            })
            .collect();

        if refs.len() != union.variants.len() || refs.len() < 2 {
            return Ok(None);
        }

        let mut components: Vec<String> = refs
            .iter()
            .map(|r| self.resolver.resolve(r).target_name)
            .collect();
        components.sort();

        self.aliases.insert(
            class_name.clone(),
            TypeAlias {
                name: class_name.clone(),
                components,
                has_forward_refs: false,
            },
        );

        // C# additionally emits the discriminated base class.
        if self.language == TargetLanguage::CSharp {
            if let Some(subtypes) = self.subclasses.get(&class_name) {
                if !subtypes.is_empty() {
                    let mut class_def = ClassDef::data(&class_name, &def.original_name);
                    class_def.subclasses = subtypes.clone();
                    class_def.discriminator_property =
                        self.discriminator_props.get(&class_name).cloned();
                    return Ok(Some(class_def));
                }
            }
        }

        Ok(None)
    }

    fn analyze_allof_definition(
        &mut self,
        def: &DefinitionNode,
        allof: &AllOfNode,
        class_name: String,
    ) -> Result<ClassDef, CodegenError> {
        let mut class_def = ClassDef::data(&class_name, &def.original_name);

        let mut base_obj: Option<&ObjectNode> = None;
        if let Some(base_ref) = &allof.base {
            let resolved = self.resolver.resolve(base_ref);
            class_def.base_class = Some(resolved.target_name.clone());

            match resolved.target {
                Some(base_def) => {
                    if let SchemaNode::Object(obj) = &base_def.body {
                        base_obj = Some(obj);
                    }
                }
                None if !resolved.is_external => {
                    return Err(CodegenError::missing_definition(
                        class_name,
                        resolved.target_name,
                    ));
                }
                // An external base stays a forward reference by name; its
                // fields cannot be enumerated for the super-call.
                None => {}
            }
        }

        if let Some(extension) = &allof.extension {
            let base_property_names: HashSet<&str> = base_obj
                .map(|b| b.properties.iter().map(|p| p.name.as_str()).collect())
                .unwrap_or_default();

            for prop in &extension.properties {
                if self.config.global_ignore_fields.contains(&prop.name) {
                    continue;
                }
                let redeclares_base = base_property_names.contains(prop.name.as_str());
                if redeclares_base && self.config.ignore_sub_class_overrides {
                    continue;
                }

                let mut field = self.analyze_property(prop, extension, &class_name)?;
                if redeclares_base && matches!(prop.node, SchemaNode::Const(_)) {
                    field.overrides_base_const = true;
                }
                match &mut class_def.kind {
                    ClassKind::Data { fields } => fields.push(field),
                    ClassKind::Enum(_) => unreachable!("allOf class is a data class"),
                }
            }
        }

        if let Some(base_obj) = base_obj {
            class_def.base_fields =
                self.analyze_base_properties(base_obj, allof.extension.as_ref(), &class_name)?;
        }

        class_def.subclasses = self.subclasses.get(&class_name).cloned().unwrap_or_default();
        class_def.discriminator_property = self.discriminator_props.get(&class_name).cloned();

        Ok(class_def)
    }

    /// Base-class fields, duplicated for constructor composition. A base
    /// const is passed by variable name in the super-call unless the subclass
    /// overrides it with a new const, in which case the literal is passed and
    /// the parameter disappears.
    fn analyze_base_properties(
        &mut self,
        base_obj: &ObjectNode,
        extension: Option<&ObjectNode>,
        class_name: &str,
    ) -> Result<Vec<FieldDef>, CodegenError> {
        let mut base_fields = Vec::new();

        for base_prop in &base_obj.properties {
            if self.config.global_ignore_fields.contains(&base_prop.name) {
                continue;
            }

            let override_value = extension.and_then(|ext| {
                ext.properties
                    .iter()
                    .find(|p| p.name == base_prop.name)
                    .and_then(|p| match &p.node {
                        SchemaNode::Const(c) => Some(c.value.clone()),
                        _ => None,
                    })
            });

            let mut field = self.analyze_property(base_prop, base_obj, class_name)?;

            if let Some(value) = override_value {
                field.default = Some(value);
                field.is_const = true;
                field.overrides_base_const = true;
            } else if matches!(base_prop.node, SchemaNode::Const(_)) {
                field.is_const = true;
                field.overrides_base_const = false;
            }

            base_fields.push(field);
        }

        Ok(base_fields)
    }

    fn analyze_object_definition(
        &mut self,
        def: &DefinitionNode,
        obj: &ObjectNode,
        class_name: String,
    ) -> Result<ClassDef, CodegenError> {
        let mut class_def = ClassDef::data(&class_name, &def.original_name);

        class_def.base_class = self.base_class.get(&class_name).cloned();
        class_def.implements = obj.implements.clone();
        class_def.subclasses = self.subclasses.get(&class_name).cloned().unwrap_or_default();
        class_def.discriminator_property = self.discriminator_props.get(&class_name).cloned();

        let fields = self.analyze_properties(obj, &class_name)?;
        class_def.kind = ClassKind::Data { fields };
        class_def.validation = self.validation_statements(obj);

        Ok(class_def)
    }

    fn analyze_root(&mut self) -> Result<Option<ClassDef>, CodegenError> {
        let Some(SchemaNode::Object(root)) = &self.ast.root else {
            return Ok(None);
        };

        let root_name = self.ast.root_name.clone();
        let mut class_def = ClassDef::data(&root_name, &root_name);
        let fields = self.analyze_properties(root, &root_name)?;
        class_def.kind = ClassKind::Data { fields };
        class_def.validation = self.validation_statements(root);

        Ok(Some(class_def))
    }

    fn analyze_properties(
        &mut self,
        obj: &ObjectNode,
        parent_class: &str,
    ) -> Result<Vec<FieldDef>, CodegenError> {
        let mut fields = Vec::new();
        for prop in &obj.properties {
            if self.config.global_ignore_fields.contains(&prop.name) {
                continue;
            }
            fields.push(self.analyze_property(prop, obj, parent_class)?);
        }
        Ok(fields)
    }

    fn analyze_property(
        &mut self,
        prop: &PropertyDef,
        parent_obj: &ObjectNode,
        parent_class: &str,
    ) -> Result<FieldDef, CodegenError> {
        let ty = self.analyze_type(&prop.node, &prop.name, parent_class, prop.required)?;
        let mut field = FieldDef::new(&prop.name, ty);
        field.required = prop.required;
        field.default = prop.default.clone();

        let escaped = self.names.escape_keyword(&prop.name);
        if escaped != prop.name {
            field.escaped_name = Some(escaped);
        }

        field.interface_property = parent_obj.interface_properties.get(&prop.name).cloned();

        // A field defaulted to a real value never needs to be nullable; the
        // default supplies the value. A null default keeps nullability.
        if matches!(field.default, Some(ref v) if !v.is_null()) {
            field.ty.nullable = false;
        }

        match &prop.node {
            SchemaNode::Const(c) => {
                field.is_const = true;
                field.default = Some(c.value.clone());
            }
            SchemaNode::Enum(e) => {
                let values = e
                    .values
                    .iter()
                    .map(|v| format!("\"{}\"", value_key(v)))
                    .collect::<Vec<_>>()
                    .join(", ");
                field.comment = Some(format!(
                    "  {} Allowed values: {values}",
                    self.language.comment_prefix()
                ));
            }
            _ => {}
        }

        Ok(field)
    }

    // --- type resolution -----------------------------------------------------

    /// The single recursive translation from schema node to resolved type.
    fn analyze_type(
        &mut self,
        node: &SchemaNode,
        field_name: &str,
        parent_class: &str,
        is_required: bool,
    ) -> Result<TypeRef, CodegenError> {
        match node {
            SchemaNode::Ref(r) => Ok(self.analyze_ref_type(r, is_required)),
            SchemaNode::Primitive(p) => {
                let mut ty = if p.type_name == "object" {
                    TypeRef::any()
                } else {
                    TypeRef::primitive(&p.type_name)
                };
                ty.default = p.default.clone();
                if ty.default.is_none() && !is_required {
                    ty.nullable = true;
                }
                Ok(ty)
            }
            SchemaNode::Const(c) => {
                let mut ty = TypeRef::new(TypeKind::Const {
                    value_type: c.inferred_type.clone(),
                    value: c.value.clone(),
                });
                ty.default = Some(c.value.clone());
                Ok(ty)
            }
            SchemaNode::Enum(e) => Ok(TypeRef::new(TypeKind::Enum {
                value_type: e.inferred_type.clone(),
                values: e.values.clone(),
            })),
            SchemaNode::Array(arr) => self.analyze_array_type(arr, field_name, parent_class, is_required),
            SchemaNode::Object(obj) => {
                if obj.properties.is_empty() {
                    let mut ty = TypeRef::any();
                    ty.default = obj.default.clone();
                    if ty.default.is_none() && !is_required {
                        ty.nullable = true;
                    }
                    return Ok(ty);
                }
                Ok(self.analyze_inline_object_type(field_name, parent_class, is_required, false))
            }
            SchemaNode::Union(u) => self.analyze_union_type(u, field_name, parent_class, is_required),
            SchemaNode::AllOf(_) => Ok(TypeRef::any()),
        }
    }

    fn analyze_ref_type(&mut self, r: &crate::ast::RefNode, is_required: bool) -> TypeRef {
        let resolved = self.resolver.resolve(r);

        let mut ty = TypeRef::class(&resolved.target_name);
        if self.config.quoted_types_for_python.contains(&resolved.target_name) {
            ty.quoted = true;
        }

        ty.default = r.default.clone();
        if ty.default.is_none() && !is_required {
            // C# marks the reference nullable; Python leaves it to the
            // backend, which constructs a default instance instead.
            if self.language == TargetLanguage::CSharp {
                ty.nullable = true;
            }
        }

        if resolved.is_external && self.language == TargetLanguage::Python {
            self.register_external_import(&resolved);
        }

        ty
    }

    fn analyze_array_type(
        &mut self,
        arr: &ArrayNode,
        field_name: &str,
        parent_class: &str,
        is_required: bool,
    ) -> Result<TypeRef, CodegenError> {
        let mut ty = match &arr.items {
            Some(ArrayItems::Positional(items)) => {
                self.analyze_positional_items(arr, items, field_name, parent_class)?
            }
            Some(ArrayItems::Single(item)) => {
                let element = self.analyze_array_item(item, field_name, parent_class)?;
                TypeRef::new(TypeKind::Array(Box::new(element)))
            }
            None => TypeRef::new(TypeKind::Array(Box::new(TypeRef::any()))),
        };

        ty.default = arr.default.clone();
        if ty.default.is_none() && !is_required {
            ty.nullable = true;
        }

        Ok(ty)
    }

    /// Tuple-vs-list decision for a positional item list.
    fn analyze_positional_items(
        &mut self,
        arr: &ArrayNode,
        items: &[SchemaNode],
        field_name: &str,
        parent_class: &str,
    ) -> Result<TypeRef, CodegenError> {
        let fixed_arity = arr.min_items == arr.max_items;

        if !fixed_arity && !self.config.drop_min_max_items {
            return Err(CodegenError::unsupported(
                &arr.source_path,
                "variable-length tuple is not supported",
            ));
        }

        if fixed_arity && self.config.use_tuples {
            let mut member_types = Vec::with_capacity(items.len());
            for item in items {
                member_types.push(self.analyze_array_item(item, field_name, parent_class)?);
            }
            return Ok(TypeRef::new(TypeKind::Tuple(member_types)));
        }

        if !self.config.use_array_of_super_type_for_variable_length_tuple {
            let mut member_types = Vec::with_capacity(items.len());
            for item in items {
                member_types.push(self.analyze_array_item(item, field_name, parent_class)?);
            }
            if member_types.windows(2).any(|pair| pair[0] != pair[1]) {
                return Err(CodegenError::unsupported(
                    &arr.source_path,
                    "tuple items are not of the same type and the super-type fallback is disabled",
                ));
            }
            let element = member_types.into_iter().next().unwrap_or_default();
            return Ok(TypeRef::new(TypeKind::Array(Box::new(element))));
        }

        // Structural super type: union of the primitive type names the items
        // declare.
        let mut type_names = BTreeSet::new();
        for item in items {
            match item {
                SchemaNode::Primitive(p) => {
                    type_names.insert(p.type_name.clone());
                }
                SchemaNode::Union(u) if u.kind == UnionKind::TypeArray => {
                    for variant in &u.variants {
                        match variant {
                            SchemaNode::Primitive(p) => {
                                type_names.insert(p.type_name.clone());
                            }
                            _ => {
                                return Err(CodegenError::unsupported(
                                    &arr.source_path,
                                    "cannot compute a super type for tuple items",
                                ));
                            }
                        }
                    }
                }
                _ => {
                    return Err(CodegenError::unsupported(
                        &arr.source_path,
                        "cannot compute a super type for tuple items",
                    ));
                }
            }
        }

        let mut members: Vec<TypeRef> = type_names.into_iter().map(TypeRef::primitive).collect();
        let element = if members.len() == 1 {
            members.remove(0)
        } else {
            self.register_union_alias(&members);
            TypeRef::new(TypeKind::Union(members))
        };

        Ok(TypeRef::new(TypeKind::Array(Box::new(element))))
    }

    /// Array items suppress nullability on their element type: a nullable
    /// array element and a nullable array field are orthogonal.
    fn analyze_array_item(
        &mut self,
        item: &SchemaNode,
        field_name: &str,
        parent_class: &str,
    ) -> Result<TypeRef, CodegenError> {
        if let SchemaNode::Union(u) = item {
            let (null_count, non_null): (usize, Vec<&SchemaNode>) = partition_null_variants(u);
            let has_null = null_count > 0;

            if non_null.len() == 1 && has_null {
                let variant = non_null[0];
                let mut member = match variant {
                    SchemaNode::Object(obj) if !obj.properties.is_empty() => {
                        self.analyze_inline_object_type(field_name, parent_class, true, true)
                    }
                    _ => self.analyze_type(variant, field_name, parent_class, true)?,
                };

                // `["T","null"]` strips the null; an explicit oneOf keeps it
                // as a genuine union member.
                if u.kind == UnionKind::TypeArray {
                    member.nullable = false;
                    return Ok(member);
                }

                let members = vec![member, TypeRef::primitive("null")];
                self.register_union_alias(&members);
                return Ok(TypeRef::new(TypeKind::Union(members)));
            }

            if non_null.len() > 1 {
                let mut members = Vec::with_capacity(non_null.len() + 1);
                for variant in non_null {
                    members.push(self.analyze_type(variant, field_name, parent_class, true)?);
                }
                if has_null {
                    members.push(TypeRef::primitive("null"));
                }
                self.register_union_alias(&members);
                return Ok(TypeRef::new(TypeKind::Union(members)));
            }
        }

        if let SchemaNode::Object(obj) = item {
            if !obj.properties.is_empty() {
                let mut ty = self.analyze_inline_object_type(field_name, parent_class, true, true);
                ty.nullable = false;
                return Ok(ty);
            }
        }

        let mut ty = self.analyze_type(item, field_name, parent_class, true)?;
        ty.nullable = false;
        Ok(ty)
    }

    fn analyze_inline_object_type(
        &mut self,
        field_name: &str,
        parent_class: &str,
        is_required: bool,
        is_array_item: bool,
    ) -> TypeRef {
        let name = self.inline_class_name(parent_class, field_name, is_array_item);
        let mut ty = TypeRef::class(name);
        if !is_required {
            ty.nullable = true;
        }
        ty
    }

    fn analyze_union_type(
        &mut self,
        union: &UnionNode,
        field_name: &str,
        parent_class: &str,
        is_required: bool,
    ) -> Result<TypeRef, CodegenError> {
        match union.kind {
            UnionKind::TypeArray => self.analyze_type_array(union, field_name, parent_class, is_required),
            UnionKind::OneOf | UnionKind::AnyOf => {
                self.analyze_explicit_union(union, field_name, parent_class, is_required)
            }
        }
    }

    /// `type: ["T", "null"]` collapses to nullable T; larger type arrays drop
    /// the null entry and union the rest.
    fn analyze_type_array(
        &mut self,
        union: &UnionNode,
        field_name: &str,
        parent_class: &str,
        is_required: bool,
    ) -> Result<TypeRef, CodegenError> {
        let (null_count, non_null) = partition_null_variants(union);
        let nullable = null_count > 0;

        let mut ty = if non_null.len() == 1 {
            let mut ty = self.analyze_type(non_null[0], field_name, parent_class, true)?;
            ty.nullable = nullable;
            ty
        } else {
            let mut members = Vec::with_capacity(non_null.len());
            for variant in non_null {
                members.push(self.analyze_type(variant, field_name, parent_class, true)?);
            }
            self.register_union_alias(&members);
            let mut ty = TypeRef::new(TypeKind::Union(members));
            ty.nullable = nullable;
            ty
        };

        ty.default = union.default.clone();
        if ty.default.is_none() && !is_required {
            ty.nullable = true;
        }

        Ok(ty)
    }

    /// An explicit `oneOf`/`anyOf` becomes a genuine union: a null variant is
    /// a union member, not a nullability flag. This spelling is deliberately
    /// not equivalent to a `["T","null"]` type array.
    fn analyze_explicit_union(
        &mut self,
        union: &UnionNode,
        field_name: &str,
        parent_class: &str,
        is_required: bool,
    ) -> Result<TypeRef, CodegenError> {
        let mut members = Vec::with_capacity(union.variants.len());
        let mut has_null_member = false;

        for variant in &union.variants {
            let member = self.analyze_type(variant, field_name, parent_class, true)?;
            if matches!(&member.kind, TypeKind::Primitive(name) if name == "null") {
                has_null_member = true;
            }
            members.push(member);
        }

        let mut ty = if members.len() == 1 {
            members.remove(0)
        } else {
            self.register_union_alias(&members);
            TypeRef::new(TypeKind::Union(members))
        };

        ty.default = union.default.clone();
        if ty.default.is_none() && !is_required && !has_null_member {
            ty.nullable = true;
        }

        Ok(ty)
    }

    // --- inline class collection ---------------------------------------------

    fn collect_inline_classes(&mut self) -> Result<Vec<ClassDef>, CodegenError> {
        let mut inline = Vec::new();
        let mut processed = HashSet::new();

        if let Some(SchemaNode::Object(root)) = &self.ast.root {
            let root_name = self.ast.root_name.clone();
            self.collect_inline_from_object(root, &root_name, &mut inline, &mut processed)?;
        }

        for def in &self.ast.definitions {
            let class_name = self.canonical_name(&def.original_name);
            match &def.body {
                SchemaNode::Object(obj) => {
                    self.collect_inline_from_object(obj, &class_name, &mut inline, &mut processed)?;
                }
                SchemaNode::AllOf(allof) => {
                    if let Some(extension) = &allof.extension {
                        self.collect_inline_from_object(
                            extension,
                            &class_name,
                            &mut inline,
                            &mut processed,
                        )?;
                    }
                }
                _ => {}
            }
        }

        // Discovery order depends on traversal; resort for output stability.
        inline.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(inline)
    }

    fn collect_inline_from_object(
        &mut self,
        obj: &ObjectNode,
        parent: &str,
        inline: &mut Vec<ClassDef>,
        processed: &mut HashSet<String>,
    ) -> Result<(), CodegenError> {
        for prop in &obj.properties {
            if self.config.global_ignore_fields.contains(&prop.name) {
                continue;
            }

            match &prop.node {
                SchemaNode::Object(nested) if !nested.properties.is_empty() => {
                    let name = self.inline_class_name(parent, &prop.name, false);
                    if self.is_ignored(&name, &name) || processed.contains(&name) {
                        continue;
                    }
                    processed.insert(name.clone());

                    let mut class_def = ClassDef::data(&name, format!("{parent}.{}", prop.name));
                    let fields = self.analyze_properties(nested, &name)?;
                    class_def.kind = ClassKind::Data { fields };
                    inline.push(class_def);

                    self.collect_inline_from_object(nested, &name, inline, processed)?;
                }
                SchemaNode::Array(arr) => {
                    let Some(ArrayItems::Single(item)) = &arr.items else {
                        continue;
                    };
                    let SchemaNode::Object(nested) = item.as_ref() else {
                        continue;
                    };
                    if nested.properties.is_empty() {
                        continue;
                    }

                    let name = self.inline_class_name(parent, &prop.name, true);
                    if self.is_ignored(&name, &name) {
                        continue;
                    }

                    if !self.config.prefix_array_item_classes {
                        // Historical naming skips the parent prefix, so two
                        // array fields can mint the same class name; the last
                        // occurrence wins.
                        inline.retain(|c| c.name != name);
                        processed.remove(&name);
                    } else if processed.contains(&name) {
                        continue;
                    }
                    processed.insert(name.clone());

                    let mut class_def = ClassDef::data(&name, format!("{parent}.{}", prop.name));
                    let fields = self.analyze_properties(nested, &name)?;
                    class_def.kind = ClassKind::Data { fields };
                    inline.push(class_def);

                    self.collect_inline_from_object(nested, &name, inline, processed)?;
                }
                _ => {}
            }
        }

        Ok(())
    }

    // --- shared helpers ------------------------------------------------------

    fn canonical_name(&self, original: &str) -> String {
        self.mapping
            .definitions
            .get(original)
            .cloned()
            .unwrap_or_else(|| original.to_string())
    }

    fn is_ignored(&self, canonical: &str, original: &str) -> bool {
        self.config.ignore_classes.iter().any(|c| c == canonical || c == original)
    }

    fn inline_class_name(&self, parent: &str, field_name: &str, is_array_item: bool) -> String {
        if is_array_item && !self.config.prefix_array_item_classes {
            return self.names.class_name(field_name);
        }

        self.mapping
            .inline_classes
            .get(&(parent.to_string(), field_name.to_string()))
            .cloned()
            .unwrap_or_else(|| format!("{parent}{}", self.names.class_name(field_name)))
    }

    fn enum_member_name(&self, value: &str) -> String {
        match self.language {
            TargetLanguage::Python => {
                let mut name: String = value
                    .chars()
                    .map(|c| {
                        if c.is_ascii_alphanumeric() {
                            c.to_ascii_uppercase()
                        } else {
                            '_'
                        }
                    })
                    .collect();
                if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                    name.insert(0, '_');
                }
                name
            }
            TargetLanguage::CSharp => {
                let mut name = names::pascal_case(value);
                if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                    name.insert(0, '_');
                }
                name
            }
        }
    }

    /// Register the alias for a multi-member union. Idempotent within one
    /// analyze call: the same member set always maps to the same alias,
    /// registered once. Skipped when the backend will inline the union.
    fn register_union_alias(&mut self, members: &[TypeRef]) {
        if self.config.use_inline_unions && self.language == TargetLanguage::Python {
            return;
        }

        let mut components: Vec<String> = members
            .iter()
            .map(|m| type_display(self.language, m))
            .collect();
        components.sort();

        let name = union_alias_name(&components);
        self.aliases.entry(name.clone()).or_insert(TypeAlias {
            name,
            components,
            has_forward_refs: false,
        });
    }

    fn validation_statements(&mut self, obj: &ObjectNode) -> Vec<String> {
        let Some(validator) = &self.validator else {
            return Vec::new();
        };

        let mut statements = Vec::new();
        for prop in &obj.properties {
            if self.config.global_ignore_fields.contains(&prop.name) {
                continue;
            }
            statements.extend(validator.property_statements(prop));
        }
        statements
    }

    fn register_external_import(&mut self, resolved: &ResolvedRef<'_>) {
        let module = if let Some(explicit) = self
            .config
            .external_ref_schema_to_module
            .get(&resolved.external_path)
        {
            explicit.clone()
        } else if !self.config.external_ref_base_module.is_empty() {
            let path = resolved
                .external_path
                .trim_start_matches('/')
                .replace('/', ".")
                .replace("_schema", "_dataclass");
            format!("{}.{path}", self.config.external_ref_base_module)
        } else {
            return;
        };

        self.python_imports.insert((module, resolved.target_name.clone()));
    }

    fn build_imports(&self) -> Vec<ImportDef> {
        let mut grouped: BTreeMap<&String, Vec<String>> = BTreeMap::new();
        for (module, name) in &self.python_imports {
            grouped.entry(module).or_default().push(name.clone());
        }
        grouped
            .into_iter()
            .map(|(module, names)| ImportDef {
                module: module.clone(),
                names,
            })
            .collect()
    }
}

/// Split a union's variants into its null count and non-null members.
fn partition_null_variants(union: &UnionNode) -> (usize, Vec<&SchemaNode>) {
    let mut nulls = 0;
    let mut non_null = Vec::new();
    for variant in &union.variants {
        match variant {
            SchemaNode::Primitive(p) if p.type_name == "null" => nulls += 1,
            other => non_null.push(other),
        }
    }
    (nulls, non_null)
}

/// Discriminator (property name, value) for a subclass: a literal const
/// inside the given object, preferring a property named `type`, else the
/// first const-valued property. Absent when the object declares no const;
/// the caller falls back to the class name.
fn discriminator_const(obj: &ObjectNode) -> Option<(String, String)> {
    let consts: Vec<(&str, String)> = obj
        .properties
        .iter()
        .filter_map(|p| match &p.node {
            SchemaNode::Const(c) => Some((p.name.as_str(), value_key(&c.value))),
            _ => None,
        })
        .collect();

    consts
        .iter()
        .find(|(name, _)| *name == "type")
        .or_else(|| consts.first())
        .map(|(name, value)| (name.to_string(), value.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse;
    use serde_json::json;

    fn analyze_python(schema: &Value) -> Ir {
        let ast = parse(schema, "Root").unwrap();
        analyze(&ast, TargetLanguage::Python, &Config::default()).unwrap()
    }

    fn class<'i>(ir: &'i Ir, name: &str) -> &'i ClassDef {
        ir.classes
            .iter()
            .find(|c| c.name == name)
            .unwrap_or_else(|| panic!("class {name} not in IR"))
    }

    #[test]
    fn analysis_is_deterministic() {
        let schema = json!({
            "definitions": {
                "Point": {
                    "type": "object",
                    "properties": {
                        "x": { "type": "integer" },
                        "y": { "type": "integer", "default": 0 },
                        "tag": { "oneOf": [{ "type": "integer" }, { "type": "string" }] }
                    },
                    "required": ["x"]
                }
            }
        });

        let ast = parse(&schema, "Root").unwrap();
        let config = Config::default();
        let first = analyze(&ast, TargetLanguage::Python, &config).unwrap();
        let second = analyze(&ast, TargetLanguage::Python, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn fields_keep_declared_order() {
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

        let ir = analyze_python(&schema);
        let point = class(&ir, "Point");
        let names: Vec<&str> = point.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert!(point.fields()[0].required);
        assert_eq!(point.fields()[1].default, Some(json!(0)));
    }

    #[test]
    fn union_alias_registration_is_idempotent() {
        let schema = json!({
            "definitions": {
                "Pair": {
                    "type": "object",
                    "properties": {
                        "first": { "oneOf": [{ "type": "integer" }, { "type": "string" }] },
                        "second": { "oneOf": [{ "type": "integer" }, { "type": "string" }] }
                    },
                    "required": ["first", "second"]
                }
            }
        });

        let ir = analyze_python(&schema);
        assert_eq!(ir.aliases.len(), 1);
        assert_eq!(ir.aliases[0].name, "IntOrStr");
        assert_eq!(ir.aliases[0].components, vec!["int", "str"]);
        assert!(!ir.aliases[0].has_forward_refs);
    }

    #[test]
    fn type_array_null_and_oneof_null_are_not_equivalent() {
        let schema = json!({
            "definitions": {
                "D": {
                    "type": "object",
                    "properties": {
                        "spelled_as_type_array": { "type": ["string", "null"] },
                        "spelled_as_oneof": {
                            "oneOf": [{ "type": "string" }, { "type": "null" }]
                        }
                    },
                    "required": ["spelled_as_type_array", "spelled_as_oneof"]
                }
            }
        });

        let ir = analyze_python(&schema);
        let d = class(&ir, "D");

        let type_array = &d.fields()[0].ty;
        assert!(matches!(&type_array.kind, TypeKind::Primitive(n) if n == "string"));
        assert!(type_array.nullable);

        let oneof = &d.fields()[1].ty;
        assert!(matches!(&oneof.kind, TypeKind::Union(members) if members.len() == 2));
        assert!(!oneof.nullable);
        assert_eq!(ir.aliases.len(), 1);
        assert_eq!(ir.aliases[0].name, "NoneOrStr");
    }

    #[test]
    fn subclass_table_in_declaration_order() {
        let schema = json!({
            "definitions": {
                "Shape": {
                    "type": "object",
                    "properties": { "type": { "type": "string" } }
                },
                "Circle": {
                    "allOf": [
                        { "$ref": "#/definitions/Shape" },
                        { "properties": { "type": { "const": "circle" } } }
                    ]
                },
                "Square": {
                    "allOf": [
                        { "$ref": "#/definitions/Shape" },
                        { "properties": { "type": { "const": "square" } } }
                    ]
                }
            }
        });

        let ir = analyze_python(&schema);
        let shape = class(&ir, "Shape");
        assert_eq!(
            shape.subclasses,
            vec![
                ("Circle".to_string(), "circle".to_string()),
                ("Square".to_string(), "square".to_string()),
            ]
        );
    }

    #[test]
    fn overridden_const_passes_literal_in_super_call() {
        let schema = json!({
            "definitions": {
                "Base": {
                    "type": "object",
                    "properties": { "kind": { "const": "base" } }
                },
                "Derived": {
                    "allOf": [
                        { "$ref": "#/definitions/Base" },
                        {
                            "properties": {
                                "kind": { "const": "derived" },
                                "extra": { "type": "string" }
                            }
                        }
                    ]
                }
            }
        });

        let ir = analyze_python(&schema);

        let base = class(&ir, "Base");
        assert_eq!(base.subclasses, vec![("Derived".to_string(), "derived".to_string())]);

        let derived = class(&ir, "Derived");
        assert_eq!(derived.base_class.as_deref(), Some("Base"));

        let kind_base_field = derived
            .base_fields
            .iter()
            .find(|f| f.name == "kind")
            .unwrap();
        assert!(kind_base_field.is_const);
        assert!(kind_base_field.overrides_base_const);
        assert_eq!(kind_base_field.default, Some(json!("derived")));

        let kind_own = derived.fields().iter().find(|f| f.name == "kind").unwrap();
        assert!(kind_own.is_const);
        assert!(kind_own.overrides_base_const);

        // Const fields never become constructor parameters.
        assert!(derived.constructor_fields().all(|f| f.name != "kind"));
    }

    #[test]
    fn inherited_const_passes_variable_in_super_call() {
        let schema = json!({
            "definitions": {
                "Base": {
                    "type": "object",
                    "properties": { "kind": { "const": "base" } }
                },
                "Derived": {
                    "allOf": [
                        { "$ref": "#/definitions/Base" },
                        { "properties": { "extra": { "type": "string" } } }
                    ]
                }
            }
        });

        let ir = analyze_python(&schema);
        let derived = class(&ir, "Derived");
        let kind = derived.base_fields.iter().find(|f| f.name == "kind").unwrap();
        assert!(kind.is_const);
        assert!(!kind.overrides_base_const);
    }

    #[test]
    fn missing_base_definition_is_fatal() {
        let schema = json!({
            "definitions": {
                "Orphan": {
                    "allOf": [
                        { "$ref": "#/definitions/DoesNotExist" },
                        { "properties": { "x": { "type": "integer" } } }
                    ]
                }
            }
        });

        let ast = parse(&schema, "Root").unwrap();
        let err = analyze(&ast, TargetLanguage::Python, &Config::default()).unwrap_err();
        match err {
            CodegenError::MissingDefinition { referrer, referenced } => {
                assert_eq!(referrer, "Orphan");
                assert_eq!(referenced, "DoesNotExist");
            }
            other => panic!("expected MissingDefinition, got {other}"),
        }
    }

    #[test]
    fn inline_classes_sorted_after_definitions() {
        let schema = json!({
            "definitions": {
                "Zed": {
                    "type": "object",
                    "properties": {
                        "beta": { "type": "object", "properties": { "v": { "type": "integer" } } },
                        "alpha": { "type": "object", "properties": { "v": { "type": "integer" } } }
                    }
                },
                "Arc": { "type": "object", "properties": { "n": { "type": "integer" } } }
            }
        });

        let ir = analyze_python(&schema);
        let names: Vec<&str> = ir.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Zed", "Arc", "ZedAlpha", "ZedBeta"]);
    }

    #[test]
    fn array_item_inline_classes_keep_historical_bare_names() {
        let schema = json!({
            "definitions": {
                "A": {
                    "type": "object",
                    "properties": {
                        "cells": {
                            "type": "array",
                            "items": { "type": "object", "properties": { "x": { "type": "integer" } } }
                        }
                    }
                },
                "B": {
                    "type": "object",
                    "properties": {
                        "cells": {
                            "type": "array",
                            "items": { "type": "object", "properties": { "y": { "type": "integer" } } }
                        }
                    }
                }
            }
        });

        let ir = analyze_python(&schema);
        // Both array fields mint `Cells`; the later definition wins.
        let cells: Vec<&ClassDef> = ir.classes.iter().filter(|c| c.name == "Cells").collect();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].fields()[0].name, "y");
    }

    #[test]
    fn array_item_prefix_gate_removes_the_collision() {
        let schema = json!({
            "definitions": {
                "A": {
                    "type": "object",
                    "properties": {
                        "cells": {
                            "type": "array",
                            "items": { "type": "object", "properties": { "x": { "type": "integer" } } }
                        }
                    }
                },
                "B": {
                    "type": "object",
                    "properties": {
                        "cells": {
                            "type": "array",
                            "items": { "type": "object", "properties": { "y": { "type": "integer" } } }
                        }
                    }
                }
            }
        });

        let ast = parse(&schema, "Root").unwrap();
        let config = Config {
            prefix_array_item_classes: true,
            ..Config::default()
        };
        let ir = analyze(&ast, TargetLanguage::Python, &config).unwrap();

        assert!(ir.classes.iter().any(|c| c.name == "ACells"));
        assert!(ir.classes.iter().any(|c| c.name == "BCells"));
        assert!(!ir.classes.iter().any(|c| c.name == "Cells"));
    }

    #[test]
    fn order_classes_prefix_wins_over_declaration_order() {
        let schema = json!({
            "definitions": {
                "First": { "type": "object", "properties": {} },
                "Second": { "type": "object", "properties": {} },
                "Third": { "type": "object", "properties": {} }
            }
        });

        let ast = parse(&schema, "Root").unwrap();
        let config = Config {
            order_classes: vec!["Third".to_string()],
            ..Config::default()
        };
        let ir = analyze(&ast, TargetLanguage::Python, &config).unwrap();
        let names: Vec<&str> = ir.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Third", "First", "Second"]);
    }

    #[test]
    fn union_of_refs_becomes_named_alias() {
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

        let ir = analyze_python(&schema);
        assert!(!ir.classes.iter().any(|c| c.name == "Pet"));
        let alias = ir.aliases.iter().find(|a| a.name == "Pet").unwrap();
        assert_eq!(alias.components, vec!["Cat", "Dog"]);
        assert!(alias.has_forward_refs);
    }

    #[test]
    fn csharp_union_of_refs_also_emits_discriminated_base() {
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

        let ast = parse(&schema, "Root").unwrap();
        let ir = analyze(&ast, TargetLanguage::CSharp, &Config::default()).unwrap();

        let pet = class(&ir, "Pet");
        assert_eq!(
            pet.subclasses,
            vec![
                ("Cat".to_string(), "cat".to_string()),
                ("Dog".to_string(), "dog".to_string()),
            ]
        );
        assert_eq!(class(&ir, "Cat").base_class.as_deref(), Some("Pet"));
    }

    #[test]
    fn optional_class_reference_diverges_by_language() {
        let schema = json!({
            "definitions": {
                "Config": { "type": "object", "properties": {} },
                "App": {
                    "type": "object",
                    "properties": { "config": { "$ref": "#/definitions/Config" } }
                }
            }
        });

        let ast = parse(&schema, "Root").unwrap();

        let python = analyze(&ast, TargetLanguage::Python, &Config::default()).unwrap();
        let field = &class(&python, "App").fields()[0];
        assert!(!field.ty.nullable);

        let csharp = analyze(&ast, TargetLanguage::CSharp, &Config::default()).unwrap();
        let field = &class(&csharp, "App").fields()[0];
        assert!(field.ty.nullable);
    }

    #[test]
    fn fixed_arity_tuple_and_super_type_fallback() {
        let schema = json!({
            "definitions": {
                "D": {
                    "type": "object",
                    "properties": {
                        "pos": {
                            "type": "array",
                            "items": [{ "type": "number" }, { "type": "number" }],
                            "minItems": 2,
                            "maxItems": 2
                        },
                        "mixed": {
                            "type": "array",
                            "items": [{ "type": "integer" }, { "type": "string" }],
                            "minItems": 1,
                            "maxItems": 3
                        }
                    },
                    "required": ["pos", "mixed"]
                }
            }
        });

        let ast = parse(&schema, "Root").unwrap();
        let config = Config {
            drop_min_max_items: true,
            ..Config::default()
        };
        let ir = analyze(&ast, TargetLanguage::Python, &config).unwrap();
        let d = class(&ir, "D");

        assert!(matches!(&d.fields()[0].ty.kind, TypeKind::Tuple(items) if items.len() == 2));
        match &d.fields()[1].ty.kind {
            TypeKind::Array(element) => {
                assert!(matches!(&element.kind, TypeKind::Union(m) if m.len() == 2));
            }
            other => panic!("expected array, got {other:?}"),
        }
        assert!(ir.aliases.iter().any(|a| a.name == "IntOrStr"));
    }

    #[test]
    fn variable_length_tuple_without_escape_hatch_is_fatal() {
        let schema = json!({
            "definitions": {
                "D": {
                    "type": "object",
                    "properties": {
                        "mixed": {
                            "type": "array",
                            "items": [{ "type": "integer" }, { "type": "string" }],
                            "minItems": 1,
                            "maxItems": 3
                        }
                    },
                    "required": ["mixed"]
                }
            }
        });

        let ast = parse(&schema, "Root").unwrap();
        let err = analyze(&ast, TargetLanguage::Python, &Config::default()).unwrap_err();
        assert!(matches!(err, CodegenError::UnsupportedShape { .. }));
    }

    #[test]
    fn array_items_never_keep_element_nullability() {
        let schema = json!({
            "definitions": {
                "D": {
                    "type": "object",
                    "properties": {
                        "xs": {
                            "type": "array",
                            "items": { "type": ["integer", "null"] }
                        }
                    },
                    "required": ["xs"]
                }
            }
        });

        let ir = analyze_python(&schema);
        let xs = &class(&ir, "D").fields()[0].ty;
        match &xs.kind {
            TypeKind::Array(element) => assert!(!element.nullable),
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn enum_members_use_custom_names_then_convention() {
        let schema = json!({
            "definitions": {
                "Status": {
                    "enum": ["in_progress", "done"],
                    "x-enum-members": { "in_progress": "InProgress" }
                }
            }
        });

        let ir = analyze_python(&schema);
        let status = class(&ir, "Status");
        let ClassKind::Enum(e) = &status.kind else {
            panic!("expected enum");
        };
        let members: Vec<&str> = e.members.keys().map(String::as_str).collect();
        assert_eq!(members, vec!["InProgress", "DONE"]);
    }

    #[test]
    fn duplicate_enum_member_names_are_rejected() {
        let schema = json!({
            "definitions": {
                "Bad": { "enum": ["a-b", "a_b"] }
            }
        });

        let ast = parse(&schema, "Root").unwrap();
        let err = analyze(&ast, TargetLanguage::Python, &Config::default()).unwrap_err();
        assert!(matches!(err, CodegenError::UnsupportedShape { .. }));
    }

    #[test]
    fn external_refs_synthesize_python_imports() {
        let schema = json!({
            "definitions": {
                "Order": {
                    "type": "object",
                    "properties": {
                        "price": { "$ref": "/shared/money_schema#/$defs/Money" }
                    },
                    "required": ["price"]
                }
            }
        });

        let ast = parse(&schema, "Root").unwrap();
        let config = Config {
            external_ref_base_module: "myapp.models".to_string(),
            ..Config::default()
        };
        let ir = analyze(&ast, TargetLanguage::Python, &config).unwrap();

        assert_eq!(ir.imports.len(), 1);
        assert_eq!(ir.imports[0].module, "myapp.models.shared.money_dataclass");
        assert_eq!(ir.imports[0].names, vec!["Money"]);
    }

    #[test]
    fn root_class_is_generated_first() {
        let schema = json!({
            "properties": { "version": { "type": "integer" } },
            "required": ["version"],
            "definitions": {
                "Inner": { "type": "object", "properties": {} }
            }
        });

        let ast = parse(&schema, "Manifest").unwrap();
        let ir = analyze(&ast, TargetLanguage::Python, &Config::default()).unwrap();
        assert_eq!(ir.classes[0].name, "Manifest");
        assert_eq!(ir.classes[1].name, "Inner");
    }
}
