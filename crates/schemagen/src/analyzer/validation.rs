//! Runtime constraint-check generation.
//!
//! Translates schema constraints into a flat, ordered list of
//! conditional-and-raise statements for the target language. Rules compose
//! independently and are concatenated in a fixed order per field: type
//! existence/type check, non-emptiness, pattern, length bounds, numeric
//! bounds, array bounds, item-type check, enum membership, const equality.
//! A rule for an optional field only fires when the field is non-null.

use serde_json::Value;

use crate::ast::{ArrayItems, PropertyDef, SchemaNode};
use crate::config::TargetLanguage;
use crate::analyzer::names::pascal_case;

/// One constraint, translated independently of all others.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationRule {
    TypeCheck { field: String, expected: &'static str },
    ReferenceType { field: String, class_name: String },
    NonEmptyString { field: String },
    Pattern { field: String, pattern: String, required: bool },
    MinLength { field: String, limit: u64 },
    MaxLength { field: String, limit: u64 },
    Minimum { field: String, limit: f64, required: bool },
    ExclusiveMinimum { field: String, limit: f64, required: bool },
    Maximum { field: String, limit: f64, required: bool },
    ExclusiveMaximum { field: String, limit: f64, required: bool },
    MultipleOf { field: String, factor: f64, required: bool },
    MinItems { field: String, limit: u64, required: bool },
    MaxItems { field: String, limit: u64, required: bool },
    ArrayItemType { field: String, class_name: String },
    EnumMembership { field: String, values: Vec<Value> },
    ConstEquality { field: String, value: Value },
}

/// Generates validation statements for one target language.
pub struct ValidationGenerator {
    language: TargetLanguage,
}

impl ValidationGenerator {
    pub fn new(language: TargetLanguage) -> Self {
        Self { language }
    }

    /// Statements for one property, in the fixed rule order.
    pub fn property_statements(&self, prop: &PropertyDef) -> Vec<String> {
        self.rules_for_property(prop)
            .iter()
            .flat_map(|rule| self.emit(rule))
            .collect()
    }

    /// Whether any statement for this property needs Python's `re` module.
    pub fn needs_regex(&self, prop: &PropertyDef) -> bool {
        self.language == TargetLanguage::Python
            && self
                .rules_for_property(prop)
                .iter()
                .any(|r| matches!(r, ValidationRule::Pattern { .. }))
    }

    fn rules_for_property(&self, prop: &PropertyDef) -> Vec<ValidationRule> {
        let field = prop.name.clone();
        let required = prop.required;
        let mut rules = Vec::new();

        match &prop.node {
            SchemaNode::Ref(r) => {
                let class_name = pascal_case(
                    r.ref_path.rsplit('/').next().unwrap_or(&r.ref_path),
                );
                if self.language == TargetLanguage::Python || required {
                    rules.push(ValidationRule::ReferenceType { field, class_name });
                }
                return rules;
            }
            SchemaNode::Array(arr) => {
                if required {
                    rules.push(ValidationRule::TypeCheck {
                        field: field.clone(),
                        expected: "list",
                    });
                }
                if let Some(limit) = arr.min_items {
                    rules.push(ValidationRule::MinItems {
                        field: field.clone(),
                        limit,
                        required,
                    });
                }
                if let Some(limit) = arr.max_items {
                    rules.push(ValidationRule::MaxItems {
                        field: field.clone(),
                        limit,
                        required,
                    });
                }
                if let Some(ArrayItems::Single(item)) = &arr.items {
                    if let SchemaNode::Ref(r) = item.as_ref() {
                        let class_name = pascal_case(
                            r.ref_path.rsplit('/').next().unwrap_or(&r.ref_path),
                        );
                        rules.push(ValidationRule::ArrayItemType { field, class_name });
                    }
                }
            }
            SchemaNode::Primitive(p) => match p.type_name.as_str() {
                "string" => {
                    if required {
                        rules.push(ValidationRule::TypeCheck {
                            field: field.clone(),
                            expected: "str",
                        });
                        rules.push(ValidationRule::NonEmptyString {
                            field: field.clone(),
                        });
                    }
                    if let Some(pattern) = &p.constraints.pattern {
                        rules.push(ValidationRule::Pattern {
                            field: field.clone(),
                            pattern: pattern.clone(),
                            required,
                        });
                    }
                    if let Some(limit) = p.constraints.min_length {
                        rules.push(ValidationRule::MinLength {
                            field: field.clone(),
                            limit,
                        });
                    }
                    if let Some(limit) = p.constraints.max_length {
                        rules.push(ValidationRule::MaxLength { field, limit });
                    }
                }
                "integer" | "number" => {
                    if required {
                        let expected = if p.type_name == "integer" {
                            "int"
                        } else {
                            "(int, float)"
                        };
                        rules.push(ValidationRule::TypeCheck {
                            field: field.clone(),
                            expected,
                        });
                    }
                    if let Some(limit) = p.constraints.minimum {
                        rules.push(ValidationRule::Minimum {
                            field: field.clone(),
                            limit,
                            required,
                        });
                    }
                    if let Some(limit) = p.constraints.exclusive_minimum {
                        rules.push(ValidationRule::ExclusiveMinimum {
                            field: field.clone(),
                            limit,
                            required,
                        });
                    }
                    if let Some(limit) = p.constraints.maximum {
                        rules.push(ValidationRule::Maximum {
                            field: field.clone(),
                            limit,
                            required,
                        });
                    }
                    if let Some(limit) = p.constraints.exclusive_maximum {
                        rules.push(ValidationRule::ExclusiveMaximum {
                            field: field.clone(),
                            limit,
                            required,
                        });
                    }
                    if let Some(factor) = p.constraints.multiple_of {
                        rules.push(ValidationRule::MultipleOf {
                            field,
                            factor,
                            required,
                        });
                    }
                }
                "boolean" if self.language == TargetLanguage::Python => {
                    if required {
                        rules.push(ValidationRule::TypeCheck {
                            field,
                            expected: "bool",
                        });
                    }
                }
                "object" if self.language == TargetLanguage::Python => {
                    if required {
                        rules.push(ValidationRule::TypeCheck {
                            field,
                            expected: "dict",
                        });
                    }
                }
                _ => {}
            },
            SchemaNode::Enum(e) => {
                rules.push(ValidationRule::EnumMembership {
                    field,
                    values: e.values.clone(),
                });
            }
            SchemaNode::Const(c) => {
                rules.push(ValidationRule::ConstEquality {
                    field,
                    value: c.value.clone(),
                });
            }
            _ => {}
        }

        rules
    }

    fn emit(&self, rule: &ValidationRule) -> Vec<String> {
        match self.language {
            TargetLanguage::Python => self.emit_python(rule),
            TargetLanguage::CSharp => self.emit_csharp(rule),
        }
    }

    fn emit_python(&self, rule: &ValidationRule) -> Vec<String> {
        use ValidationRule::*;

        let raise = |condition: String, message: String| {
            vec![
                format!("if {condition}:"),
                format!("    raise ValueError({message})"),
            ]
        };
        // A rule for an optional field only fires when the field is non-null.
        let guarded = |field: &str, condition: String, required: bool| {
            if required {
                condition
            } else {
                format!("self.{field} is not None and {condition}")
            }
        };

        match rule {
            TypeCheck { field, expected } => raise(
                format!("not isinstance(self.{field}, {expected})"),
                format!(
                    "f\"{field} must be of type {expected}, got {{type(self.{field}).__name__}}\""
                ),
            ),
            ReferenceType { field, class_name } => raise(
                format!("not isinstance(self.{field}, {class_name})"),
                format!(
                    "f\"{field} must be a {class_name} instance, got {{type(self.{field}).__name__}}\""
                ),
            ),
            NonEmptyString { field } => raise(
                format!("not self.{field}"),
                format!("\"{field} must be a non-empty string\""),
            ),
            Pattern {
                field,
                pattern,
                required,
            } => {
                let escaped = pattern.replace('"', "\\\"");
                raise(
                    guarded(
                        field,
                        format!("not re.fullmatch(r\"{escaped}\", self.{field})"),
                        *required,
                    ),
                    format!("\"{field} does not match pattern {escaped}\""),
                )
            }
            MinLength { field, limit } => raise(
                format!("len(self.{field}) < {limit}"),
                format!("\"{field} must be at least {limit} characters long\""),
            ),
            MaxLength { field, limit } => raise(
                format!("len(self.{field}) > {limit}"),
                format!("\"{field} must be at most {limit} characters long\""),
            ),
            Minimum {
                field,
                limit,
                required,
            } => raise(
                guarded(field, format!("self.{field} < {}", fmt_num(*limit)), *required),
                format!("\"{field} must be >= {}\"", fmt_num(*limit)),
            ),
            ExclusiveMinimum {
                field,
                limit,
                required,
            } => raise(
                guarded(field, format!("self.{field} <= {}", fmt_num(*limit)), *required),
                format!("\"{field} must be > {}\"", fmt_num(*limit)),
            ),
            Maximum {
                field,
                limit,
                required,
            } => raise(
                guarded(field, format!("self.{field} > {}", fmt_num(*limit)), *required),
                format!("\"{field} must be <= {}\"", fmt_num(*limit)),
            ),
            ExclusiveMaximum {
                field,
                limit,
                required,
            } => raise(
                guarded(field, format!("self.{field} >= {}", fmt_num(*limit)), *required),
                format!("\"{field} must be < {}\"", fmt_num(*limit)),
            ),
            MultipleOf {
                field,
                factor,
                required,
            } => raise(
                guarded(
                    field,
                    format!("self.{field} % {} != 0", fmt_num(*factor)),
                    *required,
                ),
                format!("\"{field} must be a multiple of {}\"", fmt_num(*factor)),
            ),
            MinItems {
                field,
                limit,
                required,
            } => raise(
                guarded(field, format!("len(self.{field}) < {limit}"), *required),
                format!("\"{field} must contain at least {limit} items\""),
            ),
            MaxItems {
                field,
                limit,
                required,
            } => raise(
                guarded(field, format!("len(self.{field}) > {limit}"), *required),
                format!("\"{field} must contain at most {limit} items\""),
            ),
            ArrayItemType { field, class_name } => vec![
                format!("for i, item in enumerate(self.{field}):"),
                format!("    if not isinstance(item, {class_name}):"),
                format!(
                    "        raise ValueError(f\"{field}[{{i}}] must be a {class_name} instance, got {{type(item).__name__}}\")"
                ),
            ],
            EnumMembership { field, values } => {
                let rendered = values
                    .iter()
                    .map(py_literal)
                    .collect::<Vec<_>>()
                    .join(", ");
                raise(
                    format!("self.{field} not in [{rendered}]"),
                    format!("\"{field} must be one of: {}\"", py_plain_list(values)),
                )
            }
            ConstEquality { field, value } => raise(
                format!("self.{field} != {}", py_literal(value)),
                format!("\"{field} must be {}\"", py_plain(value)),
            ),
        }
    }

    fn emit_csharp(&self, rule: &ValidationRule) -> Vec<String> {
        use ValidationRule::*;

        let throw_arg = |condition: String, message: String, prop: &str| {
            vec![
                format!("if ({condition})"),
                format!("    throw new ArgumentException(\"{message}\", nameof({prop}));"),
            ]
        };

        match rule {
            TypeCheck { field, .. } => {
                let prop = pascal_case(field);
                vec![
                    format!("if ({prop} == null)"),
                    format!(
                        "    throw new ArgumentNullException(nameof({prop}), \"{prop} is required\");"
                    ),
                ]
            }
            ReferenceType { field, .. } => {
                let prop = pascal_case(field);
                vec![
                    format!("if ({prop} == null)"),
                    format!(
                        "    throw new ArgumentNullException(nameof({prop}), \"{prop} is required\");"
                    ),
                ]
            }
            NonEmptyString { field } => {
                let prop = pascal_case(field);
                throw_arg(
                    format!("string.IsNullOrEmpty({prop})"),
                    format!("{prop} must be a non-empty string"),
                    &prop,
                )
            }
            Pattern { field, pattern, .. } => {
                let prop = pascal_case(field);
                let escaped = pattern.replace('\\', "\\\\").replace('"', "\\\"");
                throw_arg(
                    format!("!Regex.IsMatch({prop}, \"{escaped}\")"),
                    format!("{prop} does not match pattern {escaped}"),
                    &prop,
                )
            }
            MinLength { field, limit } => {
                let prop = pascal_case(field);
                throw_arg(
                    format!("{prop}.Length < {limit}"),
                    format!("{prop} must be at least {limit} characters long"),
                    &prop,
                )
            }
            MaxLength { field, limit } => {
                let prop = pascal_case(field);
                throw_arg(
                    format!("{prop}.Length > {limit}"),
                    format!("{prop} must be at most {limit} characters long"),
                    &prop,
                )
            }
            Minimum { field, limit, .. } => {
                let prop = pascal_case(field);
                throw_arg(
                    format!("{prop} < {}", fmt_num(*limit)),
                    format!("{prop} must be >= {}", fmt_num(*limit)),
                    &prop,
                )
            }
            ExclusiveMinimum { field, limit, .. } => {
                let prop = pascal_case(field);
                throw_arg(
                    format!("{prop} <= {}", fmt_num(*limit)),
                    format!("{prop} must be > {}", fmt_num(*limit)),
                    &prop,
                )
            }
            Maximum { field, limit, .. } => {
                let prop = pascal_case(field);
                throw_arg(
                    format!("{prop} > {}", fmt_num(*limit)),
                    format!("{prop} must be <= {}", fmt_num(*limit)),
                    &prop,
                )
            }
            ExclusiveMaximum { field, limit, .. } => {
                let prop = pascal_case(field);
                throw_arg(
                    format!("{prop} >= {}", fmt_num(*limit)),
                    format!("{prop} must be < {}", fmt_num(*limit)),
                    &prop,
                )
            }
            MultipleOf { field, factor, .. } => {
                let prop = pascal_case(field);
                throw_arg(
                    format!("{prop} % {} != 0", fmt_num(*factor)),
                    format!("{prop} must be a multiple of {}", fmt_num(*factor)),
                    &prop,
                )
            }
            MinItems { field, limit, .. } => {
                let prop = pascal_case(field);
                throw_arg(
                    format!("{prop}.Count < {limit}"),
                    format!("{prop} must contain at least {limit} items"),
                    &prop,
                )
            }
            MaxItems { field, limit, .. } => {
                let prop = pascal_case(field);
                throw_arg(
                    format!("{prop}.Count > {limit}"),
                    format!("{prop} must contain at most {limit} items"),
                    &prop,
                )
            }
            // Generic element types make a runtime item check redundant.
            ArrayItemType { .. } => Vec::new(),
            EnumMembership { field, values } => {
                let prop = pascal_case(field);
                let rendered = values
                    .iter()
                    .map(cs_literal)
                    .collect::<Vec<_>>()
                    .join(", ");
                vec![
                    format!("var valid{prop}Values = new[] {{ {rendered} }};"),
                    format!("if (!valid{prop}Values.Contains({prop}))"),
                    format!(
                        "    throw new ArgumentException(\"{prop} must be one of: {}\", nameof({prop}));",
                        py_plain_list(values)
                    ),
                ]
            }
            ConstEquality { field, value } => {
                let prop = pascal_case(field);
                throw_arg(
                    format!("{prop} != {}", cs_literal(value)),
                    format!("{prop} must be {}", py_plain(value)),
                    &prop,
                )
            }
        }
    }
}

/// Format a numeric bound without a trailing `.0` for whole numbers.
fn fmt_num(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn py_literal(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s.replace('"', "\\\"")),
        Value::Bool(b) => if *b { "True" } else { "False" }.to_string(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}

fn cs_literal(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s.replace('"', "\\\"")),
        Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Unquoted rendering for error messages.
fn py_plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn py_plain_list(values: &[Value]) -> String {
    values.iter().map(py_plain).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{SchemaAst, SchemaNode, parse};
    use serde_json::json;

    fn property(schema: serde_json::Value, required: bool) -> PropertyDef {
        let doc = json!({
            "definitions": {
                "D": {
                    "type": "object",
                    "properties": { "field": schema },
                    "required": if required { json!(["field"]) } else { json!([]) }
                }
            }
        });
        let ast: SchemaAst = parse(&doc, "Root").unwrap();
        let SchemaNode::Object(obj) = &ast.definitions[0].body else {
            panic!("expected object");
        };
        obj.properties[0].clone()
    }

    #[test]
    fn string_rules_fire_in_fixed_order() {
        let prop = property(
            json!({ "type": "string", "pattern": "^[a-z]+$", "minLength": 2, "maxLength": 8 }),
            true,
        );
        let generator = ValidationGenerator::new(TargetLanguage::Python);
        let statements = generator.property_statements(&prop);

        let joined = statements.join("\n");
        let type_pos = joined.find("isinstance").unwrap();
        let empty_pos = joined.find("non-empty").unwrap();
        let pattern_pos = joined.find("re.fullmatch").unwrap();
        let min_pos = joined.find("at least 2").unwrap();
        let max_pos = joined.find("at most 8").unwrap();
        assert!(type_pos < empty_pos && empty_pos < pattern_pos);
        assert!(pattern_pos < min_pos && min_pos < max_pos);
    }

    #[test]
    fn optional_numeric_rule_is_null_guarded() {
        let prop = property(json!({ "type": "integer", "minimum": 0 }), false);
        let generator = ValidationGenerator::new(TargetLanguage::Python);
        let statements = generator.property_statements(&prop);

        assert_eq!(
            statements[0],
            "if self.field is not None and self.field < 0:"
        );
    }

    #[test]
    fn required_numeric_rules_include_type_check() {
        let prop = property(json!({ "type": "number", "maximum": 1.5 }), true);
        let generator = ValidationGenerator::new(TargetLanguage::Python);
        let statements = generator.property_statements(&prop);

        assert!(statements[0].contains("isinstance(self.field, (int, float))"));
        assert!(statements[2].contains("self.field > 1.5"));
    }

    #[test]
    fn pattern_needs_regex_only_for_python() {
        let prop = property(json!({ "type": "string", "pattern": "^x$" }), true);
        assert!(ValidationGenerator::new(TargetLanguage::Python).needs_regex(&prop));
        assert!(!ValidationGenerator::new(TargetLanguage::CSharp).needs_regex(&prop));
    }

    #[test]
    fn csharp_enum_check_uses_value_table() {
        let prop = property(json!({ "enum": ["red", "green"] }), true);
        let generator = ValidationGenerator::new(TargetLanguage::CSharp);
        let statements = generator.property_statements(&prop);

        assert_eq!(
            statements[0],
            "var validFieldValues = new[] { \"red\", \"green\" };"
        );
        assert!(statements[1].contains("!validFieldValues.Contains(Field)"));
    }

    #[test]
    fn const_equality_passes_literal() {
        let prop = property(json!({ "const": "base" }), true);
        let generator = ValidationGenerator::new(TargetLanguage::Python);
        let statements = generator.property_statements(&prop);

        assert_eq!(statements[0], "if self.field != \"base\":");
    }

    #[test]
    fn array_item_ref_check_loops_in_python_only() {
        let prop = property(
            json!({ "type": "array", "items": { "$ref": "#/definitions/Point" }, "minItems": 1 }),
            true,
        );

        let python = ValidationGenerator::new(TargetLanguage::Python).property_statements(&prop);
        assert!(python.iter().any(|l| l.starts_with("for i, item in enumerate")));

        let csharp = ValidationGenerator::new(TargetLanguage::CSharp).property_statements(&prop);
        assert!(!csharp.iter().any(|l| l.contains("foreach")));
        assert!(csharp.iter().any(|l| l.contains("Field.Count < 1")));
    }
}
