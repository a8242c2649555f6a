//! C# syntax-tree serializer.
//!
//! Order-preserving linearization into source text: Allman braces, 4-space
//! indentation, a blank line between members. No semantic decisions happen
//! here.

use super::nodes::{
    CsClass, CsConstructor, CsEnum, CsEnumConverter, CsField, CsFile, CsProperty,
};

const INDENT: &str = "    ";

pub fn serialize(file: &CsFile) -> String {
    let mut lines: Vec<String> = Vec::new();

    if let Some(banner) = &file.banner {
        lines.push(banner.clone());
    }

    for using in &file.usings {
        lines.push(format!("using {using};"));
    }
    if !file.usings.is_empty() {
        lines.push(String::new());
    }

    let indent_level = if let Some(namespace) = &file.namespace {
        lines.push(format!("namespace {namespace}"));
        lines.push("{".to_string());
        1
    } else {
        0
    };

    let mut body: Vec<String> = Vec::new();

    if !file.alias_comments.is_empty() {
        body.extend(file.alias_comments.iter().cloned());
        body.push(String::new());
    }

    for cs_enum in &file.enums {
        let converter = file.converters.iter().find(|c| c.enum_name == cs_enum.name);
        serialize_enum(&mut body, cs_enum, converter);
    }

    for class in &file.classes {
        serialize_class(&mut body, class);
    }

    lines.extend(indent_lines(body, indent_level));

    if file.namespace.is_some() {
        lines.push("}".to_string());
    }

    let mut out = lines.join("\n");
    while out.ends_with("\n\n") {
        out.pop();
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn indent_lines(lines: Vec<String>, level: usize) -> Vec<String> {
    if level == 0 {
        return lines;
    }
    let prefix = INDENT.repeat(level);
    lines
        .into_iter()
        .map(|line| {
            if line.trim().is_empty() {
                line
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect()
}

fn serialize_enum(lines: &mut Vec<String>, cs_enum: &CsEnum, converter: Option<&CsEnumConverter>) {
    if converter.is_some() {
        lines.push(format!(
            "[JsonConverter(typeof({}JsonConverter))]",
            cs_enum.name
        ));
    }

    lines.push(format!("public enum {}", cs_enum.name));
    lines.push("{".to_string());
    for (i, member) in cs_enum.members.iter().enumerate() {
        let comma = if i + 1 < cs_enum.members.len() { "," } else { "" };
        lines.push(format!("{INDENT}{member}{comma}"));
    }
    lines.push("}".to_string());
    lines.push(String::new());

    if let Some(converter) = converter {
        serialize_enum_converter(lines, converter);
    }
}

fn serialize_enum_converter(lines: &mut Vec<String>, converter: &CsEnumConverter) {
    let name = &converter.enum_name;

    lines.push(format!(
        "public class {name}JsonConverter : JsonConverter<{name}>"
    ));
    lines.push("{".to_string());

    lines.push(format!(
        "{INDENT}private static readonly Dictionary<string, {name}> StringToEnum = new Dictionary<string, {name}>"
    ));
    lines.push(format!("{INDENT}{{"));
    for (i, (member, value)) in converter.members.iter().enumerate() {
        let comma = if i + 1 < converter.members.len() { "," } else { "" };
        lines.push(format!(
            "{INDENT}{INDENT}{{ \"{value}\", {name}.{member} }}{comma}"
        ));
    }
    lines.push(format!("{INDENT}}};"));
    lines.push(String::new());

    lines.push(format!(
        "{INDENT}private static readonly Dictionary<{name}, string> EnumToString = new Dictionary<{name}, string>"
    ));
    lines.push(format!("{INDENT}{{"));
    for (i, (member, value)) in converter.members.iter().enumerate() {
        let comma = if i + 1 < converter.members.len() { "," } else { "" };
        lines.push(format!(
            "{INDENT}{INDENT}{{ {name}.{member}, \"{value}\" }}{comma}"
        ));
    }
    lines.push(format!("{INDENT}}};"));
    lines.push(String::new());

    lines.push(format!(
        "{INDENT}public override void WriteJson(JsonWriter writer, {name} value, JsonSerializer serializer)"
    ));
    lines.push(format!("{INDENT}{{"));
    lines.push(format!("{INDENT}{INDENT}writer.WriteValue(EnumToString[value]);"));
    lines.push(format!("{INDENT}}}"));
    lines.push(String::new());

    lines.push(format!(
        "{INDENT}public override {name} ReadJson(JsonReader reader, Type objectType, {name} existingValue, bool hasExistingValue, JsonSerializer serializer)"
    ));
    lines.push(format!("{INDENT}{{"));
    lines.push(format!("{INDENT}{INDENT}string stringValue = (string)reader.Value;"));
    lines.push(format!("{INDENT}{INDENT}return StringToEnum[stringValue];"));
    lines.push(format!("{INDENT}}}"));

    lines.push("}".to_string());
    lines.push(String::new());
}

fn serialize_class(lines: &mut Vec<String>, class: &CsClass) {
    for attr in &class.attributes {
        lines.push(attr.render());
    }

    let mut declaration = format!("public class {}", class.name);
    if let Some(base) = &class.base_class {
        declaration.push_str(&format!(" : {base}"));
    } else if !class.interfaces.is_empty() {
        declaration.push_str(&format!(" : {}", class.interfaces.join(", ")));
    }
    lines.push(declaration);
    lines.push("{".to_string());

    for field in &class.fields {
        serialize_field(lines, field);
    }

    for property in &class.properties {
        serialize_property(lines, property);
    }

    for constructor in &class.constructors {
        serialize_constructor(lines, constructor);
    }

    lines.push("}".to_string());
    lines.push(String::new());
}

fn serialize_field(lines: &mut Vec<String>, field: &CsField) {
    for attr in &field.attributes {
        lines.push(format!("{INDENT}{}", attr.render()));
    }

    let modifier = if field.is_const { " const" } else { "" };
    let mut declaration = format!("{INDENT}public{modifier} {} {}", field.type_name, field.name);
    if let Some(default) = &field.default_value {
        declaration.push_str(&format!(" = {default}"));
    }
    declaration.push(';');
    if let Some(comment) = &field.comment {
        declaration.push_str(comment);
    }
    lines.push(declaration);
}

fn serialize_property(lines: &mut Vec<String>, property: &CsProperty) {
    for attr in &property.attributes {
        lines.push(format!("{INDENT}{}", attr.render()));
    }

    let accessors = if property.has_setter { "get; set;" } else { "get;" };
    let mut declaration = format!(
        "{INDENT}public {} {} {{ {accessors} }}",
        property.type_name, property.name
    );
    if let Some(default) = &property.default_value {
        declaration.push_str(&format!(" = {default};"));
    }
    if let Some(comment) = &property.comment {
        declaration.push_str(comment);
    }
    lines.push(declaration);
}

fn serialize_constructor(lines: &mut Vec<String>, constructor: &CsConstructor) {
    lines.push(String::new());

    let params = constructor
        .parameters
        .iter()
        .map(|p| format!("{} {}", p.type_name, p.name))
        .collect::<Vec<_>>()
        .join(", ");

    let mut declaration = format!("{INDENT}public {}({params})", constructor.class_name);
    if !constructor.base_call_args.is_empty() {
        declaration.push_str(&format!(": base({})", constructor.base_call_args.join(", ")));
    }
    lines.push(declaration);
    lines.push(format!("{INDENT}{{"));
    for statement in &constructor.body {
        if statement.is_empty() {
            lines.push(String::new());
        } else {
            lines.push(format!("{INDENT}{INDENT}{statement}"));
        }
    }
    lines.push(format!("{INDENT}}}"));

    // Deserializers and the Unity editor need a parameterless constructor.
    if !constructor.parameters.is_empty() {
        lines.push(format!("{INDENT}public {}() {{ }}", constructor.class_name));
    }
}
