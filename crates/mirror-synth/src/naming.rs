//! Naming conventions shared by all derived types.

const FIELD_SUFFIXES: &[&str] = &["Field", "Button", "Column"];
const CONTAINER_SUFFIXES: &[&str] = &["PageData", "FieldData", "Data"];

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "void", "volatile", "while",
];

/// `NameField` -> `Name`, `OkButton` -> `Ok`, `StateColumn` -> `State`.
///
/// Only the first matching suffix is removed, and never the whole name.
pub fn form_data_name(type_name: &str) -> &str {
    strip_first_suffix(type_name, FIELD_SUFFIXES)
}

/// `PersonTableFieldData` -> `PersonTableRowData`, `PersonTablePageData` -> `PersonTableRowData`.
pub fn row_data_name(container_name: &str) -> String {
    format!("{}RowData", strip_first_suffix(container_name, CONTAINER_SUFFIXES))
}

fn strip_first_suffix<'a>(name: &'a str, suffixes: &[&str]) -> &'a str {
    suffixes
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix).filter(|rest| !rest.is_empty()))
        .unwrap_or(name)
}

pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn is_java_keyword(name: &str) -> bool {
    JAVA_KEYWORDS.contains(&name)
}

/// Appends `_` to Java keywords so the name can be used as an identifier.
pub fn escape_keyword(name: &str) -> String {
    if is_java_keyword(name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// Simple name of a qualified (`.` or `$` separated) type name.
pub fn simple_name(name: &str) -> &str {
    match name.rfind(['.', '$']) {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}
