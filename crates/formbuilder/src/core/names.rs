use convert_case::{Case, Casing};

use super::field_type::FieldType;

/// Munge user input into a field name: trimmed, lower-cased, then camel-cased
/// across word boundaries.
pub fn field_name(raw: &str) -> String {
    raw.trim().to_lowercase().to_case(Case::Camel)
}

/// Upper-case the first character of a label, leaving the rest alone.
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A fresh name for a field created without one.
pub fn generated_name(field_type: FieldType, seq: u64) -> String {
    format!("{} {seq}", field_type.tag()).to_case(Case::Camel)
}
