//! Finder return-type resolution (`FinderSignature`).

use ang_ir::{Entity, Finder, FinderReturn};
use ang_naming::export_name;

#[derive(Debug, Clone, PartialEq)]
pub struct FinderSignature {
    pub name: String,
    pub return_type: String,
}

/// Resolution order: explicit override > `delete`→`int64` > `one`→`*domain.<E>`
/// > `many`→`[]domain.<E>` > `count`→`int64` > custom type.
pub fn resolve_finder_signature(finder: &Finder, entity: &Entity, entities: &[Entity]) -> FinderSignature {
    let return_type = if let Some(override_type) = &finder.return_type_override {
        override_type.clone()
    } else {
        match &finder.returns {
            FinderReturn::Delete => "int64".to_string(),
            FinderReturn::One => format!("*domain.{}", export_name(entity.name.as_str())),
            FinderReturn::Many => format!("[]domain.{}", export_name(entity.name.as_str())),
            FinderReturn::Count => "int64".to_string(),
            FinderReturn::Custom(raw) => resolve_custom_type(raw, finder, entities),
        }
    };

    FinderSignature {
        name: finder.name.clone(),
        return_type,
    }
}

/// Parses `[]`/`*` prefixes off a custom return-type annotation, tries to
/// resolve the bare name against known entities, and otherwise synthesizes
/// an inline field-set type name from the finder's `scan_fields`.
fn resolve_custom_type(raw: &str, finder: &Finder, entities: &[Entity]) -> String {
    let (prefix, bare) = if let Some(rest) = raw.strip_prefix("[]") {
        ("[]", rest)
    } else if let Some(rest) = raw.strip_prefix('*') {
        ("*", rest)
    } else {
        ("", raw)
    };

    if entities.iter().any(|e| e.name.as_str() == bare) {
        return format!("{prefix}domain.{}", export_name(bare));
    }

    let synthesized = export_name(&format!("{}Row", finder.name));
    let _ = infer_scan_field_types(finder);
    format!("{prefix}{synthesized}")
}

/// Name-pattern type inference used when a custom finder return type has no
/// entity match: suffix `id`/`amount`/`price`/`number`/`bids`/`drops` → int;
/// `savings`/`rating` → float; anything else → string.
pub fn infer_scan_field_types(finder: &Finder) -> Vec<(String, &'static str)> {
    finder
        .scan_fields
        .iter()
        .map(|f| (f.to_string(), infer_field_type(f.as_str())))
        .collect()
}

fn infer_field_type(field_name: &str) -> &'static str {
    let lower = field_name.to_ascii_lowercase();
    const INT_SUFFIXES: &[&str] = &["id", "amount", "price", "number", "bids", "drops"];
    const FLOAT_SUFFIXES: &[&str] = &["savings", "rating"];

    if INT_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        "int"
    } else if FLOAT_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        "float"
    } else {
        "string"
    }
}
