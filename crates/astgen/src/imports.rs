//! Deterministic import-set derivation: presence of a qualified
//! type name triggers its package; the result is always sorted.

use std::collections::BTreeSet;

const TRIGGERS: &[(&str, &str)] = &[
    ("time.Time", "time"),
    ("context.Context", "context"),
    ("sql.Null", "database/sql"),
    ("sort.Slice", "sort"),
    ("strings.", "strings"),
    ("fmt.Errorf", "fmt"),
    ("json.Unmarshal", "encoding/json"),
];

/// Scans every type name and body line a synthesized declaration carries
/// and returns the sorted set of stdlib packages it needs.
pub fn derive_imports<'a>(snippets: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut set = BTreeSet::new();
    for snippet in snippets {
        for (needle, package) in TRIGGERS {
            if snippet.contains(needle) {
                set.insert(package.to_string());
            }
        }
    }
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_type_triggers_time_package() {
        let imports = derive_imports(["func Foo(t time.Time) error"]);
        assert_eq!(imports, vec!["time".to_string()]);
    }

    #[test]
    fn multiple_triggers_are_sorted_and_deduped() {
        let imports = derive_imports([
            "func Foo(ctx context.Context, t time.Time) error",
            "func Bar(ctx context.Context) error",
        ]);
        assert_eq!(imports, vec!["context".to_string(), "time".to_string()]);
    }

    #[test]
    fn no_triggers_yields_empty_import_set() {
        assert!(derive_imports(["func Foo() error"]).is_empty());
    }
}
