//! Identifier casing: `ExportName` (PascalCase), `JsonName` (camelCase),
//! `DbName` (snake_case), `HumanizeName` (titled words), plus the kebab/snake
//! utilities and a deliberately narrow `singularize`.
//!
//! The splitting algorithm applies three joint rules left-to-right in one
//! pass: split on separator characters, split at a lower→upper boundary, and
//! split an uppercase run at its last letter when followed by a lowercase
//! letter (so `APIKey` splits as `API`, `Key` rather than `A`, `PIKey`).
//! Each resulting token is then looked up in the acronym table; tokens with
//! no internal boundary are additionally checked against the compound
//! dictionary before falling back to ordinary capitalization.

use once_cell::sync::Lazy;
use std::collections::{BTreeMap, BTreeSet};

const SEPARATORS: [char; 3] = ['_', '.', '-'];

static ACRONYMS: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    [
        "id", "url", "uri", "jwt", "http", "https", "uuid", "guid", "rpc", "sql", "json", "html",
        "xml", "css", "js", "ts", "api", "db", "ok", "io", "os", "ip", "tcp", "udp", "tls", "ssl",
        "cpu", "gpu", "ram", "csv", "pdf", "ui", "utc", "acl", "rbac", "ttl", "sdk", "cli", "ws",
        "dns", "cdn", "seo", "faq", "iso", "nat", "vpn", "grpc",
    ]
    .into_iter()
    .collect()
});

/// Whole-token dictionary for names with no separator or case boundary at
/// all (e.g. a raw, lowercase DB column name). Generic splitting cannot
/// recover these; the dictionary wins outright when it has an entry. Each
/// entry is the sub-word split, not the merged PascalCase string, so
/// `humanize_name`'s `" "`-join still sees individual words rather than one
/// concatenated token.
static COMPOUNDS: Lazy<BTreeMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    [
        ("apikey", ["API", "Key"].as_slice()),
        ("userid", ["User", "ID"].as_slice()),
        ("urlthumb", ["URL", "Thumb"].as_slice()),
        ("companyid", ["Company", "ID"].as_slice()),
        ("tenantid", ["Tenant", "ID"].as_slice()),
        ("accountid", ["Account", "ID"].as_slice()),
        ("orderid", ["Order", "ID"].as_slice()),
        ("productid", ["Product", "ID"].as_slice()),
        ("customerid", ["Customer", "ID"].as_slice()),
        ("createdat", ["Created", "At"].as_slice()),
        ("updatedat", ["Updated", "At"].as_slice()),
        ("deletedat", ["Deleted", "At"].as_slice()),
        ("ipaddress", ["IP", "Address"].as_slice()),
        ("useragent", ["User", "Agent"].as_slice()),
    ]
    .into_iter()
    .collect()
});

fn capitalize(lower: &str) -> String {
    let mut chars = lower.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Splits a separator-free run into case-boundary tokens. Returns a single
/// element when the run has no internal boundary (all-lowercase,
/// all-uppercase, or a single already-capitalized word).
fn split_case_boundaries(run: &str) -> Vec<String> {
    let chars: Vec<char> = run.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let mut breaks: Vec<usize> = Vec::new();
    for i in 1..chars.len() {
        let prev = chars[i - 1];
        let cur = chars[i];

        if prev.is_lowercase() && cur.is_uppercase() {
            breaks.push(i);
            continue;
        }
        if cur.is_lowercase() && prev.is_uppercase() && i >= 2 && chars[i - 2].is_uppercase() {
            // Acronym run ending: split before its last uppercase letter.
            breaks.push(i - 1);
        }
    }
    breaks.dedup();

    let mut tokens = Vec::with_capacity(breaks.len() + 1);
    let mut start = 0;
    for b in breaks {
        if b > start {
            tokens.push(chars[start..b].iter().collect());
        }
        start = b;
    }
    tokens.push(chars[start..].iter().collect());
    tokens
}

/// Tokenizes a raw identifier into PascalCase-ready parts, applying acronym
/// and compound recognition. Shared by `export_name`, `humanize_name`,
/// `json_name`, and the snake/kebab utilities so they never disagree about
/// where a name's boundaries fall.
fn export_tokens(s: &str) -> Vec<String> {
    let mut tokens = Vec::new();

    for segment in s.split(|c| SEPARATORS.contains(&c)) {
        if segment.is_empty() {
            continue;
        }
        let sub = split_case_boundaries(segment);
        if sub.len() == 1 {
            let lower = sub[0].to_lowercase();
            if let Some(compound) = COMPOUNDS.get(lower.as_str()) {
                tokens.extend(compound.iter().map(|t| t.to_string()));
                continue;
            }
            tokens.push(token_case(&lower));
        } else {
            for t in sub {
                let lower = t.to_lowercase();
                tokens.push(token_case(&lower));
            }
        }
    }
    tokens
}

fn token_case(lower: &str) -> String {
    if ACRONYMS.contains(lower) {
        lower.to_uppercase()
    } else {
        capitalize(lower)
    }
}

/// PascalCase export name with acronym preservation and compound
/// recognition. Idempotent: `export_name(export_name(x)) == export_name(x)`.
pub fn export_name(s: &str) -> String {
    export_tokens(s).concat()
}

/// camelCase JSON projection of `export_name`: the leading token is fully
/// lowercased (so a leading acronym like `API` becomes `api`), remaining
/// tokens keep their `export_name` casing.
pub fn json_name(s: &str) -> String {
    let mut tokens = export_tokens(s);
    if let Some(first) = tokens.first_mut() {
        *first = first.to_lowercase();
    }
    tokens.concat()
}

/// snake_case form used for DB columns: every token lowercased and joined
/// with `_`.
pub fn db_name(s: &str) -> String {
    to_snake_case(s)
}

/// Space-separated, title-case rendering of the `export_name` split, with
/// acronyms preserved.
pub fn humanize_name(s: &str) -> String {
    export_tokens(s).join(" ")
}

/// Lowercase, underscore-joined form of `export_name`'s tokens.
pub fn to_snake_case(s: &str) -> String {
    export_tokens(s)
        .iter()
        .map(|t| t.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Lowercase, hyphen-joined form of `export_name`'s tokens.
pub fn to_kebab_case(s: &str) -> String {
    export_tokens(s)
        .iter()
        .map(|t| t.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// `ExportName` of a channel identifier (e.g. `kafka.main` → `KafkaMain`),
/// with a fallback for the unnamed default channel — `export_name` alone
/// would return an empty string for `""`, which is never a usable Go type
/// name.
pub fn channel_type_name(s: &str) -> String {
    if s.is_empty() {
        "Channel".to_string()
    } else {
        export_name(s)
    }
}

/// Limited English singularization: `ies` → `y`, else a trailing `s` is
/// dropped. Nothing smarter is attempted — callers are expected to avoid
/// singularizing nouns this breaks (e.g. `status` → `statu`).
pub fn singularize(s: &str) -> String {
    if let Some(stem) = s.strip_suffix("ies") {
        format!("{stem}y")
    } else if let Some(stem) = s.strip_suffix('s') {
        stem.to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_name_seed_cases() {
        assert_eq!(export_name("api_key"), "APIKey");
        assert_eq!(export_name("urlThumb"), "URLThumb");
        assert_eq!(export_name("userId"), "UserID");
    }

    #[test]
    fn export_name_compound_dictionary() {
        assert_eq!(export_name("apikey"), "APIKey");
        assert_eq!(export_name("userid"), "UserID");
        assert_eq!(export_name("urlthumb"), "URLThumb");
    }

    #[test]
    fn export_name_idempotent() {
        for case in ["api_key", "urlThumb", "userId", "apikey", "plain_name", "ID"] {
            let once = export_name(case);
            let twice = export_name(&once);
            assert_eq!(once, twice, "not idempotent for {case:?}");
        }
    }

    #[test]
    fn json_name_lowercases_leading_token_only() {
        assert_eq!(json_name("api_key"), "apiKey");
        assert_eq!(json_name("user_name"), "userName");
    }

    #[test]
    fn db_name_is_snake_case() {
        assert_eq!(db_name("APIKey"), "api_key");
        assert_eq!(db_name("userId"), "user_id");
    }

    #[test]
    fn humanize_name_preserves_acronyms() {
        assert_eq!(humanize_name("userId"), "User ID");
        assert_eq!(humanize_name("apikey"), "API Key");
    }

    #[test]
    fn kebab_and_snake_agree_on_tokens() {
        assert_eq!(to_kebab_case("UserID"), "user-id");
        assert_eq!(to_snake_case("UserID"), "user_id");
    }

    #[test]
    fn singularize_limited_rules() {
        assert_eq!(singularize("companies"), "company");
        assert_eq!(singularize("orders"), "order");
        assert_eq!(singularize("data"), "data");
    }

    #[test]
    fn s3_channel_type_name_seed_cases() {
        assert_eq!(channel_type_name("kafka.main"), "KafkaMain");
        assert_eq!(channel_type_name(""), "Channel");
    }
}
