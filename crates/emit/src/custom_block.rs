//! Custom-block preservation: `<comment-token> ANG:BEGIN_CUSTOM <key>` …
//! `<comment-token> ANG:END_CUSTOM <key>` markers round-trip a hand-edited
//! body across re-emission. The comment token varies by target language
//! (`#` for Python, `//` for Go), so markers are matched on the bare
//! `ANG:BEGIN_CUSTOM`/`ANG:END_CUSTOM` core rather than a fixed prefix.

use std::collections::BTreeMap;

const BEGIN: &str = "ANG:BEGIN_CUSTOM";
const END: &str = "ANG:END_CUSTOM";

/// Recognizes a begin-marker line regardless of comment syntax, returning
/// `(comment_token, key)`, e.g. `"# ANG:BEGIN_CUSTOM init"` yields
/// `("#", "init")` and `"// ANG:BEGIN_CUSTOM Foo_sql"` yields
/// `("//", "Foo_sql")`.
fn parse_begin(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim();
    let idx = trimmed.find(BEGIN)?;
    let token = trimmed[..idx].trim().to_string();
    let key = trimmed[idx + BEGIN.len()..].trim().to_string();
    Some((token, key))
}

fn is_end_line(line: &str, token: &str, key: &str) -> bool {
    line.trim() == format!("{token} {END} {key}")
}

/// Extracts well-formed `key -> body` pairs from `text`. A marker whose
/// partner is missing (unmatched begin/end) is simply not returned — the
/// caller leaves such blocks untouched in generated output.
pub fn parse_custom_blocks(text: &str) -> BTreeMap<String, String> {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks = BTreeMap::new();
    let mut i = 0;

    while i < lines.len() {
        if let Some((token, key)) = parse_begin(lines[i]) {
            if let Some(end_idx) = lines[i + 1..].iter().position(|l| is_end_line(l, &token, &key)) {
                let body_start = i + 1;
                let body_end = i + 1 + end_idx;
                blocks.insert(key, lines[body_start..body_end].join("\n"));
                i = body_end + 1;
                continue;
            }
        }
        i += 1;
    }

    blocks
}

/// Splices bodies from `existing` into `generated` wherever both carry the
/// same custom-block key, preserving the generated skeleton's structure and
/// every marker pair otherwise.
pub fn splice_custom_blocks(generated: &str, existing: &str) -> String {
    let existing_blocks = parse_custom_blocks(existing);
    if existing_blocks.is_empty() {
        return generated.to_string();
    }

    let lines: Vec<&str> = generated.lines().collect();
    let mut out = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        out.push(lines[i].to_string());
        if let Some((token, key)) = parse_begin(lines[i]) {
            if let Some(end_idx) = lines[i + 1..].iter().position(|l| is_end_line(l, &token, &key)) {
                let body_end = i + 1 + end_idx;
                if let Some(preserved) = existing_blocks.get(&key) {
                    if !preserved.is_empty() {
                        out.push(preserved.clone());
                    }
                } else {
                    out.extend(lines[i + 1..body_end].iter().map(|l| l.to_string()));
                }
                i = body_end;
                continue;
            }
        }
        i += 1;
    }

    out.join("\n")
}
