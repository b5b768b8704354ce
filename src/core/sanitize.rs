// src/core/sanitize.rs

pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Split a KTC details line (`QB • KC • 28 y.o. • 6'3"`) into trimmed parts.
/// Both the bullet and the en dash are accepted as separators.
pub fn split_details(s: &str) -> Vec<String> {
    s.split(['•', '–'])
        .map(normalize_ws)
        .collect()
}

/// `"28 y.o."` → `"28"`
pub fn strip_age_marker(s: &str) -> String {
    s.replace("y.o.", "").trim().to_string()
}
