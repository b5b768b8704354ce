// src/core/normalize.rs
//! Identity normalizer: display name -> cross-source join key.
//!
//! Steps, in order:
//! 1. drop every char that is not an ASCII letter or whitespace
//!    (digits, periods, hyphens, apostrophes all go),
//! 2. drop whole-word generational suffixes (`jr sr ii iii iv v`, any case),
//! 3. collapse whitespace and trim,
//! 4. lowercase.
//!
//! Punctuation goes first so `II.` still reads as the word `II`. Hyphens are
//! removed rather than turned into spaces, so `Smith-V` fuses to `SmithV`
//! and never exposes a stray suffix token.

use serde_json::Value;

const SUFFIXES: [&str; 6] = ["jr", "sr", "ii", "iii", "iv", "v"];

/// Whitespace as name sources emit it: Unicode `White_Space` plus the
/// ASCII information separators U+001C..=U+001F.
fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

fn is_suffix(word: &str) -> bool {
    SUFFIXES.iter().any(|s| s.eq_ignore_ascii_case(word))
}

/// Normalize an optional display name. `None` maps to `""`; never fails.
pub fn normalize_name(name: Option<&str>) -> String {
    let Some(name) = name else { return s!() };

    let letters: String = name
        .chars()
        .filter(|&c| c.is_ascii_alphabetic() || is_space(c))
        .collect();

    // After step 1 a word boundary can only sit next to whitespace,
    // so whole-word matching is a token filter.
    let mut out = String::with_capacity(letters.len());
    let words = letters.split(is_space).filter(|w| !w.is_empty() && !is_suffix(w));
    for word in words {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out.make_ascii_lowercase();
    out
}

/// Normalize a table cell: only string cells carry a name.
pub fn normalize_cell(cell: &Value) -> String {
    normalize_name(cell.as_str())
}
