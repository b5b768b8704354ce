// src/core/html.rs
//! Tolerant, case-insensitive HTML scanning. No DOM: callers work on byte
//! ranges of the original document. Lowercasing touches ASCII only, so
//! offsets found in the lowered copy are valid in the original.

use super::sanitize::{normalize_entities, normalize_ws};

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// A document plus its lowercased copy, built once. Every search below
/// runs on the copy and hands back offsets into the original.
pub struct Page<'a> {
    raw: &'a str,
    lc: String,
}

impl<'a> Page<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self { raw, lc: to_lower(raw) }
    }

    pub fn raw(&self) -> &'a str { self.raw }

    /// Next `<o …> … c` block at or after `from`, as `(start, end)` offsets.
    /// Not nesting-aware: the first closing pattern wins.
    pub fn next_block(&self, o: &str, c: &str, from: usize) -> Option<(usize, usize)> {
        let ol = to_lower(o);
        let cl = to_lower(c);
        let start = self.lc.get(from..)?.find(&ol)? + from;
        let open_end = self.raw[start..].find('>')? + start + 1;
        let end_rel = self.lc[open_end..].find(&cl)?;
        Some((start, open_end + end_rel + c.len()))
    }

    /// Next open tag at or after `from` whose `attr` matches `value`. With
    /// `tag = None` any element qualifies. For `class` the value must be
    /// one of the space-separated class names.
    /// Returns `(tag_start, open_end)`; `open_end` is one past the closing `>`.
    pub fn find_tag_with_attr(
        &self,
        tag: Option<&str>,
        attr: &str,
        value: &str,
        from: usize,
    ) -> Option<(usize, usize)> {
        let want = tag.map(to_lower);
        let is_class = attr.eq_ignore_ascii_case("class");
        let mut pos = from;

        loop {
            let start = self.lc.get(pos..)?.find('<')? + pos;
            pos = start + 1;

            let name = self.tag_name_at(start);
            if name.is_empty() || want.as_deref().is_some_and(|w| w != name) {
                continue;
            }
            let open_end = self.raw[start..].find('>')? + start + 1;

            let Some(found) = attr_value(&self.raw[start..open_end], attr) else { continue };
            let hit = if is_class {
                found.split_whitespace().any(|c| c == value)
            } else {
                found == value
            };
            if hit {
                return Some((start, open_end));
            }
        }
    }

    /// Lowercased element name of the tag opening at `start` (`""` for
    /// closing tags, comments, doctypes).
    pub fn tag_name_at(&self, start: usize) -> &str {
        let Some(rest) = self.lc.get(start + 1..) else { return "" };
        if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return "";
        }
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
            .unwrap_or(rest.len());
        &rest[..end]
    }

    /// Text content from `open_end` up to the first `</tag`, tags stripped,
    /// entities and whitespace normalized.
    pub fn element_text(&self, open_end: usize, tag: &str) -> String {
        let Some(rest) = self.lc.get(open_end..) else { return s!() };
        let close = join!("</", &to_lower(tag));
        let end = rest.find(&close).map_or(self.raw.len(), |r| open_end + r);
        strip_tags(normalize_entities(&self.raw[open_end..end]))
    }
}

pub fn inner_after_open_tag(block: &str) -> String {
    if let Some(oe) = block.find('>') {
        if let Some(cs) = block.rfind('<') {
            if cs > oe {
                return block[oe + 1..cs].to_string();
            }
        }
    }
    s!()
}

pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&out)
}

/// Value of `attr` inside a single open tag (`<div id='x' class="a b">`).
/// Accepts double, single, or no quotes.
pub fn attr_value(open_tag: &str, attr: &str) -> Option<String> {
    let lc = to_lower(open_tag);
    let needle = join!(&to_lower(attr), "=");
    let mut from = 0;

    while let Some(rel) = lc[from..].find(&needle) {
        let at = from + rel;
        from = at + needle.len();

        // must be a whole attribute name, e.g. not `data-class=`
        let boundary = lc[..at].chars().next_back().is_some_and(|c| c.is_whitespace());
        if !boundary {
            continue;
        }

        let rest = &open_tag[from..];
        return match rest.chars().next() {
            Some(q @ ('"' | '\'')) => {
                let body = &rest[1..];
                body.find(q).map(|end| body[..end].to_string())
            }
            Some(_) => {
                let end = rest
                    .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
                    .unwrap_or(rest.len());
                Some(rest[..end].to_string())
            }
            None => None,
        };
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_value_quotes() {
        let tag = r#"<div id='rankings' class="a  b" data-x=7>"#;
        assert_eq!(attr_value(tag, "id").as_deref(), Some("rankings"));
        assert_eq!(attr_value(tag, "CLASS").as_deref(), Some("a  b"));
        assert_eq!(attr_value(tag, "data-x").as_deref(), Some("7"));
        assert_eq!(attr_value(tag, "x"), None);
    }

    #[test]
    fn attr_name_must_be_whole() {
        let tag = r#"<span data-class="value" class="other">"#;
        assert_eq!(attr_value(tag, "class").as_deref(), Some("other"));
    }

    #[test]
    fn find_by_class_token() {
        let doc = r#"<pre class="x"></pre><p class="big player-name">A</p>"#;
        let page = Page::new(doc);
        let (s, e) = page.find_tag_with_attr(Some("p"), "class", "player-name", 0).unwrap();
        assert!(doc[s..e].starts_with("<p class"));
        assert_eq!(page.element_text(e, "p"), "A");
        assert!(page.find_tag_with_attr(Some("p"), "class", "player", 0).is_none());
        // `<p` must not match `<pre`
        assert!(page.find_tag_with_attr(Some("p"), "class", "x", 0).is_none());
    }

    #[test]
    fn any_tag_by_class() {
        let doc = r#"<section><B class="ktc-value">7,001</B></section>"#;
        let page = Page::new(doc);
        let (s, e) = page.find_tag_with_attr(None, "class", "ktc-value", 0).unwrap();
        assert_eq!(page.tag_name_at(s), "b");
        assert_eq!(page.element_text(e, page.tag_name_at(s)), "7,001");
    }

    #[test]
    fn closing_tags_and_comments_have_no_name() {
        let page = Page::new("</div><!-- x --><Custom-El a=1>");
        assert_eq!(page.tag_name_at(0), "");
        assert_eq!(page.tag_name_at(6), "");
        assert_eq!(page.tag_name_at(16), "custom-el");
    }

    #[test]
    fn element_text_strips_markup() {
        let doc = "<p class=n><a href='#'>Josh&nbsp;Allen</a>\n </P>";
        let page = Page::new(doc);
        let (_, e) = page.find_tag_with_attr(Some("p"), "class", "n", 0).unwrap();
        assert_eq!(page.element_text(e, "p"), "Josh Allen");
    }

    #[test]
    fn tag_blocks_case_insensitive() {
        let doc = "<SCRIPT>var a = 1;</SCRIPT><script>b</script>";
        let page = Page::new(doc);
        let (s, e) = page.next_block("<script", "</script>", 0).unwrap();
        assert_eq!(inner_after_open_tag(&doc[s..e]), "var a = 1;");
        let (s2, e2) = page.next_block("<script", "</script>", e).unwrap();
        assert_eq!(inner_after_open_tag(&doc[s2..e2]), "b");
    }
}
