// ABOUTME: Best-effort markup-to-text reducer used for every matched node.
// ABOUTME: Converts <br> to newlines, strips tag-like substrings, decodes serializer entities, trims.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches `<`, then non-quote characters or quoted runs, then `>`.
///
/// This is not an HTML parser. Malformed markup is tolerated rather than
/// rejected, and a `>` inside an unterminated quote can swallow more than one
/// tag.
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"<(".*?"|'.*?'|[^'"])*?>"#).unwrap());

/// Entities the HTML serializer emits in text, in decoding order. `&amp;`
/// goes last so `&amp;lt;` stays a literal `&lt;`.
const SERIALIZER_ENTITIES: &[(&str, &str)] = &[
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&nbsp;", "\u{a0}"),
    ("&amp;", "&"),
];

/// Reduce serialized markup to plain text.
pub fn clean_markup(markup: &str) -> String {
    let text = markup.replace("<br>", "\n");
    let text = TAG_RE.replace_all(&text, "");
    decode_serializer_entities(&text).trim().to_string()
}

fn decode_serializer_entities(s: &str) -> String {
    let mut result = s.to_string();
    for (entity, replacement) in SERIALIZER_ENTITIES {
        if result.contains(entity) {
            result = result.replace(entity, replacement);
        }
    }
    result
}
