// src/utils/html.rs

use std::collections::HashSet;

/// Strips all markup from user-supplied display text.
///
/// Display names end up inside rendered pages, so nothing survives except
/// the text content. Characters such as `&` come back entity-escaped.
pub fn clean_text(input: &str) -> String {
    ammonia::Builder::empty()
        .clean_content_tags(HashSet::from(["script", "style"]))
        .clean(input)
        .to_string()
        .trim()
        .to_string()
}
