//! Title derivation for units and directories.

use std::sync::LazyLock;

use regex::Regex;

/// Numeric ordering prefix such as `01_`, `2-` or `10. `.
static ORDER_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[_\-. ]+").unwrap());

/// ATX level-1 heading (`# Title`, optional closing hashes).
static H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[ \t]+(.+?)(?:[ \t]+#+)?[ \t]*$").unwrap());

/// Derive a display title from a file stem or directory name.
///
/// Strips a numeric ordering prefix, then title-cases the remaining slug.
///
/// # Examples
///
/// ```
/// use refsite_content::title_from_segment;
///
/// assert_eq!(title_from_segment("02_function_templates"), "Function Templates");
/// assert_eq!(title_from_segment("static_cast_enum"), "Static Cast Enum");
/// assert_eq!(title_from_segment("xx_oop"), "Xx Oop");
/// ```
pub fn title_from_segment(segment: &str) -> String {
    let stripped = ORDER_PREFIX_RE.replace(segment, "");
    let slug = if stripped.is_empty() { segment } else { &*stripped };
    match titlecase_from_slug(slug) {
        title if title.is_empty() => segment.to_owned(),
        title => title,
    }
}

/// Convert a slug (kebab-case or `snake_case`) to title case.
fn titlecase_from_slug(slug: &str) -> String {
    let mut result = String::with_capacity(slug.len());
    for word in slug.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        capitalize_first_into(word, &mut result);
    }
    result
}

/// Capitalize the first character of a word, appending to `buf`.
fn capitalize_first_into(word: &str, buf: &mut String) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        buf.extend(first.to_uppercase());
        buf.push_str(chars.as_str());
    }
}

/// Extract the first ATX level-1 heading outside fenced code blocks.
///
/// ```
/// use refsite_content::extract_markdown_title;
///
/// let text = "Intro\n=====\n\n# Casts\n";
/// assert_eq!(extract_markdown_title(text).as_deref(), Some("Casts"));
/// ```
pub fn extract_markdown_title(markdown: &str) -> Option<String> {
    let mut fence: Option<&str> = None;
    for line in markdown.lines() {
        let trimmed = line.trim_start();
        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            continue;
        }
        if trimmed.starts_with("```") {
            fence = Some("```");
            continue;
        }
        if trimmed.starts_with("~~~") {
            fence = Some("~~~");
            continue;
        }
        if let Some(caps) = H1_RE.captures(line) {
            return Some(caps[1].trim().to_owned());
        }
    }
    None
}
