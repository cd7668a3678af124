//! Lexical syntax highlighting.
//!
//! Each supported language is described by a static [`Grammar`] table; a
//! single lexer walks the code once and wraps tokens in `<span>` elements
//! carrying the site's CSS classes (`keyword`, `lit_str`, `com_single`, ...).

mod ansi;
mod grammar;
mod lexer;

pub use grammar::{Grammar, RawStrings, grammar_for, is_plain_text};

use ansi::{ANSI, render_ansi};

use crate::error::RenderError;
use crate::escape::escape_html;

/// Highlight `code` as `tag`, returning HTML without the surrounding
/// `<pre>`/`<code>` elements.
///
/// Plain-text tags (`text`, `txt`, an empty fence info string, ...) are
/// escaped without markup. `ansi` output is rendered with its terminal
/// colors.
///
/// # Errors
///
/// Returns [`RenderError::UnknownLanguage`] if `tag` names neither a grammar
/// nor plain text. Callers decide how to fall back.
pub fn try_highlight(code: &str, tag: &str) -> Result<String, RenderError> {
    if let Some(grammar) = grammar_for(tag) {
        return Ok(lexer::highlight(code, grammar));
    }
    if tag.eq_ignore_ascii_case(ANSI) {
        return Ok(render_ansi(code));
    }
    if is_plain_text(tag) {
        return Ok(escape_html(code));
    }
    Err(RenderError::UnknownLanguage {
        tag: tag.to_owned(),
    })
}

/// Human readable language name.
///
/// Unknown tags are shown as-is.
pub fn language_label(tag: &str) -> String {
    if let Some(grammar) = grammar_for(tag) {
        return grammar.label.to_owned();
    }
    match tag.to_ascii_lowercase().as_str() {
        "markdown" | "md" => "Markdown".to_owned(),
        ANSI => "Terminal output".to_owned(),
        "" | "text" | "txt" | "plain" | "plaintext" | "none" => "Plain text".to_owned(),
        _ => tag.to_owned(),
    }
}

/// Canonical tag used in `language-*` CSS classes.
///
/// Aliases resolve to their grammar's tag; anything else without a grammar
/// is `text`.
pub fn canonical_tag(tag: &str) -> &'static str {
    if tag.eq_ignore_ascii_case(ANSI) {
        return ANSI;
    }
    grammar_for(tag).map_or("text", |grammar| grammar.tag)
}
