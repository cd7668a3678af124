//! Code block markup.

use std::fmt::Write;

use crate::error::RenderError;
use crate::escape::escape_html;
use crate::highlight::{canonical_tag, try_highlight};

/// A rendered `<pre>` block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeBlock {
    pub html: String,
    /// Set when the tag had no grammar and the block fell back to plain text.
    pub warning: Option<RenderError>,
}

/// Render `code` as a highlighted `<pre class="code">` block.
///
/// Unknown tags never fail: the code is emitted escaped inside a
/// `language-text` block and the error is returned alongside.
pub fn render_code_block(code: &str, tag: &str, line_numbers: bool) -> CodeBlock {
    let code = code.strip_suffix('\n').unwrap_or(code);
    let (body, warning) = match try_highlight(code, tag) {
        Ok(body) => (body, None),
        Err(err) => (escape_html(code), Some(err)),
    };

    let mut html = String::with_capacity(body.len() + 128);
    if line_numbers {
        html.push_str(r#"<pre class="code numbered"><span class="gutter" aria-hidden="true">"#);
        for n in 1..=code.split('\n').count() {
            let _ = write!(html, r#"<span class="line-number">{n}</span>"#);
            html.push('\n');
        }
        html.push_str("</span>");
    } else {
        html.push_str(r#"<pre class="code">"#);
    }
    let _ = write!(
        html,
        r#"<code class="language-{}">{body}</code></pre>"#,
        canonical_tag(tag)
    );

    CodeBlock { html, warning }
}
