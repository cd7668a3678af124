//! Markdown prose rendering.
//!
//! Prose goes through `pulldown-cmark`'s HTML writer; fenced code blocks are
//! intercepted and replaced by highlighted blocks so code looks the same in
//! prose pages and in source pages.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use refsite_content::extract_markdown_title;

use crate::code_block::render_code_block;
use crate::error::RenderError;

/// Rendered Markdown body.
#[derive(Debug, Default)]
pub(crate) struct MarkdownBody {
    pub html: String,
    pub warnings: Vec<RenderError>,
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Render Markdown to HTML.
///
/// With a `title`, the ATX level-1 heading the title was taken from is
/// dropped; the page template shows the title instead. Other level-1
/// headings, setext ones included, stay in the body.
pub(crate) fn render_markdown(
    text: &str,
    line_numbers: bool,
    title: Option<&str>,
) -> MarkdownBody {
    let mut events = Vec::new();
    let mut warnings = Vec::new();
    let mut code: Option<(String, String)> = None;
    let mut title_pending = title;
    let mut in_title = false;

    for (event, range) in Parser::new_ext(text, parser_options()).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) if title_pending.is_some()
                && extract_markdown_title(&text[range]).as_deref() == title_pending =>
            {
                title_pending = None;
                in_title = true;
            }
            Event::End(TagEnd::Heading(HeadingLevel::H1)) if in_title => in_title = false,
            _ if in_title => {}
            Event::Start(Tag::CodeBlock(kind)) => {
                let tag = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().unwrap_or_default().to_owned()
                    }
                    CodeBlockKind::Indented => String::new(),
                };
                code = Some((tag, String::new()));
            }
            Event::Text(content) if code.is_some() => {
                if let Some((_, buffer)) = code.as_mut() {
                    buffer.push_str(&content);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((tag, buffer)) = code.take() {
                    let block = render_code_block(&buffer, &tag, line_numbers);
                    warnings.extend(block.warning);
                    events.push(Event::Html(block.html.into()));
                }
            }
            other => events.push(other),
        }
    }

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    MarkdownBody {
        html: out,
        warnings,
    }
}
