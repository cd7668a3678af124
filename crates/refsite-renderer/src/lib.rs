//! Document rendering for refsite.
//!
//! Turns a [`ContentUnit`](refsite_content::ContentUnit) into a
//! [`RenderedDocument`]: a highlighted code block (or rendered Markdown), the
//! language label and a breadcrumb trail.
//!
//! Highlighting is lexical and table-driven (see [`Grammar`]). Tags without a
//! grammar do not abort rendering: the code is shown as plain text and a
//! [`RenderError`] is recorded on the document.
//!
//! # Example
//!
//! ```
//! use refsite_content::ContentUnit;
//! use refsite_renderer::DocumentRenderer;
//!
//! let unit = ContentUnit::new(
//!     vec!["a".to_owned(), "b".to_owned(), "c.cpp".to_owned()],
//!     "int main(){}".to_owned(),
//!     "cpp",
//! );
//! let doc = DocumentRenderer::default().render(&unit);
//! assert_eq!(doc.route.as_str(), "a/b/c");
//! assert_eq!(doc.language_label, "C++");
//! ```

mod breadcrumb;
mod code_block;
mod document;
mod error;
mod escape;
pub mod highlight;
mod markdown;

pub use breadcrumb::{Breadcrumb, HOME_TITLE, breadcrumbs};
pub use code_block::{CodeBlock, render_code_block};
pub use document::{DocumentRenderer, RenderedDocument, RendererConfig};
pub use error::RenderError;
pub use escape::{escape_html, escape_html_into};
pub use highlight::{Grammar, language_label, try_highlight};
