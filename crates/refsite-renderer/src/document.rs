//! Per-unit document rendering.

use std::collections::BTreeMap;

use refsite_content::{ContentUnit, Route, RouteStyle, file_route};
use serde::Serialize;

use crate::breadcrumb::{Breadcrumb, breadcrumbs};
use crate::code_block::render_code_block;
use crate::error::RenderError;
use crate::highlight::language_label;
use crate::markdown::render_markdown;

/// Renderer settings.
#[derive(Clone, Copy, Debug, Default)]
pub struct RendererConfig {
    /// Route layout the content was loaded with.
    pub route_style: RouteStyle,
    /// Render a line number gutter next to code.
    pub line_numbers: bool,
}

/// A unit rendered for display, ready to be wrapped in a page template.
#[derive(Clone, Debug, Serialize)]
pub struct RenderedDocument {
    pub route: Route,
    pub title: String,
    /// Language tag as detected at load time.
    pub language: String,
    pub language_label: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    /// Body HTML (highlighted code block or rendered Markdown).
    pub body: String,
    /// Source path relative to the content root, `/`-separated.
    pub source_path: String,
    #[serde(skip)]
    pub warnings: Vec<RenderError>,
}

/// Renders [`ContentUnit`]s into [`RenderedDocument`]s.
///
/// Rendering never fails. Unknown languages fall back to plain text and are
/// reported in [`RenderedDocument::warnings`]. The renderer holds no mutable
/// state, so one instance can be shared across threads.
#[derive(Clone, Debug, Default)]
pub struct DocumentRenderer {
    config: RendererConfig,
    directory_titles: BTreeMap<Route, String>,
}

impl DocumentRenderer {
    #[must_use]
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            directory_titles: BTreeMap::new(),
        }
    }

    /// Titles for directory breadcrumbs, keyed by directory route.
    #[must_use]
    pub fn with_directory_titles(mut self, titles: BTreeMap<Route, String>) -> Self {
        self.directory_titles = titles;
        self
    }

    #[must_use]
    pub fn config(&self) -> RendererConfig {
        self.config
    }

    /// Render one unit.
    pub fn render(&self, unit: &ContentUnit) -> RenderedDocument {
        let source_path = unit.source_path();
        let (body, warnings) = if unit.is_markdown() {
            let body = render_markdown(unit.text(), self.config.line_numbers, unit.title());
            (body.html, body.warnings)
        } else {
            let block = render_code_block(unit.text(), unit.language(), self.config.line_numbers);
            (block.html, block.warning.into_iter().collect())
        };

        for warning in &warnings {
            tracing::warn!(path = %source_path, "{warning}");
        }

        RenderedDocument {
            route: file_route(unit.path(), self.config.route_style),
            title: unit.display_title(),
            language: unit.language().to_owned(),
            language_label: language_label(unit.language()),
            breadcrumbs: breadcrumbs(
                unit.directory(),
                self.config.route_style,
                &self.directory_titles,
            ),
            body,
            source_path,
            warnings,
        }
    }
}
