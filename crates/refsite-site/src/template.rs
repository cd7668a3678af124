//! HTML page template.
//!
//! Every page shares one layout: a top bar with the menu button, the
//! navigation sidebar, breadcrumbs, the page header and the body.

use std::fmt::Write;

use refsite_content::Route;
use refsite_renderer::{HOME_TITLE, RenderedDocument, escape_html};

use crate::links::Links;
use crate::nav::{NavNode, NavTree};

/// A breadcrumb entry with a resolved link.
struct CrumbData {
    title: String,
    href: Option<String>,
}

/// All data needed to render one page.
struct PageData<'a> {
    title: &'a str,
    route: &'a Route,
    breadcrumbs: Vec<CrumbData>,
    language_label: Option<&'a str>,
    source_path: Option<&'a str>,
    content: String,
}

/// Renders complete HTML pages against a navigation tree.
pub(crate) struct PageRenderer<'a> {
    pub site_title: &'a str,
    pub tree: &'a NavTree,
    pub links: &'a Links,
}

impl PageRenderer<'_> {
    /// Page for a rendered content unit.
    pub fn document_page(&self, doc: &RenderedDocument) -> String {
        let breadcrumbs = doc
            .breadcrumbs
            .iter()
            .map(|crumb| CrumbData {
                title: crumb.title.clone(),
                href: crumb.route.as_ref().map(|to| self.links.page(&doc.route, to)),
            })
            .collect();

        self.render_page(&PageData {
            title: &doc.title,
            route: &doc.route,
            breadcrumbs,
            language_label: Some(&doc.language_label),
            source_path: Some(&doc.source_path),
            content: doc.body.clone(),
        })
    }

    /// Listing page for a directory without a page of its own.
    pub fn section_page(&self, node: &NavNode) -> String {
        let mut content = String::new();
        if let Some(description) = &node.description {
            let _ = writeln!(
                content,
                "<p class=\"description\">{}</p>",
                escape_html(description)
            );
        }
        content.push_str("<ul class=\"toc\">\n");
        for child in node.children() {
            let _ = writeln!(
                content,
                "<li><a href=\"{}\">{}</a></li>",
                escape_html(&self.links.page(&node.route, &child.route)),
                escape_html(&child.title),
            );
        }
        content.push_str("</ul>\n");

        self.render_page(&PageData {
            title: &node.title,
            route: &node.route,
            breadcrumbs: self.ancestor_crumbs(&node.route),
            language_label: None,
            source_path: None,
            content,
        })
    }

    /// Site index: the whole tree as a table of contents.
    pub fn root_page(&self) -> String {
        let root = self.tree.root();
        let mut content = String::new();
        if let Some(description) = &root.description {
            let _ = writeln!(
                content,
                "<p class=\"description\">{}</p>",
                escape_html(description)
            );
        }
        content.push_str("<ul class=\"toc\">\n");
        self.render_toc(&mut content, root.children());
        content.push_str("</ul>\n");

        self.render_page(&PageData {
            title: self.site_title,
            route: &root.route,
            breadcrumbs: Vec::new(),
            language_label: None,
            source_path: None,
            content,
        })
    }

    fn render_toc<'n>(&self, html: &mut String, nodes: impl Iterator<Item = &'n NavNode>) {
        let root = Route::root();
        for node in nodes {
            let _ = write!(
                html,
                "<li><a href=\"{}\">{}</a>",
                escape_html(&self.links.page(&root, &node.route)),
                escape_html(&node.title),
            );
            if node.has_children() {
                html.push_str("\n<ul>\n");
                self.render_toc(html, node.children());
                html.push_str("</ul>\n");
            }
            html.push_str("</li>\n");
        }
    }

    /// Breadcrumbs for a section: every ancestor, linked.
    fn ancestor_crumbs(&self, route: &Route) -> Vec<CrumbData> {
        let mut crumbs = vec![CrumbData {
            title: HOME_TITLE.to_owned(),
            href: Some(self.links.page(route, &Route::root())),
        }];
        let mut prefix = Route::root();
        let segments: Vec<&str> = route.segments().collect();
        for segment in segments.iter().take(segments.len().saturating_sub(1)) {
            prefix = prefix.join(segment);
            let title = self
                .tree
                .find(&prefix)
                .map_or_else(|| (*segment).to_owned(), |node| node.title.clone());
            crumbs.push(CrumbData {
                title,
                href: Some(self.links.page(route, &prefix)),
            });
        }
        crumbs
    }

    fn render_page(&self, page: &PageData) -> String {
        let mut html = String::with_capacity(8192 + page.content.len());

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        if page.route.is_root() {
            let _ = writeln!(html, "<title>{}</title>", escape_html(self.site_title));
        } else {
            let _ = writeln!(
                html,
                "<title>{} - {}</title>",
                escape_html(page.title),
                escape_html(self.site_title)
            );
        }
        let _ = writeln!(
            html,
            "<link rel=\"stylesheet\" href=\"{}\">",
            escape_html(&self.links.asset(page.route, "style.css"))
        );
        let _ = writeln!(
            html,
            "<script src=\"{}\" defer></script>",
            escape_html(&self.links.asset(page.route, "app.js"))
        );
        html.push_str("</head>\n<body>\n");

        self.render_topbar(&mut html, page.route);

        html.push_str("<div class=\"layout\">\n");
        self.render_sidebar(&mut html, page.route);

        html.push_str("<main class=\"content\">\n");
        render_breadcrumbs(&mut html, &page.breadcrumbs);
        let _ = writeln!(
            html,
            "<h1 class=\"page-title\">{}</h1>",
            escape_html(page.title)
        );
        if page.language_label.is_some() || page.source_path.is_some() {
            html.push_str("<div class=\"page-meta\">");
            if let Some(label) = page.language_label {
                let _ = write!(html, "<span class=\"language\">{}</span>", escape_html(label));
            }
            if let Some(source) = page.source_path {
                let _ = write!(html, "<span class=\"source-path\">{}</span>", escape_html(source));
            }
            html.push_str("</div>\n");
        }
        html.push_str("<article>\n");
        html.push_str(&page.content);
        html.push_str("\n</article>\n</main>\n</div>\n");
        html.push_str("</body>\n</html>\n");
        html
    }

    fn render_topbar(&self, html: &mut String, current: &Route) {
        html.push_str("<header class=\"topbar\">\n");
        html.push_str(
            "<button class=\"menu-button\" type=\"button\" aria-label=\"Toggle navigation\">\
             <span class=\"menu-icon\"><span class=\"bar1\"></span>\
             <span class=\"bar2\"></span><span class=\"bar3\"></span></span></button>\n",
        );
        let _ = writeln!(
            html,
            "<a class=\"site-title\" href=\"{}\">{}</a>",
            escape_html(&self.links.page(current, &Route::root())),
            escape_html(self.site_title)
        );
        html.push_str("</header>\n");
    }

    fn render_sidebar(&self, html: &mut String, current: &Route) {
        html.push_str("<aside class=\"sidebar\">\n<nav>\n<ul class=\"nav-tree\">\n");
        self.render_nav_items(html, self.tree.root().children(), current);
        html.push_str("</ul>\n</nav>\n</aside>\n");
    }

    fn render_nav_items<'n>(
        &self,
        html: &mut String,
        items: impl Iterator<Item = &'n NavNode>,
        current: &Route,
    ) {
        for item in items {
            if item.has_children() {
                html.push_str("<li class=\"section\">");
            } else {
                html.push_str("<li>");
            }
            let active = if item.route == *current {
                " class=\"active\""
            } else {
                ""
            };
            let _ = write!(
                html,
                "<a href=\"{}\"{active}>{}</a>",
                escape_html(&self.links.page(current, &item.route)),
                escape_html(&item.title),
            );
            if item.has_children() {
                html.push_str("\n<ul>\n");
                self.render_nav_items(html, item.children(), current);
                html.push_str("</ul>\n");
            }
            html.push_str("</li>\n");
        }
    }
}

fn render_breadcrumbs(html: &mut String, breadcrumbs: &[CrumbData]) {
    if breadcrumbs.is_empty() {
        return;
    }
    html.push_str("<nav class=\"breadcrumbs\">\n<ol>\n");
    for crumb in breadcrumbs {
        match &crumb.href {
            Some(href) => {
                let _ = writeln!(
                    html,
                    "<li><a href=\"{}\">{}</a></li>",
                    escape_html(href),
                    escape_html(&crumb.title)
                );
            }
            None => {
                let _ = writeln!(html, "<li><span>{}</span></li>", escape_html(&crumb.title));
            }
        }
    }
    html.push_str("</ol>\n</nav>\n");
}
