//! Static site builder.
//!
//! A build runs in two phases. [`StaticSiteBuilder::prepare`] loads nothing
//! from disk beyond what it is given and renders every page in memory; only
//! then does [`StaticSiteBuilder::write`] touch the output directory. A load
//! failure therefore never leaves partial output behind.
//!
//! `write` also refuses an output directory that overlaps the source, and
//! routes that would collide on a case-insensitive filesystem, before it
//! removes or creates anything.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use rayon::prelude::*;
use refsite_content::{ContentLoader, ContentSet, Route, dirs_overlap};
use refsite_renderer::{DocumentRenderer, RenderError, RenderedDocument, RendererConfig};

use crate::assets::write_assets;
use crate::error::BuildError;
use crate::links::Links;
use crate::nav::NavTree;
use crate::structure::{StructureWarning, check_structure};
use crate::template::PageRenderer;

/// File name of the navigation index.
pub const NAVIGATION_FILE: &str = "navigation.json";

const PAGE_FILE: &str = "index.html";

/// Site-level build settings.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    pub site_title: String,
    /// Prefix for absolute links.
    pub base_url: String,
    /// Emit links relative to each page instead of absolute ones.
    pub relative_links: bool,
    pub line_numbers: bool,
    /// Remove the output directory before writing.
    pub clean: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            site_title: "Documentation".to_owned(),
            base_url: "/".to_owned(),
            relative_links: true,
            line_numbers: false,
            clean: false,
        }
    }
}

/// A non-fatal problem found while rendering a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderWarning {
    /// Source path of the unit.
    pub source_path: String,
    pub error: RenderError,
}

/// A fully rendered site, not yet written.
#[derive(Debug)]
pub struct PreparedSite {
    /// Directory the content was loaded from, if it came from disk.
    pub source_dir: Option<PathBuf>,
    pub tree: NavTree,
    pub documents: Vec<RenderedDocument>,
    pub structure_warnings: Vec<StructureWarning>,
}

impl PreparedSite {
    /// Render warnings of all documents in route order.
    pub fn render_warnings(&self) -> Vec<RenderWarning> {
        self.documents
            .iter()
            .flat_map(|doc| {
                doc.warnings.iter().map(|error| RenderWarning {
                    source_path: doc.source_path.clone(),
                    error: error.clone(),
                })
            })
            .collect()
    }
}

/// Outcome of a successful build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Content pages written.
    pub pages: usize,
    /// Generated section pages written.
    pub sections: usize,
    pub render_warnings: Vec<RenderWarning>,
    pub structure_warnings: Vec<StructureWarning>,
}

/// Builds a static documentation site from a content directory.
pub struct StaticSiteBuilder {
    loader: ContentLoader,
    config: BuildConfig,
}

impl StaticSiteBuilder {
    pub fn new(loader: ContentLoader, config: BuildConfig) -> Self {
        Self { loader, config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn loader(&self) -> &ContentLoader {
        &self.loader
    }

    /// Load `source` and write the site to `output`.
    pub fn build(&self, source: &Path, output: &Path) -> Result<BuildReport, BuildError> {
        check_output_dir(source, output)?;
        let set = self.loader.load(source)?;
        let site = self.prepare(&set);
        self.write(&site, output)
    }

    /// Build the navigation tree and render every unit.
    pub fn prepare(&self, set: &ContentSet) -> PreparedSite {
        let tree = NavTree::from_content(set);
        let structure_warnings = check_structure(set);

        let directory_titles: BTreeMap<Route, String> = set
            .directories()
            .filter_map(|(route, meta)| meta.title.clone().map(|title| (route.clone(), title)))
            .collect();
        let renderer = DocumentRenderer::new(RendererConfig {
            route_style: set.route_style(),
            line_numbers: self.config.line_numbers,
        })
        .with_directory_titles(directory_titles);

        let units: Vec<_> = set.units().map(|(_, unit)| unit).collect();
        let documents: Vec<RenderedDocument> =
            units.par_iter().map(|unit| renderer.render(unit)).collect();
        tracing::info!(documents = documents.len(), "Rendered documents");

        PreparedSite {
            source_dir: set.root().map(Path::to_path_buf),
            tree,
            documents,
            structure_warnings,
        }
    }

    /// Write a prepared site to `output`.
    pub fn write(&self, site: &PreparedSite, output: &Path) -> Result<BuildReport, BuildError> {
        if let Some(source) = &site.source_dir {
            check_output_dir(source, output)?;
        }
        check_case_collisions(site)?;

        if self.config.clean && output.exists() {
            tracing::info!(path = %output.display(), "Cleaning output directory");
            fs::remove_dir_all(output).map_err(|e| BuildError::io(output, e))?;
        }
        fs::create_dir_all(output).map_err(|e| BuildError::io(output, e))?;

        let links = Links::new(self.config.relative_links, &self.config.base_url);
        let pages = PageRenderer {
            site_title: &self.config.site_title,
            tree: &site.tree,
            links: &links,
        };

        site.documents.par_iter().try_for_each(|doc| {
            write_page(output, &doc.route, &pages.document_page(doc))
        })?;

        let sections = site.tree.sections();
        sections
            .par_iter()
            .try_for_each(|node| write_page(output, &node.route, &pages.section_page(node)))?;

        write_page(output, &Route::root(), &pages.root_page())?;

        let navigation = output.join(NAVIGATION_FILE);
        fs::write(&navigation, site.tree.to_json()?).map_err(|e| BuildError::io(&navigation, e))?;

        let assets = write_assets(output)?;

        tracing::info!(
            pages = site.documents.len(),
            sections = sections.len(),
            assets,
            output = %output.display(),
            "Site written"
        );

        Ok(BuildReport {
            pages: site.documents.len(),
            sections: sections.len(),
            render_warnings: site.render_warnings(),
            structure_warnings: site.structure_warnings.clone(),
        })
    }
}

fn check_output_dir(source: &Path, output: &Path) -> Result<(), BuildError> {
    if dirs_overlap(source, output) {
        return Err(BuildError::OutputOverlapsSource {
            source_dir: source.to_path_buf(),
            output_dir: output.to_path_buf(),
        });
    }
    Ok(())
}

/// Reject routes whose on-disk directories differ only by case.
fn check_case_collisions(site: &PreparedSite) -> Result<(), BuildError> {
    let routes = site
        .documents
        .iter()
        .map(|doc| &doc.route)
        .chain(site.tree.sections().into_iter().map(|node| &node.route));

    let mut seen: HashMap<String, &Route> = HashMap::new();
    for route in routes {
        let folded = route_dir(Path::new(""), route)
            .to_string_lossy()
            .to_lowercase();
        if let Some(first) = seen.insert(folded, route)
            && first != route
        {
            let (first, second) = if first < route {
                (first, route)
            } else {
                (route, first)
            };
            return Err(BuildError::CaseCollision {
                first: first.clone(),
                second: second.clone(),
            });
        }
    }
    Ok(())
}

/// Filesystem directory for a route. Percent-escapes are decoded so that
/// servers resolving the URL find the file.
fn route_dir(output: &Path, route: &Route) -> PathBuf {
    let mut dir = output.to_path_buf();
    for segment in route.segments() {
        dir.push(percent_decode_str(segment).decode_utf8_lossy().as_ref());
    }
    dir
}

fn write_page(output: &Path, route: &Route, html: &str) -> Result<(), BuildError> {
    let dir = route_dir(output, route);
    fs::create_dir_all(&dir).map_err(|e| BuildError::io(&dir, e))?;
    let path = dir.join(PAGE_FILE);
    fs::write(&path, html).map_err(|e| BuildError::io(&path, e))?;
    tracing::debug!(route = %route, "Wrote page");
    Ok(())
}
