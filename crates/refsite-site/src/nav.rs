//! Navigation tree.
//!
//! The tree mirrors the route hierarchy: one node per route segment, rooted
//! at the site root. Leaves are content pages; internal nodes are sections
//! (and may carry a page of their own when a file and a directory share a
//! route). The tree is built once and only read afterwards.

use std::collections::BTreeMap;

use refsite_content::{ContentSet, Route, directory_route, title_from_segment};
use refsite_renderer::HOME_TITLE;
use serde::{Serialize, Serializer};

/// One node of the navigation tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavNode {
    pub title: String,
    pub route: Route,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// A content unit is published at this route.
    pub page: bool,
    #[serde(serialize_with = "serialize_children")]
    children: BTreeMap<String, NavNode>,
}

fn serialize_children<S: Serializer>(
    children: &BTreeMap<String, NavNode>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(children.values())
}

impl NavNode {
    fn new(route: Route, title: String) -> Self {
        Self {
            title,
            route,
            description: None,
            page: false,
            children: BTreeMap::new(),
        }
    }

    /// Children in segment order.
    pub fn children(&self) -> impl ExactSizeIterator<Item = &NavNode> {
        self.children.values()
    }

    /// Child by (normalized) segment name.
    pub fn child(&self, segment: &str) -> Option<&NavNode> {
        self.children.get(segment)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Internal node without a page of its own.
    pub fn is_section(&self) -> bool {
        !self.page && self.has_children()
    }

    fn descendants<'a>(&'a self, out: &mut Vec<&'a NavNode>) {
        for child in self.children.values() {
            out.push(child);
            child.descendants(out);
        }
    }
}

/// Navigation tree rooted at the site root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavTree {
    root: NavNode,
}

impl NavTree {
    /// Build a tree from routes alone. Titles are derived from segments.
    pub fn from_routes<'a>(routes: impl IntoIterator<Item = &'a Route>) -> Self {
        let mut root = NavNode::new(Route::root(), HOME_TITLE.to_owned());
        for route in routes {
            let mut node = &mut root;
            for segment in route.segments() {
                let child_route = node.route.join(segment);
                node = node
                    .children
                    .entry(segment.to_owned())
                    .or_insert_with(|| NavNode::new(child_route, title_from_segment(segment)));
            }
            node.page = true;
        }
        Self { root }
    }

    /// Build a tree for a loaded content set.
    ///
    /// Directory nodes are titled from their original names or from their
    /// metadata; page nodes take their unit's title.
    pub fn from_content(set: &ContentSet) -> Self {
        let mut tree = Self::from_routes(set.routes());
        let style = set.route_style();

        for (_, unit) in set.units() {
            let directory = unit.directory();
            for depth in 1..=directory.len() {
                let route = directory_route(&directory[..depth], style);
                if let Some(node) = tree.find_mut(&route) {
                    node.title = title_from_segment(&directory[depth - 1]);
                }
            }
        }

        for (route, meta) in set.directories() {
            if let Some(node) = tree.find_mut(route) {
                if let Some(title) = &meta.title {
                    node.title.clone_from(title);
                }
                node.description.clone_from(&meta.description);
            }
        }

        for (route, unit) in set.units() {
            if let Some(node) = tree.find_mut(route) {
                node.title = unit.display_title();
            }
        }

        tree
    }

    pub fn root(&self) -> &NavNode {
        &self.root
    }

    /// Node at `route`.
    pub fn find(&self, route: &Route) -> Option<&NavNode> {
        route
            .segments()
            .try_fold(&self.root, |node, segment| node.children.get(segment))
    }

    fn find_mut(&mut self, route: &Route) -> Option<&mut NavNode> {
        let mut node = &mut self.root;
        for segment in route.segments() {
            node = node.children.get_mut(segment)?;
        }
        Some(node)
    }

    /// All nodes except the root, depth-first in segment order.
    pub fn nodes(&self) -> Vec<&NavNode> {
        let mut out = Vec::new();
        self.root.descendants(&mut out);
        out
    }

    /// Nodes that need a generated section page.
    pub fn sections(&self) -> Vec<&NavNode> {
        self.nodes().into_iter().filter(|n| n.is_section()).collect()
    }

    /// Serialize the tree as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(&self.root)?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use refsite_content::{ContentLoader, LoaderConfig, RouteStyle};

    use super::*;
    use pretty_assertions::assert_eq;

    fn routes(paths: &[&str]) -> Vec<Route> {
        paths.iter().map(|p| Route::from_normalized(*p)).collect()
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_single_unit_builds_chain() {
        let routes = routes(&["a/b/c"]);
        let tree = NavTree::from_routes(&routes);

        let a = tree.root().child("a").unwrap();
        let b = a.child("b").unwrap();
        let c = b.child("c").unwrap();
        assert_eq!(a.route.as_str(), "a");
        assert_eq!(b.route.as_str(), "a/b");
        assert_eq!(c.route.as_str(), "a/b/c");
        assert!(!a.page && !b.page);
        assert!(c.page);
        assert!(!c.has_children());
        assert_eq!(tree.root().children().len(), 1);
    }

    #[test]
    fn test_shared_prefixes_merge() {
        let routes = routes(&["a/x", "a/y", "b"]);
        let tree = NavTree::from_routes(&routes);

        let a = tree.root().child("a").unwrap();
        let names: Vec<&str> = a.children().map(|n| n.route.as_str()).collect();
        assert_eq!(names, vec!["a/x", "a/y"]);
        assert_eq!(tree.root().children().len(), 2);
    }

    #[test]
    fn test_node_can_be_page_and_section() {
        let routes = routes(&["a/b", "a/b/c"]);
        let tree = NavTree::from_routes(&routes);

        let b = tree.find(&Route::from_normalized("a/b")).unwrap();
        assert!(b.page);
        assert!(b.has_children());
        assert!(!b.is_section());
        let sections: Vec<&str> = tree.sections().iter().map(|n| n.route.as_str()).collect();
        assert_eq!(sections, vec!["a"]);
    }

    #[test]
    fn test_find() {
        let routes = routes(&["a/b/c"]);
        let tree = NavTree::from_routes(&routes);

        assert_eq!(tree.find(&Route::root()).unwrap().title, "Home");
        assert!(tree.find(&Route::from_normalized("a/b")).is_some());
        assert!(tree.find(&Route::from_normalized("a/c")).is_none());
    }

    #[test]
    fn test_nodes_are_depth_first() {
        let routes = routes(&["b", "a/y", "a/x"]);
        let tree = NavTree::from_routes(&routes);

        let order: Vec<&str> = tree.nodes().iter().map(|n| n.route.as_str()).collect();
        assert_eq!(order, vec!["a", "a/x", "a/y", "b"]);
    }

    #[test]
    fn test_from_content_titles() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "01_basics/meta.yaml", "title: The Basics\ndescription: Start here\n");
        write(dir.path(), "01_basics/hello_world.cpp", "");
        write(dir.path(), "02_casts/static_cast.cpp", "");
        write(dir.path(), "guide.md", "# User Guide\n");
        let set = ContentLoader::default().load(dir.path()).unwrap();

        let tree = NavTree::from_content(&set);

        let basics = tree.find(&Route::from_normalized("01-basics")).unwrap();
        assert_eq!(basics.title, "The Basics");
        assert_eq!(basics.description.as_deref(), Some("Start here"));
        let casts = tree.find(&Route::from_normalized("02-casts")).unwrap();
        assert_eq!(casts.title, "Casts");
        let hello = tree
            .find(&Route::from_normalized("01-basics/hello-world"))
            .unwrap();
        assert_eq!(hello.title, "Hello World");
        let guide = tree.find(&Route::from_normalized("guide")).unwrap();
        assert_eq!(guide.title, "User Guide");
    }

    #[test]
    fn test_from_content_flat_is_one_level() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a/b/c.cpp", "");
        write(dir.path(), "a/d.cpp", "");
        let set = ContentLoader::new(LoaderConfig {
            route_style: RouteStyle::Flat,
            ..LoaderConfig::default()
        })
        .load(dir.path())
        .unwrap();

        let tree = NavTree::from_content(&set);

        let routes: Vec<&str> = tree.root().children().map(|n| n.route.as_str()).collect();
        assert_eq!(routes, vec!["a-b-c", "a-d"]);
        assert!(tree.sections().is_empty());
    }

    #[test]
    fn test_json_shape() {
        let routes = routes(&["a/b"]);
        let tree = NavTree::from_routes(&routes);

        let value: serde_json::Value = serde_json::from_str(&tree.to_json().unwrap()).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "title": "Home",
                "route": "",
                "page": false,
                "children": [{
                    "title": "A",
                    "route": "a",
                    "page": false,
                    "children": [{
                        "title": "B",
                        "route": "a/b",
                        "page": true,
                        "children": []
                    }]
                }]
            })
        );
    }
}
