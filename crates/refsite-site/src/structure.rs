//! Content structure checks.

use std::collections::BTreeSet;

use refsite_content::{ContentSet, Route, directory_route};

/// A structural problem in the content tree. Never fatal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StructureWarning {
    /// A directory with content has no metadata title.
    #[error("Directory \"{route}\" has no index metadata")]
    MissingIndex { route: Route },
    /// A directory has metadata but no content beneath it.
    #[error("Directory \"{route}\" has metadata but no content")]
    EmptyDirectory { route: Route },
}

/// Check directory metadata against the directories that hold content.
///
/// The root directory is exempt from both checks.
pub fn check_structure(set: &ContentSet) -> Vec<StructureWarning> {
    let style = set.route_style();
    let mut populated = BTreeSet::new();
    for (_, unit) in set.units() {
        let directory = unit.directory();
        for depth in 1..=directory.len() {
            populated.insert(directory_route(&directory[..depth], style));
        }
    }

    let mut warnings = Vec::new();
    for route in &populated {
        let titled = set
            .directory_meta(route)
            .is_some_and(|meta| meta.title.is_some());
        if !titled {
            warnings.push(StructureWarning::MissingIndex {
                route: route.clone(),
            });
        }
    }
    for (route, _) in set.directories() {
        if !route.is_root() && !populated.contains(route) {
            warnings.push(StructureWarning::EmptyDirectory {
                route: route.clone(),
            });
        }
    }

    for warning in &warnings {
        tracing::warn!("{warning}");
    }
    warnings
}
