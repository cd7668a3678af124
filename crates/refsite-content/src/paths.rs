//! Filesystem path comparison.

use std::path::{Component, Path, PathBuf};

/// Resolve `path` to an absolute form with symlinks and `.`/`..` removed.
///
/// The longest existing prefix is canonicalized; components below it that do
/// not exist yet are applied lexically.
pub fn resolve_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_default().join(path)
    };
    let components: Vec<Component> = absolute.components().collect();

    for split in (1..=components.len()).rev() {
        let prefix: PathBuf = components[..split].iter().collect();
        if let Ok(canonical) = prefix.canonicalize() {
            return push_lexically(canonical, &components[split..]);
        }
    }
    push_lexically(PathBuf::new(), &components)
}

fn push_lexically(mut base: PathBuf, components: &[Component]) -> PathBuf {
    for component in components {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                base.pop();
            }
            other => base.push(other),
        }
    }
    base
}

/// Whether `a` and `b` are the same directory or one lies inside the other.
///
/// ```
/// use std::path::Path;
/// use refsite_content::dirs_overlap;
///
/// assert!(dirs_overlap(Path::new("/srv/docs"), Path::new("/srv/docs/build")));
/// assert!(dirs_overlap(Path::new("/srv/docs/build/.."), Path::new("/srv/docs")));
/// assert!(!dirs_overlap(Path::new("/srv/docs"), Path::new("/srv/site")));
/// ```
pub fn dirs_overlap(a: &Path, b: &Path) -> bool {
    let a = resolve_path(a);
    let b = resolve_path(b);
    a.starts_with(&b) || b.starts_with(&a)
}
