//! Static assets shipped with every site.

use std::fs;
use std::path::Path;

use crate::error::BuildError;
use crate::links::ASSETS_DIR;

/// Assets compiled into the binary from the crate's `assets/` directory.
#[derive(rust_embed::RustEmbed)]
#[folder = "assets/"]
struct Assets;

/// Names of all embedded assets in sorted order.
pub fn asset_names() -> Vec<String> {
    let mut names: Vec<String> = Assets::iter().map(|name| name.into_owned()).collect();
    names.sort();
    names
}

/// Contents of an embedded asset.
pub fn get(name: &str) -> Option<Vec<u8>> {
    Assets::get(name).map(|file| file.data.into_owned())
}

/// Write every asset to `<output>/assets/`. Returns the number written.
pub(crate) fn write_assets(output: &Path) -> Result<usize, BuildError> {
    let dir = output.join(ASSETS_DIR);
    fs::create_dir_all(&dir).map_err(|e| BuildError::io(&dir, e))?;

    let names = asset_names();
    for name in &names {
        let Some(data) = get(name) else {
            continue;
        };
        let path = dir.join(name);
        fs::write(&path, data).map_err(|e| BuildError::io(&path, e))?;
    }
    Ok(names.len())
}
