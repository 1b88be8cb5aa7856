//! Fixed filesystem roots consumed by the compiler.

use std::path::{Path, PathBuf};

/// Path provider for the asset compiler.
///
/// All fields are public so callers (and tests) can point individual roots
/// somewhere else after construction.
#[derive(Debug, Clone)]
pub struct AssetPaths {
    /// Project root; manifest source paths resolve against this.
    pub root: PathBuf,
    /// Client asset root (`<root>/client`).
    pub client_dir: PathBuf,
    /// Single persisted cache file.
    pub cache_file: PathBuf,
    /// Directory of svg icon sources for the sprite map.
    pub svg_dir: PathBuf,
    /// Directory of client template sources to precompile.
    pub templates_dir: PathBuf,
    /// Directory of editor theme stylesheets.
    pub themes_dir: PathBuf,
    /// Directory of editor language mode implementations.
    pub modes_dir: PathBuf,
    /// Structured registry of supported editor modes.
    pub mode_registry: PathBuf,
    /// The built-in skiff editor theme.
    pub builtin_theme: PathBuf,
}

impl AssetPaths {
    /// Derives the standard layout below `root`.
    pub fn from_root(root: &Path) -> Self {
        let root = root.to_path_buf();
        let client_dir = root.join("client");
        let editor = client_dir.join("vendor").join("editor");
        Self {
            cache_file: root.join("dist").join("cache.bin"),
            svg_dir: client_dir.join("svg"),
            templates_dir: client_dir.join("templates"),
            themes_dir: editor.join("theme"),
            modes_dir: editor.join("mode"),
            mode_registry: editor.join("modes.json"),
            builtin_theme: client_dir.join("editor-theme.css"),
            client_dir,
            root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_layout_hangs_off_root() {
        let paths = AssetPaths::from_root(Path::new("/srv/skiff"));
        assert_eq!(paths.client_dir, Path::new("/srv/skiff/client"));
        assert_eq!(paths.cache_file, Path::new("/srv/skiff/dist/cache.bin"));
        assert_eq!(
            paths.mode_registry,
            Path::new("/srv/skiff/client/vendor/editor/modes.json")
        );
    }
}
