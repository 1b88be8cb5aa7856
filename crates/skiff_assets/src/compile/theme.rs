//! Theme sub-compiler: editor theme stylesheets.

use std::collections::BTreeMap;

use crate::compile::CompileMode;
use crate::error::AssetError;
use crate::paths::AssetPaths;
use crate::record::PendingRecord;
use crate::toolchain::Toolchain;

/// Name the built-in skiff theme is served under.
const BUILTIN_THEME: &str = "skiff";

/// Packages every `*.css` in the themes directory plus the built-in theme
/// as one style record per theme, keyed by theme name.
pub(crate) async fn compile(
    paths: &AssetPaths,
    mode: CompileMode,
    toolchain: &Toolchain,
) -> Result<BTreeMap<String, PendingRecord>, AssetError> {
    let mut themes = BTreeMap::new();

    let mut dir = tokio::fs::read_dir(&paths.themes_dir)
        .await
        .map_err(|e| AssetError::io(&paths.themes_dir, e))?;
    while let Some(entry) = dir
        .next_entry()
        .await
        .map_err(|e| AssetError::io(&paths.themes_dir, e))?
    {
        let file_name = entry.file_name();
        let Some(stem) = file_name.to_str().and_then(|n| n.strip_suffix(".css")) else {
            continue;
        };
        let path = entry.path();
        let css = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| AssetError::io(&path, e))?;
        themes.insert(stem.to_string(), theme_record(stem, css, mode, toolchain));
    }

    let css = tokio::fs::read_to_string(&paths.builtin_theme)
        .await
        .map_err(|e| AssetError::io(&paths.builtin_theme, e))?;
    themes.insert(
        BUILTIN_THEME.to_string(),
        theme_record(BUILTIN_THEME, css, mode, toolchain),
    );
    Ok(themes)
}

fn theme_record(
    name: &str,
    css: String,
    mode: CompileMode,
    toolchain: &Toolchain,
) -> PendingRecord {
    let css = if mode.minify() {
        toolchain.minify_css(&css)
    } else {
        css
    };
    PendingRecord::new(&format!("{name}.css"), css.into_bytes())
}
