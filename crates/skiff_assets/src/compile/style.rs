//! Style sub-compiler: the main stylesheet bundle.

use skiff_manifest::AssetManifest;

use crate::compile::CompileMode;
use crate::error::AssetError;
use crate::paths::AssetPaths;
use crate::record::PendingRecord;
use crate::toolchain::Toolchain;

/// Concatenates the manifest's style sources in declared order with a
/// newline after each, runs the vendor-prefix pass, and minifies in
/// production mode.
pub(crate) async fn compile(
    paths: &AssetPaths,
    manifest: &AssetManifest,
    mode: CompileMode,
    toolchain: &Toolchain,
) -> Result<PendingRecord, AssetError> {
    let mut css = String::new();
    for rel in &manifest.styles {
        let path = paths.root.join(rel);
        let source = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| AssetError::io(&path, e))?;
        css.push_str(&source);
        css.push('\n');
    }

    let css = toolchain.prefix_css(&css);
    let css = if mode.minify() {
        toolchain.minify_css(&css)
    } else {
        css
    };
    Ok(PendingRecord::new("style.css", css.into_bytes()))
}
