//! Script sub-compiler: the main client bundle.

use skiff_manifest::AssetManifest;

use crate::compile::CompileMode;
use crate::error::AssetError;
use crate::paths::AssetPaths;
use crate::record::PendingRecord;
use crate::sprite::SpriteMap;
use crate::templates;
use crate::toolchain::Toolchain;

/// Placeholder in the concatenated script replaced by the sprite map.
pub const SPRITE_PLACEHOLDER: &str = "/* {{ sprites }} */";
/// Placeholder replaced by the precompiled client templates.
pub const TEMPLATE_PLACEHOLDER: &str = "/* {{ templates }} */";

/// Concatenates the manifest's script sources in declared order with a
/// statement terminator after each, performs the two placeholder
/// substitutions, and minifies in production mode.
///
/// Each placeholder is substituted at most once; a placeholder that is
/// absent from the concatenated source is simply left alone, and its
/// generated content is not even computed.
pub(crate) async fn compile(
    paths: &AssetPaths,
    manifest: &AssetManifest,
    mode: CompileMode,
    toolchain: &Toolchain,
    sprites: &SpriteMap,
) -> Result<PendingRecord, AssetError> {
    let mut js = String::new();
    for rel in &manifest.scripts {
        let path = paths.root.join(rel);
        let source = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| AssetError::io(&path, e))?;
        js.push_str(&source);
        js.push(';');
    }

    let js = if js.contains(SPRITE_PLACEHOLDER) {
        substitute_once(&js, SPRITE_PLACEHOLDER, &sprites.to_js()?)
    } else {
        js
    };
    let js = if js.contains(TEMPLATE_PLACEHOLDER) {
        let compiled = templates::precompile_dir(&paths.templates_dir).await?;
        substitute_once(&js, TEMPLATE_PLACEHOLDER, &compiled)
    } else {
        js
    };

    let js = if mode.minify() {
        toolchain.minify_js(&js)
    } else {
        js
    };
    Ok(PendingRecord::new("client.js", js.into_bytes()))
}

/// Replaces the first occurrence of `placeholder`, leaving every other
/// byte unchanged.
fn substitute_once(text: &str, placeholder: &str, replacement: &str) -> String {
    match text.find(placeholder) {
        Some(start) => {
            let mut out =
                String::with_capacity(text.len() - placeholder.len() + replacement.len());
            out.push_str(&text[..start]);
            out.push_str(replacement);
            out.push_str(&text[start + placeholder.len()..]);
            out
        }
        None => text.to_string(),
    }
}
