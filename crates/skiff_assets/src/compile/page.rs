//! Markup sub-compiler: pages composed from a shared base document.
//!
//! The substitution points are part of the data model, not implicit DOM
//! structure: the base document carries the literal content slot
//! `<!-- page -->`, icon references are `<!-- icon:NAME -->` markers, and
//! the page type is stamped as a `data-type` attribute on the document
//! root.

use std::collections::BTreeMap;

use skiff_manifest::AssetManifest;

use crate::compile::CompileMode;
use crate::error::AssetError;
use crate::paths::AssetPaths;
use crate::record::PendingRecord;
use crate::sprite::SpriteMap;
use crate::toolchain::Toolchain;

/// The named content slot in the base document.
pub(crate) const CONTENT_SLOT: &str = "<!-- page -->";

/// Composes the three page records (`main.html`, `auth.html`,
/// `firstrun.html`) into `res`. The first-run page reuses the auth
/// fragment under its own page type.
pub(crate) async fn compile_into(
    res: &mut BTreeMap<String, PendingRecord>,
    paths: &AssetPaths,
    manifest: &AssetManifest,
    mode: CompileMode,
    toolchain: &Toolchain,
    sprites: &SpriteMap,
) -> Result<(), AssetError> {
    let base = read_fragment(paths, &manifest.pages.base, sprites).await?;
    let main = read_fragment(paths, &manifest.pages.main, sprites).await?;
    let auth = read_fragment(paths, &manifest.pages.auth, sprites).await?;

    let pages = [
        ("main.html", &main, "main"),
        ("auth.html", &auth, "auth"),
        ("firstrun.html", &auth, "firstrun"),
    ];
    for (name, fragment, page_type) in pages {
        let html = render_page(&base, fragment, page_type);
        let html = if mode.minify() {
            toolchain.minify_html(&html)
        } else {
            html
        };
        res.insert(name.to_string(), PendingRecord::new(name, html.into_bytes()));
    }
    Ok(())
}

async fn read_fragment(
    paths: &AssetPaths,
    rel: &str,
    sprites: &SpriteMap,
) -> Result<String, AssetError> {
    let path = paths.root.join(rel);
    let html = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| AssetError::io(&path, e))?;
    Ok(sprites.inline_icons(&html))
}

/// Substitutes the content slot with `fragment` and stamps the page type
/// on the document root.
pub(crate) fn render_page(base: &str, fragment: &str, page_type: &str) -> String {
    let composed = base.replacen(CONTENT_SLOT, fragment, 1);
    stamp_page_type(&composed, page_type)
}

fn stamp_page_type(html: &str, page_type: &str) -> String {
    match html.find("<html") {
        Some(pos) => {
            let insert_at = pos + "<html".len();
            format!(
                "{} data-type=\"{page_type}\"{}",
                &html[..insert_at],
                &html[insert_at..]
            )
        }
        None => html.to_string(),
    }
}
