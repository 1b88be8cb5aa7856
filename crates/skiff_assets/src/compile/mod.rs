//! Sub-compiler fan-out: one module per asset category.
//!
//! Within a category, sources are read and concatenated in manifest order,
//! so output is deterministic. Across categories the compilers run
//! concurrently and may complete in any order; the join below is the
//! barrier the compression annotator waits behind.

use std::collections::BTreeMap;

use skiff_manifest::AssetManifest;
use tracing::info;

use crate::cache::PendingCache;
use crate::error::AssetError;
use crate::paths::AssetPaths;
use crate::record::PendingRecord;
use crate::sprite::SpriteMap;
use crate::toolchain::Toolchain;

mod lib_bundle;
mod misc;
mod mode;
mod page;
mod script;
mod style;
mod theme;

pub use script::{SPRITE_PLACEHOLDER, TEMPLATE_PLACEHOLDER};

/// Whether a compile applies minification.
///
/// Threaded explicitly into every sub-compiler; there is no process-global
/// minify switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileMode {
    /// Development: no minification, output stays readable.
    Dev,
    /// Production: minified output.
    Production,
}

impl CompileMode {
    /// Whether this mode minifies.
    pub fn minify(self) -> bool {
        matches!(self, CompileMode::Production)
    }
}

/// Runs every sub-compiler against the manifest and assembles the
/// not-yet-compressed cache.
pub async fn compile_cache(
    paths: &AssetPaths,
    manifest: &AssetManifest,
    mode: CompileMode,
    toolchain: &Toolchain,
) -> Result<PendingCache, AssetError> {
    let sprites = SpriteMap::load(&paths.svg_dir).await?;
    info!(mode = ?mode, icons = sprites.len(), "compiling asset cache");

    let (res, themes, modes, lib) = tokio::join!(
        compile_main(paths, manifest, mode, toolchain, &sprites),
        theme::compile(paths, mode, toolchain),
        mode::compile(paths, mode, toolchain),
        lib_bundle::compile(paths, manifest, mode, toolchain),
    );

    Ok(PendingCache {
        res: res?,
        themes: themes?,
        modes: modes?,
        lib: lib?,
    })
}

/// The `res` section: main style and script bundles, composed pages, and
/// opaque static assets.
async fn compile_main(
    paths: &AssetPaths,
    manifest: &AssetManifest,
    mode: CompileMode,
    toolchain: &Toolchain,
    sprites: &SpriteMap,
) -> Result<BTreeMap<String, PendingRecord>, AssetError> {
    let mut res = BTreeMap::new();
    res.insert(
        "style.css".to_string(),
        style::compile(paths, manifest, mode, toolchain).await?,
    );
    res.insert(
        "client.js".to_string(),
        script::compile(paths, manifest, mode, toolchain, sprites).await?,
    );
    page::compile_into(&mut res, paths, manifest, mode, toolchain, sprites).await?;
    misc::read_into(&mut res, paths, manifest).await?;
    Ok(res)
}
