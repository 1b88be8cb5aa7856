//! Library sub-compiler: on-demand bundles.

use std::collections::BTreeMap;

use skiff_manifest::AssetManifest;

use crate::compile::CompileMode;
use crate::error::AssetError;
use crate::paths::AssetPaths;
use crate::record::PendingRecord;
use crate::toolchain::Toolchain;

/// Reads and concatenates every bundle's sources in declared order and
/// wraps each as one record keyed by bundle name. The bundle name's
/// extension selects the minifier; bundles that are neither scripts nor
/// styles pass through unmodified.
pub(crate) async fn compile(
    paths: &AssetPaths,
    manifest: &AssetManifest,
    mode: CompileMode,
    toolchain: &Toolchain,
) -> Result<BTreeMap<String, PendingRecord>, AssetError> {
    let mut bundles = BTreeMap::new();
    for bundle in &manifest.libs {
        let mut data = Vec::new();
        for rel in bundle.sources.iter() {
            let path = paths.root.join(rel);
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| AssetError::io(&path, e))?;
            data.extend_from_slice(&bytes);
        }

        let data = if mode.minify() {
            if bundle.name.ends_with(".js") {
                toolchain
                    .minify_js(&String::from_utf8_lossy(&data))
                    .into_bytes()
            } else if bundle.name.ends_with(".css") {
                toolchain
                    .minify_css(&String::from_utf8_lossy(&data))
                    .into_bytes()
            } else {
                data
            }
        } else {
            data
        };
        bundles.insert(bundle.name.clone(), PendingRecord::new(&bundle.name, data));
    }
    Ok(bundles)
}
