//! Opaque static assets: read as bytes, wrapped without transformation.

use std::collections::BTreeMap;
use std::path::Path;

use skiff_manifest::AssetManifest;

use crate::error::AssetError;
use crate::paths::AssetPaths;
use crate::record::PendingRecord;

/// Reads every misc asset into `res`, keyed by basename.
///
/// A read failure on any single asset aborts the compile; a record must
/// never be inserted with missing or partial bytes.
pub(crate) async fn read_into(
    res: &mut BTreeMap<String, PendingRecord>,
    paths: &AssetPaths,
    manifest: &AssetManifest,
) -> Result<(), AssetError> {
    for rel in &manifest.misc {
        let path = paths.root.join(rel);
        let data = tokio::fs::read(&path)
            .await
            .map_err(|e| AssetError::io(&path, e))?;
        let name = Path::new(rel)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(rel)
            .to_string();
        res.insert(name.clone(), PendingRecord::new(&name, data));
    }
    Ok(())
}
