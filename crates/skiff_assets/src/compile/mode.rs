//! Mode sub-compiler: editor language mode scripts.
//!
//! The set of supported modes comes from a structured registry file that
//! is parsed, never executed. The sentinel `none` mode carries no
//! implementation and is skipped. A read failure on any single mode file
//! aborts the whole batch: a cache silently missing a mode would only
//! surface as a broken editor at request time.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;

use crate::compile::CompileMode;
use crate::error::AssetError;
use crate::paths::AssetPaths;
use crate::record::PendingRecord;
use crate::toolchain::Toolchain;

/// Mode without an implementation file.
const SENTINEL_MODE: &str = "none";

/// One entry of the mode registry. Unknown fields (display names,
/// extensions) are ignored.
#[derive(Debug, Deserialize)]
struct ModeInfo {
    mode: String,
}

/// Packages one script record per registered mode, keyed by mode name.
pub(crate) async fn compile(
    paths: &AssetPaths,
    mode: CompileMode,
    toolchain: &Toolchain,
) -> Result<BTreeMap<String, PendingRecord>, AssetError> {
    let registry = tokio::fs::read_to_string(&paths.mode_registry)
        .await
        .map_err(|e| AssetError::io(&paths.mode_registry, e))?;
    let entries: Vec<ModeInfo> =
        serde_json::from_str(&registry).map_err(|e| AssetError::Serialization {
            reason: format!("mode registry {}: {e}", paths.mode_registry.display()),
        })?;

    // Several registry entries can share one implementation.
    let names: BTreeSet<String> = entries
        .into_iter()
        .map(|entry| entry.mode)
        .filter(|name| name != SENTINEL_MODE)
        .collect();

    let mut modes = BTreeMap::new();
    for name in names {
        let path = paths.modes_dir.join(&name).join(format!("{name}.js"));
        let js = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| AssetError::io(&path, e))?;
        let js = if mode.minify() {
            toolchain.minify_js(&js)
        } else {
            js
        };
        modes.insert(
            name.clone(),
            PendingRecord::new(&format!("{name}.js"), js.into_bytes()),
        );
    }
    Ok(modes)
}
