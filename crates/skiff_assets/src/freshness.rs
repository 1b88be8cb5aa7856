//! Whole-cache freshness check against manifest sources.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use tokio::task::JoinSet;
use tracing::debug;

/// Returns whether the persisted cache at `cache_file` is at least as new
/// as every path in `sources`.
///
/// A missing cache is never fresh. A missing source contributes a
/// modification time of zero: it cannot block freshness on its own, but it
/// can never make the cache look fresher either. Coarse by design: one
/// changed source invalidates everything.
pub async fn is_cache_fresh(cache_file: &Path, sources: &[PathBuf]) -> bool {
    let cache_mtime = match tokio::fs::metadata(cache_file).await {
        Ok(meta) => mtime_nanos(&meta),
        Err(_) => {
            debug!(cache = %cache_file.display(), "no persisted cache");
            return false;
        }
    };

    let mut stats = JoinSet::new();
    for source in sources {
        let source = source.clone();
        stats.spawn(async move {
            tokio::fs::metadata(&source)
                .await
                .map(|meta| mtime_nanos(&meta))
                .unwrap_or(0)
        });
    }

    let mut newest_source = 0;
    while let Some(joined) = stats.join_next().await {
        newest_source = newest_source.max(joined.unwrap_or(0));
    }
    cache_mtime >= newest_source
}

fn mtime_nanos(meta: &std::fs::Metadata) -> u128 {
    meta.modified()
        .ok()
        .and_then(|mtime| mtime.duration_since(UNIX_EPOCH).ok())
        .map(|since_epoch| since_epoch.as_nanos())
        .unwrap_or(0)
}
