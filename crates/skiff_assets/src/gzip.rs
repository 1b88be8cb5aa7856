//! Compression annotator: attaches a gzip copy to every pending record.

use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;
use tokio::task::JoinSet;
use tracing::debug;

use crate::cache::{Cache, PendingCache, Section};
use crate::error::AssetError;
use crate::record::ResourceRecord;

/// Compresses one byte buffer. Deterministic: the gzip header carries no
/// timestamp.
pub fn gzip_bytes(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Turns a fully compiled [`PendingCache`] into a complete [`Cache`] by
/// compressing every record in every section.
///
/// All records are dispatched concurrently and joined; the result only
/// exists once every record has been annotated. A compression failure on
/// any single record aborts the whole pass, so a partially annotated cache
/// cannot escape.
pub async fn annotate(pending: PendingCache) -> Result<Cache, AssetError> {
    let mut tasks: JoinSet<Result<(Section, String, ResourceRecord), AssetError>> = JoinSet::new();
    for (section, map) in pending.into_sections() {
        for (name, record) in map {
            tasks.spawn(async move {
                let gzip = gzip_bytes(&record.data).map_err(|source| AssetError::Compression {
                    name: name.clone(),
                    source,
                })?;
                Ok((section, name, record.into_record(gzip)))
            });
        }
    }

    let mut cache = Cache::default();
    while let Some(joined) = tasks.join_next().await {
        let (section, name, record) =
            joined.map_err(|e| AssetError::Internal(e.to_string()))??;
        cache.section_mut(section).insert(name, record);
    }
    debug!(records = cache.record_count(), "cache compression complete");
    Ok(cache)
}
