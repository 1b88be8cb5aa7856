//! Cache store: load/build entry points and persistence.

use skiff_manifest::AssetManifest;
use tracing::{debug, error, info};

use crate::cache::Cache;
use crate::compile::{CompileMode, compile_cache};
use crate::error::AssetError;
use crate::freshness::is_cache_fresh;
use crate::gzip::annotate;
use crate::paths::AssetPaths;
use crate::toolchain::ToolchainStatus;

/// Owns the compile/load/persist lifecycle of the resource cache.
///
/// The persisted cache file is a single shared mutable resource with no
/// locking discipline: two concurrent `build()` invocations race
/// last-writer-wins. This is a known hazard, tolerated because the store
/// is invoked at most once per process lifecycle in intended usage.
pub struct CacheStore {
    paths: AssetPaths,
    manifest: AssetManifest,
    toolchain: ToolchainStatus,
}

impl CacheStore {
    /// Creates a store over the given roots, manifest, and the toolchain
    /// capability probed at startup.
    pub fn new(paths: AssetPaths, manifest: AssetManifest, toolchain: ToolchainStatus) -> Self {
        Self {
            paths,
            manifest,
            toolchain,
        }
    }

    /// Borrows the path provider.
    pub fn paths(&self) -> &AssetPaths {
        &self.paths
    }

    /// Returns an in-memory cache for the serving layer.
    ///
    /// In dev mode this always performs a fresh, unminified compile and
    /// never creates, reads, or modifies the persisted cache. Otherwise
    /// the persisted cache is read and trusted as-is when it decodes —
    /// deliberately without a freshness check; a stale-but-parseable
    /// cache is the operator's call to rebuild. A missing cache triggers
    /// compile-and-persist, a corrupt one a recompile without persisting.
    pub async fn load(&self, dev: bool) -> Result<Cache, AssetError> {
        if dev {
            return self.compile(CompileMode::Dev, false).await;
        }
        match tokio::fs::read(&self.paths.cache_file).await {
            Err(err) => {
                info!(
                    cache = %self.paths.cache_file.display(),
                    error = %err,
                    "no persisted cache, compiling"
                );
                self.compile(CompileMode::Production, true).await
            }
            Ok(bytes) => match Cache::from_bytes(&bytes) {
                Ok(cache) => {
                    debug!(records = cache.record_count(), "loaded persisted cache");
                    Ok(cache)
                }
                Err(err) => {
                    error!(error = %err, "persisted cache is corrupt, recompiling");
                    self.compile(CompileMode::Production, false).await
                }
            },
        }
    }

    /// Ensures a valid, fresh persisted cache exists; the pre-start
    /// rebuild step.
    ///
    /// When the persisted cache is at least as new as every manifest
    /// source it is only read back to confirm it decodes; the decoded
    /// object is discarded. Anything else forces a full production
    /// compile with persistence.
    pub async fn build(&self) -> Result<(), AssetError> {
        let sources = self.manifest.source_paths(&self.paths.root);
        if is_cache_fresh(&self.paths.cache_file, &sources).await {
            match tokio::fs::read(&self.paths.cache_file).await {
                Ok(bytes) => match Cache::from_bytes(&bytes) {
                    Ok(_) => {
                        debug!("persisted cache is fresh and decodes, keeping it");
                        return Ok(());
                    }
                    Err(err) => {
                        error!(error = %err, "fresh cache fails to decode, rebuilding");
                    }
                },
                Err(err) => {
                    error!(error = %err, "fresh cache became unreadable, rebuilding");
                }
            }
        }
        self.compile(CompileMode::Production, true).await?;
        Ok(())
    }

    /// Reports whether the persisted cache is fresh against the manifest.
    pub async fn is_fresh(&self) -> bool {
        let sources = self.manifest.source_paths(&self.paths.root);
        is_cache_fresh(&self.paths.cache_file, &sources).await
    }

    /// Full compile: sub-compiler fan-out, then compression, then
    /// optional persistence.
    async fn compile(&self, mode: CompileMode, persist: bool) -> Result<Cache, AssetError> {
        let toolchain = self.toolchain.require()?;
        let pending = compile_cache(&self.paths, &self.manifest, mode, toolchain).await?;
        let cache = annotate(pending).await?;
        if persist {
            self.persist(&cache).await?;
        }
        Ok(cache)
    }

    async fn persist(&self, cache: &Cache) -> Result<(), AssetError> {
        let bytes = cache.to_bytes()?;
        if let Some(parent) = self.paths.cache_file.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AssetError::io(parent, e))?;
        }
        // Best-effort single write; no atomic rename, no lock.
        tokio::fs::write(&self.paths.cache_file, &bytes)
            .await
            .map_err(|e| AssetError::io(&self.paths.cache_file, e))?;
        info!(
            cache = %self.paths.cache_file.display(),
            records = cache.record_count(),
            bytes = bytes.len(),
            "persisted cache"
        );
        Ok(())
    }
}
