//! Asset compiler error types.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while compiling, compressing, persisting or
/// restoring the resource cache.
///
/// Nothing in this subsystem retries: every failure is one-shot and
/// propagates to the caller of [`CacheStore::load`] or
/// [`CacheStore::build`], which decides whether to retry, exit, or degrade.
///
/// [`CacheStore::load`]: crate::CacheStore::load
/// [`CacheStore::build`]: crate::CacheStore::build
#[derive(Debug, Error)]
pub enum AssetError {
    /// A compile was requested but the transformation toolchain is not
    /// compiled in. Non-retryable; the message names the remediation.
    #[error("cannot compile assets: {reason}")]
    MissingToolchain {
        /// Why the toolchain is unavailable and how to fix it.
        reason: String,
    },

    /// A read or write failed on a manifest source or the cache file.
    /// Aborts the in-flight compile or build.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The persisted cache exists but does not decode. Recovered
    /// automatically by a full recompile; only surfaced if that recompile
    /// also fails.
    #[error("persisted cache is corrupt: {reason}")]
    CorruptCache {
        /// Description of the decode failure.
        reason: String,
    },

    /// Gzip compression failed for one record. Aborts the whole
    /// annotation pass; no partially annotated cache is produced.
    #[error("failed to compress record {name}: {source}")]
    Compression {
        /// Name of the record being compressed.
        name: String,
        /// The underlying compression error.
        #[source]
        source: std::io::Error,
    },

    /// Cache serialization failed, or structured configuration inside an
    /// asset source (e.g. the mode registry) did not parse.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the failure.
        reason: String,
    },

    /// Manifest error.
    #[error("manifest error: {0}")]
    Manifest(#[from] skiff_manifest::ManifestError),

    /// Internal error (a compile task ended without producing a result).
    #[error("internal error: {0}")]
    Internal(String),
}

impl AssetError {
    /// Creates an I/O error for `path`.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
