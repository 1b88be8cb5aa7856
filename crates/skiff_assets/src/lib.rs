//! # skiff_assets
//!
//! Compiles the skiff client's static assets (styles, scripts, markup
//! pages, editor themes and modes, on-demand libraries) into a versioned,
//! pre-compressed in-memory cache, and persists that cache to a single
//! file so production startup is near-instant.
//!
//! The serving layer consumes the result through two entry points:
//!
//! - [`CacheStore::load`] when the server starts and needs an in-memory
//!   [`Cache`] immediately,
//! - [`CacheStore::build`] as an explicit pre-start step that ensures a
//!   fresh, decodable cache exists on disk.
//!
//! Every [`ResourceRecord`] carries the compiled bytes together with a
//! content-derived etag, the MIME type of its logical filename, and a
//! gzip copy, so the serving layer can answer conditional requests and
//! compressed transfers without touching the compiler again.
//!
//! This crate performs no network I/O.

mod cache;
mod compile;
mod error;
mod freshness;
mod gzip;
mod paths;
mod record;
mod sprite;
mod store;
mod templates;
mod toolchain;

pub use cache::{Cache, PendingCache, RecordMap, Section};
pub use compile::{CompileMode, SPRITE_PLACEHOLDER, TEMPLATE_PLACEHOLDER};
pub use error::AssetError;
pub use freshness::is_cache_fresh;
pub use gzip::{annotate, gzip_bytes};
pub use paths::AssetPaths;
pub use record::{PendingRecord, ResourceRecord, etag_of, mime_for};
pub use sprite::SpriteMap;
pub use store::CacheStore;
pub use toolchain::{Toolchain, ToolchainStatus};
