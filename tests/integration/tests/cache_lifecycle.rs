//! End-to-end lifecycle of the asset cache: compile, persist, reload.

mod common;

use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use skiff_assets::{
    AssetError, AssetPaths, Cache, CacheStore, Section, Toolchain, ToolchainStatus, etag_of,
};
use skiff_manifest::AssetManifest;

fn store(root: &Path) -> CacheStore {
    let manifest = AssetManifest::from_file(&common::manifest_path(root)).unwrap();
    CacheStore::new(AssetPaths::from_root(root), manifest, Toolchain::probe())
}

fn fixture() -> (TempDir, CacheStore) {
    let dir = tempfile::tempdir().unwrap();
    common::scaffold(dir.path());
    let store = store(dir.path());
    (dir, store)
}

fn gunzip(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    GzDecoder::new(bytes).read_to_end(&mut out).unwrap();
    out
}

fn section_keys(cache: &Cache, section: Section) -> Vec<&str> {
    cache.section(section).keys().map(String::as_str).collect()
}

#[tokio::test]
async fn build_creates_persisted_cache_with_all_records() {
    let (_dir, store) = fixture();
    store.build().await.unwrap();

    let bytes = std::fs::read(&store.paths().cache_file).unwrap();
    let cache = Cache::from_bytes(&bytes).unwrap();
    assert_eq!(
        section_keys(&cache, Section::Res),
        vec![
            "auth.html",
            "client.js",
            "firstrun.html",
            "logo.svg",
            "main.html",
            "style.css"
        ]
    );
    assert_eq!(section_keys(&cache, Section::Themes), vec!["night", "skiff"]);
    assert_eq!(section_keys(&cache, Section::Modes), vec!["markdown"]);
    assert_eq!(
        section_keys(&cache, Section::Lib),
        vec!["editor.css", "editor.js"]
    );
    assert_eq!(cache.record_count(), 11);
}

#[tokio::test]
async fn load_after_build_returns_the_persisted_cache_verbatim() {
    let (_dir, store) = fixture();
    store.build().await.unwrap();

    let persisted = Cache::from_bytes(&std::fs::read(&store.paths().cache_file).unwrap()).unwrap();
    let loaded = store.load(false).await.unwrap();
    assert_eq!(loaded, persisted);
}

#[tokio::test]
async fn every_record_carries_matching_gzip_and_etag() {
    let (_dir, store) = fixture();
    store.build().await.unwrap();
    let cache = store.load(false).await.unwrap();

    for section in Section::ALL {
        for (name, record) in cache.section(section) {
            assert!(!record.gzip.is_empty(), "{}/{name} has no gzip copy", section.name());
            assert_eq!(
                gunzip(&record.gzip),
                record.data,
                "{}/{name} gzip does not inflate to its data",
                section.name()
            );
            assert_eq!(record.etag, etag_of(&record.data));
            assert!(!record.mime.is_empty());
        }
    }
}

#[tokio::test]
async fn rebuild_from_identical_sources_is_byte_identical() {
    let (_dir, store) = fixture();
    store.build().await.unwrap();
    let first = std::fs::read(&store.paths().cache_file).unwrap();

    std::fs::remove_file(&store.paths().cache_file).unwrap();
    store.build().await.unwrap();
    let second = std::fs::read(&store.paths().cache_file).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn fresh_build_leaves_the_cache_file_untouched() {
    let (_dir, store) = fixture();
    store.build().await.unwrap();
    let before = std::fs::metadata(&store.paths().cache_file)
        .unwrap()
        .modified()
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    store.build().await.unwrap();
    let after = std::fs::metadata(&store.paths().cache_file)
        .unwrap()
        .modified()
        .unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn modified_source_invalidates_and_rebuild_picks_it_up() {
    let (dir, store) = fixture();
    store.build().await.unwrap();
    assert!(store.is_fresh().await);

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    std::fs::write(dir.path().join("client/app.css"), "html {\n  color: #222;\n}\n").unwrap();
    assert!(!store.is_fresh().await);

    store.build().await.unwrap();
    assert!(store.is_fresh().await);
    let cache = store.load(false).await.unwrap();
    let style = String::from_utf8(cache.res["style.css"].data.clone()).unwrap();
    assert!(style.contains("#222"));
}

#[tokio::test]
async fn missing_source_never_invalidates_the_cache() {
    let (dir, store) = fixture();
    store.build().await.unwrap();

    // A manifest source that does not exist on disk can never be older
    // than the cache, so the cache stays fresh; removing a real source
    // is the same as it never having existed.
    std::fs::remove_file(dir.path().join("client/app.css")).unwrap();
    assert!(store.is_fresh().await);
}

#[tokio::test]
async fn dev_load_compiles_unminified_and_never_touches_disk() {
    let (_dir, store) = fixture();
    let cache = store.load(true).await.unwrap();

    assert!(!store.paths().cache_file.exists());
    let style = String::from_utf8(cache.res["style.css"].data.clone()).unwrap();
    assert!(style.contains("\n  color: #333;\n"));

    let main = String::from_utf8(cache.res["main.html"].data.clone()).unwrap();
    assert!(main.contains("class=\"up\""), "icon marker not inlined: {main}");
    assert!(main.contains("data-type=\"main\""));
}

#[tokio::test]
async fn placeholders_are_substituted_in_the_client_bundle() {
    let (_dir, store) = fixture();
    let cache = store.load(true).await.unwrap();

    let js = String::from_utf8(cache.res["client.js"].data.clone()).unwrap();
    assert!(js.contains("skiff.sprites = {\"up\":"));
    assert!(js.contains("skiff.templates = {\"row\":function(d){"));
    assert!(!js.contains("/* {{ sprites }} */"));
    assert!(!js.contains("/* {{ templates }} */"));
}

#[tokio::test]
async fn production_output_is_smaller_than_dev_output() {
    let (_dir, store) = fixture();
    let dev = store.load(true).await.unwrap();
    store.build().await.unwrap();
    let prod = store.load(false).await.unwrap();

    assert!(prod.res["style.css"].data.len() < dev.res["style.css"].data.len());
    let prod_style = String::from_utf8(prod.res["style.css"].data.clone()).unwrap();
    assert!(!prod_style.contains("\n  "));
}

#[tokio::test]
async fn missing_cache_on_load_compiles_and_persists() {
    let (_dir, store) = fixture();
    let cache = store.load(false).await.unwrap();

    assert!(store.paths().cache_file.exists());
    let persisted = Cache::from_bytes(&std::fs::read(&store.paths().cache_file).unwrap()).unwrap();
    assert_eq!(cache, persisted);
}

#[tokio::test]
async fn corrupt_cache_recompiles_without_persisting() {
    let (_dir, store) = fixture();
    std::fs::create_dir_all(store.paths().cache_file.parent().unwrap()).unwrap();
    std::fs::write(&store.paths().cache_file, b"definitely not a cache").unwrap();

    let cache = store.load(false).await.unwrap();
    assert_eq!(cache.record_count(), 11);
    // The corrupt file is left in place for the operator to inspect.
    assert_eq!(
        std::fs::read(&store.paths().cache_file).unwrap(),
        b"definitely not a cache"
    );
}

#[tokio::test]
async fn missing_toolchain_blocks_compiles_but_not_cached_serving() {
    let dir = tempfile::tempdir().unwrap();
    common::scaffold(dir.path());
    let manifest = AssetManifest::from_file(&common::manifest_path(dir.path())).unwrap();
    let degraded = CacheStore::new(
        AssetPaths::from_root(dir.path()),
        manifest,
        ToolchainStatus::Missing {
            reason: "asset toolchain not compiled in".to_string(),
        },
    );

    // No persisted cache: a compile is needed and must fail.
    let err = degraded.load(false).await.unwrap_err();
    assert!(matches!(err, AssetError::MissingToolchain { .. }));

    // Once a full store has persisted a cache, the degraded store can
    // serve it without ever compiling.
    store(dir.path()).build().await.unwrap();
    let cache = degraded.load(false).await.unwrap();
    assert_eq!(cache.record_count(), 11);
}
