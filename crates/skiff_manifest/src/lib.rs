//! Typed asset manifest for the skiff client.
//!
//! The manifest describes which source files make up each compiled asset
//! category (styles, scripts, markup pages, opaque static files) and which
//! on-demand library bundles exist. It is externally owned configuration:
//! the compiler consumes it but never derives it.
//!
//! Each category carries its own strongly shaped slice rather than a generic
//! category-name-to-path-list map, so a manifest that names a category the
//! compiler does not understand fails at parse time instead of being
//! silently iterated over.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for manifest operations.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read manifest {path}: {source}")]
    Io {
        /// Path of the manifest file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The manifest file is not valid JSON of the expected shape.
    #[error("failed to parse manifest JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The full asset manifest.
///
/// Source paths are relative to the project root and are compiled in the
/// order they are declared; order is significant for style and script
/// concatenation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetManifest {
    /// Ordered style sources, concatenated into the main style bundle.
    #[serde(default = "default_styles")]
    pub styles: Vec<String>,

    /// Ordered script sources, concatenated into the main client bundle.
    #[serde(default = "default_scripts")]
    pub scripts: Vec<String>,

    /// Markup pages composed from a shared base document.
    #[serde(default)]
    pub pages: PageManifest,

    /// Opaque static assets (icons, images), served byte-for-byte.
    #[serde(default = "default_misc")]
    pub misc: Vec<String>,

    /// On-demand library bundles, loaded by the client when needed rather
    /// than being folded into the main bundles.
    #[serde(default = "default_libs")]
    pub libs: Vec<LibBundle>,
}

/// Markup sources: one shared base document plus named page fragments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageManifest {
    /// The shared base document containing the content slot.
    pub base: String,
    /// Fragment for the main application page.
    pub main: String,
    /// Fragment for the login page (also used for the first-run page).
    pub auth: String,
}

/// One on-demand library bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibBundle {
    /// Name the bundle is served under, e.g. `editor.js`.
    pub name: String,
    /// Source path or ordered source paths.
    pub sources: LibSources,
}

/// Sources of a library bundle: a single path, or an ordered sequence of
/// paths concatenated in declared order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LibSources {
    /// A single source file.
    Single(String),
    /// Multiple source files, concatenated in order.
    Concat(Vec<String>),
}

impl LibSources {
    /// Iterates the source paths in declared order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        match self {
            LibSources::Single(path) => std::slice::from_ref(path).iter(),
            LibSources::Concat(paths) => paths.iter(),
        }
        .map(String::as_str)
    }
}

fn default_styles() -> Vec<String> {
    [
        "client/style.css",
        "client/sprites.css",
        "client/tooltips.css",
    ]
    .map(String::from)
    .to_vec()
}

fn default_scripts() -> Vec<String> {
    [
        "client/vendor/handlebars.runtime.min.js",
        "client/vendor/uppie.js",
        "client/vendor/screenfull.js",
        "client/client.js",
    ]
    .map(String::from)
    .to_vec()
}

fn default_misc() -> Vec<String> {
    [
        "client/images/logo.svg",
        "client/images/favicon.ico",
        "client/images/sprites.png",
    ]
    .map(String::from)
    .to_vec()
}

fn default_libs() -> Vec<LibBundle> {
    vec![
        LibBundle {
            name: "editor.js".to_string(),
            sources: LibSources::Concat(
                [
                    "client/vendor/editor/editor.js",
                    "client/vendor/editor/addon/dialog.js",
                    "client/vendor/editor/addon/search.js",
                    "client/vendor/editor/keymap.js",
                ]
                .map(String::from)
                .to_vec(),
            ),
        },
        LibBundle {
            name: "editor.css".to_string(),
            sources: LibSources::Single("client/vendor/editor/editor.css".to_string()),
        },
        LibBundle {
            name: "video.js".to_string(),
            sources: LibSources::Single("client/vendor/video/video.min.js".to_string()),
        },
        LibBundle {
            name: "video.css".to_string(),
            sources: LibSources::Single("client/vendor/video/video.min.css".to_string()),
        },
    ]
}

impl Default for PageManifest {
    fn default() -> Self {
        Self {
            base: "client/html/base.html".to_string(),
            main: "client/html/main.html".to_string(),
            auth: "client/html/auth.html".to_string(),
        }
    }
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            styles: default_styles(),
            scripts: default_scripts(),
            pages: PageManifest::default(),
            misc: default_misc(),
            libs: default_libs(),
        }
    }
}

impl AssetManifest {
    /// Loads a manifest from a JSON file. Missing fields fall back to the
    /// stock skiff asset set.
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Every source path the manifest references (files and libs), resolved
    /// against `root`.
    ///
    /// This is the flattened input set of the whole-cache freshness check:
    /// a newer modification time on any of these invalidates the persisted
    /// cache.
    pub fn source_paths(&self, root: &Path) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        let mut push = |rel: &str| paths.push(root.join(rel));

        for style in &self.styles {
            push(style);
        }
        for script in &self.scripts {
            push(script);
        }
        push(&self.pages.base);
        push(&self.pages.main);
        push(&self.pages.auth);
        for misc in &self.misc {
            push(misc);
        }
        for lib in &self.libs {
            for source in lib.sources.iter() {
                push(source);
            }
        }
        paths
    }
}
