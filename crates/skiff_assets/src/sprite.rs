//! Svg sprite map: icon sources keyed by name, inlined into scripts and
//! markup.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::warn;

use crate::error::AssetError;

/// Opening delimiter of an icon marker in markup sources.
const ICON_OPEN: &str = "<!-- icon:";
/// Closing delimiter of an icon marker.
const ICON_CLOSE: &str = " -->";

/// Map of icon name (svg file stem) to inlined svg markup.
///
/// Each icon's root `<svg>` element gets a `class` attribute equal to its
/// name so client styles can target it after inlining.
#[derive(Debug, Default)]
pub struct SpriteMap {
    icons: BTreeMap<String, String>,
}

impl SpriteMap {
    /// Loads every `*.svg` in `svg_dir`, keyed by file stem.
    pub async fn load(svg_dir: &Path) -> Result<Self, AssetError> {
        let mut icons = BTreeMap::new();
        let mut dir = tokio::fs::read_dir(svg_dir)
            .await
            .map_err(|e| AssetError::io(svg_dir, e))?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| AssetError::io(svg_dir, e))?
        {
            let file_name = entry.file_name();
            let Some(stem) = file_name.to_str().and_then(|n| n.strip_suffix(".svg")) else {
                continue;
            };
            let path = entry.path();
            let svg = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| AssetError::io(&path, e))?;
            icons.insert(stem.to_string(), inject_class(&svg, stem));
        }
        Ok(Self { icons })
    }

    /// Number of loaded icons.
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    /// Whether no icons were loaded.
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Looks up an icon's inlined markup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.icons.get(name).map(String::as_str)
    }

    /// Renders the JS statement that exposes the sprite map to the client.
    /// Deterministic: the map serializes in key order.
    pub fn to_js(&self) -> Result<String, AssetError> {
        let json = serde_json::to_string(&self.icons).map_err(|e| AssetError::Serialization {
            reason: e.to_string(),
        })?;
        Ok(format!("skiff.sprites = {json};"))
    }

    /// Resolves every `<!-- icon:NAME -->` marker in `html` against the
    /// map. Unknown names are left in place and logged.
    pub fn inline_icons(&self, html: &str) -> String {
        let mut out = String::with_capacity(html.len());
        let mut rest = html;
        while let Some(start) = rest.find(ICON_OPEN) {
            out.push_str(&rest[..start]);
            let after = &rest[start + ICON_OPEN.len()..];
            let Some(end) = after.find(ICON_CLOSE) else {
                // Unterminated marker; emit as-is.
                out.push_str(&rest[start..]);
                return out;
            };
            let name = after[..end].trim();
            match self.icons.get(name) {
                Some(svg) => out.push_str(svg),
                None => {
                    warn!(icon = name, "unknown icon reference left in place");
                    out.push_str(&rest[start..start + ICON_OPEN.len() + end + ICON_CLOSE.len()]);
                }
            }
            rest = &after[end + ICON_CLOSE.len()..];
        }
        out.push_str(rest);
        out
    }
}

/// Injects `class="<name>"` on the root `<svg>` element. Sources without a
/// root `<svg>` tag pass through unchanged.
fn inject_class(svg: &str, name: &str) -> String {
    match svg.find("<svg") {
        Some(pos) => {
            let insert_at = pos + "<svg".len();
            format!(
                "{} class=\"{name}\"{}",
                &svg[..insert_at],
                &svg[insert_at..]
            )
        }
        None => {
            warn!(icon = name, "svg source has no root <svg> element");
            svg.to_string()
        }
    }
}
