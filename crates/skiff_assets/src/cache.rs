//! The aggregate cache artifact and its binary serialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AssetError;
use crate::record::{PendingRecord, ResourceRecord};

/// One top-level map of the cache.
pub type RecordMap = BTreeMap<String, ResourceRecord>;

/// The four top-level sections of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Main bundles, pages and static assets.
    Res,
    /// Editor themes.
    Themes,
    /// Editor language modes.
    Modes,
    /// On-demand library bundles.
    Lib,
}

impl Section {
    /// All sections, in serialization order.
    pub const ALL: [Section; 4] = [Section::Res, Section::Themes, Section::Modes, Section::Lib];

    /// Section name as used by the serving layer.
    pub fn name(self) -> &'static str {
        match self {
            Section::Res => "res",
            Section::Themes => "themes",
            Section::Modes => "modes",
            Section::Lib => "lib",
        }
    }
}

/// The complete compiled cache.
///
/// Always rebuilt in full; there is no partial-update path. Every record in
/// every map carries its gzip copy, enforced by construction via the
/// pending/complete type split (see [`PendingCache`]).
///
/// `BTreeMap` keeps iteration and serialization order stable, so two
/// compiles from identical sources serialize to identical bytes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cache {
    /// Main bundles, pages and static assets.
    pub res: RecordMap,
    /// Editor themes, keyed by theme name.
    pub themes: RecordMap,
    /// Editor language modes, keyed by mode name.
    pub modes: RecordMap,
    /// On-demand libraries, keyed by bundle name.
    pub lib: RecordMap,
}

impl Cache {
    /// Serializes to the persisted binary format. Byte sequences survive
    /// exactly; nothing is re-encoded as text.
    pub fn to_bytes(&self) -> Result<Vec<u8>, AssetError> {
        bincode::serialize(self).map_err(|e| AssetError::Serialization {
            reason: e.to_string(),
        })
    }

    /// Deserializes the persisted binary format.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        bincode::deserialize(bytes).map_err(|e| AssetError::CorruptCache {
            reason: e.to_string(),
        })
    }

    /// Borrows one section's record map.
    pub fn section(&self, section: Section) -> &RecordMap {
        match section {
            Section::Res => &self.res,
            Section::Themes => &self.themes,
            Section::Modes => &self.modes,
            Section::Lib => &self.lib,
        }
    }

    /// Mutably borrows one section's record map.
    pub fn section_mut(&mut self, section: Section) -> &mut RecordMap {
        match section {
            Section::Res => &mut self.res,
            Section::Themes => &mut self.themes,
            Section::Modes => &mut self.modes,
            Section::Lib => &mut self.lib,
        }
    }

    /// Total number of records across all sections.
    pub fn record_count(&self) -> usize {
        Section::ALL
            .iter()
            .map(|s| self.section(*s).len())
            .sum()
    }
}

/// A fully compiled cache whose records have not been compressed yet.
///
/// Produced by the sub-compilers, consumed by the compression annotator.
#[derive(Debug, Default)]
pub struct PendingCache {
    /// Main bundles, pages and static assets.
    pub res: BTreeMap<String, PendingRecord>,
    /// Editor themes.
    pub themes: BTreeMap<String, PendingRecord>,
    /// Editor language modes.
    pub modes: BTreeMap<String, PendingRecord>,
    /// On-demand libraries.
    pub lib: BTreeMap<String, PendingRecord>,
}

impl PendingCache {
    /// Decomposes into `(section, map)` pairs for the annotator's fan-out.
    pub fn into_sections(self) -> [(Section, BTreeMap<String, PendingRecord>); 4] {
        [
            (Section::Res, self.res),
            (Section::Themes, self.themes),
            (Section::Modes, self.modes),
            (Section::Lib, self.lib),
        ]
    }
}
