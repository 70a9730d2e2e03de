use serde::Deserialize;

use crate::mapping::{Mapping, MappingKey};

use super::tile::TileName;

/// How to choose between several mapping entries that fit one tile.
///
/// A tile fits an entry when the series indices agree and the entry's base name
/// occurs before the series marker, so `"Scan.nd2"` and `"Old Scan.nd2"` both fit
/// `"Old Scan.nd2 (series 01).tif"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LookupPolicy {
    /// Take the first fitting entry in table order
    First,
    /// Take the fitting entry with the longest base name; ties go to table order
    #[default]
    LongestBase,
    /// Skip the tile when more than one entry fits
    RejectAmbiguous,
}

/// Result of resolving one tile against the mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'m> {
    /// Exactly one entry was chosen
    Resolved {
        /// Chosen key
        key: &'m MappingKey,
        /// Its label
        label: &'m str,
    },
    /// No entry fits
    Unmatched,
    /// Several entries fit and the policy refuses to choose
    Ambiguous(Vec<&'m str>),
}

impl LookupPolicy {
    /// Resolve a tile against the mapping.
    ///
    /// `extension` is the acquisition extension used to build the base names.
    pub fn resolve<'m>(self, tile: &TileName<'_>, mapping: &'m Mapping, extension: &str) -> Resolution<'m> {
        let Some(lookup_index) = tile.lookup_index() else {
            return Resolution::Unmatched;
        };

        let candidates: Vec<(&MappingKey, &str)> = mapping
            .iter()
            .filter(|(key, _)| key.series_index == lookup_index && tile.matches_base(key, extension))
            .collect();

        let chosen = match self {
            LookupPolicy::First => candidates.first().copied(),
            LookupPolicy::LongestBase => {
                let mut best: Option<(&MappingKey, &str)> = None;
                for candidate in candidates.iter().copied() {
                    if best.map_or(true, |(key, _)| candidate.0.base_name.len() > key.base_name.len()) {
                        best = Some(candidate);
                    }
                }
                best
            }
            LookupPolicy::RejectAmbiguous => {
                if candidates.len() > 1 {
                    return Resolution::Ambiguous(candidates.iter().map(|(_, label)| *label).collect());
                }
                candidates.first().copied()
            }
        };

        match chosen {
            Some((key, label)) => Resolution::Resolved { key, label },
            None => Resolution::Unmatched,
        }
    }
}
