use crate::mapping::{find_series_marker, MappingKey, SeriesMarker};

/// An exported tile file name split around its series marker.
///
/// `"Plate.nd2 (series 01).tif"` parses as prefix `"Plate.nd2 "`, marker
/// `(series 01)` and suffix `".tif"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileName<'a> {
    /// Full file name
    pub file_name: &'a str,
    /// Text before the marker
    pub prefix: &'a str,
    /// The series marker itself
    pub marker: SeriesMarker,
    /// Text after the marker, extension included
    pub suffix: &'a str,
}

impl<'a> TileName<'a> {
    /// Split a file name around its first series marker
    pub fn parse(file_name: &'a str) -> Option<Self> {
        let marker = find_series_marker(file_name)?;
        Some(Self {
            file_name,
            prefix: &file_name[..marker.start],
            suffix: &file_name[marker.end..],
            marker,
        })
    }

    /// Series index as numbered in the file name (starting at 1)
    pub fn series_file_index(&self) -> u32 {
        self.marker.index
    }

    /// Zero-based series index to look up in the mapping.
    ///
    /// Exported file names number series from 1 while the acquisition metadata
    /// numbers them from 0. A file index of 0 has no counterpart.
    pub fn lookup_index(&self) -> Option<u32> {
        self.marker.index.checked_sub(1)
    }

    fn trimmed_prefix(&self) -> &'a str {
        self.prefix.trim_end()
    }

    /// Byte range of the acquisition name inside the text before the marker.
    ///
    /// The full base name may occur anywhere in the prefix; the base name minus
    /// `extension` only counts when the prefix ends with it.
    fn base_span(&self, key: &MappingKey, extension: &str) -> Option<(usize, usize)> {
        if key.base_name.is_empty() {
            return None;
        }
        let prefix = self.trimmed_prefix();
        if let Some(start) = prefix.rfind(key.base_name.as_str()) {
            return Some((start, start + key.base_name.len()));
        }
        let stem = key.base_name.strip_suffix(extension).filter(|s| !s.is_empty())?;
        prefix
            .ends_with(stem)
            .then(|| (prefix.len() - stem.len(), prefix.len()))
    }

    /// Check whether this tile was exported from the acquisition named by `key`.
    ///
    /// True when the base name occurs before the marker, or when the text
    /// before the marker ends with the base name minus `extension`.
    pub fn matches_base(&self, key: &MappingKey, extension: &str) -> bool {
        self.base_span(key, extension).is_some()
    }

    /// Build the destination name by putting `label` in place of the base name
    /// and the marker. Text around them is kept.
    pub fn renamed(&self, key: &MappingKey, extension: &str, label: &str) -> String {
        let prefix = self.trimmed_prefix();
        let (leading, between) = match self.base_span(key, extension) {
            Some((start, end)) => (&prefix[..start], &prefix[end..]),
            None => ("", ""),
        };

        format!("{}{}{}{}", leading, label, between, self.suffix)
    }
}
