//! # Tile Renamer
//!
//! Copies exported tile images to a destination directory under the label the
//! mapping assigns to their acquisition unit.
//!
//! For each `.tif`/`.tiff` file in the source directory (case-insensitive):
//!
//! 1. Find the `(series NN)` marker. Files without one are skipped.
//! 2. Convert the file's series number (counted from 1) to the acquisition
//!    series index (counted from 0) by subtracting one.
//! 3. Resolve the tile against the mapping with the configured [`LookupPolicy`].
//! 4. Copy the file, keeping permissions and timestamps, as
//!    `<text before base><label><text between base and marker><text after marker>`.
//!
//! The source directory is never modified, and a destination that resolves to
//! it is refused. Rerunning overwrites files of the
//! same name in the destination.

use std::collections::HashSet;
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::Path;

use serde::Deserialize;

use crate::diagnostics::DiagnosticSink;
use crate::mapping::{Mapping, DEFAULT_ACQUISITION_EXTENSION};

mod error;
mod policy;
mod report;
mod tile;

#[cfg(test)]
mod tests;

pub use error::RenameError;
pub use policy::{LookupPolicy, Resolution};
pub use report::{RenameReport, RenamedTile};
pub use tile::TileName;

/// Tile image extensions accepted by default (compared case-insensitively)
pub const DEFAULT_TILE_EXTENSIONS: [&str; 2] = ["tif", "tiff"];

/// Configuration for a rename pass
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenameOptions {
    /// Tie-break between several fitting mapping entries
    pub policy: LookupPolicy,
    /// Accepted tile extensions, without the leading dot
    pub tile_extensions: Vec<String>,
    /// Acquisition extension the mapping's base names were built with
    #[serde(skip)]
    pub acquisition_extension: String,
    /// Plan and report without copying anything
    pub dry_run: bool,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            policy: LookupPolicy::default(),
            tile_extensions: DEFAULT_TILE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            acquisition_extension: DEFAULT_ACQUISITION_EXTENSION.to_string(),
            dry_run: false,
        }
    }
}

/// What the renamer decided for one tile file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileOutcome {
    /// Copy under this new file name
    Rename(String),
    /// The file name has no series marker
    NoMarker,
    /// No mapping entry fits
    Unmatched,
    /// Several entries fit and the policy refused to choose
    Ambiguous,
}

/// Applies a [`Mapping`] to a directory of exported tiles
#[derive(Debug, Clone, Default)]
pub struct Renamer {
    options: RenameOptions,
}

impl Renamer {
    /// Create a renamer with the given options
    pub fn new(options: RenameOptions) -> Self {
        Self { options }
    }

    /// Check whether a file name has one of the accepted tile extensions
    pub fn is_tile(&self, file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.options
                    .tile_extensions
                    .iter()
                    .any(|accepted| accepted.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }

    /// Decide what to do with one tile file name. Skips are reported to `sink`.
    pub fn plan(&self, file_name: &str, mapping: &Mapping, sink: &mut dyn DiagnosticSink) -> TileOutcome {
        let Some(tile) = TileName::parse(file_name) else {
            sink.warning(format!("No series marker in file name: {}", file_name));
            return TileOutcome::NoMarker;
        };

        let extension = self.options.acquisition_extension.as_str();
        match self.options.policy.resolve(&tile, mapping, extension) {
            Resolution::Resolved { key, label } => TileOutcome::Rename(tile.renamed(key, extension, label)),
            Resolution::Unmatched => {
                match tile.lookup_index() {
                    Some(index) => sink.warning(format!(
                        "No mapping entry for {} (file series {} -> series index {})",
                        file_name,
                        tile.series_file_index(),
                        index
                    )),
                    None => sink.warning(format!(
                        "No mapping entry for {} (file series 0 has no series index)",
                        file_name
                    )),
                }
                TileOutcome::Unmatched
            }
            Resolution::Ambiguous(labels) => {
                sink.warning(format!(
                    "Ambiguous mapping for {}: candidates {}; skipping",
                    file_name,
                    labels.join(", ")
                ));
                TileOutcome::Ambiguous
            }
        }
    }

    /// Rename every tile in `source_dir` into `dest_dir`.
    ///
    /// Files are processed in file-name order. Failing to list the source,
    /// a destination that resolves to the source, and failing to create the
    /// destination are errors; everything per-file is reported to `sink` and
    /// counted in the report.
    pub fn rename_all(
        &self,
        source_dir: &Path,
        dest_dir: &Path,
        mapping: &Mapping,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<RenameReport, RenameError> {
        let mut report = RenameReport {
            dry_run: self.options.dry_run,
            ..Default::default()
        };

        let source_root = fs::canonicalize(source_dir).map_err(|source| RenameError::ReadSource {
            path: source_dir.to_path_buf(),
            source,
        })?;
        // a destination that does not exist yet cannot be the source
        if fs::canonicalize(dest_dir).is_ok_and(|dest_root| dest_root == source_root) {
            return Err(RenameError::DestinationIsSource(dest_dir.to_path_buf()));
        }

        let mut file_names = Vec::new();
        let entries = fs::read_dir(source_dir).map_err(|source| RenameError::ReadSource {
            path: source_dir.to_path_buf(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| RenameError::ReadSource {
                path: source_dir.to_path_buf(),
                source,
            })?;
            if !entry.path().is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) if self.is_tile(&name) => file_names.push(name),
                Ok(_) => report.ignored += 1,
                Err(name) => {
                    sink.warning(format!("Skipping file with non UTF-8 name: {:?}", name));
                    report.ignored += 1;
                }
            }
        }
        file_names.sort();

        if !self.options.dry_run {
            fs::create_dir_all(dest_dir).map_err(|source| RenameError::CreateDestination {
                path: dest_dir.to_path_buf(),
                source,
            })?;
        }

        let mut written = HashSet::new();
        for file_name in file_names {
            match self.plan(&file_name, mapping, sink) {
                TileOutcome::Rename(new_name) => {
                    if !written.insert(new_name.clone()) {
                        sink.warning(format!(
                            "{} maps to {}, which was already written in this run; overwriting",
                            file_name, new_name
                        ));
                    }

                    if !self.options.dry_run {
                        let source = source_dir.join(&file_name);
                        let destination = dest_dir.join(&new_name);
                        if let Err(e) = copy_preserving_metadata(&source, &destination) {
                            sink.warning(format!("Failed to copy {} to {}: {}", file_name, destination.display(), e));
                            report.failed += 1;
                            continue;
                        }
                    }

                    log::debug!("{} -> {}", file_name, new_name);
                    report.renamed.push(RenamedTile {
                        source: file_name,
                        destination: new_name,
                    });
                }
                TileOutcome::NoMarker => report.no_marker += 1,
                TileOutcome::Unmatched => report.unmatched += 1,
                TileOutcome::Ambiguous => report.ambiguous += 1,
            }
        }

        if report.renamed.is_empty() {
            sink.info(format!("No tiles renamed from {}", source_dir.display()));
        }

        Ok(report)
    }
}

/// Copy a file's contents, permissions and access/modification times
fn copy_preserving_metadata(source: &Path, destination: &Path) -> io::Result<()> {
    let mut reader = File::open(source)?;
    let metadata = reader.metadata()?;

    let mut writer = File::create(destination)?;
    io::copy(&mut reader, &mut writer)?;

    let mut times = FileTimes::new().set_modified(metadata.modified()?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    writer.set_times(times)?;
    writer.set_permissions(metadata.permissions())?;
    Ok(())
}
