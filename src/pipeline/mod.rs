//! # Pipeline
//!
//! Wires the sources, matcher, mapping table, mapping builder and renamer into
//! the two stages of a run:
//!
//! ```text
//! OME-XML ──► planes ─┐
//!                     ├─► match_positions ─► matched_positions.csv   (match stage)
//! multipoints ► points┘
//!
//! matched_positions.csv ─► build_mapping ─► Renamer ─► dest_dir     (rename stage)
//! ```
//!
//! The mapping table is the only artifact passed between the stages, so the
//! rename stage can be rerun on its own.
//!
//! The single fail-fast path is the acquisition metadata: if it cannot be read
//! or has no planes, the match stage stops before writing the table.

use std::path::{Path, PathBuf};

use crate::diagnostics::DiagnosticSink;
use crate::mapping::{load_mapping, MappingOptions};
use crate::matcher::{match_positions, DEFAULT_TOLERANCE};
use crate::multipoint::parse_multipoints_file;
use crate::ome::read_planes_from_file;
use crate::records::MatchRecord;
use crate::rename::{RenameOptions, RenameReport, Renamer};
use crate::table::{write_matches, DEFAULT_TABLE_FILE};

mod error;


pub use error::PipelineError;

/// Result of the match stage
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// Number of planes read from the acquisition metadata
    pub plane_count: usize,
    /// Number of points read from the multipoint list
    pub point_count: usize,
    /// Matches written to the table
    pub matches: Vec<MatchRecord>,
    /// Where the table was written
    pub table_path: PathBuf,
}

/// Result of a full run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Match stage result
    pub matching: MatchOutcome,
    /// Rename stage result
    pub report: RenameReport,
}

/// Inputs and settings for a full run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// OME-XML acquisition metadata
    pub ome_path: PathBuf,
    /// Multipoint position list
    pub multipoints_path: PathBuf,
    /// Mapping table to write and read back
    pub table_path: PathBuf,
    /// Directory of exported tiles
    pub source_dir: PathBuf,
    /// Directory receiving renamed copies
    pub dest_dir: PathBuf,
    /// Match tolerance
    pub tolerance: f64,
    /// Mapping key options
    pub mapping: MappingOptions,
    /// Renamer options
    pub rename: RenameOptions,
}

impl RunConfig {
    /// Create a run configuration with default settings
    pub fn new(
        ome_path: impl Into<PathBuf>,
        multipoints_path: impl Into<PathBuf>,
        source_dir: impl Into<PathBuf>,
        dest_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            ome_path: ome_path.into(),
            multipoints_path: multipoints_path.into(),
            table_path: PathBuf::from(DEFAULT_TABLE_FILE),
            source_dir: source_dir.into(),
            dest_dir: dest_dir.into(),
            tolerance: DEFAULT_TOLERANCE,
            mapping: MappingOptions::default(),
            rename: RenameOptions::default(),
        }
    }
}

/// Reject negative or non-finite tolerances
pub fn validate_tolerance(tolerance: f64) -> Result<f64, PipelineError> {
    if tolerance.is_finite() && tolerance >= 0.0 {
        Ok(tolerance)
    } else {
        Err(PipelineError::InvalidTolerance(tolerance))
    }
}

/// Read both position sources, match them and write the mapping table.
///
/// An unreadable multipoint list is reported and treated as empty; the table
/// is still written (header only).
pub fn match_stage(
    ome_path: &Path,
    multipoints_path: &Path,
    table_path: &Path,
    tolerance: f64,
    sink: &mut dyn DiagnosticSink,
) -> Result<MatchOutcome, PipelineError> {
    let tolerance = validate_tolerance(tolerance)?;

    let planes = read_planes_from_file(ome_path, sink).map_err(|source| PipelineError::Acquisition {
        path: ome_path.to_path_buf(),
        source,
    })?;
    if planes.is_empty() {
        return Err(PipelineError::NoPlanes(ome_path.to_path_buf()));
    }
    sink.info(format!("Read {} planes from {}", planes.len(), ome_path.display()));

    let points = match parse_multipoints_file(multipoints_path, sink) {
        Ok(points) => points,
        Err(e) => {
            sink.error(format!(
                "Error parsing multipoints XML {}: {}",
                multipoints_path.display(),
                e
            ));
            Vec::new()
        }
    };
    sink.info(format!("Read {} points from {}", points.len(), multipoints_path.display()));

    let matches = match_positions(&planes, &points, tolerance);
    if matches.is_empty() {
        sink.warning("No matches found; writing an empty table".to_string());
    }

    write_matches(table_path, &matches).map_err(|source| PipelineError::WriteTable {
        path: table_path.to_path_buf(),
        source,
    })?;
    sink.info(format!(
        "Saved {} matching positions to '{}'",
        matches.len(),
        table_path.display()
    ));

    Ok(MatchOutcome {
        plane_count: planes.len(),
        point_count: points.len(),
        matches,
        table_path: table_path.to_path_buf(),
    })
}

/// Build the mapping from a table and rename the tiles in `source_dir`
pub fn rename_stage(
    table_path: &Path,
    source_dir: &Path,
    dest_dir: &Path,
    mapping_options: &MappingOptions,
    rename_options: &RenameOptions,
    sink: &mut dyn DiagnosticSink,
) -> Result<RenameReport, PipelineError> {
    let mapping = load_mapping(table_path, mapping_options, sink);
    sink.info(format!("Loaded {} mapping entries", mapping.len()));

    let renamer = Renamer::new(RenameOptions {
        acquisition_extension: mapping_options.acquisition_extension.clone(),
        ..rename_options.clone()
    });
    let report = renamer.rename_all(source_dir, dest_dir, &mapping, sink)?;
    sink.info(format!(
        "Renamed {} of {} tiles into {}",
        report.renamed_count(),
        report.tile_count(),
        dest_dir.display()
    ));
    Ok(report)
}

/// Run the match stage, then the rename stage on the table it wrote
pub fn run(config: &RunConfig, sink: &mut dyn DiagnosticSink) -> Result<RunOutcome, PipelineError> {
    let matching = match_stage(
        &config.ome_path,
        &config.multipoints_path,
        &config.table_path,
        config.tolerance,
        sink,
    )?;
    let report = rename_stage(
        &config.table_path,
        &config.source_dir,
        &config.dest_dir,
        &config.mapping,
        &config.rename,
        sink,
    )?;
    Ok(RunOutcome { matching, report })
}
