//! # stagemap - Label Microscope Tiles by Stage Position
//!
//! `stagemap` correlates the stage positions recorded in a microscope
//! acquisition's OME-XML metadata with an operator-authored multipoint list,
//! and uses the result to give exported per-series tile images human labels.
//!
//! ## Workflow
//!
//! ```text
//! plate.ome.xml ─► planes  ┐
//!                          ├─► matcher ─► matched_positions.csv ─► mapping ─► renamer
//! multipoints.xml ► points ┘                                                   │
//!                                         tiles/Plate.nd2 (series 01).tif ─────┘─► out/A1.tif
//! ```
//!
//! 1. **Match**: every (plane, point) pair within an absolute tolerance on both
//!    axes becomes a row of the mapping table.
//! 2. **Map**: each row's image name, e.g. `"Plate (Series 00)"`, becomes the key
//!    `("Plate.nd2", 0)` pointing to the point's label.
//! 3. **Rename**: each tile's `(series NN)` number is shifted down by one (the
//!    exporter counts from 1, the metadata from 0) and looked up; matching tiles
//!    are copied to the destination under their label.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stagemap::diagnostics::LogSink;
//! use stagemap::pipeline::{run, RunConfig};
//!
//! let config = RunConfig::new("plate.ome.xml", "multipoints.xml", "tiles", "renamed");
//! let outcome = run(&config, &mut LogSink)?;
//! println!("Renamed {} tiles", outcome.report.renamed_count());
//! # Ok::<(), stagemap::pipeline::PipelineError>(())
//! ```
//!
//! ## Mapping Table
//!
//! | Column | Type | Description |
//! |--------|------|-------------|
//! | image_name | String | Acquisition unit name from the OME-XML `Image` |
//! | point_name | String | Multipoint label |
//! | posX | Float64 | Plane stage X |
//! | posY | Float64 | Plane stage Y |
//! | dX | Float64 | Point stage X |
//! | dY | Float64 | Point stage Y |
//!
//! ## Architecture
//!
//! - [`ome`]: OME-XML plane source
//! - [`multipoint`]: multipoint XML point source
//! - [`matcher`]: tolerance join of planes and points
//! - [`table`]: CSV persistence of match records
//! - [`mapping`]: `(base_name, series_index) -> label` mapping builder
//! - [`rename`]: tile renamer with configurable lookup policy
//! - [`pipeline`]: the match and rename stages wired together
//! - [`diagnostics`]: per-record warnings reported to a caller-supplied sink

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod diagnostics;
pub mod mapping;
pub mod matcher;
pub mod multipoint;
pub mod ome;
pub mod pipeline;
pub mod records;
pub mod rename;
pub mod table;

mod xml;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::diagnostics::{Diagnostic, DiagnosticSink, Diagnostics, LogSink, Severity};
    pub use crate::mapping::{build_mapping, load_mapping, Mapping, MappingKey, MappingOptions};
    pub use crate::matcher::{match_positions, DEFAULT_TOLERANCE};
    pub use crate::multipoint::{parse_multipoints, parse_multipoints_file, MultipointError};
    pub use crate::ome::{read_planes_from_file, OmeError, OmeReader};
    pub use crate::pipeline::{match_stage, rename_stage, run, PipelineError, RunConfig};
    pub use crate::records::{MatchRecord, PlaneRecord, PointRecord};
    pub use crate::rename::{LookupPolicy, RenameOptions, RenameReport, Renamer};
    pub use crate::table::{read_matches, write_matches, TableError};
}
