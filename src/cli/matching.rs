use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use stagemap::diagnostics::LogSink;
use stagemap::pipeline::match_stage;

use super::Config;

/// Match planes to multipoints and write the mapping table
pub fn run(
    ome: PathBuf,
    multipoints: PathBuf,
    output: Option<PathBuf>,
    tolerance: Option<f64>,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load(config.as_deref())?;
    let table = config.table_path(output);
    let tolerance = config.tolerance(tolerance);

    info!("stagemap - Match Positions");
    info!("==========================");
    info!("Acquisition metadata: {}", ome.display());
    info!("Multipoints:          {}", multipoints.display());
    info!("Mapping table:        {}", table.display());
    info!("Tolerance:            {}", tolerance);

    let outcome = match_stage(&ome, &multipoints, &table, tolerance, &mut LogSink)
        .context("Match stage failed")?;

    println!(
        "Matched {} planes against {} points: {} matches written to {}",
        outcome.plane_count,
        outcome.point_count,
        outcome.matches.len(),
        outcome.table_path.display()
    );

    Ok(())
}
