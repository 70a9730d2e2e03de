use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use stagemap::diagnostics::LogSink;
use stagemap::pipeline::{run as run_pipeline, RunConfig};

use super::{Config, RenameArgs};

/// Match positions, write the table, then rename tiles
#[allow(clippy::too_many_arguments)]
pub fn run(
    ome: PathBuf,
    multipoints: PathBuf,
    source_dir: PathBuf,
    dest_dir: PathBuf,
    output: Option<PathBuf>,
    tolerance: Option<f64>,
    args: RenameArgs,
    config: Option<PathBuf>,
) -> Result<()> {
    let mut config = Config::load(config.as_deref())?;
    args.apply(&mut config);

    let run_config = RunConfig {
        table_path: config.table_path(output),
        tolerance: config.tolerance(tolerance),
        mapping: config.mapping,
        rename: config.rename,
        ..RunConfig::new(ome, multipoints, source_dir, dest_dir)
    };

    info!("stagemap - Match and Rename");
    info!("===========================");
    info!("Acquisition metadata: {}", run_config.ome_path.display());
    info!("Multipoints:          {}", run_config.multipoints_path.display());
    info!("Mapping table:        {}", run_config.table_path.display());
    info!("Source:               {}", run_config.source_dir.display());
    info!("Destination:          {}", run_config.dest_dir.display());

    let outcome = run_pipeline(&run_config, &mut LogSink).context("Run failed")?;

    println!(
        "Matched {} planes against {} points: {} matches written to {}",
        outcome.matching.plane_count,
        outcome.matching.point_count,
        outcome.matching.matches.len(),
        outcome.matching.table_path.display()
    );

    #[cfg(feature = "colorized_output")]
    {
        println!("{}", outcome.report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", outcome.report);
    }

    Ok(())
}
