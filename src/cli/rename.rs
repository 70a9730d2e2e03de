use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use stagemap::diagnostics::LogSink;
use stagemap::pipeline::rename_stage;

use super::{Config, RenameArgs};

/// Rename tiles using an existing mapping table
pub fn run(
    table: PathBuf,
    source_dir: PathBuf,
    dest_dir: PathBuf,
    args: RenameArgs,
    config: Option<PathBuf>,
) -> Result<()> {
    let mut config = Config::load(config.as_deref())?;
    args.apply(&mut config);

    info!("stagemap - Rename Tiles");
    info!("=======================");
    info!("Mapping table: {}", table.display());
    info!("Source:        {}", source_dir.display());
    info!("Destination:   {}", dest_dir.display());
    info!("Policy:        {:?}", config.rename.policy);

    let report = rename_stage(
        &table,
        &source_dir,
        &dest_dir,
        &config.mapping,
        &config.rename,
        &mut LogSink,
    )
    .context("Rename stage failed")?;

    // Use colorized output if available
    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }

    Ok(())
}
