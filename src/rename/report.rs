use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

/// One tile copied (or planned, in a dry run) under its new name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamedTile {
    /// Original file name in the source directory
    pub source: String,
    /// New file name in the destination directory
    pub destination: String,
}

/// Outcome counts of a rename pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameReport {
    /// Tiles copied under their mapped label
    pub renamed: Vec<RenamedTile>,
    /// Tile files without a series marker
    pub no_marker: usize,
    /// Tile files with a marker but no mapping entry
    pub unmatched: usize,
    /// Tile files rejected because several entries fit
    pub ambiguous: usize,
    /// Tile files whose copy failed
    pub failed: usize,
    /// Directory entries that are not tile files
    pub ignored: usize,
    /// Whether files were only planned, not copied
    pub dry_run: bool,
}

impl RenameReport {
    /// Number of tiles renamed
    pub fn renamed_count(&self) -> usize {
        self.renamed.len()
    }

    /// Number of tile files that were not renamed, for any reason
    pub fn skipped_count(&self) -> usize {
        self.no_marker + self.unmatched + self.ambiguous + self.failed
    }

    /// Number of tile files considered
    pub fn tile_count(&self) -> usize {
        self.renamed_count() + self.skipped_count()
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = String::new();
            output.push_str(&format!("{}\n", style(self.title()).bold().cyan()));
            output.push_str(&format!(
                "  {}: {}\n",
                style("Renamed").bold(),
                style(self.renamed_count()).green()
            ));
            for (name, count) in self.skip_lines() {
                let count = if count > 0 { style(count).yellow() } else { style(count).dim() };
                output.push_str(&format!("  {}: {}\n", style(name).bold(), count));
            }
            output.push_str(&format!("  {}: {}\n", style("Ignored (not tiles)").bold(), self.ignored));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }

    fn title(&self) -> &'static str {
        if self.dry_run {
            "Rename Summary (dry run)"
        } else {
            "Rename Summary"
        }
    }

    fn skip_lines(&self) -> [(&'static str, usize); 4] {
        [
            ("No series marker", self.no_marker),
            ("No mapping match", self.unmatched),
            ("Ambiguous match", self.ambiguous),
            ("Copy failed", self.failed),
        ]
    }
}

impl fmt::Display for RenameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title())?;
        writeln!(f, "  Renamed: {}", self.renamed_count())?;
        for (name, count) in self.skip_lines() {
            writeln!(f, "  {}: {}", name, count)?;
        }
        writeln!(f, "  Ignored (not tiles): {}", self.ignored)
    }
}
