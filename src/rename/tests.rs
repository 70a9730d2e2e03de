use super::*;
use crate::diagnostics::{Diagnostic, Severity};
use crate::mapping::MappingKey;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tempfile::tempdir;

fn mapping(entries: &[(&str, u32, &str)]) -> Mapping {
    entries
        .iter()
        .map(|(base, index, label)| (MappingKey::new(*base, *index), label.to_string()))
        .collect()
}

fn touch(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_is_tile_extension() {
    let renamer = Renamer::default();
    assert!(renamer.is_tile("a (series 01).tif"));
    assert!(renamer.is_tile("a (series 01).TIFF"));
    assert!(!renamer.is_tile("a (series 01).png"));
    assert!(!renamer.is_tile("tif"));
}

#[test]
fn test_plan_outcomes() {
    let renamer = Renamer::default();
    let mapping = mapping(&[("Plate.nd2", 0, "A1")]);
    let mut sink: Vec<Diagnostic> = Vec::new();

    assert_eq!(
        renamer.plan("Plate.nd2 (series 01).tif", &mapping, &mut sink),
        TileOutcome::Rename("A1.tif".to_string())
    );
    assert!(sink.is_empty());

    assert_eq!(renamer.plan("Plate.tif", &mapping, &mut sink), TileOutcome::NoMarker);
    assert_eq!(renamer.plan("Plate.nd2 (series 00).tif", &mapping, &mut sink), TileOutcome::Unmatched);
    assert_eq!(sink.len(), 2);
    assert!(sink.iter().all(|d| d.severity == Severity::Warning));
}

#[test]
fn test_end_to_end_scenario_tiles() {
    let renamer = Renamer::default();
    let mapping = mapping(&[("Plate.nd2", 0, "A1")]);
    let mut sink: Vec<Diagnostic> = Vec::new();

    // file index 02 looks up series index 1, which has no entry
    assert_eq!(renamer.plan("Plate (series 02).tif", &mapping, &mut sink), TileOutcome::Unmatched);
    // file index 01 looks up series index 0
    assert_eq!(
        renamer.plan("Plate (series 01).tif", &mapping, &mut sink),
        TileOutcome::Rename("A1.tif".to_string())
    );
}

#[test]
fn test_rename_all_copies_and_counts() {
    let source = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let dest_dir = dest.path().join("renamed");

    touch(source.path(), "Plate.nd2 (series 01).tif", "tile-1");
    touch(source.path(), "Plate.nd2 (series 02).TIF", "tile-2");
    touch(source.path(), "Plate.nd2 (series 09).tif", "tile-9");
    touch(source.path(), "overview.tif", "overview");
    touch(source.path(), "notes.txt", "notes");
    fs::create_dir(source.path().join("sub (series 01).tif")).unwrap();

    let mapping = mapping(&[("Plate.nd2", 0, "A1"), ("Plate.nd2", 1, "A2")]);
    let mut sink: Vec<Diagnostic> = Vec::new();
    let report = Renamer::default()
        .rename_all(source.path(), &dest_dir, &mapping, &mut sink)
        .unwrap();

    assert_eq!(report.renamed_count(), 2);
    assert_eq!(report.no_marker, 1);
    assert_eq!(report.unmatched, 1);
    assert_eq!(report.ignored, 1);
    assert_eq!(report.skipped_count(), 2);
    assert_eq!(report.renamed[0].destination, "A1.tif");
    assert_eq!(report.renamed[1].destination, "A2.TIF");

    assert_eq!(fs::read_to_string(dest_dir.join("A1.tif")).unwrap(), "tile-1");
    assert_eq!(fs::read_to_string(dest_dir.join("A2.TIF")).unwrap(), "tile-2");

    // copy, not move
    assert!(source.path().join("Plate.nd2 (series 01).tif").exists());
    assert_eq!(fs::read_dir(&dest_dir).unwrap().count(), 2);
}

#[test]
fn test_copy_preserves_modification_time() {
    let source = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let path = touch(source.path(), "Plate.nd2 (series 01).tif", "tile");

    let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_times(FileTimes::new().set_modified(modified))
        .unwrap();

    let mapping = mapping(&[("Plate.nd2", 0, "A1")]);
    let mut sink: Vec<Diagnostic> = Vec::new();
    Renamer::default()
        .rename_all(source.path(), dest.path(), &mapping, &mut sink)
        .unwrap();

    let copied = fs::metadata(dest.path().join("A1.tif")).unwrap();
    assert_eq!(copied.modified().unwrap(), modified);
}

#[test]
fn test_rerun_overwrites_destination() {
    let source = tempdir().unwrap();
    let dest = tempdir().unwrap();
    touch(source.path(), "Plate.nd2 (series 01).tif", "new");
    touch(dest.path(), "A1.tif", "old");

    let mapping = mapping(&[("Plate.nd2", 0, "A1")]);
    let mut sink: Vec<Diagnostic> = Vec::new();
    let renamer = Renamer::default();
    renamer.rename_all(source.path(), dest.path(), &mapping, &mut sink).unwrap();
    let report = renamer.rename_all(source.path(), dest.path(), &mapping, &mut sink).unwrap();

    assert_eq!(report.renamed_count(), 1);
    assert_eq!(fs::read_to_string(dest.path().join("A1.tif")).unwrap(), "new");
}

#[test]
fn test_collision_within_run_is_reported() {
    let source = tempdir().unwrap();
    let dest = tempdir().unwrap();
    touch(source.path(), "Plate (series 01).tif", "short-name");
    touch(source.path(), "Plate.nd2 (series 01).tif", "long-name");

    let mapping = mapping(&[("Plate.nd2", 0, "A1")]);
    let mut sink: Vec<Diagnostic> = Vec::new();
    let report = Renamer::default()
        .rename_all(source.path(), dest.path(), &mapping, &mut sink)
        .unwrap();

    assert_eq!(report.renamed_count(), 2);
    assert!(sink.iter().any(|d| d.message.contains("already written")));
    // later file in name order wins
    assert_eq!(fs::read_to_string(dest.path().join("A1.tif")).unwrap(), "long-name");
}

#[test]
fn test_dry_run_touches_nothing() {
    let source = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let dest_dir = dest.path().join("out");
    touch(source.path(), "Plate.nd2 (series 01).tif", "tile");

    let renamer = Renamer::new(RenameOptions {
        dry_run: true,
        ..Default::default()
    });
    let mapping = mapping(&[("Plate.nd2", 0, "A1")]);
    let mut sink: Vec<Diagnostic> = Vec::new();
    let report = renamer.rename_all(source.path(), &dest_dir, &mapping, &mut sink).unwrap();

    assert!(report.dry_run);
    assert_eq!(report.renamed_count(), 1);
    assert!(!dest_dir.exists());
}

#[test]
fn test_ambiguous_tiles_are_counted() {
    let source = tempdir().unwrap();
    let dest = tempdir().unwrap();
    touch(source.path(), "Old Scan.nd2 (series 01).tif", "tile");

    let renamer = Renamer::new(RenameOptions {
        policy: LookupPolicy::RejectAmbiguous,
        ..Default::default()
    });
    let mapping = mapping(&[("Scan.nd2", 0, "short"), ("Old Scan.nd2", 0, "long")]);
    let mut sink: Vec<Diagnostic> = Vec::new();
    let report = renamer.rename_all(source.path(), dest.path(), &mapping, &mut sink).unwrap();

    assert_eq!(report.ambiguous, 1);
    assert_eq!(report.renamed_count(), 0);
    assert!(sink.iter().any(|d| d.message.contains("short, long")));
}

#[test]
fn test_empty_mapping_renames_nothing() {
    let source = tempdir().unwrap();
    let dest = tempdir().unwrap();
    touch(source.path(), "Plate.nd2 (series 01).tif", "tile");

    let mut sink: Vec<Diagnostic> = Vec::new();
    let report = Renamer::default()
        .rename_all(source.path(), dest.path(), &Mapping::new(), &mut sink)
        .unwrap();

    assert_eq!(report.renamed_count(), 0);
    assert_eq!(report.unmatched, 1);
    assert!(sink.iter().any(|d| d.severity == Severity::Info));
}

#[test]
fn test_missing_source_directory() {
    let dest = tempdir().unwrap();
    let mut sink: Vec<Diagnostic> = Vec::new();
    let result = Renamer::default().rename_all(
        Path::new("/nonexistent/tiles"),
        dest.path(),
        &Mapping::new(),
        &mut sink,
    );
    assert!(matches!(result, Err(RenameError::ReadSource { .. })));
}

#[test]
fn test_channel_tiles_keep_distinct_names() {
    let source = tempdir().unwrap();
    let dest = tempdir().unwrap();
    touch(source.path(), "Plate.nd2_c1 (series 01).tif", "channel-1");
    touch(source.path(), "Plate.nd2_c2 (series 01).tif", "channel-2");

    let mapping = mapping(&[("Plate.nd2", 0, "A1")]);
    let mut sink: Vec<Diagnostic> = Vec::new();
    let report = Renamer::default()
        .rename_all(source.path(), dest.path(), &mapping, &mut sink)
        .unwrap();

    let destinations: Vec<_> = report.renamed.iter().map(|r| r.destination.as_str()).collect();
    assert_eq!(destinations, vec!["A1_c1.tif", "A1_c2.tif"]);
    assert_eq!(fs::read_to_string(dest.path().join("A1_c1.tif")).unwrap(), "channel-1");
    assert_eq!(fs::read_to_string(dest.path().join("A1_c2.tif")).unwrap(), "channel-2");
    assert!(!sink.iter().any(|d| d.message.contains("already written")));
}

#[test]
fn test_destination_equal_to_source_is_rejected() {
    let source = tempdir().unwrap();
    touch(source.path(), "Plate.nd2 (series 01).tif", "tile");
    let existing = touch(source.path(), "A1.tif", "keep me");

    let mapping = mapping(&[("Plate.nd2", 0, "A1")]);
    let mut sink: Vec<Diagnostic> = Vec::new();
    let renamer = Renamer::default();

    let result = renamer.rename_all(source.path(), source.path(), &mapping, &mut sink);
    assert!(matches!(result, Err(RenameError::DestinationIsSource(_))));

    // same directory spelled differently
    let dotted = source.path().join(".");
    let result = renamer.rename_all(source.path(), &dotted, &mapping, &mut sink);
    assert!(matches!(result, Err(RenameError::DestinationIsSource(_))));

    assert_eq!(fs::read_to_string(existing).unwrap(), "keep me");
}

#[test]
fn test_report_display() {
    let report = RenameReport {
        renamed: vec![RenamedTile {
            source: "Plate.nd2 (series 01).tif".to_string(),
            destination: "A1.tif".to_string(),
        }],
        no_marker: 2,
        ..Default::default()
    };
    let text = report.to_string();
    assert!(text.starts_with("Rename Summary\n"));
    assert!(text.contains("Renamed: 1"));
    assert!(text.contains("No series marker: 2"));
}
