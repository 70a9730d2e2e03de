//! End-to-end tests: OME-XML and multipoint files on disk, through the mapping
//! table, to renamed tiles in a destination directory.

use stagemap::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const OME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<OME xmlns="http://www.openmicroscopy.org/Schemas/OME/2016-06" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <Instrument ID="Instrument:0"/>
  <Image ID="Image:0" Name="Plate (Series 00)">
    <Pixels ID="Pixels:0" DimensionOrder="XYCZT" Type="uint16" SizeX="4" SizeY="4" SizeZ="1" SizeC="2" SizeT="1">
      <Channel ID="Channel:0:0" Name="DAPI"/>
      <Channel ID="Channel:0:1" Name="GFP"/>
      <Plane TheZ="0" TheC="0" TheT="0" PositionX="-1520.25" PositionY="3310.5"/>
      <Plane TheZ="0" TheC="1" TheT="0" PositionX="-1520.25" PositionY="3310.5"/>
    </Pixels>
  </Image>
  <Image ID="Image:1" Name="Plate (Series 01)">
    <Pixels ID="Pixels:1" DimensionOrder="XYCZT" Type="uint16" SizeX="4" SizeY="4" SizeZ="1" SizeC="1" SizeT="1">
      <Plane TheZ="0" TheC="0" TheT="0" PositionX="7479.75" PositionY="3310.5"/>
    </Pixels>
  </Image>
  <Image ID="Image:2" Name="Plate (Series 02)">
    <Pixels ID="Pixels:2" DimensionOrder="XYCZT" Type="uint16" SizeX="4" SizeY="4" SizeZ="1" SizeC="1" SizeT="1">
      <Plane TheZ="0" TheC="0" TheT="0" PositionX="16479.5" PositionY="3310.5"/>
    </Pixels>
  </Image>
</OME>"#;

const MULTIPOINTS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<variant version="1.0">
  <no_name runtype="CLxListVariant">
    <bIncludeZ runtype="bool" value="false"/>
    <Point00000 runtype="NDSetupMultipointListItem">
      <bChecked runtype="bool" value="true"/>
      <strName runtype="CLxStringW" value="A1"/>
      <dXPosition runtype="double" value="-1520.2496"/>
      <dYPosition runtype="double" value="3310.5003"/>
    </Point00000>
    <Point00001 runtype="NDSetupMultipointListItem">
      <bChecked runtype="bool" value="true"/>
      <strName runtype="CLxStringW" value="A2"/>
      <dXPosition runtype="double" value="7479.75"/>
      <dYPosition runtype="double" value="3310.5"/>
    </Point00001>
    <Point00002 runtype="NDSetupMultipointListItem">
      <strName runtype="CLxStringW" value="unplaced"/>
      <dXPosition runtype="double" value="0.0"/>
      <dYPosition runtype="double" value="0.0"/>
    </Point00002>
  </no_name>
</variant>"#;

fn write_inputs(dir: &Path) {
    fs::write(dir.join("plate.ome.xml"), OME_XML).unwrap();
    fs::write(dir.join("multipoints.xml"), MULTIPOINTS_XML).unwrap();

    let tiles = dir.join("tiles");
    fs::create_dir(&tiles).unwrap();
    for (name, content) in [
        ("Plate.nd2 (series 01).tif", "series-0"),
        ("Plate.nd2 (series 02).tif", "series-1"),
        ("Plate.nd2 (series 03).tif", "series-2"),
        ("Plate.nd2.tif", "no-marker"),
        ("Plate.nd2 (series 01).jpg", "preview"),
    ] {
        fs::write(tiles.join(name), content).unwrap();
    }
}

#[test]
fn test_match_then_rename_in_separate_stages() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path());
    let table = dir.path().join("matched_positions.csv");

    let mut diagnostics = Diagnostics::new();
    let outcome = match_stage(
        &dir.path().join("plate.ome.xml"),
        &dir.path().join("multipoints.xml"),
        &table,
        DEFAULT_TOLERANCE,
        &mut diagnostics,
    )
    .unwrap();

    assert_eq!(outcome.plane_count, 3);
    assert_eq!(outcome.point_count, 3);
    let labels: Vec<_> = outcome.matches.iter().map(|m| m.label.as_str()).collect();
    assert_eq!(labels, vec!["A1", "A2"]);

    let text = fs::read_to_string(&table).unwrap();
    assert!(text.starts_with("image_name,point_name,posX,posY,dX,dY\n"));

    // the rename stage only needs the table
    let dest = dir.path().join("renamed");
    let report = rename_stage(
        &table,
        &dir.path().join("tiles"),
        &dest,
        &MappingOptions::default(),
        &RenameOptions::default(),
        &mut diagnostics,
    )
    .unwrap();

    assert_eq!(report.renamed_count(), 2);
    assert_eq!(report.unmatched, 1);
    assert_eq!(report.no_marker, 1);
    assert_eq!(report.ignored, 1);
    assert_eq!(fs::read_to_string(dest.join("A1.tif")).unwrap(), "series-0");
    assert_eq!(fs::read_to_string(dest.join("A2.tif")).unwrap(), "series-1");
    assert!(diagnostics.has_warnings());
    assert!(!diagnostics.has_errors());
}

#[test]
fn test_full_run_matches_stage_by_stage_result() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path());

    let mut config = RunConfig::new(
        dir.path().join("plate.ome.xml"),
        dir.path().join("multipoints.xml"),
        dir.path().join("tiles"),
        dir.path().join("renamed"),
    );
    config.table_path = dir.path().join("table.csv");

    let mut sink: Vec<Diagnostic> = Vec::new();
    let outcome = run(&config, &mut sink).unwrap();

    let destinations: Vec<_> = outcome
        .report
        .renamed
        .iter()
        .map(|r| r.destination.as_str())
        .collect();
    assert_eq!(destinations, vec!["A1.tif", "A2.tif"]);
}

#[test]
fn test_end_to_end_scenario() {
    let planes = vec![PlaneRecord::new("Plate (Series 01)", 100.0, 200.0)];
    let points = vec![PointRecord::new("A1", 100.0005, 199.9998)];

    let matches = match_positions(&planes, &points, 1e-3);
    assert_eq!(matches.len(), 1);

    let mut sink: Vec<Diagnostic> = Vec::new();
    let mapping = build_mapping(&matches, &MappingOptions::default(), &mut sink);
    assert_eq!(mapping.len(), 1);
    assert_eq!(mapping.get(&MappingKey::new("Plate.nd2", 1)), Some("A1"));

    let dir = tempdir().unwrap();
    let source = dir.path().join("tiles");
    fs::create_dir(&source).unwrap();
    // file index 02 -> series index 1
    fs::write(source.join("Plate (series 02).tif"), "tile").unwrap();
    // file index 01 -> series index 0, no entry
    fs::write(source.join("Plate (series 01).tif"), "other").unwrap();

    let dest = dir.path().join("out");
    let report = Renamer::default()
        .rename_all(&source, &dest, &mapping, &mut sink)
        .unwrap();

    assert_eq!(report.renamed_count(), 1);
    assert_eq!(report.unmatched, 1);
    assert_eq!(fs::read_to_string(dest.join("A1.tif")).unwrap(), "tile");
}

#[test]
fn test_unreadable_acquisition_aborts_before_any_output() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path());
    fs::write(dir.path().join("plate.ome.xml"), "<OME><Image></OME>").unwrap();

    let mut config = RunConfig::new(
        dir.path().join("plate.ome.xml"),
        dir.path().join("multipoints.xml"),
        dir.path().join("tiles"),
        dir.path().join("renamed"),
    );
    config.table_path = dir.path().join("table.csv");

    let mut sink: Vec<Diagnostic> = Vec::new();
    let result = run(&config, &mut sink);

    assert!(matches!(result, Err(PipelineError::Acquisition { .. })));
    assert!(!config.table_path.exists());
    assert!(!config.dest_dir.exists());
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// A point offset by at most the tolerance on each axis always matches
        #[test]
        fn test_offset_within_tolerance_matches(
            x in -50_000.0f64..50_000.0,
            y in -50_000.0f64..50_000.0,
            fx in -0.9f64..0.9,
            fy in -0.9f64..0.9,
        ) {
            let tolerance = 1e-3;
            let planes = vec![PlaneRecord::new("P (Series 00)", x, y)];
            let points = vec![PointRecord::new("Q", x + fx * tolerance, y + fy * tolerance)];
            prop_assert_eq!(match_positions(&planes, &points, tolerance).len(), 1);
        }

        /// Swapping the roles of plane and point coordinates gives the same answer
        #[test]
        fn test_match_is_symmetric(
            ax in -100.0f64..100.0,
            ay in -100.0f64..100.0,
            bx in -100.0f64..100.0,
            by in -100.0f64..100.0,
            tolerance in 0.0f64..5.0,
        ) {
            let forward = match_positions(
                &[PlaneRecord::new("P (Series 00)", ax, ay)],
                &[PointRecord::new("Q", bx, by)],
                tolerance,
            );
            let backward = match_positions(
                &[PlaneRecord::new("P (Series 00)", bx, by)],
                &[PointRecord::new("Q", ax, ay)],
                tolerance,
            );
            prop_assert_eq!(forward.len(), backward.len());
        }
    }
}
