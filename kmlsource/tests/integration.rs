//! Tests d'intégration sur des fichiers KML écrits sur disque

use std::path::PathBuf;

use kmlsource::{read_metadata, DataSource, KmlError};

const BOUNDARY_KML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>Boundaries for FRA at admin level 6</name>
    <Placemark>
      <name>Isère</name>
      <ExtendedData>
        <Data name="admin_level"><value>6</value></Data>
        <Data name="boundary"><value>administrative</value></Data>
      </ExtendedData>
      <MultiGeometry>
        <Polygon>
          <outerBoundaryIs>
            <LinearRing>
              <coordinates>
                5.0,45.0,0 6.0,45.0,0 6.0,46.0,0 5.0,46.0,0 5.0,45.0,0
              </coordinates>
            </LinearRing>
          </outerBoundaryIs>
        </Polygon>
      </MultiGeometry>
    </Placemark>
  </Document>
</kml>
"#;

fn write_fixture(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_read_metadata_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "relation-7407-isere.kml", BOUNDARY_KML);

    let metadata = read_metadata(&path).unwrap();
    assert_eq!(metadata.name, "Isère");
    assert_eq!(metadata.data["admin_level"], "6");
    assert_eq!(metadata.data["boundary"], "administrative");
}

#[test]
fn test_open_data_source_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "relation-7407-isere.kml", BOUNDARY_KML);

    let ds = DataSource::open(&path).unwrap();
    assert_eq!(ds.len(), 1);
    assert_eq!(ds.srid, 4326);

    let feature = ds.single_layer().unwrap().single_feature().unwrap();
    assert_eq!(feature.geometry.0.len(), 1);
    assert_eq!(feature.geometry.0[0].exterior().0.len(), 5);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = DataSource::open(&dir.path().join("absent.kml"));
    assert!(matches!(result, Err(KmlError::Io(_))));
}

#[test]
fn test_metadata_with_two_names_is_ambiguous() {
    let dir = tempfile::tempdir().unwrap();
    let kml = BOUNDARY_KML.replace(
        "</Document>",
        "<Placemark><name>Savoie</name></Placemark></Document>",
    );
    let path = write_fixture(&dir, "relation-1-x.kml", &kml);

    match read_metadata(&path) {
        Err(KmlError::MultipleUsefulNames(names)) => {
            assert!(names.contains(&"Isère".to_string()));
            assert!(names.contains(&"Savoie".to_string()));
        }
        other => panic!("Expected MultipleUsefulNames, got {:?}", other),
    }
}
