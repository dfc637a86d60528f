//! Chargement de la nouvelle géométrie depuis un fichier KML

use std::path::Path;

use anyhow::{bail, Context, Result};
use geo::MultiPolygon;
use kmlsource::DataSource;
use tracing::debug;

use super::reproject::{Reprojector, TARGET_SRID};
use super::{has_short_ring, normalize, Normalized};

/// Nouvelle frontière, côté KML
#[derive(Debug, Clone)]
pub struct NewBoundary {
    /// Géométrie reprojetée en EPSG:4326, non simplifiée
    pub geometry: MultiPolygon<f64>,

    /// `None` si un anneau est trop court: ni aire ni simplification
    pub normalized: Option<Normalized>,
}

impl NewBoundary {
    /// Applique la règle de vacuité: un anneau de moins de 4 points rend la
    /// géométrie vide sans autre calcul.
    pub fn from_geometry(geometry: MultiPolygon<f64>) -> Self {
        let normalized = if has_short_ring(&geometry) {
            None
        } else {
            Some(normalize(&geometry))
        };
        Self {
            geometry,
            normalized,
        }
    }

    pub fn empty(&self) -> bool {
        self.normalized.as_ref().map_or(true, |n| n.empty)
    }

    pub fn area(&self) -> Option<f64> {
        self.normalized.as_ref().map(|n| n.area)
    }

    /// Géométrie simplifiée, uniquement si elle n'est pas vide
    pub fn comparable(&self) -> Option<&MultiPolygon<f64>> {
        self.normalized
            .as_ref()
            .filter(|n| !n.empty)
            .map(|n| &n.geometry)
    }
}

/// Ouvre le KML et en extrait l'unique feature, reprojetée en EPSG:4326
///
/// # Errors
///
/// Échoue si la source n'a pas exactement une couche, ou si la couche n'a pas
/// exactement une feature.
pub fn load_new_boundary(path: &Path) -> Result<NewBoundary> {
    let ds = DataSource::open(path)
        .with_context(|| format!("Failed to open data source {}", path.display()))?;

    let Some(layer) = ds.single_layer() else {
        bail!(
            "We only expect one layer in a DataSource ({} has {})",
            path.display(),
            ds.len()
        );
    };
    let Some(feature) = layer.single_feature() else {
        bail!(
            "We only expect one feature in each layer ({} has {})",
            path.display(),
            layer.len()
        );
    };

    let reprojector = Reprojector::new(ds.srid, TARGET_SRID)?;
    let geometry = reprojector.transform(&feature.geometry)?;
    debug!(
        path = %path.display(),
        source_srid = reprojector.source_epsg(),
        target_srid = reprojector.target_epsg(),
        polygons = geometry.0.len(),
        "Loaded new boundary"
    );

    Ok(NewBoundary::from_geometry(geometry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, polygon, Polygon};

    #[test]
    fn test_short_ring_is_empty_without_area() {
        let degenerate = Polygon::new(line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)], vec![]);
        let boundary = NewBoundary::from_geometry(MultiPolygon::new(vec![degenerate]));
        assert!(boundary.empty());
        assert_eq!(boundary.area(), None);
        assert!(boundary.comparable().is_none());
    }

    #[test]
    fn test_valid_polygon_has_area() {
        let boundary = NewBoundary::from_geometry(MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 3.0, y: 0.0),
            (x: 3.0, y: 1.0),
            (x: 0.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ]]));
        assert!(!boundary.empty());
        assert_eq!(boundary.area(), Some(3.0));
        assert!(boundary.comparable().is_some());
    }

    #[test]
    fn test_no_polygon_is_empty_with_zero_area() {
        let boundary = NewBoundary::from_geometry(MultiPolygon::new(vec![]));
        assert!(boundary.empty());
        assert_eq!(boundary.area(), Some(0.0));
        assert!(boundary.comparable().is_none());
    }

    fn write_kml(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("way-1-x.kml");
        std::fs::write(&path, format!("<kml><Document>{}</Document></kml>", body)).unwrap();
        path
    }

    const PLACEMARK: &str = "<Placemark><name>A</name><Polygon><outerBoundaryIs><LinearRing>\
        <coordinates>0,0 1,0 1,1 0,1 0,0</coordinates></LinearRing></outerBoundaryIs></Polygon></Placemark>";

    #[test]
    fn test_load_single_feature() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_kml(&dir, PLACEMARK);
        let boundary = load_new_boundary(&path).unwrap();
        assert_eq!(boundary.area(), Some(1.0));
    }

    #[test]
    fn test_load_rejects_two_features() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_kml(&dir, &format!("{}{}", PLACEMARK, PLACEMARK));
        let err = load_new_boundary(&path).unwrap_err();
        assert!(err.to_string().contains("one feature"));
    }

    #[test]
    fn test_load_rejects_no_layer() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_kml(&dir, "<name>nothing</name>");
        let err = load_new_boundary(&path).unwrap_err();
        assert!(err.to_string().contains("one layer"));
    }

    #[test]
    fn test_load_rejects_two_layers() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!("<Folder>{}</Folder><Folder>{}</Folder>", PLACEMARK, PLACEMARK);
        let path = write_kml(&dir, &body);
        let err = load_new_boundary(&path).unwrap_err();
        assert!(err.to_string().contains("one layer"));
    }
}
