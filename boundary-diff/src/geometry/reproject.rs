//! Reprojection des frontières vers le SRID de comparaison
//!
//! Avec la feature `reproject`, PROJ est utilisé pour toute paire de SRID.
//! Sans elle, seule la transformation identité est possible (cas des KML,
//! toujours en EPSG:4326).

use anyhow::Result;
use geo::MultiPolygon;

/// SRID dans lequel les frontières sont comparées
pub const TARGET_SRID: u32 = 4326;

#[cfg(feature = "reproject")]
mod imp {
    use anyhow::{Context, Result};
    use geo::{Coord, LineString, MultiPolygon, Polygon};
    use proj::Proj;

    pub struct Reprojector {
        proj: Option<Proj>,
        source_epsg: u32,
        target_epsg: u32,
    }

    impl Reprojector {
        pub fn new(source_epsg: u32, target_epsg: u32) -> Result<Self> {
            let proj = if source_epsg == target_epsg {
                None
            } else {
                let source = format!("EPSG:{}", source_epsg);
                let target = format!("EPSG:{}", target_epsg);
                Some(Proj::new_known_crs(&source, &target, None).context(format!(
                    "Failed to create projection from {} to {}",
                    source, target
                ))?)
            };

            Ok(Self {
                proj,
                source_epsg,
                target_epsg,
            })
        }

        pub fn source_epsg(&self) -> u32 {
            self.source_epsg
        }

        pub fn target_epsg(&self) -> u32 {
            self.target_epsg
        }

        pub fn transform(&self, geom: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
            let Some(proj) = &self.proj else {
                return Ok(geom.clone());
            };

            let polygons: Result<Vec<Polygon<f64>>> = geom
                .0
                .iter()
                .map(|p| transform_polygon(proj, p))
                .collect();
            Ok(MultiPolygon::new(polygons?))
        }
    }

    /// Transformation batch d'un anneau
    fn transform_ring(proj: &Proj, ls: &LineString<f64>) -> Result<LineString<f64>> {
        let mut coords: Vec<(f64, f64)> = ls.0.iter().map(|c| (c.x, c.y)).collect();

        proj.convert_array(&mut coords)
            .context("Batch coordinate transformation failed")?;

        Ok(LineString::new(
            coords.into_iter().map(|(x, y)| Coord { x, y }).collect(),
        ))
    }

    fn transform_polygon(proj: &Proj, p: &Polygon<f64>) -> Result<Polygon<f64>> {
        let exterior = transform_ring(proj, p.exterior())?;
        let interiors: Result<Vec<LineString<f64>>> = p
            .interiors()
            .iter()
            .map(|ls| transform_ring(proj, ls))
            .collect();
        Ok(Polygon::new(exterior, interiors?))
    }
}

#[cfg(not(feature = "reproject"))]
mod imp {
    use anyhow::{bail, Result};
    use geo::MultiPolygon;

    /// Reprojector sans PROJ: identité uniquement
    pub struct Reprojector {
        epsg: u32,
    }

    impl Reprojector {
        pub fn new(source_epsg: u32, target_epsg: u32) -> Result<Self> {
            if source_epsg != target_epsg {
                bail!(
                    "Reprojection from EPSG:{} to EPSG:{} requires the 'reproject' feature. \
                     Build with: cargo build --features reproject",
                    source_epsg,
                    target_epsg
                );
            }
            Ok(Self { epsg: source_epsg })
        }

        pub fn source_epsg(&self) -> u32 {
            self.epsg
        }

        pub fn target_epsg(&self) -> u32 {
            self.epsg
        }

        pub fn transform(&self, geom: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
            Ok(geom.clone())
        }
    }
}

pub use imp::Reprojector;

/// Vérifie si la reprojection PROJ est disponible
pub fn is_available() -> bool {
    cfg!(feature = "reproject")
}

/// Copie reprojetée vers [`TARGET_SRID`]; la géométrie source n'est pas modifiée
pub fn to_target(geom: &MultiPolygon<f64>, source_epsg: u32) -> Result<MultiPolygon<f64>> {
    Reprojector::new(source_epsg, TARGET_SRID)?.transform(geom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};

    #[test]
    fn test_identity_returns_equal_copy() {
        let geom = MultiPolygon::new(vec![polygon![
            (x: 2.35, y: 48.85),
            (x: 2.36, y: 48.85),
            (x: 2.36, y: 48.86),
            (x: 2.35, y: 48.85),
        ]]);
        let result = to_target(&geom, 4326).unwrap();
        assert_eq!(result, geom);
    }

    #[cfg(not(feature = "reproject"))]
    #[test]
    fn test_other_srid_requires_feature() {
        assert!(!is_available());
        assert!(Reprojector::new(2154, 4326).is_err());
    }

    #[cfg(feature = "reproject")]
    #[test]
    fn test_lambert93_to_wgs84() {
        let geom = MultiPolygon::new(vec![polygon![
            (x: 652381.0, y: 6862047.0),
            (x: 652481.0, y: 6862047.0),
            (x: 652481.0, y: 6862147.0),
            (x: 652381.0, y: 6862047.0),
        ]]);
        let result = to_target(&geom, 2154).unwrap();
        let first = result.0[0].exterior().0[0];
        assert!(first.x > 2.0 && first.x < 3.0);
        assert!(first.y > 48.0 && first.y < 49.0);
    }
}
