//! Chargement, normalisation et comparaison des géométries de frontières

pub mod diff;
pub mod load;
pub mod reproject;

use anyhow::{bail, Result};
use geo::{Area, Geometry, HasDimensions, MultiPolygon, Polygon, Simplify};

pub use diff::{evaluate, Comparison};
pub use load::{load_new_boundary, NewBoundary};
pub use reproject::{Reprojector, TARGET_SRID};

/// Nombre minimal de points d'un anneau fermé
pub const MIN_RING_POINTS: usize = 4;

/// Géométrie simplifiée à tolérance nulle, avec son aire et son statut vide
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub geometry: MultiPolygon<f64>,
    pub area: f64,
    pub empty: bool,
}

/// Simplifie (tolérance 0, Douglas-Peucker) puis mesure la géométrie
pub fn normalize(geom: &MultiPolygon<f64>) -> Normalized {
    let geometry = geom.simplify(&0.0);
    Normalized {
        area: geometry.unsigned_area(),
        empty: geometry.is_empty(),
        geometry,
    }
}

/// Vrai si un anneau (extérieur ou intérieur) a moins de [`MIN_RING_POINTS`] points
pub fn has_short_ring(geom: &MultiPolygon<f64>) -> bool {
    geom.0.iter().any(|p| {
        std::iter::once(p.exterior())
            .chain(p.interiors())
            .any(|ring| ring.0.len() < MIN_RING_POINTS)
    })
}

/// Rassemble les polygones d'une géométrie quelconque en MultiPolygon
pub fn collect_polygons(geom: Geometry<f64>) -> Result<MultiPolygon<f64>> {
    let mut polygons: Vec<Polygon<f64>> = Vec::new();
    push_polygons(geom, &mut polygons)?;
    Ok(MultiPolygon::new(polygons))
}

fn push_polygons(geom: Geometry<f64>, out: &mut Vec<Polygon<f64>>) -> Result<()> {
    match geom {
        Geometry::Polygon(p) => out.push(p),
        Geometry::MultiPolygon(mp) => out.extend(mp.0),
        Geometry::GeometryCollection(gc) => {
            for g in gc.0 {
                push_polygons(g, out)?;
            }
        }
        other => bail!("Expected polygonal geometry, got {:?}", other),
    }
    Ok(())
}
