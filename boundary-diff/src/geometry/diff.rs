//! Comparaison d'une frontière enregistrée avec la nouvelle frontière
//!
//! Toute valeur qui n'a pas pu être calculée (côté absent ou vide) reste à
//! `None`: "non calculé" se distingue ainsi de `false` ou `0`.

use geo::{Area, BooleanOps, MultiPolygon, Relate};

use super::load::NewBoundary;
use super::normalize;

/// Résultat de la comparaison côté "précédent"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    pub previous_empty: Option<bool>,
    pub previous_area: Option<f64>,

    /// Aire de la zone couverte par exactement une des deux géométries
    pub symmetric_difference_area: Option<f64>,

    /// Égalité topologique (même ensemble de points)
    pub equals: Option<bool>,

    /// Égalité coordonnée par coordonnée, ordre des sommets compris
    pub equals_exact: Option<bool>,
}

/// Compare la géométrie enregistrée la plus récente avec la nouvelle.
///
/// `previous` vaut `None` quand aucun enregistrement n'existe, et
/// `Some(None)` quand l'enregistrement existe mais que sa zone n'a aucun polygone.
pub fn evaluate(previous: Option<Option<&MultiPolygon<f64>>>, new: &NewBoundary) -> Comparison {
    let mut cmp = Comparison::default();

    let Some(previous) = previous else {
        return cmp;
    };

    cmp.previous_empty = Some(previous.is_none());
    let Some(previous) = previous else {
        return cmp;
    };

    let previous = normalize(previous);
    cmp.previous_area = Some(previous.area);

    if let Some(new_geometry) = new.comparable() {
        let previous = &previous.geometry;
        cmp.symmetric_difference_area = Some(previous.xor(new_geometry).unsigned_area());
        cmp.equals = Some(previous.relate(new_geometry).is_equal_topo());
        cmp.equals_exact = Some(previous == new_geometry);
    }

    cmp
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, polygon, Polygon};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: x0, y: y0),
            (x: x1, y: y0),
            (x: x1, y: y1),
            (x: x0, y: y1),
            (x: x0, y: y0),
        ]])
    }

    #[test]
    fn test_no_previous_record() {
        let new = NewBoundary::from_geometry(rect(0.0, 0.0, 1.0, 1.0));
        assert_eq!(evaluate(None, &new), Comparison::default());
    }

    #[test]
    fn test_previous_without_polygons() {
        let new = NewBoundary::from_geometry(rect(0.0, 0.0, 1.0, 1.0));
        let cmp = evaluate(Some(None), &new);
        assert_eq!(cmp.previous_empty, Some(true));
        assert_eq!(cmp.previous_area, None);
        assert_eq!(cmp.symmetric_difference_area, None);
        assert_eq!(cmp.equals, None);
        assert_eq!(cmp.equals_exact, None);
    }

    #[test]
    fn test_identical_geometries() {
        let geom = rect(0.0, 0.0, 2.0, 1.0);
        let new = NewBoundary::from_geometry(geom.clone());
        let cmp = evaluate(Some(Some(&geom)), &new);

        assert_eq!(cmp.previous_empty, Some(false));
        assert_eq!(cmp.previous_area, Some(2.0));
        assert_eq!(cmp.symmetric_difference_area, Some(0.0));
        assert_eq!(cmp.equals, Some(true));
        assert_eq!(cmp.equals_exact, Some(true));
    }

    #[test]
    fn test_same_shape_different_start_vertex() {
        let previous = MultiPolygon::new(vec![polygon![
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
        ]]);
        let new = NewBoundary::from_geometry(rect(0.0, 0.0, 1.0, 1.0));
        let cmp = evaluate(Some(Some(&previous)), &new);

        assert_eq!(cmp.equals, Some(true));
        assert_eq!(cmp.equals_exact, Some(false));
        assert!(cmp.symmetric_difference_area.unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_shifted_geometry() {
        let previous = rect(0.0, 0.0, 2.0, 2.0);
        let new = NewBoundary::from_geometry(rect(1.0, 0.0, 3.0, 2.0));
        let cmp = evaluate(Some(Some(&previous)), &new);

        assert_eq!(cmp.previous_area, Some(4.0));
        let sym = cmp.symmetric_difference_area.unwrap();
        assert!((sym - 4.0).abs() < 1e-9, "got {}", sym);
        assert_eq!(cmp.equals, Some(false));
        assert_eq!(cmp.equals_exact, Some(false));
    }

    #[test]
    fn test_new_side_empty_skips_comparison() {
        let previous = rect(0.0, 0.0, 1.0, 1.0);
        let degenerate = Polygon::new(line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)], vec![]);
        let new = NewBoundary::from_geometry(MultiPolygon::new(vec![degenerate]));
        let cmp = evaluate(Some(Some(&previous)), &new);

        assert_eq!(cmp.previous_empty, Some(false));
        assert_eq!(cmp.previous_area, Some(1.0));
        assert_eq!(cmp.symmetric_difference_area, None);
        assert_eq!(cmp.equals, None);
        assert_eq!(cmp.equals_exact, None);
    }
}
