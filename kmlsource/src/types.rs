//! Types de données pour le crate kmlsource

use geo::MultiPolygon;
use std::collections::BTreeMap;

use crate::KmlError;

/// Préfixe des noms de document générés par l'extracteur de frontières
pub const GENERATED_NAME_PREFIX: &str = "Boundaries for";

/// SRID des coordonnées KML (toujours WGS84 lon/lat)
pub const KML_SRID: u32 = 4326;

/// Source de données KML: une liste de couches
#[derive(Debug, Clone)]
pub struct DataSource {
    /// Couches (une par Folder, ou une seule pour le Document)
    pub layers: Vec<Layer>,

    /// SRID des coordonnées
    pub srid: u32,
}

impl DataSource {
    /// Nombre de couches
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Retourne l'unique couche, ou `None` s'il y en a zéro ou plusieurs
    pub fn single_layer(&self) -> Option<&Layer> {
        match self.layers.as_slice() {
            [layer] => Some(layer),
            _ => None,
        }
    }
}

/// Une couche: un ensemble de placemarks
#[derive(Debug, Clone, Default)]
pub struct Layer {
    /// Nom du Folder ou du Document
    pub name: Option<String>,

    pub features: Vec<Feature>,
}

impl Layer {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Retourne l'unique feature, ou `None` s'il y en a zéro ou plusieurs
    pub fn single_feature(&self) -> Option<&Feature> {
        match self.features.as_slice() {
            [feature] => Some(feature),
            _ => None,
        }
    }
}

/// Un placemark avec sa géométrie polygonale
#[derive(Debug, Clone)]
pub struct Feature {
    /// Contenu de l'élément <name> du placemark
    pub name: Option<String>,

    /// Polygones du placemark (Polygon ou MultiGeometry)
    pub geometry: MultiPolygon<f64>,

    /// ExtendedData du placemark (Data/SimpleData name -> value)
    pub properties: BTreeMap<String, String>,
}

/// Métadonnées d'un fichier de frontière
///
/// `name` est le nom d'affichage de la frontière: l'unique entrée qui n'a pas
/// été générée par l'extracteur (préfixe [`GENERATED_NAME_PREFIX`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmlMetadata {
    pub name: String,

    /// ExtendedData associées à ce nom
    pub data: BTreeMap<String, String>,
}

impl KmlMetadata {
    /// Construit les métadonnées à partir des entrées brutes `nom -> ExtendedData`
    pub fn from_entries(entries: BTreeMap<String, BTreeMap<String, String>>) -> Result<Self, KmlError> {
        let mut useful: Vec<(String, BTreeMap<String, String>)> = entries
            .into_iter()
            .filter(|(name, _)| !name.starts_with(GENERATED_NAME_PREFIX))
            .collect();

        match useful.len() {
            0 => Err(KmlError::NoUsefulName),
            1 => {
                let (name, data) = useful.remove(0);
                Ok(Self { name, data })
            }
            _ => Err(KmlError::MultipleUsefulNames(
                useful.into_iter().map(|(name, _)| name).collect(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(names: &[&str]) -> BTreeMap<String, BTreeMap<String, String>> {
        names
            .iter()
            .map(|n| (n.to_string(), BTreeMap::new()))
            .collect()
    }

    #[test]
    fn test_single_useful_name() {
        let meta =
            KmlMetadata::from_entries(entries(&["Boundaries for FRA", "Isère"])).unwrap();
        assert_eq!(meta.name, "Isère");
    }

    #[test]
    fn test_no_useful_name() {
        let result = KmlMetadata::from_entries(entries(&["Boundaries for FRA"]));
        assert!(matches!(result, Err(KmlError::NoUsefulName)));
    }

    #[test]
    fn test_multiple_useful_names() {
        let result = KmlMetadata::from_entries(entries(&["Boundaries for X", "A", "B"]));
        match result {
            Err(KmlError::MultipleUsefulNames(names)) => assert_eq!(names, vec!["A", "B"]),
            other => panic!("Expected MultipleUsefulNames, got {:?}", other),
        }
    }

    #[test]
    fn test_single_layer_and_feature() {
        let ds = DataSource {
            layers: vec![Layer::default()],
            srid: KML_SRID,
        };
        let layer = ds.single_layer().unwrap();
        assert!(layer.single_feature().is_none());

        let ds = DataSource {
            layers: vec![Layer::default(), Layer::default()],
            srid: KML_SRID,
        };
        assert!(ds.single_layer().is_none());
    }
}
