//! Types d'erreurs pour le crate kmlsource

use thiserror::Error;

/// Erreurs pouvant survenir lors de la lecture d'un fichier KML
#[derive(Debug, Error)]
pub enum KmlError {
    /// Erreur d'I/O lors de la lecture du fichier
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML mal formé
    #[error("XML error at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// Aucun nom exploitable dans les ExtendedData
    #[error("No useful names found in KML data")]
    NoUsefulName,

    /// Plusieurs noms exploitables, impossible de choisir
    #[error("Multiple useful names found in KML data: {}", .0.join(", "))]
    MultipleUsefulNames(Vec<String>),

    /// Coordonnées illisibles dans un élément <coordinates>
    #[error("Invalid coordinates {value:?}: {reason}")]
    InvalidCoordinates { value: String, reason: String },

    /// Géométrie non supportée ou incohérente
    #[error("Invalid geometry in placemark {placemark:?}: {reason}")]
    InvalidGeometry { placemark: String, reason: String },
}

impl KmlError {
    /// Crée une erreur XML avec la position dans le flux
    pub fn xml(position: u64, source: impl Into<quick_xml::Error>) -> Self {
        Self::Xml {
            position,
            source: source.into(),
        }
    }

    /// Crée une erreur de coordonnées invalides
    pub fn invalid_coordinates(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCoordinates {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Crée une erreur de géométrie invalide
    pub fn invalid_geometry(placemark: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            placemark: placemark.into(),
            reason: reason.into(),
        }
    }
}
