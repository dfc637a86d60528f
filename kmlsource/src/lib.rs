//! # kmlsource
//!
//! Lecture des fichiers KML produits par l'extracteur de frontières OSM.
//!
//! ## Features
//!
//! - Parsing en flux avec `quick-xml`
//! - Extraction des ExtendedData et du nom d'affichage de la frontière
//! - Source de données couches / placemarks / polygones en types `geo`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kmlsource::{read_metadata, DataSource};
//! use std::path::Path;
//!
//! let path = Path::new("FRA/relation-7407-isere.kml");
//! let metadata = read_metadata(path)?;
//! println!("Nom: {}", metadata.name);
//!
//! let ds = DataSource::open(path)?;
//! for layer in &ds.layers {
//!     println!("{:?}: {} features", layer.name, layer.len());
//! }
//! ```

pub mod error;
pub mod parser;
pub mod types;

pub use error::KmlError;
pub use types::{DataSource, Feature, KmlMetadata, Layer, GENERATED_NAME_PREFIX, KML_SRID};

use std::path::Path;

use tracing::trace;

/// Lit les métadonnées d'un fichier KML et en déduit le nom d'affichage.
///
/// # Errors
///
/// Retourne `KmlError::NoUsefulName` ou `KmlError::MultipleUsefulNames` si,
/// une fois écartés les noms générés ("Boundaries for ..."), il ne reste pas
/// exactement un nom.
pub fn read_metadata(path: &Path) -> Result<KmlMetadata, KmlError> {
    let data = std::fs::read(path)?;
    let entries = parser::metadata::parse(&data)?;
    trace!(path = %path.display(), entries = entries.len(), "Parsed KML metadata");
    KmlMetadata::from_entries(entries)
}

impl DataSource {
    /// Ouvre un fichier KML comme source de données
    pub fn open(path: &Path) -> Result<Self, KmlError> {
        let data = std::fs::read(path)?;
        let ds = parser::document::parse(&data)?;
        trace!(path = %path.display(), layers = ds.len(), "Opened KML data source");
        Ok(ds)
    }

    /// Parse une source de données depuis un buffer en mémoire
    pub fn from_bytes(data: &[u8]) -> Result<Self, KmlError> {
        parser::document::parse(data)
    }
}
