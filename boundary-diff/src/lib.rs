//! # boundary-diff
//!
//! Comparaison des frontières administratives OSM fraîchement extraites (KML)
//! avec les frontières déjà enregistrées dans MapIt (PostGIS).
//!
//! ## Features
//!
//! - Lecture des KML via `kmlsource`
//! - Recherche des codes OSM et des polygones de zone dans PostgreSQL
//! - Aire, différence symétrique, égalité topologique et exacte (`geo`)
//! - Rapport CSV, une ligne par fichier KML
//!
//! ## Usage CLI
//!
//! ```bash
//! boundary-diff ./kml-by-type/ --output /tmp/difference-results.csv
//! boundary-diff ./kml-by-type/ --resume-from relation-80370
//! ```

pub mod cli;
pub mod config;
pub mod element;
pub mod geometry;
pub mod report;
pub mod runner;
pub mod store;

pub use config::Config;
pub use element::{OsmElement, OsmElementType};
pub use report::{DiffRow, RunSummary};
pub use runner::{run, RunOptions};
pub use store::{BoundaryStore, StoredBoundary};
