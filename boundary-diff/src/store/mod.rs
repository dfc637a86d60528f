//! Accès aux frontières déjà enregistrées dans MapIt

pub mod pool;
pub mod postgres;

use std::time::SystemTime;

use anyhow::Result;
use geo::MultiPolygon;

use crate::element::OsmElement;

pub use pool::{create_pool, test_connection, DatabaseConfig, DatabaseOverrides, SslMode};
pub use postgres::PgBoundaryStore;

/// Un code OSM enregistré, avec la géométrie de la zone associée
#[derive(Debug, Clone)]
pub struct StoredBoundary {
    /// Identifiant de la ligne de code
    pub code_id: i32,

    pub area_id: i32,

    /// Date de création de la génération (generation_high) de la zone
    pub generation_created: SystemTime,

    /// Polygones de la zone rassemblés en une géométrie; `None` si la zone n'en a aucun
    pub geometry: Option<MultiPolygon<f64>>,
}

/// Recherche des frontières enregistrées pour un élément OSM
///
/// Les implémentations retournent les enregistrements triés par date de
/// création de génération croissante: le dernier est le plus récent.
#[allow(async_fn_in_trait)]
pub trait BoundaryStore {
    async fn boundaries_for(&self, element: &OsmElement) -> Result<Vec<StoredBoundary>>;
}

/// Trie les enregistrements par génération (puis par code pour départager)
pub fn sort_by_generation(records: &mut [StoredBoundary]) {
    records.sort_by(|a, b| {
        a.generation_created
            .cmp(&b.generation_created)
            .then(a.code_id.cmp(&b.code_id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn record(code_id: i32, secs: u64) -> StoredBoundary {
        StoredBoundary {
            code_id,
            area_id: code_id * 10,
            generation_created: SystemTime::UNIX_EPOCH + Duration::from_secs(secs),
            geometry: None,
        }
    }

    #[test]
    fn test_sort_by_generation() {
        let mut records = vec![record(3, 300), record(1, 100), record(4, 100), record(2, 200)];
        sort_by_generation(&mut records);
        let ids: Vec<i32> = records.iter().map(|r| r.code_id).collect();
        assert_eq!(ids, vec![1, 4, 2, 3]);
    }
}
