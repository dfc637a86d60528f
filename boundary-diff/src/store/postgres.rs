//! Lecture des codes OSM et des géométries de zones dans PostGIS

use std::time::SystemTime;

use anyhow::{Context, Result};
use deadpool_postgres::Pool;
use geozero::wkb::Wkb;
use geozero::ToGeo;
use tokio_postgres::Row;
use tracing::debug;

use super::{BoundaryStore, StoredBoundary};
use crate::config::Config;
use crate::element::OsmElement;
use crate::geometry::{collect_polygons, TARGET_SRID};

/// Store MapIt adossé à un pool PostgreSQL
pub struct PgBoundaryStore {
    pool: Pool,
    config: Config,
    query: String,
}

impl PgBoundaryStore {
    pub fn new(pool: Pool, config: Config) -> Self {
        let query = boundaries_query(&config);
        Self {
            pool,
            config,
            query,
        }
    }
}

/// Requête des codes d'un type donné, avec la génération haute de leur zone
/// et ses polygones rassemblés (NULL si aucun).
fn boundaries_query(config: &Config) -> String {
    let t = &config.tables;
    format!(
        r#"
        SELECT c.id, c.area_id, g.created,
               ST_AsBinary(ST_Transform(ST_Collect(geom.polygon), {srid})) AS polygons
        FROM {code} c
        JOIN {code_type} ct ON ct.id = c.type_id
        JOIN {area} a ON a.id = c.area_id
        LEFT JOIN {generation} g ON g.id = a.generation_high_id
        LEFT JOIN {geometry} geom ON geom.area_id = a.id
        WHERE ct.code = $1 AND c.code = $2
        GROUP BY c.id, c.area_id, g.created
        ORDER BY g.created ASC, c.id ASC
        "#,
        srid = TARGET_SRID,
        code = config.qualified(&t.code),
        code_type = config.qualified(&t.code_type),
        area = config.qualified(&t.area),
        generation = config.qualified(&t.generation),
        geometry = config.qualified(&t.geometry),
    )
}

fn decode_row(row: &Row) -> Result<StoredBoundary> {
    let code_id: i32 = row.get(0);
    let area_id: i32 = row.get(1);
    let generation_created: Option<SystemTime> = row.get(2);
    let generation_created = generation_created
        .with_context(|| format!("Area {} (code {}) has no high generation", area_id, code_id))?;

    let wkb: Option<Vec<u8>> = row.get(3);
    let geometry = match wkb {
        Some(bytes) => {
            let geom = Wkb(bytes)
                .to_geo()
                .with_context(|| format!("Invalid WKB for area {}", area_id))?;
            Some(collect_polygons(geom)?).filter(|mp| !mp.0.is_empty())
        }
        None => None,
    };

    Ok(StoredBoundary {
        code_id,
        area_id,
        generation_created,
        geometry,
    })
}

impl BoundaryStore for PgBoundaryStore {
    async fn boundaries_for(&self, element: &OsmElement) -> Result<Vec<StoredBoundary>> {
        let code_type = self.config.code_types.for_element(element.kind);
        let client = self
            .pool
            .get()
            .await
            .context("Failed to get connection from pool")?;

        let rows = client
            .query(self.query.as_str(), &[&code_type, &element.id])
            .await
            .with_context(|| format!("Failed to look up stored boundaries for {}", element))?;

        let records: Vec<StoredBoundary> = rows.iter().map(decode_row).collect::<Result<_>>()?;
        debug!(element = %element, code_type, records = records.len(), "Looked up stored boundaries");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_uses_configured_tables() {
        let mut config = Config::default();
        config.schema = Some("public".into());
        let query = boundaries_query(&config);

        assert!(query.contains("FROM public.mapit_code c"));
        assert!(query.contains("JOIN public.mapit_generation g ON g.id = a.generation_high_id"));
        assert!(query.contains("ST_Transform(ST_Collect(geom.polygon), 4326)"));
        assert!(query.contains("ORDER BY g.created ASC"));
    }
}
