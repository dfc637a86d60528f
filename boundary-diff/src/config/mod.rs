//! Configuration du schéma MapIt interrogé

use serde::{Deserialize, Serialize};
use std::path::Path;

use anyhow::{Context, Result};

use crate::element::OsmElementType;

/// Configuration principale
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Schéma PostgreSQL des tables (optionnel, sinon search_path)
    #[serde(default)]
    pub schema: Option<String>,

    pub tables: Tables,

    /// Types de code MapIt associés aux types d'éléments OSM
    pub code_types: CodeTypes,
}

/// Noms des tables MapIt
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Tables {
    pub code: String,
    pub code_type: String,
    pub area: String,
    pub generation: String,
    pub geometry: String,
}

/// Mapping type d'élément OSM -> code de CodeType
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CodeTypes {
    pub way: String,
    pub relation: String,
}

impl CodeTypes {
    pub fn for_element(&self, kind: OsmElementType) -> &str {
        match kind {
            OsmElementType::Way => &self.way,
            OsmElementType::Relation => &self.relation,
        }
    }
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "mapit" => Self::load_embedded(include_str!("presets/mapit.json")),
            _ => anyhow::bail!("Unknown preset: {}. Use: mapit", preset),
        }
    }

    /// Preset si le nom est connu, sinon chemin vers un fichier JSON
    pub fn resolve(name_or_path: &str) -> Result<Self> {
        match name_or_path {
            "mapit" => Self::from_preset(name_or_path),
            _ => Self::load(Path::new(name_or_path)),
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse embedded config")
    }

    /// Nom qualifié d'une table (`schema.table` si un schéma est configuré)
    pub fn qualified(&self, table: &str) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, table),
            None => table.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: None,
            tables: Tables {
                code: "mapit_code".into(),
                code_type: "mapit_codetype".into(),
                area: "mapit_area".into(),
                generation: "mapit_generation".into(),
                geometry: "mapit_geometry".into(),
            },
            code_types: CodeTypes {
                way: "osm_way".into(),
                relation: "osm_rel".into(),
            },
        }
    }
}
