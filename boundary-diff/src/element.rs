//! Éléments OSM et conventions de nommage des fichiers de frontières

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Type d'élément OSM inconnu
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown OSM element type: {0}")]
pub struct UnknownElementType(pub String);

/// Type d'élément OSM porteur d'une frontière
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OsmElementType {
    Way,
    Relation,
}

impl OsmElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OsmElementType::Way => "way",
            OsmElementType::Relation => "relation",
        }
    }
}

impl FromStr for OsmElementType {
    type Err = UnknownElementType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "way" => Ok(OsmElementType::Way),
            "relation" => Ok(OsmElementType::Relation),
            _ => Err(UnknownElementType(s.to_string())),
        }
    }
}

impl fmt::Display for OsmElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Un élément OSM (type + identifiant numérique)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct OsmElement {
    pub kind: OsmElementType,

    /// Identifiant, conservé tel qu'il apparaît dans le nom de fichier
    pub id: String,
}

impl OsmElement {
    /// Extrait l'élément d'un nom de fichier `<type>-<id>-...`
    ///
    /// Retourne `Ok(None)` si le nom ne suit pas la convention.
    pub fn from_file_name(name: &str) -> Result<Option<Self>, UnknownElementType> {
        let Some(caps) = file_name_regex().captures(name) else {
            return Ok(None);
        };
        let kind = caps[1].parse()?;
        Ok(Some(Self {
            kind,
            id: caps[2].to_string(),
        }))
    }
}

impl fmt::Display for OsmElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.id)
    }
}

/// Vérifie qu'un nom de répertoire ressemble à un type de zone MapIt (`^[A-Z0-9]{3}$`)
pub fn is_area_type_dir(name: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z0-9]{3}$").expect("valid regex"))
        .is_match(name)
}

fn file_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(way|relation)-(\d+)-").expect("valid regex"))
}
