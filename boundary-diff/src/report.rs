//! Rapport CSV des différences et résumé d'exécution
//!
//! Une ligne CSV par fichier KML traité. Les valeurs non applicables sont
//! écrites comme des chaînes vides.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::element::OsmElement;
use crate::geometry::{Comparison, NewBoundary};

/// En-tête du fichier CSV
pub const HEADER: [&str; 10] = [
    "ElementType",
    "ElementID",
    "ExistedPreviously",
    "PreviousEmpty",
    "PreviousArea",
    "NewEmpty",
    "NewArea",
    "SymmetricDifferenceArea",
    "GEOSEquals",
    "GEOSEqualsExact",
];

/// Une ligne du rapport
#[derive(Debug, Clone, PartialEq)]
pub struct DiffRow {
    pub element: OsmElement,
    pub existed_previously: bool,
    pub new_empty: Option<bool>,
    pub new_area: Option<f64>,
    pub comparison: Comparison,
}

impl DiffRow {
    pub fn new(element: OsmElement, existed_previously: bool, new: &NewBoundary, comparison: Comparison) -> Self {
        Self {
            element,
            existed_previously,
            new_empty: Some(new.empty()),
            new_area: new.area(),
            comparison,
        }
    }

    /// Champs dans l'ordre de [`HEADER`]
    pub fn to_record(&self) -> [String; 10] {
        let c = &self.comparison;
        [
            self.element.kind.to_string(),
            self.element.id.clone(),
            format_bool(self.existed_previously),
            format_opt_bool(c.previous_empty),
            format_opt_float(c.previous_area),
            format_opt_bool(self.new_empty),
            format_opt_float(self.new_area),
            format_opt_float(c.symmetric_difference_area),
            format_opt_bool(c.equals),
            format_opt_bool(c.equals_exact),
        ]
    }
}

fn format_bool(value: bool) -> String {
    let text = if value { "True" } else { "False" };
    text.to_string()
}

fn format_opt_bool(value: Option<bool>) -> String {
    value.map(format_bool).unwrap_or_default()
}

/// `{:?}` garde toujours une partie décimale (`0.0`, `12.5`)
fn format_opt_float(value: Option<f64>) -> String {
    value.map(|v| format!("{:?}", v)).unwrap_or_default()
}

/// Écrivain CSV, ouvert une fois (fichier tronqué) pour toute l'exécution
pub struct ReportWriter {
    writer: csv::Writer<File>,
}

impl ReportWriter {
    /// Crée le fichier et écrit l'en-tête
    pub fn create(path: &Path) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_path(path)
            .with_context(|| format!("Cannot create report {}", path.display()))?;
        writer
            .write_record(HEADER)
            .context("Failed to write CSV header")?;
        Ok(Self { writer })
    }

    /// Écrit une ligne et vide le tampon: une erreur ultérieure laisse un CSV partiel lisible
    pub fn write_row(&mut self, row: &DiffRow) -> Result<()> {
        self.writer
            .write_record(row.to_record())
            .with_context(|| format!("Failed to write CSV row for {}", row.element))?;
        self.writer.flush().context("Failed to flush CSV report")?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush CSV report")?;
        Ok(())
    }
}

/// Résumé d'une exécution
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub duration_secs: f64,

    /// Lignes écrites dans le CSV
    pub rows_written: usize,
    /// Fichiers ignorés avant le point de reprise
    pub files_skipped_before_resume: usize,
    /// Répertoires dont le nom ne ressemble pas à un type de zone
    pub nonconforming_directories: Vec<String>,

    pub existed_previously: usize,
    pub new_elements: usize,
    pub previous_empty: usize,
    pub new_empty: usize,
    pub equal: usize,
    pub equal_exact: usize,
    pub changed: usize,

    /// Éléments OSM rencontrés dans les nouveaux fichiers
    pub seen: BTreeSet<OsmElement>,
}

impl RunSummary {
    /// Comptabilise une ligne écrite
    pub fn record(&mut self, row: &DiffRow) {
        self.rows_written += 1;
        if row.existed_previously {
            self.existed_previously += 1;
        } else {
            self.new_elements += 1;
        }
        if row.comparison.previous_empty == Some(true) {
            self.previous_empty += 1;
        }
        if row.new_empty == Some(true) {
            self.new_empty += 1;
        }
        match row.comparison.equals {
            Some(true) => self.equal += 1,
            Some(false) => self.changed += 1,
            None => {}
        }
        if row.comparison.equals_exact == Some(true) {
            self.equal_exact += 1;
        }
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Affiche le résumé sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("BOUNDARY DIFFERENCE REPORT");
        println!("{}", "=".repeat(60));

        println!("Duration: {:.2}s", self.duration_secs);
        println!("Rows written: {}", self.rows_written);
        println!("Distinct OSM elements: {}", self.seen.len());
        if self.files_skipped_before_resume > 0 {
            println!("Files skipped before resume point: {}", self.files_skipped_before_resume);
        }

        println!("\n--- SUMMARY ---");
        println!(
            "Elements: {} existed previously, {} new",
            self.existed_previously, self.new_elements
        );
        println!(
            "Geometries: {} equal ({} exactly), {} changed",
            self.equal, self.equal_exact, self.changed
        );
        println!(
            "Empty: {} previous, {} new",
            self.previous_empty, self.new_empty
        );

        if !self.nonconforming_directories.is_empty() {
            println!(
                "\n--- NON-CONFORMING DIRECTORIES ({}) ---",
                self.nonconforming_directories.len()
            );
            for dir in &self.nonconforming_directories {
                println!("  {}", dir);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le résumé en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write summary {}", path.display()))?;
        Ok(())
    }

    /// Affichage compact
    pub fn summary(&self) -> String {
        format!(
            "{} rows: {} new, {} equal, {} changed",
            self.rows_written, self.new_elements, self.equal, self.changed
        )
    }
}
