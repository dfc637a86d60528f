//! Parcours des répertoires de KML et écriture du rapport
//!
//! Arborescence attendue: `<racine>/<TYPE>/<way|relation>-<id>-*.kml`, où
//! `<TYPE>` est un code de type de zone MapIt sur 3 caractères.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};

use crate::element::{is_area_type_dir, OsmElement};
use crate::geometry::{evaluate, load_new_boundary};
use crate::report::{DiffRow, ReportWriter, RunSummary};
use crate::store::BoundaryStore;

/// Paramètres d'une exécution
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Répertoire racine contenant un sous-répertoire par type de zone
    pub root: PathBuf,

    /// Fichier CSV de sortie (tronqué au démarrage)
    pub output: PathBuf,

    /// Point de reprise: les fichiers sont ignorés jusqu'au premier dont le
    /// nom contient cette chaîne (inclus)
    pub resume_from: Option<String>,
}

/// Compare chaque KML de l'arborescence avec le store et écrit le rapport.
///
/// Toute anomalie (nom de fichier, métadonnées, forme de la source) interrompt
/// l'exécution; le CSV reste partiellement écrit.
pub async fn run<S: BoundaryStore>(options: &RunOptions, store: &S) -> Result<RunSummary> {
    let started = Instant::now();

    if !options.root.is_dir() {
        bail!("'{}' is not a directory", options.root.display());
    }

    let mut writer = ReportWriter::create(&options.output)?;
    let mut summary = RunSummary::default();
    let mut resume_marker = options.resume_from.as_deref();

    let directories: Vec<(String, PathBuf)> = sorted_entries(&options.root)?
        .into_iter()
        .filter(|(_, path)| path.is_dir())
        .collect();

    for (dir_name, dir_path) in directories {
        if !is_area_type_dir(&dir_name) {
            warn!(directory = %dir_name, "Directory doesn't look like a MapIt area type");
            summary.nonconforming_directories.push(dir_name.clone());
        }

        if !dir_path.exists() {
            continue;
        }

        for (file_name, file_path) in sorted_entries(&dir_path)? {
            if let Some(marker) = resume_marker {
                if !file_name.contains(marker) {
                    summary.files_skipped_before_resume += 1;
                    continue;
                }
                info!(file = %file_name, "Reached resume point");
                resume_marker = None;
            }

            if !file_name.ends_with(".kml") {
                continue;
            }

            let row = process_file(&file_name, &file_path, store).await?;
            summary.seen.insert(row.element.clone());
            writer.write_row(&row)?;
            summary.record(&row);
        }
    }

    writer.finish()?;
    summary.set_duration(started.elapsed());
    info!(summary = %summary.summary(), output = %options.output.display(), "Report written");

    Ok(summary)
}

/// Traite un fichier KML et produit sa ligne de rapport
async fn process_file<S: BoundaryStore>(file_name: &str, path: &Path, store: &S) -> Result<DiffRow> {
    let element = OsmElement::from_file_name(file_name)?.with_context(|| {
        format!("Couldn't extract OSM element type and ID from: {}", file_name)
    })?;

    info!(file = %path.display(), "Parsing");
    let metadata = kmlsource::read_metadata(path)
        .with_context(|| format!("Failed to read metadata from {}", path.display()))?;
    info!(name = %metadata.name, element = %element, "Boundary");

    let new = load_new_boundary(path)?;
    let records = store.boundaries_for(&element).await?;

    let previous = records.last().map(|r| r.geometry.as_ref());
    let comparison = evaluate(previous, &new);
    debug!(element = %element, records = records.len(), ?comparison, "Compared boundaries");

    Ok(DiffRow::new(element, !records.is_empty(), &new, comparison))
}

/// Entrées d'un répertoire triées par nom
fn sorted_entries(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("Cannot list {}", dir.display()))? {
        let entry = entry?;
        entries.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
    }
    entries.sort();
    Ok(entries)
}
