//! Arguments CLI et exécution de la comparaison

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::config::Config;
use crate::runner::{run, RunOptions};
use crate::store::{create_pool, test_connection, DatabaseConfig, DatabaseOverrides, PgBoundaryStore};

#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Directory containing one sub-directory of KML files per area type
    pub directory: PathBuf,

    /// Output CSV file (truncated if it exists)
    #[arg(short, long, default_value = "difference-results.csv")]
    pub output: PathBuf,

    /// Skip files until one whose name contains this marker (e.g. relation-80370)
    #[arg(long)]
    pub resume_from: Option<String>,

    /// Schema preset name (mapit) or path to a JSON config
    #[arg(long, default_value = "mapit")]
    pub config: String,

    /// Also save the run summary as JSON
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// PostgreSQL host (défaut : env PGHOST / localhost)
    #[arg(long)]
    pub host: Option<String>,

    /// PostgreSQL database name (défaut : env PGDATABASE / mapit)
    #[arg(long)]
    pub database: Option<String>,

    /// PostgreSQL user (défaut : env PGUSER / mapit)
    #[arg(long)]
    pub user: Option<String>,

    /// PostgreSQL password (défaut : env PGPASSWORD)
    #[arg(long)]
    pub password: Option<String>,

    /// PostgreSQL port (défaut : env PGPORT / 5432)
    #[arg(long)]
    pub port: Option<u16>,

    /// SSL mode: disable, prefer, require (défaut : env PGSSLMODE / disable)
    #[arg(long)]
    pub ssl: Option<String>,
}

impl DiffArgs {
    fn database_overrides(&self) -> DatabaseOverrides {
        DatabaseOverrides {
            host: self.host.clone(),
            database: self.database.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            port: self.port,
            ssl: self.ssl.clone(),
        }
    }
}

/// Exécute la comparaison complète
pub async fn cmd_diff(args: DiffArgs) -> Result<()> {
    let config = Config::resolve(&args.config)?;

    let mut db_config = DatabaseConfig::from_env();
    db_config.apply_overrides(args.database_overrides())?;

    println!("=== Boundary differences ===");
    println!("Directory: {}", args.directory.display());
    println!("Output: {}", args.output.display());
    println!("Config: {}", args.config);
    if let Some(marker) = &args.resume_from {
        println!("Resume from: {}", marker);
    }
    println!(
        "Database: {}@{}:{}/{} (SSL: {:?})",
        db_config.user, db_config.host, db_config.port, db_config.dbname, db_config.ssl_mode
    );

    let pool = create_pool(&db_config)?;
    test_connection(&pool).await?;
    println!("Connected to PostgreSQL");

    let store = PgBoundaryStore::new(pool, config);
    let options = RunOptions {
        root: args.directory,
        output: args.output,
        resume_from: args.resume_from,
    };

    let summary = run(&options, &store).await?;
    summary.display();

    if let Some(path) = &args.summary {
        summary
            .save_to_file(path)
            .with_context(|| format!("Cannot save summary to {}", path.display()))?;
        info!(path = %path.display(), "Summary saved");
    }

    Ok(())
}
