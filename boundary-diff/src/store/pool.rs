//! Pool de connexions PostgreSQL vers la base MapIt

use anyhow::{Context, Result};
use deadpool_postgres::{Config, Pool, PoolConfig, Runtime, Timeouts};
use std::time::Duration;
use tokio_postgres::NoTls;
use tokio_postgres_rustls::MakeRustlsConnect;

/// Mode SSL pour la connexion PostgreSQL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SslMode {
    #[default]
    Disable,
    Prefer,
    Require,
}

impl std::str::FromStr for SslMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "disable" | "off" | "false" | "no" => Ok(SslMode::Disable),
            "prefer" => Ok(SslMode::Prefer),
            "require" | "on" | "true" | "yes" => Ok(SslMode::Require),
            _ => Err(format!("Invalid SSL mode: {}. Use: disable, prefer, require", s)),
        }
    }
}

/// Configuration de la base de données
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: Option<String>,
    /// Les requêtes sont séquentielles: une ou deux connexions suffisent
    pub pool_size: usize,
    pub ssl_mode: SslMode,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 5432,
            dbname: "mapit".into(),
            user: "mapit".into(),
            password: None,
            pool_size: 2,
            ssl_mode: SslMode::Disable,
        }
    }
}

impl DatabaseConfig {
    /// Charge la configuration depuis les variables d'environnement (PGHOST, PGPORT, ...)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: var("PGHOST").unwrap_or(defaults.host),
            port: var("PGPORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            dbname: var("PGDATABASE").unwrap_or(defaults.dbname),
            user: var("PGUSER").unwrap_or(defaults.user),
            password: var("PGPASSWORD"),
            pool_size: var("POOL_SIZE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.pool_size),
            ssl_mode: var("PGSSLMODE")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
        }
    }

    /// Applique les options passées en ligne de commande
    pub fn apply_overrides(&mut self, overrides: DatabaseOverrides) -> Result<()> {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(database) = overrides.database {
            self.dbname = database;
        }
        if let Some(user) = overrides.user {
            self.user = user;
        }
        if let Some(password) = overrides.password {
            self.password = Some(password);
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(ssl) = overrides.ssl {
            self.ssl_mode = ssl.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        }
        Ok(())
    }
}

/// Surcharges de connexion issues de la CLI
#[derive(Debug, Clone, Default)]
pub struct DatabaseOverrides {
    pub host: Option<String>,
    pub database: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub port: Option<u16>,
    pub ssl: Option<String>,
}

fn make_tls_connector() -> MakeRustlsConnect {
    let root_store = rustls::RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    MakeRustlsConnect::new(config)
}

/// Crée un pool de connexions
pub fn create_pool(config: &DatabaseConfig) -> Result<Pool> {
    let mut cfg = Config::new();
    cfg.host = Some(config.host.clone());
    cfg.port = Some(config.port);
    cfg.dbname = Some(config.dbname.clone());
    cfg.user = Some(config.user.clone());
    cfg.password = config.password.clone();

    cfg.pool = Some(PoolConfig {
        max_size: config.pool_size,
        timeouts: Timeouts {
            wait: Some(Duration::from_secs(30)),
            create: Some(Duration::from_secs(10)),
            recycle: Some(Duration::from_secs(30)),
        },
        ..Default::default()
    });

    match config.ssl_mode {
        SslMode::Disable => cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .context("Failed to create database pool"),
        SslMode::Prefer | SslMode::Require => cfg
            .create_pool(Some(Runtime::Tokio1), make_tls_connector())
            .context("Failed to create database pool with TLS"),
    }
}

/// Teste la connexion à la base
pub async fn test_connection(pool: &Pool) -> Result<()> {
    let client = pool
        .get()
        .await
        .context("Failed to get connection from pool")?;
    client
        .execute("SELECT 1", &[])
        .await
        .context("Connection test failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_ssl_mode_parse() {
        assert_eq!("require".parse(), Ok(SslMode::Require));
        assert_eq!("OFF".parse(), Ok(SslMode::Disable));
        assert_eq!("prefer".parse(), Ok(SslMode::Prefer));
        assert!("maybe".parse::<SslMode>().is_err());
    }

    #[test]
    fn test_from_lookup_defaults_and_values() {
        let vars: HashMap<&str, &str> = [("PGHOST", "db.example"), ("PGPORT", "6543"), ("PGSSLMODE", "require")]
            .into_iter()
            .collect();
        let config = DatabaseConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.host, "db.example");
        assert_eq!(config.port, 6543);
        assert_eq!(config.dbname, "mapit");
        assert_eq!(config.ssl_mode, SslMode::Require);
        assert_eq!(config.password, None);
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = DatabaseConfig::default();
        config
            .apply_overrides(DatabaseOverrides {
                database: Some("mapit_global".into()),
                port: Some(5433),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(config.dbname, "mapit_global");
        assert_eq!(config.port, 5433);
        assert_eq!(config.host, "localhost");

        let bad = config.apply_overrides(DatabaseOverrides {
            ssl: Some("sometimes".into()),
            ..Default::default()
        });
        assert!(bad.is_err());
    }
}
