//! # Backend Configuration
//!
//! Startup configuration for the repository boundary.
//!
//! ## Backend Selection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Which backend runs?                                  │
//! │                                                                         │
//! │  DbConfig::from_env()                                                  │
//! │       │                                                                 │
//! │       ├── PHARMA_DATABASE_PATH set ──► SQLite backend (persistent)     │
//! │       │                                                                 │
//! │       └── not set ──────────────────► memory backend (transient)       │
//! │                                                                         │
//! │  The choice is made ONCE, in Database::connect. Business logic never   │
//! │  branches on the backend.                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

/// Repository backend configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::sqlite("./data/pharmacare.db").max_connections(5);
/// let db = Database::connect(config).await?;
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file. `None` selects the in-memory
    /// backend.
    pub database_path: Option<PathBuf>,

    /// Maximum number of connections in the SQLite pool.
    /// Default: 5 (sufficient for a single storefront process)
    pub max_connections: u32,

    /// Connection acquire timeout.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,

    /// Whether to seed starter data into an empty store.
    /// Default: true
    pub seed_if_empty: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        DbConfig {
            database_path: None,
            max_connections: 5,
            connect_timeout: Duration::from_secs(30),
            run_migrations: true,
            seed_if_empty: true,
        }
    }
}

impl DbConfig {
    /// Configuration for the transient in-memory backend.
    pub fn memory() -> Self {
        DbConfig::default()
    }

    /// Configuration for the SQLite backend at the given path. The file is
    /// created if it doesn't exist.
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: Some(path.into()),
            ..DbConfig::default()
        }
    }

    /// Configuration for an isolated in-memory SQLite database (for tests).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::connect(DbConfig::in_memory_sqlite()).await?;
    /// // Schema and queries run against real SQLite, nothing touches disk
    /// ```
    pub fn in_memory_sqlite() -> Self {
        DbConfig {
            database_path: Some(PathBuf::from(":memory:")),
            // In-memory SQLite requires a single connection: each new
            // connection would otherwise see its own empty database
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            run_migrations: true,
            seed_if_empty: false,
        }
    }

    /// Reads configuration from the environment.
    ///
    /// ## Environment Variables
    /// - `PHARMA_DATABASE_PATH`: presence selects the SQLite backend
    /// - `PHARMA_DB_MAX_CONNECTIONS`: pool size override
    pub fn from_env() -> Self {
        let mut config = match std::env::var("PHARMA_DATABASE_PATH") {
            Ok(path) if !path.trim().is_empty() => DbConfig::sqlite(path),
            _ => DbConfig::memory(),
        };

        if let Ok(max) = std::env::var("PHARMA_DB_MAX_CONNECTIONS") {
            if let Ok(max) = max.parse::<u32>() {
                config.max_connections = max;
            }
        }

        config
    }

    /// Sets the maximum number of pool connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Sets whether to seed starter data into an empty store.
    pub fn seed_if_empty(mut self, seed: bool) -> Self {
        self.seed_if_empty = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_memory() {
        assert!(DbConfig::default().database_path.is_none());
    }

    #[test]
    fn test_builder() {
        let config = DbConfig::sqlite("/tmp/test.db")
            .max_connections(10)
            .seed_if_empty(false);
        assert_eq!(config.max_connections, 10);
        assert!(!config.seed_if_empty);
        assert!(config.database_path.is_some());
    }
}
