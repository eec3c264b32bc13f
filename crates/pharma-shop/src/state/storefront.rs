//! # Storefront Handle
//!
//! Wires the repository, the session, and the notifier into the one object
//! command functions take.

use pharma_db::{Database, DbConfig};

use crate::error::ApiError;
use crate::notify::Notifier;
use crate::state::SessionState;

/// Everything a storefront command needs.
///
/// ## Construction
/// ```rust,ignore
/// // Backend chosen from configuration presence (PHARMA_DATABASE_PATH)
/// let shop = Storefront::connect(DbConfig::from_env()).await?;
///
/// // Or, for tests and the baseline transient setup:
/// let shop = Storefront::in_memory();
/// ```
#[derive(Debug, Clone)]
pub struct Storefront {
    /// Repository boundary (catalog + orders).
    pub db: Database,

    /// Per-session mutable state.
    pub session: SessionState,

    /// Toast queue.
    pub notifier: Notifier,
}

impl Storefront {
    /// Connects the configured repository backend and starts a fresh
    /// session.
    pub async fn connect(config: DbConfig) -> Result<Self, ApiError> {
        let db = Database::connect(config).await?;
        Ok(Storefront {
            db,
            session: SessionState::new(),
            notifier: Notifier::new(),
        })
    }

    /// Storefront over the seeded in-memory backend.
    pub fn in_memory() -> Self {
        Storefront {
            db: Database::in_memory(),
            session: SessionState::new(),
            notifier: Notifier::new(),
        }
    }
}
