//! # pharma-db: Repository Boundary for the PharmaCare Storefront
//!
//! This crate provides persistence behind one abstract trait pair with two
//! interchangeable backends.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     PharmaCare Data Flow                                │
//! │                                                                         │
//! │  Session command (place_order, save_product, ...)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     pharma-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────────┐   ┌───────────────────────────────────┐   │   │
//! │  │   │   Database     │   │  CatalogRepository (trait)        │   │   │
//! │  │   │  (database.rs) │──►│  OrderRepository   (trait)        │   │   │
//! │  │   │                │   └──────────────┬────────────────────┘   │   │
//! │  │   │ backend chosen │                  │                        │   │
//! │  │   │ from DbConfig  │        ┌─────────┴──────────┐             │   │
//! │  │   └────────────────┘        ▼                    ▼             │   │
//! │  │                     ┌──────────────┐    ┌────────────────┐     │   │
//! │  │                     │ MemoryBackend│    │ SqliteBackend  │     │   │
//! │  │                     │ (transient)  │    │ (sqlx + WAL +  │     │   │
//! │  │                     │              │    │  migrations)   │     │   │
//! │  │                     └──────────────┘    └────────────────┘     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - `DbConfig`, backend selection from the environment
//! - [`database`] - the `Database` handle the session layer holds
//! - [`repository`] - trait contracts plus the memory and SQLite backends
//! - [`migrations`] - embedded SQLite migrations
//! - [`seed`] - starter data for a fresh store
//! - [`error`] - repository error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pharma_db::{Database, DbConfig};
//!
//! // SQLite when PHARMA_DATABASE_PATH is set, memory otherwise
//! let db = Database::connect(DbConfig::from_env()).await?;
//!
//! let products = db.catalog().products().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod database;
pub mod error;
pub mod migrations;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::DbConfig;
pub use database::Database;
pub use error::{DbError, DbResult};
pub use repository::{CatalogRepository, OrderRepository};

// Backend re-exports for direct construction in tests
pub use repository::memory::MemoryBackend;
pub use repository::sqlite::SqliteBackend;
