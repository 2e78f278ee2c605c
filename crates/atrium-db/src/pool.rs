//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  Server / direct-backend startup                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure pool settings                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config, registry).await                                 │
//! │       │          │                                                      │
//! │       │          └── schema::ensure_tables() ← one table per           │
//! │       │              registry entry + expression indexes               │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │  (max_connections)        │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │                           │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.tickets() / db.clients() / ... / db.store()                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled so readers don't block
//! writers and writers don't block readers.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use atrium_core::registry::TableRegistry;

use crate::error::{StoreError, StoreResult};
use crate::facade::{
    AdminUserFacade, AppFacade, ClientFacade, FeatureRequestFacade, InvoiceFacade,
    KnowledgeBaseFacade, PopularTopicFacade, QrCodeFacade, RecentUpdateFacade, TicketFacade,
    UserFacade,
};
use crate::schema;
use crate::store::KvStore;

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/atrium.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory(), TableRegistry::with_defaults()).await?;
    /// // Database is isolated, perfect for tests
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing façade access.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./atrium.db"), TableRegistry::from_env()?).await?;
///
/// let ticket = db.tickets().create(new_ticket).await?;
/// let page = db.clients().list(PageRequest::default()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,

    /// Logical → physical table mapping.
    registry: TableRegistry,
}

impl Database {
    /// Creates a new database connection pool and bootstraps the schema.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite: WAL mode, NORMAL synchronous, foreign keys on
    /// 3. Creates the connection pool
    /// 4. Creates one table (plus expression indexes) per registry entry
    pub async fn new(config: DbConfig, registry: TableRegistry) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        // sqlite://path with mode=rwc creates the file if not exists
        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            // WAL mode: readers don't block writers and vice versa
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL synchronous: safe from corruption, may lose the last
            // transaction on crash
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool, registry };
        db.ensure_schema().await?;

        Ok(db)
    }

    /// Bootstraps the physical tables and indexes for every registry entry.
    ///
    /// Idempotent: every statement is `IF NOT EXISTS`.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        info!("Ensuring portal tables exist");
        schema::ensure_tables(&self.pool, &self.registry).await?;
        info!("Schema bootstrap complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    ///
    /// For diagnostics only - prefer the façades for data access.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the table registry in effect.
    pub fn registry(&self) -> &TableRegistry {
        &self.registry
    }

    /// Returns the generic key-value store.
    ///
    /// Most callers want an entity façade instead; the raw store is the
    /// building block the façades specialize.
    pub fn store(&self) -> KvStore {
        KvStore::new(self.pool.clone(), self.registry.clone())
    }

    // =========================================================================
    // Entity Façades
    // =========================================================================

    pub fn clients(&self) -> ClientFacade {
        ClientFacade::new(self.store())
    }

    pub fn tickets(&self) -> TicketFacade {
        TicketFacade::new(self.store())
    }

    pub fn apps(&self) -> AppFacade {
        AppFacade::new(self.store())
    }

    pub fn feature_requests(&self) -> FeatureRequestFacade {
        FeatureRequestFacade::new(self.store())
    }

    pub fn knowledge_base(&self) -> KnowledgeBaseFacade {
        KnowledgeBaseFacade::new(self.store())
    }

    pub fn users(&self) -> UserFacade {
        UserFacade::new(self.store())
    }

    pub fn admin_users(&self) -> AdminUserFacade {
        AdminUserFacade::new(self.store())
    }

    pub fn recent_updates(&self) -> RecentUpdateFacade {
        RecentUpdateFacade::new(self.store())
    }

    pub fn popular_topics(&self) -> PopularTopicFacade {
        PopularTopicFacade::new(self.store())
    }

    pub fn invoices(&self) -> InvoiceFacade {
        InvoiceFacade::new(self.store())
    }

    pub fn qr_codes(&self) -> QrCodeFacade {
        QrCodeFacade::new(self.store())
    }

    /// Closes the database connection pool.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
