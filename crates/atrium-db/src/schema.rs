//! # Schema Bootstrap
//!
//! Creates the physical tables and indexes for every registry entry.
//!
//! ## Physical Table Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     One Table Per Logical Entity                        │
//! │                                                                         │
//! │  CREATE TABLE IF NOT EXISTS tickets (                                  │
//! │      id         TEXT PRIMARY KEY,   ← conditional-write guard          │
//! │      body       TEXT NOT NULL,      ← full record as JSON              │
//! │      created_at TEXT NOT NULL,                                         │
//! │      updated_at TEXT NOT NULL                                          │
//! │  );                                                                    │
//! │                                                                        │
//! │  CREATE INDEX IF NOT EXISTS idx_tickets_clientId                       │
//! │      ON tickets (json_extract(body, '$.clientId'));                    │
//! │                                                                        │
//! │  The qr_codes table is keyed by "code" instead of "id".               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Physical names come from the registry (env-var overridable), so the schema
//! cannot live in static migration files - it is issued at startup instead.
//! Every statement is `IF NOT EXISTS`, making the bootstrap idempotent.

use sqlx::SqlitePool;
use tracing::debug;

use atrium_core::registry::{Table, TableRegistry};

use crate::error::StoreResult;

/// Creates all portal tables and secondary indexes.
pub async fn ensure_tables(pool: &SqlitePool, registry: &TableRegistry) -> StoreResult<()> {
    for table in Table::ALL {
        let physical = registry.physical_name(table);
        let key = table.key_column();

        debug!(table = %table, physical = %physical, "Creating table if missing");

        let create = format!(
            "CREATE TABLE IF NOT EXISTS {physical} (\
                {key} TEXT PRIMARY KEY, \
                body TEXT NOT NULL, \
                created_at TEXT NOT NULL, \
                updated_at TEXT NOT NULL\
            )"
        );
        sqlx::query(&create).execute(pool).await?;

        // Expression indexes over the JSON body back the query operation.
        for field in table.indexed_fields() {
            let index = format!(
                "CREATE INDEX IF NOT EXISTS idx_{physical}_{field} \
                 ON {physical} (json_extract(body, '$.{field}'))"
            );
            sqlx::query(&index).execute(pool).await?;
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
