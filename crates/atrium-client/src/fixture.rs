//! # Local-Fixture Transport
//!
//! The floor of the transport ladder. Persists nothing: operations echo the
//! input back with generated id and timestamps, so a caller keeps working
//! (read-your-input, not read-your-writes) when every real backend is gone.

use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use atrium_core::registry::Table;
use atrium_db::{JsonMap, Page};

use crate::error::{ClientError, ClientResult};

/// Stateless echo transport.
#[derive(Debug, Clone, Default)]
pub struct FixtureTransport;

impl FixtureTransport {
    /// Echoes the item back with generated key and timestamps.
    pub fn create(&self, table: Table, mut item: JsonMap) -> ClientResult<Value> {
        let key_col = table.key_column();
        if !item.contains_key(key_col) {
            if key_col == "id" {
                item.insert("id".to_string(), json!(Uuid::new_v4().to_string()));
            } else {
                return Err(ClientError::OperationFailed(format!(
                    "missing key attribute '{key_col}'"
                )));
            }
        }

        let now = Utc::now();
        item.insert("createdAt".to_string(), json!(now));
        item.insert("updatedAt".to_string(), json!(now));
        Ok(Value::Object(item))
    }

    /// Nothing is stored, so nothing is found.
    pub fn get(&self, _table: Table, _key: &str) -> ClientResult<Option<Value>> {
        Ok(None)
    }

    /// Echoes the patch back as if it had been applied.
    pub fn update(&self, table: Table, key: &str, mut patch: JsonMap) -> ClientResult<Value> {
        patch.insert(table.key_column().to_string(), json!(key));
        patch.insert("updatedAt".to_string(), json!(Utc::now()));
        Ok(Value::Object(patch))
    }

    pub fn delete(&self, _table: Table, _key: &str) -> ClientResult<()> {
        Ok(())
    }

    pub fn list(&self, _table: Table) -> ClientResult<Page<Value>> {
        Ok(Page {
            items: Vec::new(),
            next_cursor: None,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
