//! # Generic Key-Value Store
//!
//! Storage-agnostic CRUD primitives over the registry's tables.
//!
//! ## How a Record Lives
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Generic Data-Access Layer                            │
//! │                                                                         │
//! │  create(Tickets, {subject: "X", ...})                                  │
//! │       │                                                                 │
//! │       ├── strip nulls                                                  │
//! │       ├── assign id (UUID v4) if absent                                │
//! │       ├── stamp createdAt / updatedAt                                  │
//! │       ▼                                                                 │
//! │  INSERT INTO tickets (id, body, created_at, updated_at)                │
//! │       │                                                                 │
//! │       ├── PRIMARY KEY violation ──► AlreadyExists                      │
//! │       └── ok ──► full record returned                                  │
//! │                                                                         │
//! │  update(Tickets, id, {status: "Resolved"})                             │
//! │       │                                                                 │
//! │       ├── strip nulls, drop key/timestamp fields, re-stamp updatedAt   │
//! │       ▼                                                                 │
//! │  UPDATE tickets SET body = json_patch(body, patch) WHERE id = ?        │
//! │       │                                                                 │
//! │       ├── rows_affected == 0 ──► NotFound (no upsert)                  │
//! │       └── ok ──► re-read record returned                               │
//! │                                                                         │
//! │  scan / query: keyset pagination ordered by primary key, limit         │
//! │  clamped to MAX_PAGE_SIZE, opaque base64 cursor                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Partial updates use SQLite's `json_patch` (RFC 7396 merge patch). Because
//! nulls are stripped before the patch is built, an absent field can never
//! remove or overwrite a stored value.
//!
//! `query` scopes a page by an equality condition on an indexed body field;
//! naming the field doubles as index selection (the expression indexes are
//! declared per table in the registry).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sqlx::sqlite::SqliteArguments;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use atrium_core::registry::{Table, TableRegistry};
use atrium_core::MAX_PAGE_SIZE;

use crate::error::{is_unique_violation, StoreError, StoreResult};

/// A JSON object - the wire shape of every record body.
pub type JsonMap = Map<String, Value>;

// =============================================================================
// Paging Types
// =============================================================================

/// An equality condition on a record body field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCondition {
    /// Body field name (camelCase, as stored).
    pub field: String,
    /// Value the field must equal.
    pub equals: Value,
}

impl FieldCondition {
    pub fn eq(field: impl Into<String>, equals: impl Into<Value>) -> Self {
        FieldCondition {
            field: field.into(),
            equals: equals.into(),
        }
    }
}

/// Parameters for a paged `scan`.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    /// Requested page size. Clamped server-side to [`MAX_PAGE_SIZE`].
    pub limit: Option<u32>,
    /// Opaque continuation cursor from the previous page.
    pub cursor: Option<String>,
    /// Optional equality filter applied to the page.
    pub filter: Option<FieldCondition>,
}

/// Parameters for a paged `query`.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
    /// Additional equality filter beyond the key condition.
    pub filter: Option<FieldCondition>,
    /// Key order. Defaults to ascending.
    pub ascending: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        QueryOptions {
            limit: None,
            cursor: None,
            filter: None,
            ascending: true,
        }
    }
}

/// One page of results plus the cursor to fetch the next one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,

    /// Opaque token to continue from where this page ended.
    /// `None` means the read is exhausted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Converts the items, keeping the cursor.
    pub fn try_map<U>(self, f: impl Fn(T) -> StoreResult<U>) -> StoreResult<Page<U>> {
        let items = self.items.into_iter().map(f).collect::<StoreResult<_>>()?;
        Ok(Page {
            items,
            next_cursor: self.next_cursor,
        })
    }
}

// =============================================================================
// Cursor Encoding
// =============================================================================

/// Encodes the last-seen primary key as an opaque cursor.
fn encode_cursor(key: &str) -> String {
    URL_SAFE_NO_PAD.encode(key.as_bytes())
}

/// Decodes a cursor back to the primary key it wraps.
fn decode_cursor(cursor: &str) -> StoreResult<String> {
    let bytes = URL_SAFE_NO_PAD
        .decode(cursor.as_bytes())
        .map_err(|_| StoreError::OperationFailed("invalid cursor".to_string()))?;
    String::from_utf8(bytes)
        .map_err(|_| StoreError::OperationFailed("invalid cursor".to_string()))
}

/// Clamps a requested limit to the server-side maximum.
fn clamp_limit(limit: Option<u32>) -> i64 {
    let requested = limit.unwrap_or(atrium_core::DEFAULT_PAGE_SIZE);
    i64::from(requested.clamp(1, MAX_PAGE_SIZE))
}

/// Body field names are interpolated into `json_extract` paths, so they are
/// held to the same grammar as identifiers.
fn check_field_name(field: &str) -> StoreResult<()> {
    let ok = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if ok {
        Ok(())
    } else {
        Err(StoreError::OperationFailed(format!(
            "invalid field name '{field}'"
        )))
    }
}

/// Removes top-level nulls so an absent field can never null out a stored
/// value (and, under `json_patch` semantics, never remove a key).
fn strip_nulls(map: &mut JsonMap) {
    map.retain(|_, v| !v.is_null());
}

/// Binds a JSON scalar to a query.
///
/// Booleans are bound as integers to match how `json_extract` surfaces them.
fn bind_scalar<'q>(
    query: sqlx::query::QueryAs<'q, sqlx::Sqlite, (String, String), SqliteArguments<'q>>,
    value: &'q Value,
) -> StoreResult<sqlx::query::QueryAs<'q, sqlx::Sqlite, (String, String), SqliteArguments<'q>>> {
    match value {
        Value::String(s) => Ok(query.bind(s.as_str())),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(query.bind(i))
            } else if let Some(f) = n.as_f64() {
                Ok(query.bind(f))
            } else {
                Err(StoreError::OperationFailed(
                    "unsupported numeric filter value".to_string(),
                ))
            }
        }
        Value::Bool(b) => Ok(query.bind(i64::from(*b))),
        _ => Err(StoreError::OperationFailed(
            "filter values must be scalars".to_string(),
        )),
    }
}

// =============================================================================
// Key-Value Store
// =============================================================================

/// Generic CRUD over any registry table.
///
/// ## Usage
/// ```rust,ignore
/// let store = db.store();
///
/// let record = store.create(Table::Clients, item).await?;
/// let page = store.scan(Table::Clients, PageRequest::default()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct KvStore {
    pool: SqlitePool,
    registry: TableRegistry,
}

impl KvStore {
    /// Creates a new store over a pool and registry.
    pub fn new(pool: SqlitePool, registry: TableRegistry) -> Self {
        KvStore { pool, registry }
    }

    /// Creates a record.
    ///
    /// Assigns `id` (UUID v4) when absent, stamps `createdAt`/`updatedAt`,
    /// and writes behind the uniqueness guard.
    ///
    /// ## Returns
    /// * `Ok(Value)` - the full stored record
    /// * `Err(StoreError::AlreadyExists)` - the guard tripped
    pub async fn create(&self, table: Table, mut item: JsonMap) -> StoreResult<Value> {
        let key_col = table.key_column();
        strip_nulls(&mut item);

        let key = match item.get(key_col).and_then(Value::as_str) {
            Some(k) => k.to_string(),
            None if key_col == "id" => {
                let id = Uuid::new_v4().to_string();
                item.insert("id".to_string(), json!(id));
                id
            }
            None => {
                return Err(StoreError::OperationFailed(format!(
                    "missing key attribute '{key_col}'"
                )))
            }
        };

        let now = Utc::now();
        item.insert("createdAt".to_string(), json!(now));
        item.insert("updatedAt".to_string(), json!(now));
        let body = Value::Object(item);

        debug!(table = %table, key = %key, "Creating record");

        let physical = self.registry.physical_name(table);
        let sql = format!(
            "INSERT INTO {physical} ({key_col}, body, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4)"
        );

        let result = sqlx::query(&sql)
            .bind(&key)
            .bind(body.to_string())
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(body),
            Err(e) if is_unique_violation(&e) => {
                Err(StoreError::already_exists(table.logical_name(), key))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fetches a record by key.
    ///
    /// Absence is `Ok(None)`, never an error.
    pub async fn get(&self, table: Table, key: &str) -> StoreResult<Option<Value>> {
        let physical = self.registry.physical_name(table);
        let key_col = table.key_column();
        let sql = format!("SELECT body FROM {physical} WHERE {key_col} = ?1");

        let body: Option<String> = sqlx::query_scalar(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match body {
            Some(raw) => Ok(Some(parse_body(&raw)?)),
            None => Ok(None),
        }
    }

    /// Applies a partial update to an existing record.
    ///
    /// Null fields are stripped (absent means "keep the stored value"); the
    /// key and timestamp fields are never client-writable; `updatedAt` is
    /// re-stamped. The write is guarded by existence.
    ///
    /// ## Returns
    /// * `Ok(Value)` - the full record after the patch
    /// * `Err(StoreError::NotFound)` - the guard tripped, nothing written
    pub async fn update(&self, table: Table, key: &str, mut patch: JsonMap) -> StoreResult<Value> {
        let key_col = table.key_column();
        strip_nulls(&mut patch);
        patch.remove(key_col);
        patch.remove("createdAt");

        let now = Utc::now();
        patch.insert("updatedAt".to_string(), json!(now));

        debug!(table = %table, key = %key, fields = patch.len(), "Updating record");

        let physical = self.registry.physical_name(table);
        let sql = format!(
            "UPDATE {physical} SET body = json_patch(body, ?2), updated_at = ?3 \
             WHERE {key_col} = ?1"
        );

        let result = sqlx::query(&sql)
            .bind(key)
            .bind(Value::Object(patch).to_string())
            .bind(now)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(table.logical_name(), key));
        }

        self.get(table, key)
            .await?
            .ok_or_else(|| StoreError::not_found(table.logical_name(), key))
    }

    /// Deletes a record, guarded by existence.
    pub async fn delete(&self, table: Table, key: &str) -> StoreResult<()> {
        debug!(table = %table, key = %key, "Deleting record");

        let physical = self.registry.physical_name(table);
        let key_col = table.key_column();
        let sql = format!("DELETE FROM {physical} WHERE {key_col} = ?1");

        let result = sqlx::query(&sql).bind(key).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(table.logical_name(), key));
        }

        Ok(())
    }

    /// Returns a page of records ordered by primary key.
    ///
    /// The limit is clamped to [`MAX_PAGE_SIZE`] regardless of what was
    /// requested. The returned cursor continues from where this page ended.
    pub async fn scan(&self, table: Table, page: PageRequest) -> StoreResult<Page<Value>> {
        self.page_rows(table, page.limit, page.cursor, None, page.filter, true)
            .await
    }

    /// Returns a page scoped by an equality condition on an indexed field.
    ///
    /// Same paging contract as `scan`. The condition field must carry one of
    /// the table's declared secondary indexes.
    pub async fn query(
        &self,
        table: Table,
        key_condition: FieldCondition,
        opts: QueryOptions,
    ) -> StoreResult<Page<Value>> {
        if !table
            .indexed_fields()
            .contains(&key_condition.field.as_str())
        {
            return Err(StoreError::OperationFailed(format!(
                "field '{}' is not indexed on {}",
                key_condition.field, table
            )));
        }

        self.page_rows(
            table,
            opts.limit,
            opts.cursor,
            Some(key_condition),
            opts.filter,
            opts.ascending,
        )
        .await
    }

    /// Shared paging implementation behind scan and query.
    async fn page_rows(
        &self,
        table: Table,
        limit: Option<u32>,
        cursor: Option<String>,
        condition: Option<FieldCondition>,
        filter: Option<FieldCondition>,
        ascending: bool,
    ) -> StoreResult<Page<Value>> {
        let physical = self.registry.physical_name(table);
        let key_col = table.key_column();
        let limit = clamp_limit(limit);

        let after = cursor.as_deref().map(decode_cursor).transpose()?;

        let mut clauses: Vec<String> = Vec::new();
        if after.is_some() {
            let op = if ascending { ">" } else { "<" };
            clauses.push(format!("{key_col} {op} ?"));
        }
        for cond in condition.iter().chain(filter.iter()) {
            check_field_name(&cond.field)?;
            clauses.push(format!("json_extract(body, '$.{}') = ?", cond.field));
        }

        let mut sql = format!("SELECT {key_col}, body FROM {physical}");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        let order = if ascending { "ASC" } else { "DESC" };
        sql.push_str(&format!(" ORDER BY {key_col} {order} LIMIT ?"));

        let mut query = sqlx::query_as::<_, (String, String)>(&sql);
        if let Some(ref after) = after {
            query = query.bind(after.as_str());
        }
        if let Some(ref cond) = condition {
            query = bind_scalar(query, &cond.equals)?;
        }
        if let Some(ref cond) = filter {
            query = bind_scalar(query, &cond.equals)?;
        }
        query = query.bind(limit);

        let rows = query.fetch_all(&self.pool).await?;

        debug!(table = %table, count = rows.len(), "Page fetched");

        let next_cursor = if rows.len() as i64 == limit {
            rows.last().map(|(key, _)| encode_cursor(key))
        } else {
            None
        };

        let items = rows
            .into_iter()
            .map(|(_, body)| parse_body(&body))
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(Page { items, next_cursor })
    }
}

/// Parses a stored body back into JSON.
fn parse_body(raw: &str) -> StoreResult<Value> {
    serde_json::from_str(raw)
        .map_err(|e| StoreError::OperationFailed(format!("corrupt record body: {e}")))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{DateTime, Utc};

    async fn test_store() -> KvStore {
        Database::new(DbConfig::in_memory(), TableRegistry::with_defaults())
            .await
            .unwrap()
            .store()
    }

    fn item(pairs: &[(&str, Value)]) -> JsonMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_create_then_get_roundtrip() {
        let store = test_store().await;

        let created = store
            .create(
                Table::Clients,
                item(&[("companyName", json!("Acme Corp"))]),
            )
            .await
            .unwrap();

        let id = created["id"].as_str().unwrap().to_string();
        assert!(created.get("createdAt").is_some());
        assert!(created.get("updatedAt").is_some());

        let fetched = store.get(Table::Clients, &id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched["companyName"], "Acme Corp");
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = test_store().await;
        let result = store.get(Table::Clients, "missing").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_fails_exactly_once() {
        let store = test_store().await;
        let fields = item(&[("id", json!("c-1")), ("companyName", json!("Acme"))]);

        store.create(Table::Clients, fields.clone()).await.unwrap();

        let err = store.create(Table::Clients, fields).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
        assert_eq!(err.code(), "ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = test_store().await;

        let err = store
            .update(
                Table::Tickets,
                "missing",
                item(&[("subject", json!("nope"))]),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_patches_only_supplied_fields() {
        let store = test_store().await;

        let created = store
            .create(
                Table::Tickets,
                item(&[
                    ("subject", json!("Broken export")),
                    ("priority", json!("High")),
                ]),
            )
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap().to_string();

        let updated = store
            .update(
                Table::Tickets,
                &id,
                item(&[("priority", json!("Low")), ("subject", Value::Null)]),
            )
            .await
            .unwrap();

        // Null fields are stripped, so subject keeps its stored value.
        assert_eq!(updated["subject"], "Broken export");
        assert_eq!(updated["priority"], "Low");
    }

    #[tokio::test]
    async fn test_update_cannot_touch_key_or_created_at() {
        let store = test_store().await;

        let created = store
            .create(Table::Clients, item(&[("companyName", json!("Acme"))]))
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap().to_string();

        let updated = store
            .update(
                Table::Clients,
                &id,
                item(&[
                    ("id", json!("hijacked")),
                    ("createdAt", json!("1970-01-01T00:00:00Z")),
                    ("companyName", json!("Acme Ltd")),
                ]),
            )
            .await
            .unwrap();

        assert_eq!(updated["id"], json!(id));
        assert_eq!(updated["createdAt"], created["createdAt"]);
        assert_eq!(updated["companyName"], "Acme Ltd");
    }

    #[tokio::test]
    async fn test_updated_at_advances_on_mutation() {
        let store = test_store().await;

        let created = store
            .create(Table::Clients, item(&[("companyName", json!("Acme"))]))
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap().to_string();

        let updated = store
            .update(Table::Clients, &id, item(&[("email", json!("a@acme.io"))]))
            .await
            .unwrap();

        let before: DateTime<Utc> =
            serde_json::from_value(created["updatedAt"].clone()).unwrap();
        let after: DateTime<Utc> =
            serde_json::from_value(updated["updatedAt"].clone()).unwrap();
        assert!(after > before);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = test_store().await;

        let err = store.delete(Table::Clients, "missing").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_delete_then_get_is_none() {
        let store = test_store().await;

        let created = store
            .create(Table::Apps, item(&[("name", json!("Scheduler"))]))
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap().to_string();

        store.delete(Table::Apps, &id).await.unwrap();
        assert!(store.get(Table::Apps, &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_scan_limit_is_clamped_to_100() {
        let store = test_store().await;

        for i in 0..105 {
            store
                .create(
                    Table::RecentUpdates,
                    item(&[
                        ("id", json!(format!("u-{i:03}"))),
                        ("title", json!(format!("Update {i}"))),
                    ]),
                )
                .await
                .unwrap();
        }

        let page = store
            .scan(
                Table::RecentUpdates,
                PageRequest {
                    limit: Some(500),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(page.items.len(), 100);
        assert!(page.next_cursor.is_some());
    }

    #[tokio::test]
    async fn test_scan_cursor_walks_every_record() {
        let store = test_store().await;

        for i in 0..7 {
            store
                .create(
                    Table::Apps,
                    item(&[
                        ("id", json!(format!("a-{i}"))),
                        ("name", json!(format!("App {i}"))),
                    ]),
                )
                .await
                .unwrap();
        }

        let mut seen = Vec::new();
        let mut cursor = None;
        loop {
            let page = store
                .scan(
                    Table::Apps,
                    PageRequest {
                        limit: Some(3),
                        cursor: cursor.clone(),
                        filter: None,
                    },
                )
                .await
                .unwrap();

            seen.extend(
                page.items
                    .iter()
                    .map(|v| v["id"].as_str().unwrap().to_string()),
            );
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        assert_eq!(seen.len(), 7);
        assert_eq!(seen[0], "a-0");
        assert_eq!(seen[6], "a-6");
    }

    #[tokio::test]
    async fn test_scan_filter_matches_equality() {
        let store = test_store().await;

        for (id, status) in [("t-1", "Open"), ("t-2", "Closed"), ("t-3", "Open")] {
            store
                .create(
                    Table::Tickets,
                    item(&[
                        ("id", json!(id)),
                        ("subject", json!("s")),
                        ("status", json!(status)),
                    ]),
                )
                .await
                .unwrap();
        }

        let page = store
            .scan(
                Table::Tickets,
                PageRequest {
                    filter: Some(FieldCondition::eq("status", "Open")),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);
    }

    #[tokio::test]
    async fn test_query_by_indexed_field() {
        let store = test_store().await;

        for (id, client) in [("t-1", "c-1"), ("t-2", "c-2"), ("t-3", "c-1")] {
            store
                .create(
                    Table::Tickets,
                    item(&[
                        ("id", json!(id)),
                        ("subject", json!("s")),
                        ("clientId", json!(client)),
                    ]),
                )
                .await
                .unwrap();
        }

        let page = store
            .query(
                Table::Tickets,
                FieldCondition::eq("clientId", "c-1"),
                QueryOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);

        // Descending order flips the page.
        let page = store
            .query(
                Table::Tickets,
                FieldCondition::eq("clientId", "c-1"),
                QueryOptions {
                    ascending: false,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(page.items[0]["id"], "t-3");
    }

    #[tokio::test]
    async fn test_query_unindexed_field_is_rejected() {
        let store = test_store().await;

        let err = store
            .query(
                Table::Tickets,
                FieldCondition::eq("subject", "s"),
                QueryOptions::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::OperationFailed(_)));
    }

    #[tokio::test]
    async fn test_qr_codes_are_keyed_by_code() {
        let store = test_store().await;

        let created = store
            .create(
                Table::QrCodes,
                item(&[("code", json!("QR-XYZ")), ("clientId", json!("c-1"))]),
            )
            .await
            .unwrap();
        // No generated id - the code is the key.
        assert!(created.get("id").is_none());

        let fetched = store.get(Table::QrCodes, "QR-XYZ").await.unwrap().unwrap();
        assert_eq!(fetched["clientId"], "c-1");

        // A keyless create cannot fall back to a generated id here.
        let err = store
            .create(Table::QrCodes, item(&[("clientId", json!("c-2"))]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::OperationFailed(_)));
    }

    #[tokio::test]
    async fn test_bad_cursor_is_rejected() {
        let store = test_store().await;

        let err = store
            .scan(
                Table::Apps,
                PageRequest {
                    cursor: Some("%%not-base64%%".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::OperationFailed(_)));
    }
}
