//! # Table Registry
//!
//! Maps logical entity names to physical storage tables.
//!
//! ## Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Table Name Resolution                              │
//! │                                                                         │
//! │  Table::Tickets                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ATRIUM_TABLE_TICKETS set? ──── yes ──► use override (validated)       │
//! │       │                                                                 │
//! │       no                                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  default physical name: "tickets"                                      │
//! │                                                                         │
//! │  Every table is keyed by "id" except qr_codes, which is keyed by       │
//! │  its code value.                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Physical names end up interpolated into SQL (identifiers cannot be bound),
//! so overrides are validated against a strict identifier grammar at startup.

use std::collections::HashMap;

use crate::error::RegistryError;

// =============================================================================
// Logical Tables
// =============================================================================

/// Every logical entity collection in the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Clients,
    Tickets,
    Apps,
    FeatureRequests,
    KnowledgeBase,
    Users,
    AdminUsers,
    RecentUpdates,
    PopularTopics,
    Invoices,
    QrCodes,
}

impl Table {
    /// All logical tables, in registry order.
    pub const ALL: [Table; 11] = [
        Table::Clients,
        Table::Tickets,
        Table::Apps,
        Table::FeatureRequests,
        Table::KnowledgeBase,
        Table::Users,
        Table::AdminUsers,
        Table::RecentUpdates,
        Table::PopularTopics,
        Table::Invoices,
        Table::QrCodes,
    ];

    /// Logical name, used in log output and error messages.
    pub fn logical_name(&self) -> &'static str {
        match self {
            Table::Clients => "Clients",
            Table::Tickets => "Tickets",
            Table::Apps => "Apps",
            Table::FeatureRequests => "FeatureRequests",
            Table::KnowledgeBase => "KnowledgeBase",
            Table::Users => "Users",
            Table::AdminUsers => "AdminUsers",
            Table::RecentUpdates => "RecentUpdates",
            Table::PopularTopics => "PopularTopics",
            Table::Invoices => "Invoices",
            Table::QrCodes => "QrCodes",
        }
    }

    /// Default physical table name.
    pub fn default_physical_name(&self) -> &'static str {
        match self {
            Table::Clients => "clients",
            Table::Tickets => "tickets",
            Table::Apps => "apps",
            Table::FeatureRequests => "feature_requests",
            Table::KnowledgeBase => "knowledge_base",
            Table::Users => "users",
            Table::AdminUsers => "admin_users",
            Table::RecentUpdates => "recent_updates",
            Table::PopularTopics => "popular_topics",
            Table::Invoices => "invoices",
            Table::QrCodes => "qr_codes",
        }
    }

    /// Environment variable that overrides the physical name.
    pub fn override_var(&self) -> &'static str {
        match self {
            Table::Clients => "ATRIUM_TABLE_CLIENTS",
            Table::Tickets => "ATRIUM_TABLE_TICKETS",
            Table::Apps => "ATRIUM_TABLE_APPS",
            Table::FeatureRequests => "ATRIUM_TABLE_FEATURE_REQUESTS",
            Table::KnowledgeBase => "ATRIUM_TABLE_KNOWLEDGE_BASE",
            Table::Users => "ATRIUM_TABLE_USERS",
            Table::AdminUsers => "ATRIUM_TABLE_ADMIN_USERS",
            Table::RecentUpdates => "ATRIUM_TABLE_RECENT_UPDATES",
            Table::PopularTopics => "ATRIUM_TABLE_POPULAR_TOPICS",
            Table::Invoices => "ATRIUM_TABLE_INVOICES",
            Table::QrCodes => "ATRIUM_TABLE_QR_CODES",
        }
    }

    /// Primary key column for this table.
    ///
    /// QR codes are looked up by their code value; everything else uses `id`.
    pub fn key_column(&self) -> &'static str {
        match self {
            Table::QrCodes => "code",
            _ => "id",
        }
    }

    /// Body fields with a secondary index, addressable by `query`.
    pub fn indexed_fields(&self) -> &'static [&'static str] {
        match self {
            Table::Tickets => &["clientId", "status"],
            Table::FeatureRequests => &["clientId", "status"],
            Table::Invoices => &["clientId", "status"],
            Table::Users => &["username", "clientId"],
            Table::AdminUsers => &["username"],
            Table::PopularTopics => &["articleId"],
            Table::KnowledgeBase => &["category"],
            _ => &[],
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.logical_name())
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Resolved logical → physical table mapping.
///
/// ## Usage
/// ```rust
/// use atrium_core::registry::{Table, TableRegistry};
///
/// let registry = TableRegistry::with_defaults();
/// assert_eq!(registry.physical_name(Table::Tickets), "tickets");
/// ```
#[derive(Debug, Clone)]
pub struct TableRegistry {
    names: HashMap<Table, String>,
}

impl TableRegistry {
    /// Builds a registry using only the default physical names.
    pub fn with_defaults() -> Self {
        let names = Table::ALL
            .iter()
            .map(|t| (*t, t.default_physical_name().to_string()))
            .collect();
        TableRegistry { names }
    }

    /// Builds a registry, consulting `lookup` for per-table overrides.
    ///
    /// `lookup` receives the override variable name (e.g.
    /// `ATRIUM_TABLE_TICKETS`) and returns the override value if present.
    /// Override values must be valid identifiers.
    pub fn from_overrides(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, RegistryError> {
        let mut names = HashMap::with_capacity(Table::ALL.len());

        for table in Table::ALL {
            let name = match lookup(table.override_var()) {
                Some(value) => {
                    if !is_valid_identifier(&value) {
                        return Err(RegistryError::InvalidTableName {
                            logical: table.logical_name().to_string(),
                            value,
                        });
                    }
                    value
                }
                None => table.default_physical_name().to_string(),
            };
            names.insert(table, name);
        }

        Ok(TableRegistry { names })
    }

    /// Builds a registry from process environment variables.
    pub fn from_env() -> Result<Self, RegistryError> {
        Self::from_overrides(|var| std::env::var(var).ok())
    }

    /// Returns the physical table name for a logical table.
    pub fn physical_name(&self, table: Table) -> &str {
        // Every Table variant is inserted by construction.
        self.names
            .get(&table)
            .map(String::as_str)
            .unwrap_or_else(|| table.default_physical_name())
    }
}

impl Default for TableRegistry {
    fn default() -> Self {
        TableRegistry::with_defaults()
    }
}

/// Checks the identifier grammar `[A-Za-z_][A-Za-z0-9_]*`.
fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let registry = TableRegistry::with_defaults();
        assert_eq!(registry.physical_name(Table::Tickets), "tickets");
        assert_eq!(registry.physical_name(Table::QrCodes), "qr_codes");
        assert_eq!(registry.physical_name(Table::FeatureRequests), "feature_requests");
    }

    #[test]
    fn test_override_applies() {
        let registry = TableRegistry::from_overrides(|var| {
            (var == "ATRIUM_TABLE_TICKETS").then(|| "tickets_staging".to_string())
        })
        .unwrap();

        assert_eq!(registry.physical_name(Table::Tickets), "tickets_staging");
        assert_eq!(registry.physical_name(Table::Clients), "clients");
    }

    #[test]
    fn test_invalid_override_rejected() {
        let result = TableRegistry::from_overrides(|var| {
            (var == "ATRIUM_TABLE_USERS").then(|| "users; DROP TABLE".to_string())
        });

        assert!(matches!(
            result,
            Err(RegistryError::InvalidTableName { .. })
        ));
    }

    #[test]
    fn test_key_columns() {
        assert_eq!(Table::QrCodes.key_column(), "code");
        assert_eq!(Table::Tickets.key_column(), "id");
    }

    #[test]
    fn test_identifier_grammar() {
        assert!(is_valid_identifier("tickets"));
        assert!(is_valid_identifier("_t1"));
        assert!(!is_valid_identifier("1tickets"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("tickets-prod"));
    }
}
