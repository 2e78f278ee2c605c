//! # Entity Façades
//!
//! Typed per-entity access over the generic key-value store.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Façade Layer                                     │
//! │                                                                         │
//! │  TicketFacade::create(NewTicket)                                       │
//! │       │                                                                 │
//! │       ├── domain rules applied here:                                   │
//! │       │     status forced to Open, replies forced to [],               │
//! │       │     ticketNumber generated                                     │
//! │       ▼                                                                 │
//! │  KvStore::create(Table::Tickets, map)  ← generic layer stays dumb      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Ticket (typed record back out)                                        │
//! │                                                                         │
//! │  Facades add nothing the store doesn't have EXCEPT domain defaults     │
//! │  and typed signatures. Validation of caller input happens at the       │
//! │  API boundary, before a façade is ever reached.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod apps;
mod clients;
mod content;
mod feature_requests;
mod invoices;
mod knowledge_base;
mod qr_codes;
mod tickets;
mod users;

pub use apps::AppFacade;
pub use clients::ClientFacade;
pub use content::{PopularTopicFacade, RecentUpdateFacade};
pub use feature_requests::FeatureRequestFacade;
pub use invoices::InvoiceFacade;
pub use knowledge_base::KnowledgeBaseFacade;
pub use qr_codes::QrCodeFacade;
pub use tickets::TicketFacade;
pub use users::{AdminUserFacade, UserFacade};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::store::JsonMap;

/// Serializes a typed request into the map shape the store consumes.
pub(crate) fn to_map<T: Serialize>(value: &T) -> StoreResult<JsonMap> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(StoreError::OperationFailed(
            "record must serialize to an object".to_string(),
        )),
        Err(e) => Err(StoreError::OperationFailed(e.to_string())),
    }
}

/// Deserializes a stored record back into its entity type.
pub(crate) fn from_record<T: DeserializeOwned>(value: Value) -> StoreResult<T> {
    serde_json::from_value(value)
        .map_err(|e| StoreError::OperationFailed(format!("record does not match entity shape: {e}")))
}
