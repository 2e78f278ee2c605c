//! # Atrium Storage Layer
//!
//! SQLite-backed persistence for the support portal.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          atrium-db                                      │
//! │                                                                         │
//! │  ┌──────────┐   ┌──────────────────────────────────────────────┐       │
//! │  │ pool.rs  │──►│ facade/  - typed per-entity access            │       │
//! │  │ Database │   │   tickets, clients, apps, users, ...          │       │
//! │  └────┬─────┘   └───────────────────┬──────────────────────────┘       │
//! │       │                             │                                   │
//! │       │         ┌───────────────────▼──────────────────────────┐       │
//! │       ├────────►│ store.rs - generic key-value CRUD + paging    │       │
//! │       │         └───────────────────┬──────────────────────────┘       │
//! │       │                             │                                   │
//! │       │         ┌───────────────────▼──────────────────────────┐       │
//! │       └────────►│ schema.rs - registry-driven table bootstrap   │       │
//! │                 └──────────────────────────────────────────────┘       │
//! │                                                                         │
//! │  error.rs - the StoreError taxonomy everything above raises            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod facade;
pub mod pool;
pub mod schema;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use facade::{
    AdminUserFacade, AppFacade, ClientFacade, FeatureRequestFacade, InvoiceFacade,
    KnowledgeBaseFacade, PopularTopicFacade, QrCodeFacade, RecentUpdateFacade, TicketFacade,
    UserFacade,
};
pub use pool::{Database, DbConfig};
pub use store::{FieldCondition, JsonMap, KvStore, Page, PageRequest, QueryOptions};
