//! # atrium-core: Pure Domain Logic for the Atrium Support Portal
//!
//! This crate is the **heart** of Atrium. It contains the entity types, the
//! table registry, and request validation as pure code with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Atrium Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               portal-api / atrium-client                        │   │
//! │  │   REST handlers ──► validation ──► façades ──► transport        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ atrium-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  registry │  │ validation│  │   error   │  │   │
//! │  │   │  Ticket   │  │  Table →  │  │   rules   │  │  Field    │  │   │
//! │  │   │  Client   │  │  physical │  │  checks   │  │  errors   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   atrium-db (Storage Layer)                     │   │
//! │  │          Generic key-value CRUD + entity façades                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entity types (Ticket, Client, Invoice, etc.) and their typed
//!   create/update requests
//! - [`registry`] - Logical table names and their physical resolution
//! - [`validation`] - Per-operation request validation
//! - [`error`] - Validation and registry error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Closed update sets**: Updates are typed structs of optional fields,
//!    never arbitrary key maps
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod registry;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{FieldError, RegistryError, ValidationError};
pub use registry::{Table, TableRegistry};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum page size for scan/query operations.
///
/// Requested limits above this are clamped server-side, so a caller can never
/// pull more than 100 records per page regardless of what it asks for.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default page size when a list call does not specify a limit.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Prefix for human-readable ticket numbers (`TKT-<numeric-suffix>`).
pub const TICKET_NUMBER_PREFIX: &str = "TKT";
