//! # Atrium Portal Client
//!
//! Transport-selecting client library for the support portal.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         atrium-client                                   │
//! │                                                                         │
//! │  PortalClient::connect(config)                                         │
//! │       │                                                                 │
//! │       ├── remote.rs   reqwest against the REST proxy (+ /health)       │
//! │       ├── atrium-db   direct SQLite backend, same process              │
//! │       └── fixture.rs  stateless echo, the floor                        │
//! │                                                                         │
//! │  transport.rs holds the explicit TransportState and the demotion       │
//! │  ladder: RemoteProxy → DirectBackend → LocalFixture.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod fixture;
pub mod remote;
pub mod transport;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use transport::{PortalClient, TransportMode, TransportState};
