//! # Atrium Portal API
//!
//! REST proxy server for the support portal.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         portal-api                                      │
//! │                                                                         │
//! │  routes/   axum handlers, one module per entity collection             │
//! │  auth.rs   JWT manager, argon2 passwords, x-api-key middleware         │
//! │  error.rs  ApiError + the uniform response envelope                    │
//! │  config.rs environment configuration (secrets are required)           │
//! │  state.rs  shared handler state                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use state::AppState;
