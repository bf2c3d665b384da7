//! Signup Gatekeeper - device-aware account creation service.
//!
//! Decides whether an account-creation request is accepted, rejected as a
//! bot, or rejected as a duplicate device, and durably records accepted
//! accounts:
//! - Resolves the request token to an identity event via the external
//!   identity service
//! - Rejects detected bots before touching storage
//! - Allows at most one account per visitor id, backed by a unique index

pub mod api;
pub mod config;
pub mod error;
pub mod gate;
pub mod store;

pub use config::Config;
pub use error::GateError;
pub use store::AccountStore;
