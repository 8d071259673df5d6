//! Common types module for the restaurant administration client.
//!
//! This module defines the wire models exchanged with the restaurant backend
//! together with the small set of shared primitives (secret strings, session
//! keys, configuration validation) used by every other crate in the workspace.

/// API envelope types wrapping every backend response.
pub mod api;
/// Authentication and user account types.
pub mod auth;
/// Menu item types and client-side input validation.
pub mod menu;
/// Order types and the order status enumeration.
pub mod order;
/// Registry trait for self-registering implementations.
pub mod registry;
/// Restaurant profile and analytics types.
pub mod restaurant;
/// Redacting string wrapper for credentials.
pub mod secret_string;
/// Keys for persisted session state.
pub mod session;
/// Formatting helpers shared by the services and the CLI.
pub mod utils;
/// Configuration and input validation types.
pub mod validation;

pub use api::*;
pub use auth::*;
pub use menu::*;
pub use order::*;
pub use registry::ImplementationRegistry;
pub use restaurant::*;
pub use secret_string::SecretString;
pub use session::*;
pub use utils::{format_amount, short_id};
pub use validation::*;
