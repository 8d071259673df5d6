//! Utility functions shared by the services and the command-line front end.

pub mod formatting;

pub use formatting::{format_amount, short_id};
