//! API envelope types for the restaurant backend.
//!
//! Every endpoint answers with the same JSON wrapper: a `success` flag, an
//! optional `data` payload, an optional human-readable `message` and, for list
//! endpoints, an optional `count`.

use serde::{Deserialize, Serialize};

/// Standard response wrapper returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
	/// Whether the backend considers the call successful.
	#[serde(default = "default_success")]
	pub success: bool,
	/// Response payload.
	pub data: Option<T>,
	/// Human-readable message, usually set on errors and mutations.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	/// Number of items for list endpoints.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub count: Option<u64>,
}

fn default_success() -> bool {
	true
}

impl<T> ApiEnvelope<T> {
	/// Wraps a payload in a successful envelope.
	pub fn ok(data: T) -> Self {
		Self {
			success: true,
			data: Some(data),
			message: None,
			count: None,
		}
	}

	/// Consumes the envelope, returning the payload if present.
	pub fn into_data(self) -> Option<T> {
		self.data
	}
}

/// Body of a failed response.
///
/// The backend is not consistent about which field carries the reason, so
/// both `message` and `error` are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
	#[serde(default)]
	pub message: Option<String>,
	#[serde(default)]
	pub error: Option<String>,
}

impl ErrorBody {
	/// Returns the most specific reason carried by the body.
	pub fn reason(&self) -> Option<&str> {
		self.message
			.as_deref()
			.or(self.error.as_deref())
			.filter(|s| !s.trim().is_empty())
	}
}
