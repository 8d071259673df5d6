//! HTTP client for the restaurant backend.
//!
//! Outbound calls go through an [`HttpTransport`], which keeps the wire layer
//! swappable, and are issued by the [`ApiClient`]. The client attaches the
//! persisted bearer token to every call and, when the backend answers 401,
//! exchanges the refresh token for a new pair and retries the call once.

use async_trait::async_trait;
use resto_session::SessionError;
use serde::de::DeserializeOwned;
use std::fmt;
use thiserror::Error;

mod client;

pub use client::{ApiClient, ApiRequest, REFRESH_PATH};

/// Re-export implementations
pub mod implementations {
	pub mod http;
}

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Errors raised by an [`HttpTransport`] before a response is received.
#[derive(Debug, Error)]
pub enum TransportError {
	/// Connection, TLS or protocol failure.
	#[error("Network error: {0}")]
	Network(String),
	/// The request did not complete within the configured timeout.
	#[error("Request timed out: {0}")]
	Timeout(String),
	/// The transport could not be built.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Errors returned by [`ApiClient`] calls.
#[derive(Debug, Error)]
pub enum ClientError {
	/// The request never produced a response.
	#[error("Transport error: {0}")]
	Transport(#[from] TransportError),
	/// The backend answered with a non-success status.
	#[error("HTTP {status}: {message}")]
	Http { status: u16, message: String },
	/// The backend rejected the call again after the token was refreshed.
	#[error("Unauthorized")]
	Unauthorized,
	/// The session could not be refreshed and has been cleared.
	#[error("Session expired, please log in again")]
	AuthExpired,
	/// A request or response body could not be encoded or decoded.
	#[error("Decode error: {0}")]
	Decode(String),
	/// The session store failed.
	#[error("Session error: {0}")]
	Session(#[from] SessionError),
}

impl ClientError {
	/// HTTP status carried by the error, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			ClientError::Http { status, .. } => Some(*status),
			ClientError::Unauthorized => Some(401),
			_ => None,
		}
	}
}

/// HTTP methods used by the backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
	Get,
	Post,
	Put,
	Delete,
}

impl Method {
	pub fn as_str(&self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Delete => "DELETE",
		}
	}
}

impl fmt::Display for Method {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A fully resolved outbound request.
#[derive(Clone)]
pub struct HttpRequest {
	pub method: Method,
	/// Absolute URL without the query string.
	pub url: String,
	pub query: Vec<(String, String)>,
	pub headers: Vec<(String, String)>,
	pub body: Option<serde_json::Value>,
}

impl HttpRequest {
	/// Looks up a header value by case-insensitive name.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

impl fmt::Debug for HttpRequest {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		// Never print the bearer token.
		let headers: Vec<(&str, &str)> = self
			.headers
			.iter()
			.map(|(key, value)| {
				if key.eq_ignore_ascii_case("authorization") {
					(key.as_str(), "***REDACTED***")
				} else {
					(key.as_str(), value.as_str())
				}
			})
			.collect();
		f.debug_struct("HttpRequest")
			.field("method", &self.method)
			.field("url", &self.url)
			.field("query", &self.query)
			.field("headers", &headers)
			.field("body", &self.body.is_some())
			.finish()
	}
}

/// Status code and raw body of a response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
	pub status: u16,
	pub body: String,
}

impl HttpResponse {
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self {
			status,
			body: body.into(),
		}
	}

	/// Whether the status is in the 2xx range.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Decodes the body as JSON. An empty body decodes as `null`.
	pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
		let body = self.body.trim();
		serde_json::from_str(if body.is_empty() { "null" } else { body })
	}
}

/// Sends a single HTTP request and returns whatever the server answered.
///
/// Implementations must not interpret status codes; 4xx and 5xx responses
/// are returned as `Ok`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
	async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
