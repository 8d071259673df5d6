//! Scripted transport for exercising the client without a network.

use crate::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Transport that answers from a queue of canned responses and records
/// every request it receives.
#[derive(Default)]
pub struct ScriptedTransport {
	responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
	requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
	pub fn new() -> Self {
		Self::default()
	}

	/// Queues a JSON response.
	pub fn respond(&self, status: u16, body: serde_json::Value) -> &Self {
		self.push(Ok(HttpResponse::new(status, body.to_string())))
	}

	/// Queues a transport failure.
	pub fn fail(&self, error: TransportError) -> &Self {
		self.push(Err(error))
	}

	fn push(&self, response: Result<HttpResponse, TransportError>) -> &Self {
		if let Ok(mut responses) = self.responses.lock() {
			responses.push_back(response);
		}
		self
	}

	/// Every request sent so far, in order.
	pub fn requests(&self) -> Vec<HttpRequest> {
		self.requests
			.lock()
			.map(|requests| requests.clone())
			.unwrap_or_default()
	}

	/// Number of requests whose URL ends with `path`.
	pub fn calls_to(&self, path: &str) -> usize {
		self.requests()
			.iter()
			.filter(|request| request.url.ends_with(path))
			.count()
	}

	/// Number of queued responses not yet consumed.
	pub fn remaining(&self) -> usize {
		self.responses.lock().map(|r| r.len()).unwrap_or_default()
	}
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
	async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
		let url = request.url.clone();
		if let Ok(mut requests) = self.requests.lock() {
			requests.push(request);
		}
		self.responses
			.lock()
			.ok()
			.and_then(|mut responses| responses.pop_front())
			.unwrap_or_else(|| Err(TransportError::Network(format!("no scripted response for {}", url))))
	}
}
