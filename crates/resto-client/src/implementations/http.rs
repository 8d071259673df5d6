//! reqwest-backed transport.

use crate::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use std::time::Duration;

/// Transport sending requests through a pooled `reqwest::Client`.
///
/// Every request carries JSON `Content-Type` and `Accept` headers.
#[derive(Clone)]
pub struct ReqwestTransport {
	client: reqwest::Client,
}

impl ReqwestTransport {
	/// Builds a transport whose requests fail after `timeout`.
	pub fn new(timeout: Duration) -> Result<Self, TransportError> {
		let mut headers = HeaderMap::new();
		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

		let client = reqwest::Client::builder()
			.default_headers(headers)
			.pool_idle_timeout(Duration::from_secs(90))
			.pool_max_idle_per_host(10)
			.timeout(timeout)
			.build()
			.map_err(|e| TransportError::Configuration(e.to_string()))?;

		Ok(Self { client })
	}
}

fn to_reqwest(method: Method) -> reqwest::Method {
	match method {
		Method::Get => reqwest::Method::GET,
		Method::Post => reqwest::Method::POST,
		Method::Put => reqwest::Method::PUT,
		Method::Delete => reqwest::Method::DELETE,
	}
}

fn transport_error(err: reqwest::Error) -> TransportError {
	if err.is_timeout() {
		TransportError::Timeout(err.to_string())
	} else {
		TransportError::Network(err.to_string())
	}
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
	async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
		let mut builder = self
			.client
			.request(to_reqwest(request.method), &request.url);

		if !request.query.is_empty() {
			builder = builder.query(&request.query);
		}
		for (name, value) in &request.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}
		if let Some(body) = &request.body {
			builder = builder.json(body);
		}

		let response = builder.send().await.map_err(transport_error)?;
		let status = response.status().as_u16();
		let body = response.text().await.map_err(transport_error)?;

		Ok(HttpResponse { status, body })
	}
}
