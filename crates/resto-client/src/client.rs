//! API client with bearer authentication and one-shot token refresh.

use crate::{ClientError, HttpRequest, HttpResponse, HttpTransport, Method};
use resto_session::SessionService;
use resto_types::{ErrorBody, RefreshRequest, RefreshResponse, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Endpoint exchanging a refresh token for a new token pair.
pub const REFRESH_PATH: &str = "/api/auth/refresh-token";

const AUTHORIZATION: &str = "Authorization";

/// A call to the backend, relative to the client's base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
	method: Method,
	path: String,
	query: Vec<(String, String)>,
	headers: Vec<(String, String)>,
	body: Option<serde_json::Value>,
	refresh_on_unauthorized: bool,
}

impl ApiRequest {
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: Vec::new(),
			headers: Vec::new(),
			body: None,
			refresh_on_unauthorized: true,
		}
	}

	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::Get, path)
	}

	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::Post, path)
	}

	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::Put, path)
	}

	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::Delete, path)
	}

	/// Appends a query parameter.
	pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((name.into(), value.into()));
		self
	}

	/// Adds a header. An `Authorization` header is replaced by the session
	/// token whenever one is stored.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	/// Sets a JSON body.
	pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ClientError> {
		self.body = Some(serde_json::to_value(body).map_err(|e| ClientError::Decode(e.to_string()))?);
		Ok(self)
	}

	/// Answers a 401 with the response itself instead of refreshing the
	/// session. Used by the credential endpoints, where 401 means wrong
	/// credentials rather than an expired token.
	pub fn without_refresh(mut self) -> Self {
		self.refresh_on_unauthorized = false;
		self
	}

	pub fn method(&self) -> Method {
		self.method
	}

	pub fn path(&self) -> &str {
		&self.path
	}
}

/// Client for the restaurant backend.
///
/// Every call reads the access token from the session and sends it as a
/// bearer credential. A 401 triggers a single refresh through
/// [`REFRESH_PATH`] followed by a single retry. A failed refresh clears the
/// session and yields [`ClientError::AuthExpired`]; a second 401 on the
/// retried call yields [`ClientError::Unauthorized`].
///
/// Concurrent calls that fail at the same time each run their own refresh.
pub struct ApiClient {
	base_url: String,
	transport: Arc<dyn HttpTransport>,
	session: Arc<SessionService>,
}

impl ApiClient {
	pub fn new(
		base_url: impl Into<String>,
		transport: Arc<dyn HttpTransport>,
		session: Arc<SessionService>,
	) -> Self {
		let base_url = base_url.into().trim_end_matches('/').to_string();
		Self {
			base_url,
			transport,
			session,
		}
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	pub fn session(&self) -> &Arc<SessionService> {
		&self.session
	}

	fn url(&self, path: &str) -> String {
		if path.starts_with('/') {
			format!("{}{}", self.base_url, path)
		} else {
			format!("{}/{}", self.base_url, path)
		}
	}

	/// Resolves `request` against the base URL and attaches the bearer token.
	async fn authorize(&self, request: &ApiRequest) -> Result<HttpRequest, ClientError> {
		let token = self.session.access_token().await?;

		let mut headers: Vec<(String, String)> = request
			.headers
			.iter()
			.filter(|(name, _)| token.is_none() || !name.eq_ignore_ascii_case(AUTHORIZATION))
			.cloned()
			.collect();
		if let Some(token) = token {
			headers.push((
				AUTHORIZATION.to_string(),
				format!("Bearer {}", token.expose_secret()),
			));
		}

		Ok(HttpRequest {
			method: request.method,
			url: self.url(&request.path),
			query: request.query.clone(),
			headers,
			body: request.body.clone(),
		})
	}

	async fn dispatch(&self, request: &ApiRequest) -> Result<HttpResponse, ClientError> {
		let outbound = self.authorize(request).await?;
		tracing::debug!(method = %request.method, path = %request.path, "Sending request");
		let response = self.transport.send(outbound).await?;
		tracing::debug!(
			method = %request.method,
			path = %request.path,
			status = response.status,
			"Received response"
		);
		Ok(response)
	}

	/// Sends `request` and returns the raw response, whatever its status.
	///
	/// Only the 401 path is interpreted here; see the type-level docs.
	pub async fn execute(&self, request: ApiRequest) -> Result<HttpResponse, ClientError> {
		let response = self.dispatch(&request).await?;
		if response.status != 401 || !request.refresh_on_unauthorized {
			return Ok(response);
		}

		tracing::info!(path = %request.path, "Access token rejected, refreshing session");
		self.refresh().await?;

		let retried = self.dispatch(&request).await?;
		if retried.status == 401 {
			tracing::warn!(path = %request.path, "Request rejected again after token refresh");
			return Err(ClientError::Unauthorized);
		}
		Ok(retried)
	}

	/// Sends `request` and decodes a successful JSON body into `T`.
	///
	/// Non-2xx responses become [`ClientError::Http`] carrying the backend's
	/// message.
	pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
		let response = self.execute(request).await?;
		if !response.is_success() {
			return Err(http_error(&response));
		}
		response
			.json()
			.map_err(|e| ClientError::Decode(e.to_string()))
	}

	pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
		self.send(ApiRequest::get(path)).await
	}

	pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
	where
		B: Serialize + ?Sized,
		T: DeserializeOwned,
	{
		self.send(ApiRequest::post(path).json(body)?).await
	}

	pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
	where
		B: Serialize + ?Sized,
		T: DeserializeOwned,
	{
		self.send(ApiRequest::put(path).json(body)?).await
	}

	pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
		self.send(ApiRequest::delete(path)).await
	}

	/// Exchanges the stored refresh token for a new token pair.
	///
	/// Any failure clears the whole session.
	async fn refresh(&self) -> Result<(), ClientError> {
		let Some(refresh_token) = self.session.refresh_token().await? else {
			tracing::warn!("No refresh token available");
			self.expire().await;
			return Err(ClientError::AuthExpired);
		};

		match self.request_new_tokens(&refresh_token).await {
			Ok(tokens) => {
				self.session
					.store_credentials(&tokens.token, &tokens.refresh_token)
					.await?;
				tracing::info!("Session refreshed");
				Ok(())
			}
			Err(reason) => {
				tracing::warn!("Token refresh failed: {}", reason);
				self.expire().await;
				Err(ClientError::AuthExpired)
			}
		}
	}

	/// Calls the refresh endpoint directly on the transport, bypassing the
	/// bearer header and the 401 handling.
	async fn request_new_tokens(&self, refresh_token: &SecretString) -> Result<RefreshResponse, String> {
		let body = serde_json::to_value(RefreshRequest {
			refresh_token: refresh_token.expose_secret(),
		})
		.map_err(|e| e.to_string())?;

		let response = self
			.transport
			.send(HttpRequest {
				method: Method::Post,
				url: self.url(REFRESH_PATH),
				query: Vec::new(),
				headers: Vec::new(),
				body: Some(body),
			})
			.await
			.map_err(|e| e.to_string())?;

		if !response.is_success() {
			return Err(http_error(&response).to_string());
		}
		let tokens: RefreshResponse = response.json().map_err(|e| e.to_string())?;
		if tokens.token.is_blank() || tokens.refresh_token.is_blank() {
			return Err("refresh response carried an empty token".to_string());
		}
		Ok(tokens)
	}

	async fn expire(&self) {
		if let Err(e) = self.session.clear().await {
			tracing::warn!("Failed to clear session: {}", e);
		}
	}
}

fn http_error(response: &HttpResponse) -> ClientError {
	let message = response
		.json::<ErrorBody>()
		.ok()
		.and_then(|body| body.reason().map(str::to_string))
		.unwrap_or_else(|| format!("Request failed with status code {}", response.status));
	ClientError::Http {
		status: response.status,
		message,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::ScriptedTransport;
	use crate::TransportError;
	use resto_session::implementations::memory::MemoryStore;
	use resto_types::{ApiEnvelope, SessionKey};
	use serde_json::{json, Value};

	const BASE: &str = "http://api.test";

	async fn client_with_tokens(
		access: Option<&str>,
		refresh: Option<&str>,
	) -> (ApiClient, Arc<ScriptedTransport>, Arc<SessionService>) {
		let session = Arc::new(SessionService::new(Box::new(MemoryStore::new())));
		if let Some(access) = access {
			session
				.backend()
				.set(SessionKey::AccessToken.as_str(), access)
				.await
				.unwrap();
		}
		if let Some(refresh) = refresh {
			session
				.backend()
				.set(SessionKey::RefreshToken.as_str(), refresh)
				.await
				.unwrap();
		}
		session
			.backend()
			.set(SessionKey::UserInfo.as_str(), r#"{"_id":"u1","role":"restaurant"}"#)
			.await
			.unwrap();

		let transport = Arc::new(ScriptedTransport::new());
		let client = ApiClient::new(format!("{}/", BASE), transport.clone(), session.clone());
		(client, transport, session)
	}

	async fn assert_session_cleared(session: &SessionService) {
		for key in SessionKey::all() {
			assert!(!session.backend().exists(key.as_str()).await.unwrap());
		}
	}

	#[tokio::test]
	async fn test_valid_token_is_attached_and_response_returned() {
		let (client, transport, _) = client_with_tokens(Some("a1"), Some("r1")).await;
		transport.respond(200, json!({ "success": true, "data": [{ "_id": "o1" }], "count": 1 }));

		let envelope: ApiEnvelope<Vec<Value>> = client
			.send(ApiRequest::get("/api/orders").query("status", "pending"))
			.await
			.unwrap();
		assert_eq!(envelope.count, Some(1));

		let requests = transport.requests();
		assert_eq!(requests.len(), 1);
		assert_eq!(requests[0].url, "http://api.test/api/orders");
		assert_eq!(requests[0].query, vec![("status".to_string(), "pending".to_string())]);
		assert_eq!(requests[0].header("authorization"), Some("Bearer a1"));
	}

	#[tokio::test]
	async fn test_caller_authorization_does_not_override_token() {
		let (client, transport, _) = client_with_tokens(Some("a1"), Some("r1")).await;
		transport.respond(200, json!({}));

		client
			.execute(ApiRequest::get("/api/auth/me").header("authorization", "Bearer forged"))
			.await
			.unwrap();

		let requests = transport.requests();
		let request = &requests[0];
		let bearers: Vec<_> = request
			.headers
			.iter()
			.filter(|(name, _)| name.eq_ignore_ascii_case("authorization"))
			.collect();
		assert_eq!(bearers.len(), 1);
		assert_eq!(request.header("Authorization"), Some("Bearer a1"));
	}

	#[tokio::test]
	async fn test_no_token_sends_no_bearer() {
		let (client, transport, _) = client_with_tokens(None, None).await;
		transport.respond(200, json!({ "success": true }));

		client
			.execute(ApiRequest::post("/api/auth/forgotpassword"))
			.await
			.unwrap();
		assert!(transport.requests()[0].header("authorization").is_none());
	}

	#[tokio::test]
	async fn test_expired_token_refreshes_once_and_retries() {
		let (client, transport, session) = client_with_tokens(Some("old"), Some("r1")).await;
		transport
			.respond(401, json!({ "message": "Token expired" }))
			.respond(200, json!({ "token": "new", "refreshToken": "r2" }))
			.respond(200, json!({ "success": true, "data": { "_id": "o1" } }));

		let envelope: ApiEnvelope<Value> = client.get("/api/orders/o1").await.unwrap();
		assert_eq!(envelope.data.unwrap()["_id"], "o1");

		assert_eq!(transport.calls_to(REFRESH_PATH), 1);
		assert_eq!(transport.calls_to("/api/orders/o1"), 2);

		let requests = transport.requests();
		let refresh = &requests[1];
		assert_eq!(refresh.method, Method::Post);
		assert!(refresh.header("authorization").is_none());
		assert_eq!(refresh.body, Some(json!({ "refreshToken": "r1" })));
		assert_eq!(requests[2].header("authorization"), Some("Bearer new"));

		let credentials = session.credentials().await.unwrap().unwrap();
		assert_eq!(credentials.access_token.expose_secret(), "new");
		assert_eq!(credentials.refresh_token.expose_secret(), "r2");
	}

	#[tokio::test]
	async fn test_retried_response_is_returned_whatever_its_status() {
		let (client, transport, _) = client_with_tokens(Some("old"), Some("r1")).await;
		transport
			.respond(401, json!({}))
			.respond(200, json!({ "token": "new", "refreshToken": "r2" }))
			.respond(404, json!({ "message": "Order not found" }));

		let response = client.execute(ApiRequest::get("/api/orders/x")).await.unwrap();
		assert_eq!(response.status, 404);

		transport
			.respond(401, json!({}))
			.respond(200, json!({ "token": "newer", "refreshToken": "r3" }))
			.respond(404, json!({ "message": "Order not found" }));
		let err = client
			.get::<ApiEnvelope<Value>>("/api/orders/x")
			.await
			.unwrap_err();
		assert!(matches!(err, ClientError::Http { status: 404, ref message } if message == "Order not found"));
	}

	#[tokio::test]
	async fn test_rejected_refresh_clears_session() {
		let (client, transport, session) = client_with_tokens(Some("old"), Some("stale")).await;
		transport
			.respond(401, json!({}))
			.respond(401, json!({ "message": "Invalid refresh token" }));

		let err = client.get::<Value>("/api/orders").await.unwrap_err();
		assert!(matches!(err, ClientError::AuthExpired));
		assert_eq!(transport.calls_to(REFRESH_PATH), 1);
		assert_eq!(transport.calls_to("/api/orders"), 1);
		assert_session_cleared(&session).await;
	}

	#[tokio::test]
	async fn test_missing_refresh_token_fails_fast() {
		let (client, transport, session) = client_with_tokens(Some("old"), None).await;
		transport.respond(401, json!({}));

		let err = client.get::<Value>("/api/orders").await.unwrap_err();
		assert!(matches!(err, ClientError::AuthExpired));
		assert_eq!(transport.calls_to(REFRESH_PATH), 0);
		assert_eq!(transport.requests().len(), 1);
		assert_session_cleared(&session).await;
	}

	#[tokio::test]
	async fn test_refresh_transport_error_or_malformed_body_clears_session() {
		let (client, transport, session) = client_with_tokens(Some("old"), Some("r1")).await;
		transport
			.respond(401, json!({}))
			.fail(TransportError::Network("connection reset".into()));
		assert!(matches!(
			client.get::<Value>("/api/orders").await,
			Err(ClientError::AuthExpired)
		));
		assert_session_cleared(&session).await;

		let (client, transport, session) = client_with_tokens(Some("old"), Some("r1")).await;
		transport
			.respond(401, json!({}))
			.respond(200, json!({ "token": "only-access" }));
		assert!(matches!(
			client.get::<Value>("/api/orders").await,
			Err(ClientError::AuthExpired)
		));
		assert_session_cleared(&session).await;
	}

	#[tokio::test]
	async fn test_second_unauthorized_does_not_loop() {
		let (client, transport, session) = client_with_tokens(Some("old"), Some("r1")).await;
		transport
			.respond(401, json!({}))
			.respond(200, json!({ "token": "new", "refreshToken": "r2" }))
			.respond(401, json!({}));

		let err = client.get::<Value>("/api/menu").await.unwrap_err();
		assert!(matches!(err, ClientError::Unauthorized));
		assert_eq!(transport.calls_to(REFRESH_PATH), 1);
		assert_eq!(transport.calls_to("/api/menu"), 2);
		assert_eq!(transport.remaining(), 0);

		// The refreshed pair is kept; only a failed refresh clears it.
		assert!(session.credentials().await.unwrap().is_some());
	}

	#[tokio::test]
	async fn test_without_refresh_returns_the_401() {
		let (client, transport, session) = client_with_tokens(None, Some("r1")).await;
		transport.respond(401, json!({ "message": "Invalid credentials" }));

		let err = client
			.send::<Value>(ApiRequest::post("/api/auth/login").without_refresh())
			.await
			.unwrap_err();
		assert!(matches!(err, ClientError::Http { status: 401, ref message } if message == "Invalid credentials"));
		assert_eq!(transport.calls_to(REFRESH_PATH), 0);
		assert!(session.refresh_token().await.unwrap().is_some());
	}

	#[tokio::test]
	async fn test_error_message_fallback() {
		let (client, transport, _) = client_with_tokens(Some("a1"), None).await;
		transport.respond(500, json!({ "success": false }));

		let err = client.get::<Value>("/api/restaurants/r1").await.unwrap_err();
		assert_eq!(
			err.to_string(),
			"HTTP 500: Request failed with status code 500"
		);
	}

	#[tokio::test]
	async fn test_decode_error() {
		let (client, transport, _) = client_with_tokens(Some("a1"), None).await;
		transport.respond(200, json!({ "data": "not a list" }));

		let err = client
			.get::<ApiEnvelope<Vec<u32>>>("/api/orders")
			.await
			.unwrap_err();
		assert!(matches!(err, ClientError::Decode(_)));
	}
}
