//! Login, logout and account management.
//!
//! Only users with the `restaurant` role may use this client. The backend
//! accepts any valid credentials on the login endpoint, so the role is
//! checked here after the response arrives; a rejected login leaves no
//! session behind.

use super::{require_data, RestaurantService};
use crate::CoreError;
use resto_client::{ApiClient, ApiRequest};
use resto_session::SessionService;
use resto_types::{
	require_email, require_path_segment, short_id, validate_new_password, ApiEnvelope, LoginRequest,
	LoginResponse, PasswordUpdate, User, UserDetailsUpdate,
};
use serde_json::json;
use std::sync::Arc;

/// Header telling the backend which dashboard is logging in.
pub const DASHBOARD_TYPE_HEADER: &str = "x-dashboard-type";

/// Calls under `/api/auth`.
#[derive(Clone)]
pub struct AuthService {
	client: Arc<ApiClient>,
	restaurants: RestaurantService,
	dashboard_type: String,
}

impl AuthService {
	pub fn new(client: Arc<ApiClient>, restaurants: RestaurantService, dashboard_type: String) -> Self {
		Self {
			client,
			restaurants,
			dashboard_type,
		}
	}

	fn session(&self) -> &SessionService {
		self.client.session()
	}

	/// Logs in and persists the session.
	///
	/// The restaurant of the user is fetched and cached with the profile; if
	/// that fails the login still succeeds without it.
	pub async fn login(&self, request: &LoginRequest) -> Result<User, CoreError> {
		request.validate()?;

		let response: LoginResponse = self
			.client
			.send(
				ApiRequest::post("/api/auth/login")
					.header(DASHBOARD_TYPE_HEADER, self.dashboard_type.as_str())
					.json(request)?
					.without_refresh(),
			)
			.await?;

		let (token, refresh_token) = match (response.token, response.refresh_token) {
			(Some(token), Some(refresh)) if !token.is_blank() && !refresh.is_blank() => (token, refresh),
			_ => {
				return Err(CoreError::InvalidResponse(
					"login response did not include both tokens".into(),
				));
			}
		};
		let mut user = response
			.user
			.ok_or_else(|| CoreError::InvalidResponse("login response did not include a user".into()))?;

		self.session().store_credentials(&token, &refresh_token).await?;

		if !user.is_restaurant_operator() {
			tracing::warn!(user_id = %short_id(&user.id), role = %user.role, "Rejected login for non-restaurant account");
			self.session().clear().await?;
			return Err(CoreError::Unauthorized(
				"this account does not have restaurant access".into(),
			));
		}

		if let Some(restaurant_id) = user.restaurant_id.as_deref() {
			match self.restaurants.get(restaurant_id).await {
				Ok(restaurant) => user.restaurant = Some(restaurant),
				Err(e) => tracing::warn!("Failed to fetch restaurant details: {}", e),
			}
		}

		self.session().store_user_info(&user).await?;
		tracing::info!(user_id = %short_id(&user.id), "Logged in");
		Ok(user)
	}

	/// Forgets the persisted session.
	pub async fn logout(&self) -> Result<(), CoreError> {
		self.session().clear().await?;
		tracing::info!("Logged out");
		Ok(())
	}

	/// Cached user of a previous login, if a token is also persisted.
	pub async fn restore_session(&self) -> Result<Option<User>, CoreError> {
		if self.session().access_token().await?.is_none() {
			return Ok(None);
		}
		Ok(self.session().user_info().await?)
	}

	/// Current user from the backend, with the restaurant of the cached
	/// profile attached.
	pub async fn profile(&self) -> Result<User, CoreError> {
		let envelope: ApiEnvelope<User> = self.client.get("/api/auth/me").await?;
		let mut user = require_data(envelope, "user")?;

		let cached_restaurant_id = self
			.session()
			.user_info()
			.await?
			.and_then(|cached| cached.restaurant_id);
		match cached_restaurant_id {
			Some(restaurant_id) => {
				match self.restaurants.get(&restaurant_id).await {
					Ok(restaurant) => user.restaurant = Some(restaurant),
					Err(e) => tracing::warn!("Failed to fetch restaurant details: {}", e),
				}
				user.restaurant_id = Some(restaurant_id);
			}
			None => tracing::warn!("No restaurant id in cached user info"),
		}
		Ok(user)
	}

	/// Updates name, email and phone, and refreshes the cached profile.
	pub async fn update_details(&self, details: &UserDetailsUpdate) -> Result<User, CoreError> {
		details.validate()?;
		let envelope: ApiEnvelope<User> = self.client.put("/api/auth/updatedetails", details).await?;
		let mut user = require_data(envelope, "user")?;

		if let Some(cached) = self.session().user_info().await? {
			user.restaurant_id = user.restaurant_id.or(cached.restaurant_id);
			user.restaurant = user.restaurant.or(cached.restaurant);
		}
		self.session().store_user_info(&user).await?;
		tracing::info!(user_id = %short_id(&user.id), "Updated account details");
		Ok(user)
	}

	/// Changes the password. Tokens re-issued by the backend replace the
	/// stored ones.
	pub async fn update_password(&self, update: &PasswordUpdate) -> Result<(), CoreError> {
		update.validate()?;
		let response: LoginResponse = self.client.put("/api/auth/updatepassword", update).await?;
		if let (Some(token), Some(refresh_token)) = (response.token, response.refresh_token) {
			self.session().store_credentials(&token, &refresh_token).await?;
		}
		tracing::info!("Password updated");
		Ok(())
	}

	/// Asks the backend to email a reset link. Returns the backend's message.
	pub async fn forgot_password(&self, email: &str) -> Result<String, CoreError> {
		require_email("email", email)?;
		let envelope: ApiEnvelope<serde_json::Value> = self
			.client
			.send(
				ApiRequest::post("/api/auth/forgotpassword")
					.json(&json!({ "email": email }))?
					.without_refresh(),
			)
			.await?;
		Ok(envelope
			.message
			.unwrap_or_else(|| "Password reset email sent".to_string()))
	}

	/// Sets a new password using the token from the reset email.
	pub async fn reset_password(&self, reset_token: &str, password: &str) -> Result<(), CoreError> {
		require_path_segment("resetToken", reset_token)?;
		validate_new_password(password)?;
		let _: serde_json::Value = self
			.client
			.send(
				ApiRequest::put(format!("/api/auth/resetpassword/{}", reset_token.trim()))
					.json(&json!({ "password": password }))?
					.without_refresh(),
			)
			.await?;
		tracing::info!("Password reset");
		Ok(())
	}
}
