//! Authentication and user account types.

use crate::restaurant::Restaurant;
use crate::secret_string::SecretString;
use crate::validation::{require_email, require_non_empty, ValidationError};
use serde::{Deserialize, Serialize};

/// Role a user must hold to operate the restaurant dashboard.
pub const RESTAURANT_ROLE: &str = "restaurant";

/// Minimum password length accepted by the login and password forms.
pub const MIN_PASSWORD_LEN: usize = 6;

/// An authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	#[serde(rename = "_id", alias = "id")]
	pub id: String,
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub email: String,
	#[serde(default)]
	pub role: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub restaurant_id: Option<String>,
	/// Restaurant details, attached by the client after login.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub restaurant: Option<Restaurant>,
}

impl User {
	/// Whether this user may operate the restaurant dashboard.
	pub fn is_restaurant_operator(&self) -> bool {
		self.role == RESTAURANT_ROLE
	}
}

/// Email and password typed into the login form.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
	pub email: String,
	pub password: String,
}

impl LoginRequest {
	pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self {
			email: email.into(),
			password: password.into(),
		}
	}

	pub fn validate(&self) -> Result<(), ValidationError> {
		require_email("email", &self.email)?;
		validate_password("password", &self.password)
	}
}

/// Response of `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
	#[serde(default)]
	pub success: bool,
	#[serde(default)]
	pub token: Option<SecretString>,
	#[serde(default)]
	pub refresh_token: Option<SecretString>,
	#[serde(default)]
	pub user: Option<User>,
	#[serde(default)]
	pub message: Option<String>,
}

/// Body of `POST /api/auth/refresh-token`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest<'a> {
	pub refresh_token: &'a str,
}

/// Response of `POST /api/auth/refresh-token`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
	pub token: SecretString,
	pub refresh_token: SecretString,
}

/// Editable account details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDetailsUpdate {
	pub name: String,
	pub email: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
}

impl UserDetailsUpdate {
	pub fn validate(&self) -> Result<(), ValidationError> {
		require_non_empty("name", &self.name)?;
		require_email("email", &self.email)
	}
}

/// Body of `PUT /api/auth/updatepassword`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdate {
	pub current_password: String,
	pub new_password: String,
}

impl PasswordUpdate {
	pub fn validate(&self) -> Result<(), ValidationError> {
		require_non_empty("currentPassword", &self.current_password)?;
		validate_password("newPassword", &self.new_password)
	}
}

fn validate_password(field: &str, password: &str) -> Result<(), ValidationError> {
	require_non_empty(field, password)?;
	if password.chars().count() < MIN_PASSWORD_LEN {
		return Err(ValidationError::invalid(
			field,
			format!("must be at least {} characters", MIN_PASSWORD_LEN),
		));
	}
	Ok(())
}

/// Validates a new password chosen through the reset flow.
pub fn validate_new_password(password: &str) -> Result<(), ValidationError> {
	validate_password("password", password)
}
