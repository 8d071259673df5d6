//! Session persistence for the restaurant client.
//!
//! The client keeps three pieces of state between runs: the access token, the
//! refresh token and the cached user profile. This module defines the
//! key-value interface those values are stored through, the backends that
//! implement it, and a typed service on top.

use async_trait::async_trait;
use resto_types::{ConfigSchema, ImplementationRegistry, SecretString, SessionKey, User};
use thiserror::Error;

pub mod implementations {
	pub mod file;
	pub mod memory;
}

/// Errors that can occur during session store operations.
#[derive(Debug, Error)]
pub enum SessionError {
	/// The requested key holds no value.
	#[error("Not found")]
	NotFound,
	/// A stored value could not be encoded or decoded.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// The backend failed to read or write.
	#[error("Backend error: {0}")]
	Backend(String),
	/// The backend configuration is invalid.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Low-level key-value interface for session backends.
#[async_trait]
pub trait SessionStore: Send + Sync {
	/// Returns the value stored under `key`, or [`SessionError::NotFound`].
	async fn get(&self, key: &str) -> Result<String, SessionError>;

	/// Stores `value` under `key`, replacing any previous value.
	async fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;

	/// Removes `key`. Removing an absent key is not an error.
	async fn delete(&self, key: &str) -> Result<(), SessionError>;

	/// Checks whether `key` holds a value.
	async fn exists(&self, key: &str) -> Result<bool, SessionError>;

	/// Removes every key held by this store.
	async fn clear(&self) -> Result<(), SessionError>;

	/// Returns the configuration schema for validation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;
}

/// Signature every session store factory provides.
pub type SessionFactory = fn(&toml::Value) -> Result<Box<dyn SessionStore>, SessionError>;

/// Registry trait for session store implementations.
pub trait SessionRegistry: ImplementationRegistry<Factory = SessionFactory> {}

/// Returns (name, factory) pairs for every available session store.
pub fn get_all_implementations() -> Vec<(&'static str, SessionFactory)> {
	use implementations::{file, memory};

	vec![
		(file::Registry::NAME, file::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
	]
}

/// Builds the session store named `name` from its configuration table.
pub fn create_store(name: &str, config: &toml::Value) -> Result<Box<dyn SessionStore>, SessionError> {
	let factory = get_all_implementations()
		.into_iter()
		.find(|(registered, _)| *registered == name)
		.map(|(_, factory)| factory)
		.ok_or_else(|| SessionError::Configuration(format!("Unknown session store '{}'", name)))?;
	factory(config)
}

/// Access and refresh token pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
	pub access_token: SecretString,
	pub refresh_token: SecretString,
}

/// Typed session operations on top of a [`SessionStore`].
pub struct SessionService {
	backend: Box<dyn SessionStore>,
}

impl SessionService {
	pub fn new(backend: Box<dyn SessionStore>) -> Self {
		Self { backend }
	}

	async fn read(&self, key: SessionKey) -> Result<Option<String>, SessionError> {
		match self.backend.get(key.as_str()).await {
			Ok(value) if value.is_empty() => Ok(None),
			Ok(value) => Ok(Some(value)),
			Err(SessionError::NotFound) => Ok(None),
			Err(e) => Err(e),
		}
	}

	/// Current access token, if any.
	pub async fn access_token(&self) -> Result<Option<SecretString>, SessionError> {
		Ok(self.read(SessionKey::AccessToken).await?.map(SecretString::new))
	}

	/// Current refresh token, if any.
	pub async fn refresh_token(&self) -> Result<Option<SecretString>, SessionError> {
		Ok(self.read(SessionKey::RefreshToken).await?.map(SecretString::new))
	}

	/// Both tokens, or `None` unless both are present.
	pub async fn credentials(&self) -> Result<Option<Credentials>, SessionError> {
		let access_token = self.access_token().await?;
		let refresh_token = self.refresh_token().await?;
		Ok(access_token
			.zip(refresh_token)
			.map(|(access_token, refresh_token)| Credentials {
				access_token,
				refresh_token,
			}))
	}

	/// Replaces the stored token pair.
	pub async fn store_credentials(
		&self,
		access_token: &SecretString,
		refresh_token: &SecretString,
	) -> Result<(), SessionError> {
		self.backend
			.set(SessionKey::AccessToken.as_str(), access_token.expose_secret())
			.await?;
		self.backend
			.set(SessionKey::RefreshToken.as_str(), refresh_token.expose_secret())
			.await
	}

	/// Cached user profile, if any.
	pub async fn user_info(&self) -> Result<Option<User>, SessionError> {
		self.read(SessionKey::UserInfo)
			.await?
			.map(|raw| {
				serde_json::from_str(&raw).map_err(|e| SessionError::Serialization(e.to_string()))
			})
			.transpose()
	}

	/// Caches the user profile.
	pub async fn store_user_info(&self, user: &User) -> Result<(), SessionError> {
		let raw = serde_json::to_string(user).map_err(|e| SessionError::Serialization(e.to_string()))?;
		self.backend.set(SessionKey::UserInfo.as_str(), &raw).await
	}

	/// Empties the backing store.
	pub async fn clear(&self) -> Result<(), SessionError> {
		self.backend.clear().await?;
		tracing::info!("Cleared session");
		Ok(())
	}

	/// Direct access to the underlying store.
	pub fn backend(&self) -> &dyn SessionStore {
		self.backend.as_ref()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use implementations::memory::MemoryStore;

	fn service() -> SessionService {
		SessionService::new(Box::new(MemoryStore::new()))
	}

	#[tokio::test]
	async fn test_credentials_require_both_tokens() {
		let session = service();
		assert!(session.credentials().await.unwrap().is_none());

		session
			.backend()
			.set(SessionKey::AccessToken.as_str(), "a1")
			.await
			.unwrap();
		assert!(session.credentials().await.unwrap().is_none());

		session
			.store_credentials(&SecretString::from("a2"), &SecretString::from("r2"))
			.await
			.unwrap();
		let credentials = session.credentials().await.unwrap().unwrap();
		assert_eq!(credentials.access_token.expose_secret(), "a2");
		assert_eq!(credentials.refresh_token.expose_secret(), "r2");
	}

	#[tokio::test]
	async fn test_user_info_round_trip_and_clear() {
		let session = service();
		let user: User = serde_json::from_value(serde_json::json!({
			"_id": "u1",
			"name": "Sam",
			"role": "restaurant",
			"restaurantId": "r1"
		}))
		.unwrap();
		session.store_user_info(&user).await.unwrap();
		session
			.store_credentials(&SecretString::from("a"), &SecretString::from("r"))
			.await
			.unwrap();

		let cached = session.user_info().await.unwrap().unwrap();
		assert_eq!(cached.restaurant_id.as_deref(), Some("r1"));

		session.clear().await.unwrap();
		assert!(session.user_info().await.unwrap().is_none());
		assert!(session.access_token().await.unwrap().is_none());
		assert!(session.refresh_token().await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_clear_empties_the_store() {
		let session = service();
		session
			.store_credentials(&SecretString::from("a"), &SecretString::from("r"))
			.await
			.unwrap();
		session.backend().set("lastDashboard", "{}").await.unwrap();

		session.clear().await.unwrap();
		assert!(!session.backend().exists("lastDashboard").await.unwrap());
		assert!(session.credentials().await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_corrupt_user_info_is_an_error() {
		let session = service();
		session
			.backend()
			.set(SessionKey::UserInfo.as_str(), "{not json")
			.await
			.unwrap();
		assert!(matches!(
			session.user_info().await,
			Err(SessionError::Serialization(_))
		));
	}

	#[test]
	fn test_create_store_by_name() {
		let empty = toml::Value::Table(toml::map::Map::new());
		assert!(create_store("memory", &empty).is_ok());
		assert!(matches!(
			create_store("redis", &empty),
			Err(SessionError::Configuration(_))
		));
	}
}
