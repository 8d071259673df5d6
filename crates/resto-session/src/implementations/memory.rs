//! In-memory session store.
//!
//! Nothing survives the process. Used by tests and by one-shot invocations
//! that pass credentials through the environment.

use crate::{SessionError, SessionFactory, SessionRegistry, SessionStore};
use async_trait::async_trait;
use resto_types::{ConfigSchema, ImplementationRegistry, Schema, ValidationError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Session store backed by a HashMap.
#[derive(Clone, Default)]
pub struct MemoryStore {
	entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl SessionStore for MemoryStore {
	async fn get(&self, key: &str) -> Result<String, SessionError> {
		let entries = self.entries.read().await;
		entries.get(key).cloned().ok_or(SessionError::NotFound)
	}

	async fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
		let mut entries = self.entries.write().await;
		entries.insert(key.to_string(), value.to_string());
		Ok(())
	}

	async fn delete(&self, key: &str) -> Result<(), SessionError> {
		let mut entries = self.entries.write().await;
		entries.remove(key);
		Ok(())
	}

	async fn exists(&self, key: &str) -> Result<bool, SessionError> {
		let entries = self.entries.read().await;
		Ok(entries.contains_key(key))
	}

	async fn clear(&self) -> Result<(), SessionError> {
		self.entries.write().await.clear();
		Ok(())
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MemoryStoreSchema)
	}
}

/// Configuration schema for MemoryStore. The section takes no options.
pub struct MemoryStoreSchema;

impl ConfigSchema for MemoryStoreSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		Schema::new(vec![], vec![]).validate(config)
	}
}

/// Factory function to create a memory store from configuration.
pub fn create_store(config: &toml::Value) -> Result<Box<dyn SessionStore>, SessionError> {
	MemoryStoreSchema
		.validate(config)
		.map_err(|e| SessionError::Configuration(e.to_string()))?;
	Ok(Box::new(MemoryStore::new()))
}

/// Registry for the memory store.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = SessionFactory;

	fn factory() -> Self::Factory {
		create_store
	}
}

impl SessionRegistry for Registry {}
