//! File-backed session store.
//!
//! Each key is kept in its own file under a base directory so the tokens
//! survive between runs of the command-line client. Writes go to a temporary
//! file first and are renamed into place. On Unix the files are created with
//! owner-only permissions.

use crate::{SessionError, SessionFactory, SessionRegistry, SessionStore};
use async_trait::async_trait;
use resto_types::{ConfigSchema, Field, FieldType, ImplementationRegistry, Schema, ValidationError};
use std::path::{Path, PathBuf};
use tokio::fs;

const EXTENSION: &str = "session";
const DEFAULT_PATH: &str = "~/.resto/session";

/// Session store writing one file per key.
pub struct FileStore {
	base_path: PathBuf,
}

impl FileStore {
	pub fn new(base_path: PathBuf) -> Self {
		Self { base_path }
	}

	pub fn base_path(&self) -> &Path {
		&self.base_path
	}

	/// Maps a key to a filesystem-safe path.
	fn file_path(&self, key: &str) -> PathBuf {
		let safe_key: String = key
			.chars()
			.map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
			.collect();
		self.base_path.join(format!("{}.{}", safe_key, EXTENSION))
	}

	async fn write_private(path: &Path, value: &str) -> Result<(), SessionError> {
		let temp_path = path.with_extension("tmp");
		fs::write(&temp_path, value.as_bytes())
			.await
			.map_err(|e| SessionError::Backend(e.to_string()))?;

		#[cfg(unix)]
		{
			use std::os::unix::fs::PermissionsExt;
			fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))
				.await
				.map_err(|e| SessionError::Backend(e.to_string()))?;
		}

		fs::rename(&temp_path, path)
			.await
			.map_err(|e| SessionError::Backend(e.to_string()))
	}
}

#[async_trait]
impl SessionStore for FileStore {
	async fn get(&self, key: &str) -> Result<String, SessionError> {
		match fs::read_to_string(self.file_path(key)).await {
			Ok(value) => Ok(value),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(SessionError::NotFound),
			Err(e) => Err(SessionError::Backend(e.to_string())),
		}
	}

	async fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
		fs::create_dir_all(&self.base_path)
			.await
			.map_err(|e| SessionError::Backend(e.to_string()))?;
		Self::write_private(&self.file_path(key), value).await
	}

	async fn delete(&self, key: &str) -> Result<(), SessionError> {
		match fs::remove_file(self.file_path(key)).await {
			Ok(_) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(SessionError::Backend(e.to_string())),
		}
	}

	async fn exists(&self, key: &str) -> Result<bool, SessionError> {
		fs::try_exists(self.file_path(key))
			.await
			.map_err(|e| SessionError::Backend(e.to_string()))
	}

	async fn clear(&self) -> Result<(), SessionError> {
		let mut entries = match fs::read_dir(&self.base_path).await {
			Ok(entries) => entries,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
			Err(e) => return Err(SessionError::Backend(e.to_string())),
		};

		while let Some(entry) = entries
			.next_entry()
			.await
			.map_err(|e| SessionError::Backend(e.to_string()))?
		{
			let path = entry.path();
			if path.extension() == Some(std::ffi::OsStr::new(EXTENSION)) {
				match fs::remove_file(&path).await {
					Ok(_) => {}
					Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
					Err(e) => {
						tracing::warn!(path = %path.display(), error = %e, "Failed to remove session file");
						return Err(SessionError::Backend(e.to_string()));
					}
				}
			}
		}
		Ok(())
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(FileStoreSchema)
	}
}

/// Configuration schema for FileStore.
pub struct FileStoreSchema;

impl ConfigSchema for FileStoreSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		Schema::new(
			vec![],
			vec![Field::new("storage_path", FieldType::String).with_validator(|v| {
				match v.as_str() {
					Some(s) if s.trim().is_empty() => Err("cannot be empty".to_string()),
					_ => Ok(()),
				}
			})],
		)
		.validate(config)
	}
}

/// Expands a leading `~/` using `$HOME`.
fn expand_home(path: &str) -> PathBuf {
	match (path.strip_prefix("~/"), std::env::var_os("HOME")) {
		(Some(rest), Some(home)) => PathBuf::from(home).join(rest),
		_ => PathBuf::from(path),
	}
}

/// Factory function to create a file store from configuration.
///
/// Configuration parameters:
/// - `storage_path`: directory holding the session files (default: `~/.resto/session`)
pub fn create_store(config: &toml::Value) -> Result<Box<dyn SessionStore>, SessionError> {
	FileStoreSchema
		.validate(config)
		.map_err(|e| SessionError::Configuration(e.to_string()))?;

	let storage_path = config
		.get("storage_path")
		.and_then(|v| v.as_str())
		.unwrap_or(DEFAULT_PATH);

	Ok(Box::new(FileStore::new(expand_home(storage_path))))
}

/// Registry for the file store.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "file";
	type Factory = SessionFactory;

	fn factory() -> Self::Factory {
		create_store
	}
}

impl SessionRegistry for Registry {}
