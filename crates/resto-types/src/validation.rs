//! Validation utilities for configuration sections and request payloads.
//!
//! Two kinds of input are checked before anything reaches the network:
//! backend configuration tables (validated against a [`Schema`]) and the
//! payloads operators type in (menu items, profile edits, credentials),
//! validated with the field helpers at the bottom of this module.

use thiserror::Error;

/// Errors that can occur during validation.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
	/// A required field is missing or empty.
	#[error("Missing required field: {0}")]
	MissingField(String),
	/// A field has a value outside its allowed range or format.
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	/// A configuration field has the wrong TOML type.
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		field: String,
		expected: String,
		actual: String,
	},
}

impl ValidationError {
	/// Shorthand for an [`ValidationError::InvalidValue`].
	pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self::InvalidValue {
			field: field.into(),
			message: message.into(),
		}
	}
}

/// Type of a configuration field.
#[derive(Debug)]
pub enum FieldType {
	String,
	/// An integer with optional inclusive bounds.
	Integer { min: Option<i64>, max: Option<i64> },
	Boolean,
}

/// Custom check run after the type check succeeds.
pub type FieldValidator = Box<dyn Fn(&toml::Value) -> Result<(), String> + Send + Sync>;

/// A named, typed field in a configuration schema.
pub struct Field {
	pub name: String,
	pub field_type: FieldType,
	pub validator: Option<FieldValidator>,
}

impl std::fmt::Debug for Field {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("field_type", &self.field_type)
			.field("validator", &self.validator.is_some())
			.finish()
	}
}

impl Field {
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
			validator: None,
		}
	}

	/// Attaches a custom validator to this field.
	pub fn with_validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<(), String> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(validator));
		self
	}

	fn check(&self, value: &toml::Value) -> Result<(), ValidationError> {
		let mismatch = |expected: &str| ValidationError::TypeMismatch {
			field: self.name.clone(),
			expected: expected.to_string(),
			actual: value.type_str().to_string(),
		};

		match &self.field_type {
			FieldType::String => {
				if !value.is_str() {
					return Err(mismatch("string"));
				}
			}
			FieldType::Boolean => {
				if !value.is_bool() {
					return Err(mismatch("boolean"));
				}
			}
			FieldType::Integer { min, max } => {
				let int_val = value.as_integer().ok_or_else(|| mismatch("integer"))?;
				if let Some(min_val) = min.filter(|m| int_val < *m) {
					return Err(ValidationError::invalid(
						&self.name,
						format!("Value {} is less than minimum {}", int_val, min_val),
					));
				}
				if let Some(max_val) = max.filter(|m| int_val > *m) {
					return Err(ValidationError::invalid(
						&self.name,
						format!("Value {} is greater than maximum {}", int_val, max_val),
					));
				}
			}
		}

		if let Some(validator) = &self.validator {
			validator(value).map_err(|msg| ValidationError::invalid(&self.name, msg))?;
		}
		Ok(())
	}
}

/// Required and optional fields of a configuration table.
#[derive(Debug)]
pub struct Schema {
	pub required: Vec<Field>,
	pub optional: Vec<Field>,
}

impl Schema {
	pub fn new(required: Vec<Field>, optional: Vec<Field>) -> Self {
		Self { required, optional }
	}

	/// Validates a TOML table against this schema.
	///
	/// Required fields must be present; optional fields are type-checked only
	/// when present. Unknown keys are ignored.
	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let table = config
			.as_table()
			.ok_or_else(|| ValidationError::TypeMismatch {
				field: "root".to_string(),
				expected: "table".to_string(),
				actual: config.type_str().to_string(),
			})?;

		for field in &self.required {
			let value = table
				.get(&field.name)
				.ok_or_else(|| ValidationError::MissingField(field.name.clone()))?;
			field.check(value)?;
		}

		for field in &self.optional {
			if let Some(value) = table.get(&field.name) {
				field.check(value)?;
			}
		}

		Ok(())
	}
}

/// A configuration schema that pluggable backends expose for their section.
pub trait ConfigSchema: Send + Sync {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}

/// Fails with [`ValidationError::MissingField`] if `value` is blank.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
	if value.trim().is_empty() {
		return Err(ValidationError::MissingField(field.to_string()));
	}
	Ok(())
}

/// Fails unless `value` can be placed in a URL path as a single segment.
pub fn require_path_segment(field: &str, value: &str) -> Result<(), ValidationError> {
	require_non_empty(field, value)?;
	let value = value.trim();
	let unsafe_char = value
		.chars()
		.any(|c| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control());
	if unsafe_char || value == "." || value.contains("..") {
		return Err(ValidationError::invalid(field, "is not a valid identifier"));
	}
	Ok(())
}

/// Fails unless `value` is a finite number strictly greater than zero.
pub fn require_positive(field: &str, value: f64) -> Result<(), ValidationError> {
	if !value.is_finite() || value <= 0.0 {
		return Err(ValidationError::invalid(field, "must be a positive number"));
	}
	Ok(())
}

/// Fails unless `value` is a finite number greater than or equal to zero.
pub fn require_non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
	if !value.is_finite() || value < 0.0 {
		return Err(ValidationError::invalid(field, "must be a non-negative number"));
	}
	Ok(())
}

/// Loose `local@domain.tld` shape check, the same one the login form applies.
pub fn require_email(field: &str, value: &str) -> Result<(), ValidationError> {
	require_non_empty(field, value)?;
	let valid = value
		.split_once('@')
		.filter(|(local, domain)| {
			!local.is_empty()
				&& !value.chars().any(char::is_whitespace)
				&& domain
					.split_once('.')
					.is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
		})
		.is_some();
	if !valid {
		return Err(ValidationError::invalid(field, "email is invalid"));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn schema() -> Schema {
		Schema::new(
			vec![Field::new("storage_path", FieldType::String)],
			vec![
				Field::new(
					"dismiss_after_ms",
					FieldType::Integer {
						min: Some(0),
						max: Some(60_000),
					},
				),
				Field::new("owner_only", FieldType::Boolean),
			],
		)
	}

	#[test]
	fn test_schema_accepts_valid_table() {
		let config: toml::Value = toml::from_str("storage_path = \"/tmp/x\"\nowner_only = true").unwrap();
		assert!(schema().validate(&config).is_ok());
	}

	#[test]
	fn test_schema_reports_missing_and_mismatched_fields() {
		let config: toml::Value = toml::from_str("owner_only = true").unwrap();
		assert_eq!(
			schema().validate(&config),
			Err(ValidationError::MissingField("storage_path".into()))
		);

		let config: toml::Value = toml::from_str("storage_path = 3").unwrap();
		assert!(matches!(
			schema().validate(&config),
			Err(ValidationError::TypeMismatch { .. })
		));

		let config: toml::Value = toml::from_str("storage_path = \"x\"\ndismiss_after_ms = -1").unwrap();
		assert!(matches!(
			schema().validate(&config),
			Err(ValidationError::InvalidValue { .. })
		));
	}

	#[test]
	fn test_custom_validator() {
		let schema = Schema::new(
			vec![Field::new("storage_path", FieldType::String).with_validator(|v| {
				if v.as_str().is_some_and(|s| s.is_empty()) {
					Err("cannot be empty".into())
				} else {
					Ok(())
				}
			})],
			vec![],
		);
		let config: toml::Value = toml::from_str("storage_path = \"\"").unwrap();
		assert!(schema.validate(&config).is_err());
	}

	#[test]
	fn test_field_helpers() {
		assert!(require_non_empty("name", "  ").is_err());
		assert!(require_positive("price", 0.0).is_err());
		assert!(require_positive("price", 4.5).is_ok());
		assert!(require_non_negative("deliveryFee", 0.0).is_ok());
		assert!(require_non_negative("deliveryFee", f64::NAN).is_err());
	}

	#[test]
	fn test_path_segment() {
		assert!(require_path_segment("orderId", "665f1c2ab9e4a1").is_ok());
		assert!(require_path_segment("orderId", " 665f1c2a ").is_ok());
		assert_eq!(
			require_path_segment("orderId", " "),
			Err(ValidationError::MissingField("orderId".into()))
		);
		for bad in ["../auth/me", "a/b", "..", ".", "a?x=1", "a#b", "%2e%2e", "a b", "a\\b"] {
			assert!(
				matches!(
					require_path_segment("orderId", bad),
					Err(ValidationError::InvalidValue { .. })
				),
				"{bad} accepted"
			);
		}
	}

	#[test]
	fn test_email_shape() {
		assert!(require_email("email", "chef@bistro.com").is_ok());
		assert!(require_email("email", "chef@bistro").is_err());
		assert!(require_email("email", "chef bistro@x.com").is_err());
		assert!(require_email("email", "@bistro.com").is_err());
		assert_eq!(
			require_email("email", ""),
			Err(ValidationError::MissingField("email".into()))
		);
	}
}
