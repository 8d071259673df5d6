//! Registry trait for self-registering implementations.
//!
//! Pluggable backends (currently the session stores) implement this trait so
//! the application can build them by the name used in the configuration file.

/// Base trait for implementation registries.
///
/// Each implementation module provides a `Registry` struct implementing this
/// trait, declaring its configuration name and its factory function.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation,
	/// e.g. `"file"` for `[session.implementations.file]`.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
