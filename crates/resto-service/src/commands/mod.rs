//! Subcommands of the `resto` binary.
//!
//! Every handler returns a [`Report`] holding both a short human readable
//! text and the JSON value behind it; `main` picks one to print.

use clap::Subcommand;
use resto_core::{CoreError, RestoApp};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

pub mod auth;
pub mod dashboard;
pub mod menu;
pub mod orders;
pub mod restaurant;

/// Errors surfaced by a command.
#[derive(Debug, Error)]
pub enum CommandError {
	#[error("{0}")]
	Core(#[from] CoreError),
	#[error("Cannot read {path}: {source}")]
	Io {
		path: String,
		source: std::io::Error,
	},
	#[error("Invalid JSON in {path}: {source}")]
	InvalidFile {
		path: String,
		source: serde_json::Error,
	},
	#[error("Cannot render output: {0}")]
	Output(#[from] serde_json::Error),
}

impl CommandError {
	/// Whether the user has to log in again.
	pub fn requires_login(&self) -> bool {
		matches!(self, CommandError::Core(e) if e.requires_login())
	}
}

/// Outcome of a command.
#[derive(Debug)]
pub struct Report {
	pub text: String,
	pub json: serde_json::Value,
}

impl Report {
	pub fn new<T: Serialize>(value: &T, text: impl Into<String>) -> Result<Self, CommandError> {
		Ok(Self {
			text: text.into(),
			json: serde_json::to_value(value)?,
		})
	}

	/// Report carrying only a message.
	pub fn message(text: impl Into<String>) -> Self {
		let text = text.into();
		Self {
			json: serde_json::json!({ "message": text }),
			text,
		}
	}

	pub fn render(&self, json: bool) -> Result<String, CommandError> {
		if json {
			Ok(serde_json::to_string_pretty(&self.json)?)
		} else {
			Ok(self.text.clone())
		}
	}
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Log in as a restaurant operator
	Login {
		#[arg(long, env = "RESTO_EMAIL")]
		email: String,
		#[arg(long, env = "RESTO_PASSWORD", hide_env_values = true)]
		password: String,
	},
	/// Forget the stored session
	Logout,
	/// Show the logged-in user and restaurant
	Whoami,
	/// Update name, email and phone of the account
	UpdateDetails {
		#[arg(long)]
		name: String,
		#[arg(long)]
		email: String,
		#[arg(long)]
		phone: Option<String>,
	},
	/// Ask for a password reset email
	ForgotPassword { email: String },
	/// Set a new password using the token from the reset email
	ResetPassword {
		token: String,
		#[arg(long, env = "RESTO_NEW_PASSWORD", hide_env_values = true)]
		password: String,
	},
	/// Change the password of the logged-in account
	UpdatePassword {
		#[arg(long, env = "RESTO_PASSWORD", hide_env_values = true)]
		current: String,
		#[arg(long, env = "RESTO_NEW_PASSWORD", hide_env_values = true)]
		new: String,
	},
	/// Overview of the restaurant, revenue and recent orders
	Dashboard,
	/// Manage orders
	Orders {
		#[command(subcommand)]
		command: OrdersCommand,
	},
	/// Manage the menu
	Menu {
		#[command(subcommand)]
		command: MenuCommand,
	},
	/// Manage the restaurant profile
	Restaurant {
		#[command(subcommand)]
		command: RestaurantCommand,
	},
	/// Sales analytics and insights
	Analytics {
		/// week, month, year or 30days
		#[arg(long, default_value = "30days")]
		period: String,
	},
}

#[derive(Subcommand, Debug)]
pub enum OrdersCommand {
	/// List orders, optionally only those in one status
	List {
		#[arg(long)]
		status: Option<String>,
	},
	/// Show an order with its progress
	Show { id: String },
	/// Move an order to the next status
	Advance { id: String },
	/// Cancel a pending order
	Cancel {
		id: String,
		#[arg(long, default_value = "")]
		note: String,
	},
	/// Set any status on an order
	SetStatus {
		id: String,
		status: String,
		#[arg(long, default_value = "")]
		note: String,
	},
}

#[derive(Subcommand, Debug)]
pub enum MenuCommand {
	/// List menu items
	List {
		#[arg(long)]
		category: Option<String>,
		#[arg(long)]
		search: Option<String>,
	},
	/// Show a menu item
	Show { id: String },
	/// Create a menu item from a JSON file
	Create {
		#[arg(long)]
		file: std::path::PathBuf,
	},
	/// Replace a menu item from a JSON file
	Update {
		id: String,
		#[arg(long)]
		file: std::path::PathBuf,
	},
	/// Delete a menu item
	Delete { id: String },
	/// Flip the availability of a menu item
	Toggle { id: String },
}

#[derive(Subcommand, Debug)]
pub enum RestaurantCommand {
	/// Show the restaurant profile
	Show,
	/// Open or close the restaurant
	Toggle,
	/// Replace the editable profile from a JSON file
	Update {
		#[arg(long)]
		file: std::path::PathBuf,
		/// Comma separated cuisines, replacing those in the file
		#[arg(long)]
		cuisine: Option<String>,
	},
}

/// Runs `command` against `app`.
pub async fn run(app: &RestoApp, command: Command) -> Result<Report, CommandError> {
	match command {
		Command::Login { email, password } => auth::login(app, email, password).await,
		Command::Logout => auth::logout(app).await,
		Command::Whoami => auth::whoami(app).await,
		Command::UpdateDetails { name, email, phone } => {
			auth::update_details(app, name, email, phone).await
		}
		Command::ForgotPassword { email } => auth::forgot_password(app, &email).await,
		Command::ResetPassword { token, password } => {
			auth::reset_password(app, &token, &password).await
		}
		Command::UpdatePassword { current, new } => auth::update_password(app, current, new).await,
		Command::Dashboard => dashboard::summary(app).await,
		Command::Analytics { period } => dashboard::analytics(app, &period).await,
		Command::Orders { command } => orders::run(app, command).await,
		Command::Menu { command } => menu::run(app, command).await,
		Command::Restaurant { command } => restaurant::run(app, command).await,
	}
}

/// Prints the alert banner, if one is showing, to stderr.
pub fn print_alert(app: &RestoApp) {
	let alert = app.alerts().current();
	if alert.visible {
		eprintln!("[{}] {}", alert.kind, alert.message);
	}
}

/// Reads and decodes a JSON input file.
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CommandError> {
	let display = path.display().to_string();
	let content = tokio::fs::read_to_string(path)
		.await
		.map_err(|source| CommandError::Io {
			path: display.clone(),
			source,
		})?;
	serde_json::from_str(&content).map_err(|source| CommandError::InvalidFile {
		path: display,
		source,
	})
}


#[cfg(test)]
mod tests {
	use super::*;
	use resto_client::ClientError;

	#[test]
	fn test_report_render() {
		let report = Report::new(&serde_json::json!({ "id": "o1" }), "Order #o1").unwrap();
		assert_eq!(report.render(false).unwrap(), "Order #o1");
		assert!(report.render(true).unwrap().contains("\"id\": \"o1\""));

		let message = Report::message("Logged out");
		assert_eq!(message.json["message"], "Logged out");
	}

	#[test]
	fn test_requires_login() {
		assert!(CommandError::Core(CoreError::Client(ClientError::AuthExpired)).requires_login());
		assert!(!CommandError::Core(CoreError::MissingRestaurantId).requires_login());
	}

	#[tokio::test]
	async fn test_read_json_errors_name_the_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("item.json");

		let err = read_json::<serde_json::Value>(&path).await.unwrap_err();
		assert!(matches!(err, CommandError::Io { .. }));

		tokio::fs::write(&path, "{ not json").await.unwrap();
		let err = read_json::<serde_json::Value>(&path).await.unwrap_err();
		assert!(err.to_string().starts_with("Invalid JSON in"));
		assert!(err.to_string().contains("item.json"));
	}
}
