//! Command line client for the restaurant dashboard.
//!
//! Logs in as a restaurant operator and manages orders, the menu and the
//! restaurant profile against the backend configured in the config file.

use clap::Parser;
use resto_config::Config;
use resto_core::RestoBuilder;
use std::path::PathBuf;

mod commands;

use commands::Command;

/// Command-line arguments for the restaurant client.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "resto.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "warn")]
	log_level: String,

	/// Print results as pretty JSON
	#[arg(long, global = true)]
	json: bool,

	#[command(subcommand)]
	command: Command,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
	fmt()
		.with_env_filter(env_filter)
		.with_target(true)
		.with_writer(std::io::stderr)
		.init();

	let config = Config::from_file(&args.config).await?;
	tracing::debug!(base_url = %config.api.base_url, "Loaded configuration");

	let app = RestoBuilder::new(config).build()?;

	match commands::run(&app, args.command).await {
		Ok(report) => {
			println!("{}", report.render(args.json)?);
			commands::print_alert(&app);
			Ok(())
		}
		Err(e) if e.requires_login() => {
			eprintln!("Session expired, please log in again with `resto login`");
			std::process::exit(1);
		}
		Err(e) => {
			eprintln!("Error: {}", e);
			std::process::exit(1);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use commands::{MenuCommand, OrdersCommand};

	#[test]
	fn test_args_default_values() {
		let args = Args::try_parse_from(["resto", "dashboard"]).unwrap();
		assert_eq!(args.config, PathBuf::from("resto.toml"));
		assert_eq!(args.log_level, "warn");
		assert!(!args.json);
		assert!(matches!(args.command, Command::Dashboard));
	}

	#[test]
	fn test_args_custom_values() {
		let args = Args::try_parse_from([
			"resto",
			"--config",
			"custom.toml",
			"-l",
			"debug",
			"orders",
			"list",
			"--status",
			"pending",
			"--json",
		])
		.unwrap();
		assert_eq!(args.config, PathBuf::from("custom.toml"));
		assert_eq!(args.log_level, "debug");
		assert!(args.json);
		assert!(matches!(
			args.command,
			Command::Orders {
				command: OrdersCommand::List { status: Some(ref s) }
			} if s == "pending"
		));
	}

	#[test]
	fn test_set_status_and_menu_args() {
		let args = Args::try_parse_from([
			"resto", "orders", "set-status", "abc123", "on_the_way", "--note", "rider left",
		])
		.unwrap();
		assert!(matches!(
			args.command,
			Command::Orders {
				command: OrdersCommand::SetStatus { ref id, ref status, ref note }
			} if id == "abc123" && status == "on_the_way" && note == "rider left"
		));

		let args = Args::try_parse_from(["resto", "menu", "list", "--category", "Mains"]).unwrap();
		assert!(matches!(
			args.command,
			Command::Menu {
				command: MenuCommand::List { category: Some(_), search: None }
			}
		));
	}

	#[test]
	fn test_missing_subcommand_is_rejected() {
		assert!(Args::try_parse_from(["resto"]).is_err());
		assert!(Args::try_parse_from(["resto", "orders", "show"]).is_err());
	}
}
