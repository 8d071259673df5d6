//! Builder for the application root.
//!
//! Resolves the configured session store through the registered factories,
//! creates the HTTP transport and wires every service around a single
//! shared [`ApiClient`].

use crate::{
	AlertCenter, AuthService, DashboardService, MenuService, OrderService, RestaurantService,
	RestoApp, ThemeState,
};
use resto_client::implementations::http::ReqwestTransport;
use resto_client::{ApiClient, HttpTransport};
use resto_config::Config;
use resto_session::{SessionFactory, SessionService};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while building the application.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Transport error: {0}")]
	Transport(String),
}

/// Builds a [`RestoApp`] from configuration.
pub struct RestoBuilder {
	config: Config,
	session_factories: HashMap<&'static str, SessionFactory>,
}

impl RestoBuilder {
	/// Creates a builder knowing every built-in session store.
	pub fn new(config: Config) -> Self {
		Self {
			config,
			session_factories: resto_session::get_all_implementations()
				.into_iter()
				.collect(),
		}
	}

	/// Builds the application with the reqwest transport.
	pub fn build(self) -> Result<RestoApp, BuilderError> {
		let transport = ReqwestTransport::new(self.config.api.timeout())
			.map_err(|e| BuilderError::Transport(e.to_string()))?;
		self.build_with_transport(Arc::new(transport))
	}

	/// Builds the application around the given transport.
	pub fn build_with_transport(
		self,
		transport: Arc<dyn HttpTransport>,
	) -> Result<RestoApp, BuilderError> {
		let primary = &self.config.session.primary;
		let store_config = self.config.session.primary_config().ok_or_else(|| {
			BuilderError::Config(format!(
				"Primary session store '{}' not found in implementations",
				primary
			))
		})?;
		let factory = self.session_factories.get(primary.as_str()).ok_or_else(|| {
			BuilderError::Config(format!("Unknown session store '{}'", primary))
		})?;

		let backend = match factory(store_config) {
			Ok(backend) => {
				tracing::info!(component = "session", implementation = %primary, "Loaded");
				backend
			}
			Err(e) => {
				tracing::error!(
					component = "session",
					implementation = %primary,
					error = %e,
					"Failed to create session store"
				);
				return Err(BuilderError::Config(format!(
					"Failed to create session store '{}': {}",
					primary, e
				)));
			}
		};

		let session = Arc::new(SessionService::new(backend));
		let client = Arc::new(ApiClient::new(
			self.config.api.base_url.clone(),
			transport,
			session.clone(),
		));

		let restaurants = RestaurantService::new(client.clone());
		let orders = OrderService::new(client.clone());
		let menu = MenuService::new(client.clone());
		let auth = AuthService::new(
			client.clone(),
			restaurants.clone(),
			self.config.api.dashboard_type.clone(),
		);
		let dashboard = DashboardService::new(restaurants.clone(), orders.clone());
		let alerts = AlertCenter::new(self.config.alerts.dismiss_after());

		tracing::debug!(base_url = %self.config.api.base_url, "Client ready");

		Ok(RestoApp {
			config: self.config,
			session,
			auth,
			orders,
			menu,
			restaurants,
			dashboard,
			alerts,
			theme: ThemeState::default(),
		})
	}
}
