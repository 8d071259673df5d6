//! Core of the restaurant administration client.
//!
//! Ties the session store, the API client and the domain services together
//! into a [`RestoApp`], and holds the order status model and the two small
//! pieces of application state (alert banner and theme).

use resto_client::ClientError;
use resto_config::Config;
use resto_session::{SessionError, SessionService};
use resto_types::ValidationError;
use std::sync::Arc;
use thiserror::Error;

pub mod builder;
pub mod context;
pub mod services;
pub mod state;

pub use builder::{BuilderError, RestoBuilder};
pub use context::{Alert, AlertCenter, AlertKind, Palette, ThemeState};
pub use services::{
	AuthService, DashboardService, DashboardSummary, Insights, MenuService, OrderService,
	RestaurantService,
};

/// Errors returned by the domain services.
#[derive(Debug, Error)]
pub enum CoreError {
	/// Input rejected before any request was sent.
	#[error("Validation error: {0}")]
	Validation(#[from] ValidationError),
	/// The backend call failed.
	#[error("{0}")]
	Client(#[from] ClientError),
	/// The session store failed.
	#[error("Session error: {0}")]
	Session(#[from] SessionError),
	/// The user is authenticated but not allowed to use this client.
	#[error("Unauthorized: {0}")]
	Unauthorized(String),
	/// An operation needs a restaurant id and none was given.
	#[error("Restaurant ID is required")]
	MissingRestaurantId,
	/// No user is logged in.
	#[error("Not logged in")]
	NotAuthenticated,
	/// The requested status change is not offered for the order's status.
	#[error("Invalid transition: {0}")]
	InvalidTransition(String),
	/// The backend answered successfully but without the expected payload.
	#[error("Unexpected response: {0}")]
	InvalidResponse(String),
}

impl CoreError {
	/// Whether the session is gone and the user must log in again.
	pub fn requires_login(&self) -> bool {
		matches!(
			self,
			CoreError::NotAuthenticated
				| CoreError::Client(ClientError::AuthExpired)
				| CoreError::Client(ClientError::Unauthorized)
		)
	}
}

/// The application root.
///
/// Owns every service and the shared state that the screens of a graphical
/// client would read from context. Built by [`RestoBuilder`].
pub struct RestoApp {
	config: Config,
	session: Arc<SessionService>,
	auth: AuthService,
	orders: OrderService,
	menu: MenuService,
	restaurants: RestaurantService,
	dashboard: DashboardService,
	alerts: AlertCenter,
	theme: ThemeState,
}

impl RestoApp {
	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn session(&self) -> &Arc<SessionService> {
		&self.session
	}

	pub fn auth(&self) -> &AuthService {
		&self.auth
	}

	pub fn orders(&self) -> &OrderService {
		&self.orders
	}

	pub fn menu(&self) -> &MenuService {
		&self.menu
	}

	pub fn restaurants(&self) -> &RestaurantService {
		&self.restaurants
	}

	pub fn dashboard(&self) -> &DashboardService {
		&self.dashboard
	}

	pub fn alerts(&self) -> &AlertCenter {
		&self.alerts
	}

	pub fn theme(&self) -> &ThemeState {
		&self.theme
	}

	/// Restaurant id of the logged-in user.
	pub async fn current_restaurant_id(&self) -> Result<String, CoreError> {
		let user = self
			.session
			.user_info()
			.await?
			.ok_or(CoreError::NotAuthenticated)?;
		user.restaurant_id
			.filter(|id| !id.trim().is_empty())
			.ok_or(CoreError::MissingRestaurantId)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use resto_client::testing::ScriptedTransport;
	use resto_types::SessionKey;

	#[test]
	fn test_requires_login() {
		assert!(CoreError::Client(ClientError::AuthExpired).requires_login());
		assert!(CoreError::NotAuthenticated.requires_login());
		assert!(!CoreError::MissingRestaurantId.requires_login());
	}

	#[tokio::test]
	async fn test_current_restaurant_id() {
		let app = RestoBuilder::new(Config::for_tests("http://api.test"))
			.build_with_transport(Arc::new(ScriptedTransport::new()))
			.unwrap();
		assert!(matches!(
			app.current_restaurant_id().await,
			Err(CoreError::NotAuthenticated)
		));

		app.session()
			.backend()
			.set(SessionKey::UserInfo.as_str(), r#"{"_id":"u1","role":"restaurant"}"#)
			.await
			.unwrap();
		assert!(matches!(
			app.current_restaurant_id().await,
			Err(CoreError::MissingRestaurantId)
		));

		app.session()
			.backend()
			.set(
				SessionKey::UserInfo.as_str(),
				r#"{"_id":"u1","role":"restaurant","restaurantId":"r9"}"#,
			)
			.await
			.unwrap();
		assert_eq!(app.current_restaurant_id().await.unwrap(), "r9");
	}
}
