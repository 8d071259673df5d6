//! Account commands.

use super::{CommandError, Report};
use resto_core::RestoApp;
use resto_types::{LoginRequest, PasswordUpdate, User, UserDetailsUpdate};

fn describe(user: &User) -> String {
	let mut text = format!("{} <{}>", user.name, user.email);
	match &user.restaurant {
		Some(restaurant) => {
			text.push_str(&format!("\n{} ({})", restaurant.name, restaurant.status));
		}
		None => {
			if let Some(id) = &user.restaurant_id {
				text.push_str(&format!("\nRestaurant {}", id));
			}
		}
	}
	text
}

pub async fn login(app: &RestoApp, email: String, password: String) -> Result<Report, CommandError> {
	let user = app.auth().login(&LoginRequest::new(email, password)).await?;
	app.alerts().success(format!("Welcome back, {}", user.name));
	Report::new(&user, describe(&user))
}

pub async fn logout(app: &RestoApp) -> Result<Report, CommandError> {
	app.auth().logout().await?;
	Ok(Report::message("Logged out"))
}

/// Shows the profile from the backend.
pub async fn whoami(app: &RestoApp) -> Result<Report, CommandError> {
	if app.auth().restore_session().await?.is_none() {
		return Err(resto_core::CoreError::NotAuthenticated.into());
	}
	let user = app.auth().profile().await?;
	Report::new(&user, describe(&user))
}

pub async fn update_details(
	app: &RestoApp,
	name: String,
	email: String,
	phone: Option<String>,
) -> Result<Report, CommandError> {
	let user = app
		.auth()
		.update_details(&UserDetailsUpdate { name, email, phone })
		.await?;
	app.alerts().success("Profile updated");
	Report::new(&user, describe(&user))
}

pub async fn forgot_password(app: &RestoApp, email: &str) -> Result<Report, CommandError> {
	let message = app.auth().forgot_password(email).await?;
	Ok(Report::message(message))
}

pub async fn reset_password(
	app: &RestoApp,
	token: &str,
	password: &str,
) -> Result<Report, CommandError> {
	app.auth().reset_password(token, password).await?;
	Ok(Report::message("Password reset, you can now log in"))
}

pub async fn update_password(
	app: &RestoApp,
	current_password: String,
	new_password: String,
) -> Result<Report, CommandError> {
	app.auth()
		.update_password(&PasswordUpdate {
			current_password,
			new_password,
		})
		.await?;
	Ok(Report::message("Password updated"))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::commands::test_support::logged_in_app;
	use resto_core::CoreError;
	use serde_json::json;

	#[tokio::test]
	async fn test_whoami_shows_restaurant() {
		let (app, transport) = logged_in_app().await;
		transport
			.respond(200, json!({ "success": true, "data": { "_id": "user0001", "name": "Sam", "email": "sam@lotus.io", "role": "restaurant" } }))
			.respond(200, json!({ "success": true, "data": { "_id": "rest01", "name": "Lotus Kitchen", "status": "open" } }));

		let report = whoami(&app).await.unwrap();
		assert_eq!(report.text, "Sam <sam@lotus.io>\nLotus Kitchen (open)");
		assert_eq!(report.json["restaurantId"], "rest01");
	}

	#[tokio::test]
	async fn test_whoami_requires_session() {
		let (app, transport) = logged_in_app().await;
		logout(&app).await.unwrap();

		let err = whoami(&app).await.unwrap_err();
		assert!(matches!(err, CommandError::Core(CoreError::NotAuthenticated)));
		assert!(err.requires_login());
		assert!(transport.requests().is_empty());
	}

	#[tokio::test]
	async fn test_expired_session_requires_login() {
		let (app, transport) = logged_in_app().await;
		transport
			.respond(401, json!({ "message": "jwt expired" }))
			.respond(401, json!({ "message": "invalid refresh token" }));

		let err = whoami(&app).await.unwrap_err();
		assert!(err.requires_login());
		assert!(app.session().access_token().await.unwrap().is_none());
	}
}
