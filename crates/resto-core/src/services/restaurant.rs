//! Restaurant profile, open/closed status and analytics.

use super::{require_data, require_id};
use crate::CoreError;
use resto_client::{ApiClient, ApiRequest};
use resto_types::{Analytics, AnalyticsPeriod, ApiEnvelope, Restaurant, RestaurantUpdate};
use std::sync::Arc;

/// Calls under `/api/restaurants/:id`.
///
/// Every operation needs the restaurant id and fails with
/// [`CoreError::MissingRestaurantId`] before sending anything when it is blank,
/// or with a validation error when it is not a single path segment.
#[derive(Clone)]
pub struct RestaurantService {
	client: Arc<ApiClient>,
}

fn ensure_id(restaurant_id: &str) -> Result<&str, CoreError> {
	if restaurant_id.trim().is_empty() {
		return Err(CoreError::MissingRestaurantId);
	}
	require_id("restaurantId", restaurant_id)
}

impl RestaurantService {
	pub fn new(client: Arc<ApiClient>) -> Self {
		Self { client }
	}

	pub async fn get(&self, restaurant_id: &str) -> Result<Restaurant, CoreError> {
		let id = ensure_id(restaurant_id)?;
		let envelope: ApiEnvelope<Restaurant> =
			self.client.get(&format!("/api/restaurants/{}", id)).await?;
		require_data(envelope, "restaurant")
	}

	/// Replaces the editable profile fields.
	pub async fn update(
		&self,
		restaurant_id: &str,
		update: &RestaurantUpdate,
	) -> Result<Restaurant, CoreError> {
		let id = ensure_id(restaurant_id)?;
		update.validate()?;
		let envelope: ApiEnvelope<Restaurant> = self
			.client
			.put(&format!("/api/restaurants/{}", id), update)
			.await?;
		tracing::info!(restaurant_id = %id, "Updated restaurant details");
		require_data(envelope, "restaurant")
	}

	/// Flips the restaurant between open and closed.
	pub async fn toggle_status(&self, restaurant_id: &str) -> Result<Restaurant, CoreError> {
		let id = ensure_id(restaurant_id)?;
		let envelope: ApiEnvelope<Restaurant> = self
			.client
			.send(ApiRequest::put(format!("/api/restaurants/{}/toggle-status", id)))
			.await?;
		let restaurant = require_data(envelope, "restaurant")?;
		tracing::info!(restaurant_id = %id, status = %restaurant.status, "Toggled restaurant status");
		Ok(restaurant)
	}

	pub async fn analytics(
		&self,
		restaurant_id: &str,
		period: &AnalyticsPeriod,
	) -> Result<Analytics, CoreError> {
		let id = ensure_id(restaurant_id)?;
		let envelope: ApiEnvelope<Analytics> = self
			.client
			.send(
				ApiRequest::get(format!("/api/restaurants/{}/analytics", id))
					.query("period", period.as_str()),
			)
			.await?;
		Ok(envelope.into_data().unwrap_or_default())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::services::test_support::{logged_in_client, restaurant_json};
	use resto_client::Method;
	use resto_types::RestaurantStatus;
	use serde_json::json;

	#[tokio::test]
	async fn test_blank_id_fails_before_any_request() {
		let (client, transport) = logged_in_client().await;
		let service = RestaurantService::new(client);

		assert!(matches!(service.get("").await, Err(CoreError::MissingRestaurantId)));
		assert!(matches!(
			service.toggle_status("  ").await,
			Err(CoreError::MissingRestaurantId)
		));
		assert!(matches!(
			service.analytics("", &AnalyticsPeriod::Week).await,
			Err(CoreError::MissingRestaurantId)
		));
		assert!(transport.requests().is_empty());
	}

	#[tokio::test]
	async fn test_id_with_path_characters_is_rejected() {
		let (client, transport) = logged_in_client().await;
		let service = RestaurantService::new(client);

		assert!(matches!(
			service.get("../../auth/me").await,
			Err(CoreError::Validation(_))
		));
		assert!(matches!(
			service.toggle_status("r1/analytics").await,
			Err(CoreError::Validation(_))
		));
		assert!(transport.requests().is_empty());
	}

	#[tokio::test]
	async fn test_toggle_status() {
		let (client, transport) = logged_in_client().await;
		transport.respond(200, json!({ "success": true, "data": restaurant_json("r1", "closed") }));

		let restaurant = RestaurantService::new(client).toggle_status("r1").await.unwrap();
		assert_eq!(restaurant.status, RestaurantStatus::Closed);

		let requests = transport.requests();
		let request = &requests[0];
		assert_eq!(request.method, Method::Put);
		assert_eq!(request.url, "http://api.test/api/restaurants/r1/toggle-status");
	}

	#[tokio::test]
	async fn test_analytics_sends_period() {
		let (client, transport) = logged_in_client().await;
		transport.respond(
			200,
			json!({ "success": true, "data": { "totalRevenue": 120.5, "totalOrders": 4 } }),
		);

		let analytics = RestaurantService::new(client)
			.analytics("r1", &AnalyticsPeriod::default())
			.await
			.unwrap();
		assert_eq!(analytics.total_orders, 4);
		assert!(analytics.sales_by_day.is_empty());
		assert_eq!(
			transport.requests()[0].query,
			vec![("period".to_string(), "30days".to_string())]
		);
	}

	#[tokio::test]
	async fn test_update_is_validated() {
		let (client, transport) = logged_in_client().await;
		let update = RestaurantUpdate {
			name: "Lotus".into(),
			description: None,
			email: None,
			phone: "".into(),
			address: "12 Harbour St".into(),
			cuisine_type: vec!["Thai".into()],
			minimum_order: 0.0,
			delivery_fee: 2.0,
			delivery_time: Some(30),
		};
		let err = RestaurantService::new(client).update("r1", &update).await.unwrap_err();
		assert!(matches!(err, CoreError::Validation(_)));
		assert!(transport.requests().is_empty());
	}
}
