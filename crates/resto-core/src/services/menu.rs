//! Menu management.

use super::{require_data, require_id};
use crate::CoreError;
use resto_client::{ApiClient, ApiRequest};
use resto_types::{ApiEnvelope, MenuItem, MenuItemInput};
use std::sync::Arc;

/// Calls under `/api/menu`.
#[derive(Clone)]
pub struct MenuService {
	client: Arc<ApiClient>,
}

impl MenuService {
	pub fn new(client: Arc<ApiClient>) -> Self {
		Self { client }
	}

	/// Lists the menu of a restaurant.
	pub async fn list(&self, restaurant_id: &str) -> Result<Vec<MenuItem>, CoreError> {
		if restaurant_id.trim().is_empty() {
			return Err(CoreError::MissingRestaurantId);
		}
		let envelope: ApiEnvelope<Vec<MenuItem>> = self
			.client
			.send(ApiRequest::get("/api/menu").query("restaurant", restaurant_id))
			.await?;
		Ok(envelope.into_data().unwrap_or_default())
	}

	pub async fn get(&self, item_id: &str) -> Result<MenuItem, CoreError> {
		let item_id = require_id("menuItemId", item_id)?;
		let envelope: ApiEnvelope<MenuItem> = self.client.get(&format!("/api/menu/{}", item_id)).await?;
		require_data(envelope, "menu item")
	}

	pub async fn create(&self, input: &MenuItemInput) -> Result<MenuItem, CoreError> {
		input.validate()?;
		let envelope: ApiEnvelope<MenuItem> = self.client.post("/api/menu", input).await?;
		let item = require_data(envelope, "menu item")?;
		tracing::info!(item_id = %item.id, name = %item.name, "Created menu item");
		Ok(item)
	}

	/// Replaces every field of an existing item.
	pub async fn update(&self, item_id: &str, input: &MenuItemInput) -> Result<MenuItem, CoreError> {
		let item_id = require_id("menuItemId", item_id)?;
		input.validate()?;
		let envelope: ApiEnvelope<MenuItem> = self
			.client
			.put(&format!("/api/menu/{}", item_id), input)
			.await?;
		tracing::info!(item_id = %item_id, "Updated menu item");
		require_data(envelope, "menu item")
	}

	pub async fn delete(&self, item_id: &str) -> Result<(), CoreError> {
		let item_id = require_id("menuItemId", item_id)?;
		let _: ApiEnvelope<serde_json::Value> =
			self.client.delete(&format!("/api/menu/{}", item_id)).await?;
		tracing::info!(item_id = %item_id, "Deleted menu item");
		Ok(())
	}

	/// Flips whether the item can be ordered.
	pub async fn toggle_availability(&self, item_id: &str) -> Result<MenuItem, CoreError> {
		let item_id = require_id("menuItemId", item_id)?;
		let envelope: ApiEnvelope<MenuItem> = self
			.client
			.send(ApiRequest::put(format!("/api/menu/{}/toggle-availability", item_id)))
			.await?;
		require_data(envelope, "menu item")
	}
}

/// Distinct categories in first-seen order.
pub fn categories(items: &[MenuItem]) -> Vec<String> {
	let mut seen: Vec<String> = Vec::new();
	for item in items {
		if !seen.contains(&item.category) {
			seen.push(item.category.clone());
		}
	}
	seen
}

/// Items in `category` (all when `None`) whose name or description contains
/// `query`, ignoring case.
pub fn filter<'a>(items: &'a [MenuItem], category: Option<&str>, query: Option<&str>) -> Vec<&'a MenuItem> {
	let query = query
		.map(|q| q.trim().to_lowercase())
		.filter(|q| !q.is_empty());

	items
		.iter()
		.filter(|item| category.is_none_or(|category| item.category == category))
		.filter(|item| match &query {
			Some(q) => {
				item.name.to_lowercase().contains(q) || item.description.to_lowercase().contains(q)
			}
			None => true,
		})
		.collect()
}
