//! Menu item types.

use crate::validation::{require_non_empty, require_positive, ValidationError};
use serde::{Deserialize, Serialize};

/// A menu item as returned by `/api/menu`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
	#[serde(rename = "_id")]
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub description: String,
	pub price: f64,
	#[serde(default)]
	pub category: String,
	/// Preparation time in minutes.
	#[serde(default)]
	pub preparation_time: u32,
	#[serde(default)]
	pub is_veg: bool,
	#[serde(default)]
	pub is_vegan: bool,
	#[serde(default)]
	pub is_gluten_free: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
	#[serde(default = "default_true")]
	pub available: bool,
	#[serde(default)]
	pub featured: bool,
	/// Owning restaurant id.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub restaurant: Option<String>,
}

fn default_true() -> bool {
	true
}

/// Payload for creating or fully replacing a menu item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemInput {
	pub name: String,
	pub description: String,
	pub price: f64,
	pub category: String,
	pub preparation_time: u32,
	#[serde(default)]
	pub is_veg: bool,
	#[serde(default)]
	pub is_vegan: bool,
	#[serde(default)]
	pub is_gluten_free: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
	#[serde(default = "default_true")]
	pub available: bool,
	#[serde(default)]
	pub featured: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub restaurant: Option<String>,
}

impl MenuItemInput {
	/// Checks the payload before it is sent.
	///
	/// Name, description and category are required; price and preparation
	/// time must be positive.
	pub fn validate(&self) -> Result<(), ValidationError> {
		require_non_empty("name", &self.name)?;
		require_non_empty("description", &self.description)?;
		require_positive("price", self.price)?;
		require_non_empty("category", &self.category)?;
		if self.preparation_time == 0 {
			return Err(ValidationError::invalid(
				"preparationTime",
				"must be a positive number",
			));
		}
		Ok(())
	}
}

impl From<MenuItem> for MenuItemInput {
	fn from(item: MenuItem) -> Self {
		Self {
			name: item.name,
			description: item.description,
			price: item.price,
			category: item.category,
			preparation_time: item.preparation_time,
			is_veg: item.is_veg,
			is_vegan: item.is_vegan,
			is_gluten_free: item.is_gluten_free,
			image: item.image,
			available: item.available,
			featured: item.featured,
			restaurant: item.restaurant,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn input() -> MenuItemInput {
		MenuItemInput {
			name: "Pad Thai".into(),
			description: "Rice noodles, tamarind, peanuts".into(),
			price: 12.0,
			category: "Mains".into(),
			preparation_time: 15,
			is_veg: false,
			is_vegan: false,
			is_gluten_free: true,
			image: None,
			available: true,
			featured: false,
			restaurant: Some("r1".into()),
		}
	}

	#[test]
	fn test_valid_input() {
		assert!(input().validate().is_ok());
	}

	#[test]
	fn test_invalid_inputs() {
		let mut bad = input();
		bad.price = 0.0;
		assert!(matches!(bad.validate(), Err(ValidationError::InvalidValue { field, .. }) if field == "price"));

		let mut bad = input();
		bad.preparation_time = 0;
		assert!(matches!(bad.validate(), Err(ValidationError::InvalidValue { field, .. }) if field == "preparationTime"));

		let mut bad = input();
		bad.category = String::new();
		assert_eq!(bad.validate(), Err(ValidationError::MissingField("category".into())));
	}

	#[test]
	fn test_input_serializes_camel_case() {
		let value = serde_json::to_value(input()).unwrap();
		assert_eq!(value["preparationTime"], json!(15));
		assert_eq!(value["isGlutenFree"], json!(true));
		assert!(value.get("image").is_none());
	}

	#[test]
	fn test_menu_item_defaults() {
		let item: MenuItem = serde_json::from_value(json!({
			"_id": "m1",
			"name": "Soup",
			"price": 4.0
		}))
		.unwrap();
		assert!(item.available);
		assert!(!item.featured);
		assert_eq!(MenuItemInput::from(item).name, "Soup");
	}
}
