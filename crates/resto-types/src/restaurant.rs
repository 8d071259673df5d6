//! Restaurant profile and analytics types.

use crate::validation::{require_non_empty, require_non_negative, ValidationError};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Operating status of a restaurant.
///
/// The toggle endpoint only flips between `open` and `closed`; `busy` is set
/// elsewhere and only displayed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestaurantStatus {
	Open,
	Closed,
	Busy,
}

impl RestaurantStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			RestaurantStatus::Open => "open",
			RestaurantStatus::Closed => "closed",
			RestaurantStatus::Busy => "busy",
		}
	}
}

impl fmt::Display for RestaurantStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A restaurant as returned by `/api/restaurants/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
	#[serde(rename = "_id")]
	pub id: String,
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
	#[serde(default)]
	pub address: String,
	#[serde(default)]
	pub cuisine_type: Vec<String>,
	pub status: RestaurantStatus,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub average_rating: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rating_count: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub minimum_order: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub delivery_fee: Option<f64>,
	/// Estimated delivery time in minutes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub delivery_time: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub logo: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cover_image: Option<String>,
}

/// Editable restaurant profile, sent to `PUT /api/restaurants/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantUpdate {
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	pub phone: String,
	pub address: String,
	pub cuisine_type: Vec<String>,
	#[serde(default)]
	pub minimum_order: f64,
	#[serde(default)]
	pub delivery_fee: f64,
	/// Estimated delivery time in minutes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub delivery_time: Option<u32>,
}

impl RestaurantUpdate {
	/// Splits a comma separated cuisine list, dropping blank entries.
	pub fn parse_cuisines(raw: &str) -> Vec<String> {
		raw.split(',')
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.map(str::to_string)
			.collect()
	}

	pub fn validate(&self) -> Result<(), ValidationError> {
		require_non_empty("name", &self.name)?;
		require_non_empty("phone", &self.phone)?;
		require_non_empty("address", &self.address)?;
		if self.cuisine_type.iter().all(|c| c.trim().is_empty()) {
			return Err(ValidationError::MissingField("cuisineType".into()));
		}
		require_non_negative("minimumOrder", self.minimum_order)?;
		require_non_negative("deliveryFee", self.delivery_fee)?;
		if self.delivery_time == Some(0) {
			return Err(ValidationError::invalid("deliveryTime", "must be a positive number"));
		}
		Ok(())
	}
}

/// Reporting window for analytics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnalyticsPeriod {
	Week,
	Month,
	Year,
	/// Rolling thirty days, the backend's default window.
	#[default]
	ThirtyDays,
	/// Any other period string understood by the backend.
	Other(String),
}

impl AnalyticsPeriod {
	pub fn as_str(&self) -> &str {
		match self {
			AnalyticsPeriod::Week => "week",
			AnalyticsPeriod::Month => "month",
			AnalyticsPeriod::Year => "year",
			AnalyticsPeriod::ThirtyDays => "30days",
			AnalyticsPeriod::Other(raw) => raw,
		}
	}
}

impl FromStr for AnalyticsPeriod {
	type Err = Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s {
			"week" => AnalyticsPeriod::Week,
			"month" => AnalyticsPeriod::Month,
			"year" => AnalyticsPeriod::Year,
			"30days" => AnalyticsPeriod::ThirtyDays,
			other => AnalyticsPeriod::Other(other.to_string()),
		})
	}
}

impl fmt::Display for AnalyticsPeriod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Revenue and order count for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
	/// Day as sent by the backend, either `YYYY-MM-DD` or a full timestamp.
	pub date: String,
	#[serde(default)]
	pub revenue: f64,
	#[serde(default)]
	pub order_count: u64,
}

/// A best-selling menu item over the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopItem {
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
	#[serde(default)]
	pub order_count: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub revenue: Option<f64>,
}

/// Analytics for a restaurant over a period.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
	#[serde(default)]
	pub total_revenue: f64,
	#[serde(default)]
	pub total_orders: u64,
	#[serde(default)]
	pub sales_by_day: Vec<DailySales>,
	#[serde(default)]
	pub top_items: Vec<TopItem>,
}
