//! Order types for the restaurant client.
//!
//! Orders are owned by the backend; the client only reads them and asks for
//! status changes. The status history is append-only on the server side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an order.
///
/// The backend may add statuses this client does not know about; those are
/// kept verbatim in [`OrderStatus::Unknown`] instead of failing to decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
	Pending,
	Accepted,
	Preparing,
	ReadyForPickup,
	AssignedToRider,
	PickedUp,
	OnTheWay,
	Delivered,
	Cancelled,
	/// Any status string not listed above.
	Unknown(String),
}

impl OrderStatus {
	/// Every known status, in happy-path order followed by the side branch.
	pub const KNOWN: [OrderStatus; 9] = [
		OrderStatus::Pending,
		OrderStatus::Accepted,
		OrderStatus::Preparing,
		OrderStatus::ReadyForPickup,
		OrderStatus::AssignedToRider,
		OrderStatus::PickedUp,
		OrderStatus::OnTheWay,
		OrderStatus::Delivered,
		OrderStatus::Cancelled,
	];

	/// Returns the wire representation of the status.
	pub fn as_str(&self) -> &str {
		match self {
			OrderStatus::Pending => "pending",
			OrderStatus::Accepted => "accepted",
			OrderStatus::Preparing => "preparing",
			OrderStatus::ReadyForPickup => "ready_for_pickup",
			OrderStatus::AssignedToRider => "assigned_to_rider",
			OrderStatus::PickedUp => "picked_up",
			OrderStatus::OnTheWay => "on_the_way",
			OrderStatus::Delivered => "delivered",
			OrderStatus::Cancelled => "cancelled",
			OrderStatus::Unknown(raw) => raw,
		}
	}

	/// Upper-case label with underscores turned into spaces, e.g. `READY FOR PICKUP`.
	pub fn label(&self) -> String {
		self.as_str().replace('_', " ").to_uppercase()
	}
}

impl From<String> for OrderStatus {
	fn from(raw: String) -> Self {
		OrderStatus::KNOWN
			.into_iter()
			.find(|status| status.as_str() == raw)
			.unwrap_or(OrderStatus::Unknown(raw))
	}
}

impl From<&str> for OrderStatus {
	fn from(raw: &str) -> Self {
		OrderStatus::from(raw.to_string())
	}
}

impl From<OrderStatus> for String {
	fn from(status: OrderStatus) -> Self {
		match status {
			OrderStatus::Unknown(raw) => raw,
			known => known.as_str().to_string(),
		}
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One entry of an order's status history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
	pub status: OrderStatus,
	/// When the order entered this status.
	#[serde(default)]
	pub time: Option<DateTime<Utc>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub note: Option<String>,
}

/// An option chosen within a customization group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomizationOption {
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub price: Option<f64>,
}

/// A customization group applied to an ordered item (e.g. "Size: Large").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customization {
	pub name: String,
	#[serde(default)]
	pub options: Vec<CustomizationOption>,
}

/// A line of an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
	/// Menu item reference; the backend sends either an id or a populated object.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub menu_item: Option<serde_json::Value>,
	pub name: String,
	#[serde(default)]
	pub price: f64,
	#[serde(default = "default_quantity")]
	pub quantity: u32,
	#[serde(default)]
	pub subtotal: f64,
	#[serde(default)]
	pub customizations: Vec<Customization>,
}

fn default_quantity() -> u32 {
	1
}

/// Customer details embedded in an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderCustomer {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub email: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
}

/// Where the order is delivered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryAddress {
	#[serde(default)]
	pub address: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub instructions: Option<String>,
}

/// An order as returned by `/api/orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	#[serde(rename = "_id")]
	pub id: String,
	pub status: OrderStatus,
	#[serde(default)]
	pub status_history: Vec<StatusHistoryEntry>,
	#[serde(default)]
	pub items: Vec<OrderItem>,
	#[serde(default)]
	pub subtotal: f64,
	#[serde(default)]
	pub delivery_fee: f64,
	#[serde(default)]
	pub tax: f64,
	#[serde(default)]
	pub discount: f64,
	#[serde(default)]
	pub total: f64,
	#[serde(default)]
	pub user: OrderCustomer,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub delivery_address: Option<DeliveryAddress>,
	#[serde(default)]
	pub payment_method: String,
	#[serde(default)]
	pub payment_status: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<DateTime<Utc>>,
}

impl Order {
	/// Total number of units across all lines, saturating at `u32::MAX`.
	pub fn item_count(&self) -> u32 {
		self.items
			.iter()
			.fold(0u32, |count, item| count.saturating_add(item.quantity))
	}

	/// Time at which the order first entered `status`, if recorded.
	pub fn entered_at(&self, status: &OrderStatus) -> Option<DateTime<Utc>> {
		self.status_history
			.iter()
			.find(|entry| &entry.status == status)
			.and_then(|entry| entry.time)
	}
}

/// Body of `PUT /api/orders/:id/status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdateRequest {
	pub status: OrderStatus,
	pub note: String,
}
