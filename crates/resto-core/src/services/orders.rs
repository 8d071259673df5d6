//! Order listing and status changes.

use super::{require_data, require_id};
use crate::state::{is_cancellable, next_status};
use crate::CoreError;
use resto_client::{ApiClient, ApiRequest};
use resto_types::{short_id, ApiEnvelope, Order, OrderStatus, StatusUpdateRequest};
use std::sync::Arc;

/// Calls under `/api/orders`.
#[derive(Clone)]
pub struct OrderService {
	client: Arc<ApiClient>,
}

impl OrderService {
	pub fn new(client: Arc<ApiClient>) -> Self {
		Self { client }
	}

	/// Lists the restaurant's orders, optionally only those in `status`.
	pub async fn list(&self, status: Option<&OrderStatus>) -> Result<Vec<Order>, CoreError> {
		let mut request = ApiRequest::get("/api/orders");
		if let Some(status) = status {
			request = request.query("status", status.as_str());
		}
		let envelope: ApiEnvelope<Vec<Order>> = self.client.send(request).await?;
		Ok(envelope.into_data().unwrap_or_default())
	}

	pub async fn get(&self, order_id: &str) -> Result<Order, CoreError> {
		let order_id = require_id("orderId", order_id)?;
		let envelope: ApiEnvelope<Order> = self.client.get(&format!("/api/orders/{}", order_id)).await?;
		require_data(envelope, "order")
	}

	/// Sets the status of an order. No transition rules are applied here.
	pub async fn update_status(
		&self,
		order_id: &str,
		status: OrderStatus,
		note: &str,
	) -> Result<Order, CoreError> {
		let order_id = require_id("orderId", order_id)?;
		let body = StatusUpdateRequest {
			status: status.clone(),
			note: note.to_string(),
		};
		let envelope: ApiEnvelope<Order> = self
			.client
			.put(&format!("/api/orders/{}/status", order_id), &body)
			.await?;
		tracing::info!(order_id = %short_id(order_id), status = %status, "Updated order status");
		require_data(envelope, "order")
	}

	/// Moves the order to the next status of the restaurant flow.
	pub async fn advance(&self, order_id: &str) -> Result<Order, CoreError> {
		let order = self.get(order_id).await?;
		let next = next_status(&order.status).ok_or_else(|| {
			CoreError::InvalidTransition(format!(
				"order #{} is {} and cannot be advanced",
				short_id(&order.id),
				order.status
			))
		})?;
		self.update_status(order_id, next, "").await
	}

	/// Cancels an order that is still pending.
	pub async fn cancel(&self, order_id: &str, note: &str) -> Result<Order, CoreError> {
		let order = self.get(order_id).await?;
		if !is_cancellable(&order.status) {
			return Err(CoreError::InvalidTransition(format!(
				"order #{} is {} and can no longer be cancelled",
				short_id(&order.id),
				order.status
			)));
		}
		self.update_status(order_id, OrderStatus::Cancelled, note).await
	}
}
