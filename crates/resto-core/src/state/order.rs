//! Order status model.
//!
//! The restaurant drives an order through a fixed sequence:
//! pending -> accepted -> preparing -> ready_for_pickup. Riders and the
//! backend take it from there (assigned_to_rider -> picked_up -> on_the_way
//! -> delivered). Cancellation is a terminal side branch reachable only
//! while the order is still pending.

use chrono::{DateTime, Utc};
use resto_types::{Order, OrderStatus};
use serde::Serialize;

/// Statuses the restaurant advances through, in order.
const RESTAURANT_FLOW: [OrderStatus; 4] = [
	OrderStatus::Pending,
	OrderStatus::Accepted,
	OrderStatus::Preparing,
	OrderStatus::ReadyForPickup,
];

/// Steps shown by the progress display.
const PROGRESS_STEPS: [(OrderStatus, &str); 5] = [
	(OrderStatus::Pending, "Pending"),
	(OrderStatus::Accepted, "Accepted"),
	(OrderStatus::Preparing, "Preparing"),
	(OrderStatus::ReadyForPickup, "Ready for Pickup"),
	(OrderStatus::Delivered, "Delivered"),
];

/// Status the restaurant may move `current` to, if any.
///
/// Returns `None` for `ready_for_pickup` (the rider takes over), for every
/// status after it, for `cancelled` and for unknown statuses.
pub fn next_status(current: &OrderStatus) -> Option<OrderStatus> {
	let index = RESTAURANT_FLOW.iter().position(|s| s == current)?;
	RESTAURANT_FLOW.get(index + 1).cloned()
}

/// Whether the restaurant may still cancel an order in `current`.
pub fn is_cancellable(current: &OrderStatus) -> bool {
	*current == OrderStatus::Pending
}

/// Display class of a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
	/// Waiting for the restaurant.
	PendingLike,
	/// Being prepared or delivered.
	InProgress,
	TerminalSuccess,
	TerminalFailure,
	/// Anything the client does not recognise.
	Other,
}

pub fn classify(status: &OrderStatus) -> StatusClass {
	match status {
		OrderStatus::Pending => StatusClass::PendingLike,
		OrderStatus::Accepted
		| OrderStatus::Preparing
		| OrderStatus::ReadyForPickup
		| OrderStatus::AssignedToRider
		| OrderStatus::PickedUp
		| OrderStatus::OnTheWay => StatusClass::InProgress,
		OrderStatus::Delivered => StatusClass::TerminalSuccess,
		OrderStatus::Cancelled => StatusClass::TerminalFailure,
		OrderStatus::Unknown(_) => StatusClass::Other,
	}
}

/// Upper-case status label, e.g. `READY FOR PICKUP`.
pub fn status_label(status: &OrderStatus) -> String {
	status.label()
}

/// One step of the progress display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressStep {
	pub status: OrderStatus,
	pub label: &'static str,
	/// Whether the order has reached this step.
	pub active: bool,
	/// When the order first entered this step, from its status history.
	pub reached_at: Option<DateTime<Utc>>,
}

/// Progress of an order as shown on the order detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderProgress {
	Steps { steps: Vec<ProgressStep> },
	Cancelled,
}

/// Builds the progress display for `order`.
///
/// A step is active once the current status is at or past it. Rider
/// statuses are not part of the display, so an order that is on its way
/// shows no active step.
pub fn progress(order: &Order) -> OrderProgress {
	if order.status == OrderStatus::Cancelled {
		return OrderProgress::Cancelled;
	}

	let current = PROGRESS_STEPS
		.iter()
		.position(|(status, _)| *status == order.status);

	let steps = PROGRESS_STEPS
		.iter()
		.enumerate()
		.map(|(index, (status, label))| ProgressStep {
			status: status.clone(),
			label: *label,
			active: current.is_some_and(|current| current >= index),
			reached_at: order.entered_at(status),
		})
		.collect();

	OrderProgress::Steps { steps }
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn order(status: &str) -> Order {
		serde_json::from_value(json!({
			"_id": "o1",
			"status": status,
			"statusHistory": [
				{ "status": "pending", "time": "2024-05-01T12:00:00Z" },
				{ "status": "accepted", "time": "2024-05-01T12:05:00Z" },
				{ "status": "accepted", "time": "2024-05-01T12:09:00Z" }
			]
		}))
		.unwrap()
	}

	#[test]
	fn test_next_status_follows_restaurant_flow() {
		assert_eq!(next_status(&OrderStatus::Pending), Some(OrderStatus::Accepted));
		assert_eq!(next_status(&OrderStatus::Accepted), Some(OrderStatus::Preparing));
		assert_eq!(
			next_status(&OrderStatus::Preparing),
			Some(OrderStatus::ReadyForPickup)
		);
	}

	#[test]
	fn test_next_status_has_no_successor_outside_flow() {
		for status in [
			OrderStatus::ReadyForPickup,
			OrderStatus::AssignedToRider,
			OrderStatus::PickedUp,
			OrderStatus::OnTheWay,
			OrderStatus::Delivered,
			OrderStatus::Cancelled,
			OrderStatus::Unknown("refunded".into()),
		] {
			assert_eq!(next_status(&status), None, "{}", status);
		}
	}

	#[test]
	fn test_only_pending_is_cancellable() {
		for status in OrderStatus::KNOWN {
			assert_eq!(is_cancellable(&status), status == OrderStatus::Pending);
		}
		assert!(!is_cancellable(&OrderStatus::Unknown("pending ".into())));
	}

	#[test]
	fn test_classify() {
		assert_eq!(classify(&OrderStatus::Pending), StatusClass::PendingLike);
		assert_eq!(classify(&OrderStatus::OnTheWay), StatusClass::InProgress);
		assert_eq!(classify(&OrderStatus::AssignedToRider), StatusClass::InProgress);
		assert_eq!(classify(&OrderStatus::Delivered), StatusClass::TerminalSuccess);
		assert_eq!(classify(&OrderStatus::Cancelled), StatusClass::TerminalFailure);
		assert_eq!(classify(&OrderStatus::from("refunded")), StatusClass::Other);
	}

	#[test]
	fn test_progress_marks_reached_steps() {
		let OrderProgress::Steps { steps } = progress(&order("accepted")) else {
			panic!("expected steps");
		};
		assert_eq!(steps.len(), 5);
		let active: Vec<bool> = steps.iter().map(|s| s.active).collect();
		assert_eq!(active, vec![true, true, false, false, false]);

		// First history entry wins.
		assert_eq!(
			steps[1].reached_at.map(|t| t.to_rfc3339()),
			Some("2024-05-01T12:05:00+00:00".to_string())
		);
		assert!(steps[2].reached_at.is_none());
		assert_eq!(steps[3].label, "Ready for Pickup");
	}

	#[test]
	fn test_progress_for_delivered_and_rider_statuses() {
		let OrderProgress::Steps { steps } = progress(&order("delivered")) else {
			panic!("expected steps");
		};
		assert!(steps.iter().all(|s| s.active));

		let OrderProgress::Steps { steps } = progress(&order("on_the_way")) else {
			panic!("expected steps");
		};
		assert!(steps.iter().all(|s| !s.active));
	}

	#[test]
	fn test_cancelled_order_renders_marker() {
		assert_eq!(progress(&order("cancelled")), OrderProgress::Cancelled);
	}
}
