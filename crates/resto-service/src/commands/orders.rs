//! Order commands.

use super::{CommandError, OrdersCommand, Report};
use resto_core::state::{classify, progress, status_label, OrderProgress};
use resto_core::RestoApp;
use resto_types::{format_amount, short_id, Order, OrderStatus};

pub async fn run(app: &RestoApp, command: OrdersCommand) -> Result<Report, CommandError> {
	match command {
		OrdersCommand::List { status } => list(app, status.map(OrderStatus::from)).await,
		OrdersCommand::Show { id } => show(app, &id).await,
		OrdersCommand::Advance { id } => {
			let order = app.orders().advance(&id).await?;
			updated(app, order)
		}
		OrdersCommand::Cancel { id, note } => {
			let order = app.orders().cancel(&id, &note).await?;
			updated(app, order)
		}
		OrdersCommand::SetStatus { id, status, note } => {
			let order = app
				.orders()
				.update_status(&id, OrderStatus::from(status), &note)
				.await?;
			updated(app, order)
		}
	}
}

/// One line per order: id, status, total, item count and customer.
pub fn order_line(order: &Order) -> String {
	format!(
		"#{:<8} {:<18} {:>9}  {} items  {}",
		short_id(&order.id),
		status_label(&order.status),
		format_amount(order.total),
		order.item_count(),
		order.user.name
	)
}

async fn list(app: &RestoApp, status: Option<OrderStatus>) -> Result<Report, CommandError> {
	let orders = app.orders().list(status.as_ref()).await?;
	let text = if orders.is_empty() {
		"No orders".to_string()
	} else {
		orders.iter().map(order_line).collect::<Vec<_>>().join("\n")
	};
	Report::new(&orders, text)
}

async fn show(app: &RestoApp, id: &str) -> Result<Report, CommandError> {
	let order = app.orders().get(id).await?;
	let progress = progress(&order);

	let mut lines = vec![order_line(&order)];
	for item in &order.items {
		lines.push(format!(
			"  {} x {}  {}",
			item.quantity,
			item.name,
			format_amount(item.subtotal)
		));
	}
	match &progress {
		OrderProgress::Cancelled => lines.push("Order cancelled".to_string()),
		OrderProgress::Steps { steps } => {
			let rendered: Vec<String> = steps
				.iter()
				.map(|step| {
					let mark = if step.active { "x" } else { " " };
					format!("[{}] {}", mark, step.label)
				})
				.collect();
			lines.push(rendered.join("  "));
		}
	}

	Report::new(
		&serde_json::json!({
			"order": order,
			"class": classify(&order.status),
			"progress": progress
		}),
		lines.join("\n"),
	)
}

fn updated(app: &RestoApp, order: Order) -> Result<Report, CommandError> {
	app.alerts().success(format!(
		"Order #{} is now {}",
		short_id(&order.id),
		status_label(&order.status)
	));
	let text = order_line(&order);
	Report::new(&order, text)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::commands::test_support::logged_in_app;
	use resto_core::CoreError;
	use serde_json::json;

	fn order(id: &str, status: &str) -> serde_json::Value {
		json!({
			"_id": id,
			"status": status,
			"total": 24.5,
			"items": [{ "name": "Green Curry", "quantity": 2, "subtotal": 24.5 }],
			"user": { "name": "Alex" }
		})
	}

	#[tokio::test]
	async fn test_list_filters_by_status() {
		let (app, transport) = logged_in_app().await;
		transport.respond(200, json!({ "success": true, "count": 1, "data": [order("ord000111", "pending")] }));

		let report = run(&app, OrdersCommand::List { status: Some("pending".into()) })
			.await
			.unwrap();
		assert!(report.text.starts_with("#000111"));
		assert!(report.text.contains("PENDING"));
		assert!(report.text.contains("$24.50"));
		assert!(report.text.contains("2 items  Alex"));
		assert_eq!(
			transport.requests()[0].query,
			vec![("status".to_string(), "pending".to_string())]
		);
	}

	#[tokio::test]
	async fn test_show_renders_progress() {
		let (app, transport) = logged_in_app().await;
		transport.respond(200, json!({ "success": true, "data": order("ord000111", "preparing") }));

		let report = run(&app, OrdersCommand::Show { id: "ord000111".into() })
			.await
			.unwrap();
		assert!(report.text.contains("  2 x Green Curry  $24.50"));
		assert!(report.text.contains("[x] Preparing"));
		assert!(report.text.contains("[ ] Ready"));
		assert_eq!(report.json["progress"]["kind"], "steps");
		assert_eq!(report.json["class"], "in_progress");
	}

	#[tokio::test]
	async fn test_show_classifies_finished_and_unknown_orders() {
		let (app, transport) = logged_in_app().await;
		transport
			.respond(200, json!({ "success": true, "data": order("ord000111", "cancelled") }))
			.respond(200, json!({ "success": true, "data": order("ord000222", "refunded") }));

		let report = run(&app, OrdersCommand::Show { id: "ord000111".into() })
			.await
			.unwrap();
		assert_eq!(report.json["class"], "terminal_failure");
		assert!(report.text.contains("Order cancelled"));

		let report = run(&app, OrdersCommand::Show { id: "ord000222".into() })
			.await
			.unwrap();
		assert_eq!(report.json["class"], "other");
		assert!(report.text.contains("REFUNDED"));
	}

	#[test]
	fn test_order_line_spells_out_status() {
		let order: Order = serde_json::from_value(order("ord000333", "ready_for_pickup")).unwrap();
		assert!(order_line(&order).contains("READY FOR PICKUP"));
	}

	#[tokio::test]
	async fn test_advance_shows_success_alert() {
		let (app, transport) = logged_in_app().await;
		transport
			.respond(200, json!({ "success": true, "data": order("ord000111", "pending") }))
			.respond(200, json!({ "success": true, "data": order("ord000111", "accepted") }));

		let report = run(&app, OrdersCommand::Advance { id: "ord000111".into() })
			.await
			.unwrap();
		assert!(report.text.contains("ACCEPTED"));
		let alert = app.alerts().current();
		assert!(alert.visible);
		assert_eq!(alert.message, "Order #000111 is now ACCEPTED");
	}

	#[tokio::test]
	async fn test_cancel_refused_after_acceptance() {
		let (app, transport) = logged_in_app().await;
		transport.respond(200, json!({ "success": true, "data": order("ord000111", "accepted") }));

		let err = run(
			&app,
			OrdersCommand::Cancel {
				id: "ord000111".into(),
				note: String::new(),
			},
		)
		.await
		.unwrap_err();
		assert!(matches!(err, CommandError::Core(CoreError::InvalidTransition(_))));
		assert!(!app.alerts().current().visible);
	}
}
