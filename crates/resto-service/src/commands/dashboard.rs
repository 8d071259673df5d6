//! Dashboard and analytics commands.

use super::orders::order_line;
use super::{CommandError, Report};
use resto_core::{Insights, RestoApp};
use resto_types::{format_amount, AnalyticsPeriod, DailySales};

fn trend_lines(days: &[DailySales]) -> Vec<String> {
	days.iter()
		.map(|day| {
			format!(
				"  {:<10} {:>10}  {} orders",
				day.date.get(..10).unwrap_or(&day.date),
				format_amount(day.revenue),
				day.order_count
			)
		})
		.collect()
}

pub async fn summary(app: &RestoApp) -> Result<Report, CommandError> {
	let restaurant_id = app.current_restaurant_id().await?;
	let summary = app.dashboard().summary(&restaurant_id).await?;

	let mut lines = vec![
		format!("{} ({})", summary.restaurant.name, summary.restaurant.status),
		format!(
			"Revenue {}  Orders {}  Pending {}",
			format_amount(summary.analytics.total_revenue),
			summary.analytics.total_orders,
			summary.pending_orders
		),
	];
	if !summary.revenue_trend.is_empty() {
		lines.push("Revenue trend:".to_string());
		lines.extend(trend_lines(&summary.revenue_trend));
	}
	if summary.recent_orders.is_empty() {
		lines.push("No recent orders".to_string());
	} else {
		lines.push("Recent orders:".to_string());
		lines.extend(summary.recent_orders.iter().map(order_line));
	}

	Report::new(&summary, lines.join("\n"))
}

pub async fn analytics(app: &RestoApp, period: &str) -> Result<Report, CommandError> {
	let period: AnalyticsPeriod = period.parse().unwrap_or_default();
	let restaurant_id = app.current_restaurant_id().await?;
	let analytics = app.restaurants().analytics(&restaurant_id, &period).await?;
	let insights = Insights::from_analytics(&analytics);

	let mut lines = vec![
		format!(
			"Period {}: revenue {}, {} orders",
			period,
			format_amount(analytics.total_revenue),
			analytics.total_orders
		),
		format!("Average order value {}", format_amount(insights.average_order_value)),
	];
	if let Some(category) = &insights.best_selling_category {
		lines.push(format!("Best-selling category {}", category));
	}
	if let Some(day) = &insights.most_active_day {
		lines.push(format!("Most active day {} ({} orders)", day.date, day.order_count));
	}
	if !analytics.top_items.is_empty() {
		lines.push("Top items:".to_string());
		for item in &analytics.top_items {
			lines.push(format!("  {:<24} {} orders", item.name, item.order_count));
		}
	}
	if !insights.recent_revenue.is_empty() {
		lines.push("Last 7 days:".to_string());
		lines.extend(trend_lines(&insights.recent_revenue));
	}

	Report::new(
		&serde_json::json!({ "analytics": analytics, "insights": insights }),
		lines.join("\n"),
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::commands::test_support::logged_in_app;
	use serde_json::json;

	#[tokio::test]
	async fn test_summary_text() {
		let (app, transport) = logged_in_app().await;
		transport
			.respond(200, json!({ "success": true, "data": { "_id": "rest01", "name": "Lotus Kitchen", "status": "open" } }))
			.respond(200, json!({ "success": true, "data": { "totalRevenue": 310.0, "totalOrders": 12 } }))
			.respond(200, json!({ "success": true, "data": [
				{ "_id": "ord000111", "status": "pending", "total": 20.0 },
				{ "_id": "ord000222", "status": "delivered", "total": 15.0 }
			] }));

		let report = summary(&app).await.unwrap();
		assert!(report.text.starts_with("Lotus Kitchen (open)\nRevenue $310.00  Orders 12  Pending 1"));
		assert!(report.text.contains("Recent orders:\n#000111"));
		assert_eq!(report.json["pendingOrders"], 1);
	}

	#[tokio::test]
	async fn test_analytics_insights() {
		let (app, transport) = logged_in_app().await;
		transport.respond(
			200,
			json!({ "success": true, "data": {
				"totalRevenue": 300.0,
				"totalOrders": 12,
				"salesByDay": [
					{ "date": "2024-05-01T00:00:00.000Z", "revenue": 100.0, "orderCount": 3 },
					{ "date": "2024-05-02", "revenue": 200.0, "orderCount": 9 }
				],
				"topItems": [{ "name": "Green Curry", "category": "Mains", "orderCount": 7 }]
			} }),
		);

		let report = analytics(&app, "week").await.unwrap();
		assert!(report.text.starts_with("Period week: revenue $300.00, 12 orders"));
		assert!(report.text.contains("Average order value $25.00"));
		assert!(report.text.contains("Best-selling category Mains"));
		assert!(report.text.contains("Most active day 2024-05-02 (9 orders)"));
		assert!(report.text.contains("  2024-05-01    $100.00  3 orders"));
		assert_eq!(
			transport.requests()[0].query,
			vec![("period".to_string(), "week".to_string())]
		);
	}
}
