//! Figures derived from an analytics report.

use resto_types::{Analytics, DailySales};
use serde::Serialize;

/// Number of days in the revenue trend.
pub const TREND_DAYS: usize = 7;

/// Summary figures shown next to the analytics charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
	pub average_order_value: f64,
	pub best_selling_category: Option<String>,
	pub most_active_day: Option<DailySales>,
	/// The last [`TREND_DAYS`] entries of the daily sales.
	pub recent_revenue: Vec<DailySales>,
}

impl Insights {
	pub fn from_analytics(analytics: &Analytics) -> Self {
		Self {
			average_order_value: average_order_value(analytics),
			best_selling_category: best_selling_category(analytics),
			most_active_day: most_active_day(analytics).cloned(),
			recent_revenue: recent_revenue(analytics).to_vec(),
		}
	}
}

/// Revenue per order, or 0 when there is no revenue or no orders.
pub fn average_order_value(analytics: &Analytics) -> f64 {
	if analytics.total_orders == 0 || analytics.total_revenue == 0.0 {
		return 0.0;
	}
	analytics.total_revenue / analytics.total_orders as f64
}

/// Category of the top item, if the backend reported one.
pub fn best_selling_category(analytics: &Analytics) -> Option<String> {
	analytics
		.top_items
		.first()
		.and_then(|item| item.category.clone())
		.filter(|category| !category.trim().is_empty())
}

/// Day with the most orders. Ties go to the earliest day.
pub fn most_active_day(analytics: &Analytics) -> Option<&DailySales> {
	analytics
		.sales_by_day
		.iter()
		.reduce(|best, day| if day.order_count > best.order_count { day } else { best })
}

pub fn recent_revenue(analytics: &Analytics) -> &[DailySales] {
	let days = &analytics.sales_by_day;
	&days[days.len().saturating_sub(TREND_DAYS)..]
}
