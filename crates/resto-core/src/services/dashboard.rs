//! Dashboard overview.

use super::insights::recent_revenue;
use super::{OrderService, RestaurantService};
use crate::CoreError;
use resto_types::{Analytics, AnalyticsPeriod, DailySales, Order, OrderStatus, Restaurant};
use serde::Serialize;

/// Number of orders listed on the dashboard.
pub const RECENT_ORDERS: usize = 5;

/// Everything the dashboard shows, fetched in one go.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
	pub restaurant: Restaurant,
	pub analytics: Analytics,
	pub recent_orders: Vec<Order>,
	pub pending_orders: usize,
	pub revenue_trend: Vec<DailySales>,
}

/// Loads the dashboard overview.
#[derive(Clone)]
pub struct DashboardService {
	restaurants: RestaurantService,
	orders: OrderService,
}

impl DashboardService {
	pub fn new(restaurants: RestaurantService, orders: OrderService) -> Self {
		Self {
			restaurants,
			orders,
		}
	}

	/// Fetches the restaurant, its default-period analytics and its orders.
	///
	/// Orders are listed in the order the backend returns them; the pending
	/// count covers all of them, not just the recent ones.
	pub async fn summary(&self, restaurant_id: &str) -> Result<DashboardSummary, CoreError> {
		let restaurant = self.restaurants.get(restaurant_id).await?;
		let analytics = self
			.restaurants
			.analytics(&restaurant.id, &AnalyticsPeriod::default())
			.await?;
		let orders = self.orders.list(None).await?;

		let pending_orders = orders
			.iter()
			.filter(|order| order.status == OrderStatus::Pending)
			.count();
		let revenue_trend = recent_revenue(&analytics).to_vec();
		let recent_orders = orders.into_iter().take(RECENT_ORDERS).collect();

		tracing::debug!(restaurant_id = %restaurant.id, pending_orders, "Loaded dashboard");

		Ok(DashboardSummary {
			restaurant,
			analytics,
			recent_orders,
			pending_orders,
			revenue_trend,
		})
	}
}
