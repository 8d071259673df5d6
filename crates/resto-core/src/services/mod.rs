//! Domain services, one per backend resource.

pub mod auth;
pub mod dashboard;
pub mod insights;
pub mod menu;
pub mod orders;
pub mod restaurant;

pub use auth::AuthService;
pub use dashboard::{DashboardService, DashboardSummary};
pub use insights::Insights;
pub use menu::MenuService;
pub use orders::OrderService;
pub use restaurant::RestaurantService;

use crate::CoreError;
use resto_types::ApiEnvelope;

/// Unwraps the payload of an envelope, failing if the backend sent none.
pub(crate) fn require_data<T>(envelope: ApiEnvelope<T>, what: &str) -> Result<T, CoreError> {
	envelope
		.into_data()
		.ok_or_else(|| CoreError::InvalidResponse(format!("missing {} in response", what)))
}

/// Trims `id` and fails with a validation error unless it is a single,
/// non-blank URL path segment.
pub(crate) fn require_id<'a>(field: &str, id: &'a str) -> Result<&'a str, CoreError> {
	resto_types::require_path_segment(field, id)?;
	Ok(id.trim())
}
