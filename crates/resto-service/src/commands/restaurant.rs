//! Restaurant profile commands.

use super::{read_json, CommandError, Report, RestaurantCommand};
use resto_core::RestoApp;
use resto_types::{format_amount, Restaurant, RestaurantUpdate};

pub async fn run(app: &RestoApp, command: RestaurantCommand) -> Result<Report, CommandError> {
	let restaurant_id = app.current_restaurant_id().await?;
	match command {
		RestaurantCommand::Show => {
			let restaurant = app.restaurants().get(&restaurant_id).await?;
			Report::new(&restaurant, describe(&restaurant))
		}
		RestaurantCommand::Toggle => {
			let restaurant = app.restaurants().toggle_status(&restaurant_id).await?;
			app.alerts()
				.success(format!("{} is now {}", restaurant.name, restaurant.status));
			Report::new(&restaurant, describe(&restaurant))
		}
		RestaurantCommand::Update { file, cuisine } => {
			let mut update: RestaurantUpdate = read_json(&file).await?;
			if let Some(raw) = cuisine {
				update.cuisine_type = RestaurantUpdate::parse_cuisines(&raw);
			}
			let restaurant = app.restaurants().update(&restaurant_id, &update).await?;
			app.alerts().success("Restaurant details updated");
			Report::new(&restaurant, describe(&restaurant))
		}
	}
}

pub fn describe(restaurant: &Restaurant) -> String {
	let mut lines = vec![
		format!("{} ({})", restaurant.name, restaurant.status),
		restaurant.address.clone(),
	];
	if !restaurant.cuisine_type.is_empty() {
		lines.push(restaurant.cuisine_type.join(", "));
	}
	if let Some(rating) = restaurant.average_rating {
		lines.push(format!(
			"Rating {:.1} ({} reviews)",
			rating,
			restaurant.rating_count.unwrap_or_default()
		));
	}
	if let (Some(minimum), Some(fee)) = (restaurant.minimum_order, restaurant.delivery_fee) {
		lines.push(format!(
			"Minimum order {}, delivery fee {}",
			format_amount(minimum),
			format_amount(fee)
		));
	}
	lines.join("\n")
}
