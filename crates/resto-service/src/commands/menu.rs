//! Menu commands.

use super::{read_json, CommandError, MenuCommand, Report};
use resto_core::services::menu::{categories, filter};
use resto_core::RestoApp;
use resto_types::{format_amount, short_id, MenuItem, MenuItemInput};

pub async fn run(app: &RestoApp, command: MenuCommand) -> Result<Report, CommandError> {
	match command {
		MenuCommand::List { category, search } => {
			list(app, category.as_deref(), search.as_deref()).await
		}
		MenuCommand::Show { id } => {
			let item = app.menu().get(&id).await?;
			Report::new(&item, item_line(&item))
		}
		MenuCommand::Create { file } => {
			let mut input: MenuItemInput = read_json(&file).await?;
			if input.restaurant.is_none() {
				input.restaurant = Some(app.current_restaurant_id().await?);
			}
			let item = app.menu().create(&input).await?;
			app.alerts().success(format!("Added {} to the menu", item.name));
			Report::new(&item, item_line(&item))
		}
		MenuCommand::Update { id, file } => {
			let input: MenuItemInput = read_json(&file).await?;
			let item = app.menu().update(&id, &input).await?;
			app.alerts().success(format!("Updated {}", item.name));
			Report::new(&item, item_line(&item))
		}
		MenuCommand::Delete { id } => {
			app.menu().delete(&id).await?;
			Ok(Report::message(format!("Deleted menu item {}", short_id(&id))))
		}
		MenuCommand::Toggle { id } => {
			let item = app.menu().toggle_availability(&id).await?;
			let state = if item.available { "available" } else { "unavailable" };
			app.alerts().success(format!("{} is now {}", item.name, state));
			Report::new(&item, item_line(&item))
		}
	}
}

fn item_line(item: &MenuItem) -> String {
	let mut line = format!(
		"{:<24} {:<14} {:>8}  {} min",
		item.name,
		item.category,
		format_amount(item.price),
		item.preparation_time
	);
	if !item.available {
		line.push_str("  (unavailable)");
	}
	line
}

async fn list(
	app: &RestoApp,
	category: Option<&str>,
	search: Option<&str>,
) -> Result<Report, CommandError> {
	let restaurant_id = app.current_restaurant_id().await?;
	let items = app.menu().list(&restaurant_id).await?;
	let shown = filter(&items, category, search);

	let mut lines = vec![format!("Categories: {}", categories(&items).join(", "))];
	if shown.is_empty() {
		lines.push("No menu items".to_string());
	}
	lines.extend(shown.iter().map(|item| item_line(item)));

	Report::new(&shown, lines.join("\n"))
}
