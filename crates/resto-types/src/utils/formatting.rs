//! String formatting utilities.
//!
//! Order ids are long backend object ids; operators only ever see the last
//! six characters, and amounts are always shown with two decimals.

/// Returns the last six characters of an id, as shown in order headers.
pub fn short_id(id: &str) -> &str {
	let start = id
		.char_indices()
		.rev()
		.nth(5)
		.map(|(idx, _)| idx)
		.unwrap_or(0);
	&id[start..]
}

/// Formats a currency amount with two decimals.
pub fn format_amount(amount: f64) -> String {
	format!("${:.2}", amount)
}
