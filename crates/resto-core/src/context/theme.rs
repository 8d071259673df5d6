//! Light and dark color themes.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};

/// Colors of one theme, as `#RRGGBB` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
	pub primary: &'static str,
	pub background: &'static str,
	pub card: &'static str,
	pub text: &'static str,
	pub border: &'static str,
	pub error: &'static str,
	pub success: &'static str,
	pub warning: &'static str,
	pub info: &'static str,
	pub gray: &'static str,
}

impl Palette {
	pub const LIGHT: Palette = Palette {
		primary: "#FD6A00",
		background: "#FFFFFF",
		card: "#F5F5F5",
		text: "#212121",
		border: "#EEEEEE",
		error: "#DC3545",
		success: "#28A745",
		warning: "#FFC107",
		info: "#17A2B8",
		gray: "#6C757D",
	};

	pub const DARK: Palette = Palette {
		background: "#121212",
		card: "#1E1E1E",
		text: "#F5F5F5",
		border: "#333333",
		error: "#FF6B6B",
		gray: "#888888",
		..Palette::LIGHT
	};
}

/// Dark mode flag shared by the whole application. Starts in light mode.
#[derive(Debug, Default)]
pub struct ThemeState {
	dark: AtomicBool,
}

impl ThemeState {
	pub fn new(dark: bool) -> Self {
		Self {
			dark: AtomicBool::new(dark),
		}
	}

	pub fn is_dark(&self) -> bool {
		self.dark.load(Ordering::Relaxed)
	}

	/// Switches between light and dark, returning whether dark is now on.
	pub fn toggle(&self) -> bool {
		!self.dark.fetch_xor(true, Ordering::Relaxed)
	}

	pub fn palette(&self) -> &'static Palette {
		if self.is_dark() {
			&Palette::DARK
		} else {
			&Palette::LIGHT
		}
	}
}
