//! Application-wide state read by every screen.

pub mod alert;
pub mod theme;

pub use alert::{Alert, AlertCenter, AlertKind};
pub use theme::{Palette, ThemeState};
