//! Transient alert banner.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Severity of an alert, which selects its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
	#[default]
	Success,
	Error,
	Info,
	Warning,
}

impl AlertKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			AlertKind::Success => "success",
			AlertKind::Error => "error",
			AlertKind::Info => "info",
			AlertKind::Warning => "warning",
		}
	}
}

impl fmt::Display for AlertKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// What the banner currently shows.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Alert {
	pub visible: bool,
	pub kind: AlertKind,
	pub message: String,
}

/// Owner of the alert banner.
///
/// Each [`show`](Self::show) starts a dismiss timer tagged with a generation
/// number; a timer only hides the banner if no newer alert was shown since.
/// Clones share the same banner.
#[derive(Clone)]
pub struct AlertCenter {
	state: Arc<watch::Sender<Alert>>,
	generation: Arc<AtomicU64>,
	dismiss_after: Duration,
}

impl AlertCenter {
	pub fn new(dismiss_after: Duration) -> Self {
		let (state, _) = watch::channel(Alert::default());
		Self {
			state: Arc::new(state),
			generation: Arc::new(AtomicU64::new(0)),
			dismiss_after,
		}
	}

	/// Shows `message` and schedules its dismissal.
	///
	/// Outside a tokio runtime the alert stays until [`hide`](Self::hide).
	pub fn show(&self, kind: AlertKind, message: impl Into<String>) {
		let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
		let message = message.into();
		tracing::debug!(kind = %kind, "Showing alert");
		self.state.send_replace(Alert {
			visible: true,
			kind,
			message,
		});

		let Ok(handle) = tokio::runtime::Handle::try_current() else {
			tracing::debug!("No runtime available, alert will not auto-dismiss");
			return;
		};
		let state = self.state.clone();
		let current = self.generation.clone();
		let delay = self.dismiss_after;
		handle.spawn(async move {
			tokio::time::sleep(delay).await;
			if current.load(Ordering::SeqCst) == generation {
				state.send_modify(|alert| alert.visible = false);
			}
		});
	}

	pub fn success(&self, message: impl Into<String>) {
		self.show(AlertKind::Success, message);
	}

	pub fn error(&self, message: impl Into<String>) {
		self.show(AlertKind::Error, message);
	}

	/// Hides the banner, keeping its last kind and message.
	pub fn hide(&self) {
		self.generation.fetch_add(1, Ordering::SeqCst);
		self.state.send_modify(|alert| alert.visible = false);
	}

	pub fn current(&self) -> Alert {
		self.state.borrow().clone()
	}

	/// Receiver notified on every change of the banner.
	pub fn subscribe(&self) -> watch::Receiver<Alert> {
		self.state.subscribe()
	}

	pub fn dismiss_after(&self) -> Duration {
		self.dismiss_after
	}
}

impl Default for AlertCenter {
	fn default() -> Self {
		Self::new(Duration::from_secs(3))
	}
}
