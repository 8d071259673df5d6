//! Order status rules used by the services and the command line.

pub mod order;

pub use order::{
	classify, is_cancellable, next_status, progress, status_label, OrderProgress, ProgressStep,
	StatusClass,
};
