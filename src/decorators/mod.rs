//! Chain-aware handlers that wrap everything chained after them.

use crate::Handler;
use std::sync::Arc;

mod gzip;
mod log;
mod recovery;

pub use gzip::Gzip;
pub use log::{LogFields, LogHandler};
pub use recovery::PanicRecovery;

/// Panic recovery, access logging and gzip, in that order. Prepend these to a
/// chain to cover every handler after them.
pub fn standard() -> Vec<Arc<dyn Handler>> {
	vec![
		Arc::new(PanicRecovery::default()) as Arc<dyn Handler>,
		Arc::new(LogHandler::default()) as Arc<dyn Handler>,
		Arc::new(Gzip::default()) as Arc<dyn Handler>,
	]
}
