use crate::{Handler, PatternError, Request};
use std::sync::Arc;

mod glob;
mod method;
mod mux;
mod path;

pub use glob::GlobRouter;
pub use method::MethodRouter;
pub use mux::ServeMux;
pub use path::PathRouter;

/// The result of resolving a request against a router.
#[derive(Clone, Copy)]
pub struct Match<'a> {
	pub handler: &'a dyn Handler,
	/// The winning pattern, or `None` when nothing matched and `handler` is the
	/// router's not-found fallback.
	pub pattern: Option<&'a str>,
}

impl<'a> Match<'a> {
	pub fn found(handler: &'a dyn Handler, pattern: &'a str) -> Self {
		Self {
			handler,
			pattern: Some(pattern),
		}
	}

	pub fn not_found(handler: &'a dyn Handler) -> Self {
		Self {
			handler,
			pattern: None,
		}
	}

	pub fn is_match(&self) -> bool {
		self.pattern.is_some()
	}
}

/// A handler that picks another handler by pattern.
///
/// Routers can be nested inside each other and used as chain members. In a
/// chain, a router with no matching pattern is skipped unless it is the last
/// handler.
pub trait Router: Handler {
	fn handle(&mut self, pattern: &str, handler: Arc<dyn Handler>) -> Result<(), PatternError>;

	fn resolve(&self, req: &Request) -> Match<'_>;
}
