use super::{Match, Router};
use crate::{Handler, NotFound, PatternError, Request, ResponseWriter};
use std::{collections::HashMap, sync::Arc};

/// A plain path router.
///
/// Patterns ending in `/` name a subtree and match every path beneath them;
/// any other pattern matches only that exact path. The longest matching
/// pattern wins, so `/` acts as a catch-all.
pub struct ServeMux {
	exact: HashMap<String, Arc<dyn Handler>>,
	// Kept sorted longest first.
	subtrees: Vec<(String, Arc<dyn Handler>)>,
	not_found: Arc<dyn Handler>,
}

impl Default for ServeMux {
	fn default() -> Self {
		Self {
			exact: HashMap::new(),
			subtrees: Vec::new(),
			not_found: Arc::new(NotFound),
		}
	}
}

impl ServeMux {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_not_found(mut self, handler: Arc<dyn Handler>) -> Self {
		self.not_found = handler;
		self
	}

	pub fn register(&mut self, pattern: &str, handler: Arc<dyn Handler>) -> Result<&mut Self, PatternError> {
		if pattern.is_empty() {
			return Err(PatternError::Empty);
		}
		if self.exact.contains_key(pattern) || self.subtrees.iter().any(|(p, _)| p == pattern) {
			return Err(PatternError::Duplicate(pattern.to_owned()));
		}

		if pattern.ends_with('/') {
			let at = self
				.subtrees
				.iter()
				.position(|(p, _)| p.len() < pattern.len())
				.unwrap_or(self.subtrees.len());
			self.subtrees.insert(at, (pattern.to_owned(), handler));
		} else {
			self.exact.insert(pattern.to_owned(), handler);
		}
		tracing::debug!(pattern, "registered route");
		Ok(self)
	}

	pub fn lookup(&self, path: &str) -> Option<(&str, &Arc<dyn Handler>)> {
		if let Some((pattern, handler)) = self.exact.get_key_value(path) {
			return Some((pattern.as_str(), handler));
		}

		self.subtrees
			.iter()
			.find(|(pattern, _)| path.starts_with(pattern.as_str()))
			.map(|(pattern, handler)| (pattern.as_str(), handler))
	}
}

impl Handler for ServeMux {
	fn serve(&self, w: &mut dyn ResponseWriter, req: &mut Request) {
		let handler = self.resolve(req).handler;
		handler.serve(w, req);
	}

	fn as_router(&self) -> Option<&dyn Router> {
		Some(self)
	}
}

impl Router for ServeMux {
	fn handle(&mut self, pattern: &str, handler: Arc<dyn Handler>) -> Result<(), PatternError> {
		self.register(pattern, handler).map(|_| ())
	}

	fn resolve(&self, req: &Request) -> Match<'_> {
		match self.lookup(req.path()) {
			Some((pattern, handler)) => Match::found(&**handler, pattern),
			None => Match::not_found(&*self.not_found),
		}
	}
}

#[cfg(test)]
mod test {
	use super::ServeMux;
	use crate::{Handler, Noop, PatternError};
	use std::sync::Arc;

	fn noop() -> Arc<dyn Handler> {
		Arc::new(Noop)
	}

	#[test]
	fn exact_and_subtree() {
		let mut mux = ServeMux::new();
		mux.register("/", noop()).unwrap();
		mux.register("/static/", noop()).unwrap();
		mux.register("/static/img/", noop()).unwrap();
		mux.register("/about", noop()).unwrap();

		let pattern = |path| mux.lookup(path).map(|(p, _)| p);
		assert_eq!(pattern("/about"), Some("/about"));
		assert_eq!(pattern("/about/team"), Some("/"));
		assert_eq!(pattern("/static/app.js"), Some("/static/"));
		assert_eq!(pattern("/static/img/a.png"), Some("/static/img/"));
		assert_eq!(pattern("/static"), Some("/"));
	}

	#[test]
	fn no_catch_all_means_no_match() {
		let mut mux = ServeMux::new();
		mux.register("/api/", noop()).unwrap();

		assert!(mux.lookup("/web").is_none());
	}

	#[test]
	fn rejects_duplicates() {
		let mut mux = ServeMux::new();
		mux.register("/a", noop()).unwrap();

		assert_eq!(
			mux.register("/a", noop()).err(),
			Some(PatternError::Duplicate("/a".into()))
		);
		assert_eq!(mux.register("", noop()).err(), Some(PatternError::Empty));
	}
}
