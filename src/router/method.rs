use super::{Match, Router, ServeMux};
use crate::{Handler, Noop, PatternError, Request, ResponseWriter};
use hyper::Method;
use std::{collections::HashMap, sync::Arc};

/// Routes by HTTP method first, then by pattern.
///
/// Patterns may start with a method and a space, `"GET /homepage"`. A missing
/// method, or `*`, registers for every method. Method-specific routes take
/// precedence over the catch-all ones. When neither matches the request falls
/// through to the not-found handler, which does nothing unless replaced.
pub struct MethodRouter<R = ServeMux> {
	// `None` holds the routes shared by every method.
	methods: HashMap<Option<Method>, R>,
	not_found: Arc<dyn Handler>,
}

impl<R: Router + Default> Default for MethodRouter<R> {
	fn default() -> Self {
		let mut methods = HashMap::new();
		methods.insert(None, R::default());
		Self {
			methods,
			not_found: Arc::new(Noop),
		}
	}
}

impl<R: Router + Default> MethodRouter<R> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_not_found(mut self, handler: Arc<dyn Handler>) -> Self {
		self.not_found = handler;
		self
	}

	pub fn register(&mut self, pattern: &str, handler: Arc<dyn Handler>) -> Result<&mut Self, PatternError> {
		let (method, pattern) = match pattern.split_once(' ') {
			Some(("*", pattern)) => (None, pattern),
			Some((method, pattern)) => {
				let method = Method::from_bytes(method.as_bytes())
					.map_err(|_| PatternError::InvalidMethod(method.to_owned()))?;
				(Some(method), pattern)
			}
			None => (None, pattern),
		};

		self.methods
			.entry(method)
			.or_insert_with(R::default)
			.handle(pattern, handler)?;
		Ok(self)
	}

	/// Registers one handler for several methods at once.
	pub fn register_methods(
		&mut self,
		pattern: &str,
		handler: Arc<dyn Handler>,
		methods: &[Method],
	) -> Result<&mut Self, PatternError> {
		for method in methods {
			self.register(&format!("{} {}", method, pattern), Arc::clone(&handler))?;
		}
		Ok(self)
	}

	fn resolve_method(&self, method: Option<&Method>, req: &Request) -> Option<Match<'_>> {
		let router = self.methods.get(&method.cloned())?;
		Some(router.resolve(req)).filter(Match::is_match)
	}
}

impl<R: Router + Default> Handler for MethodRouter<R> {
	fn serve(&self, w: &mut dyn ResponseWriter, req: &mut Request) {
		let handler = self.resolve(req).handler;
		handler.serve(w, req);
	}

	fn as_router(&self) -> Option<&dyn Router> {
		Some(self)
	}
}

impl<R: Router + Default> Router for MethodRouter<R> {
	fn handle(&mut self, pattern: &str, handler: Arc<dyn Handler>) -> Result<(), PatternError> {
		self.register(pattern, handler).map(|_| ())
	}

	fn resolve(&self, req: &Request) -> Match<'_> {
		self.resolve_method(Some(req.method()), req)
			.or_else(|| self.resolve_method(None, req))
			.unwrap_or_else(|| Match::not_found(&*self.not_found))
	}
}
