use super::{Match, Router};
use crate::{request::decode_segment, Handler, NotFound, PatternError, Request, ResponseWriter};
use std::sync::Arc;

/// Routes patterns with `*` wildcard segments.
///
/// A wildcard matches exactly one path segment, or nothing when the path ends
/// early. Literal segments must match exactly. Paths may run past the end of a
/// pattern, so `/x/*` matches `/x`, `/x/y` and `/x/y/z`. When several patterns
/// match, the one with the most segments wins; ties go to whichever was
/// registered first.
pub struct GlobRouter {
	routes: Vec<(String, Arc<dyn Handler>)>,
	not_found: Arc<dyn Handler>,
}

impl Default for GlobRouter {
	fn default() -> Self {
		Self {
			routes: Vec::new(),
			not_found: Arc::new(NotFound),
		}
	}
}

impl GlobRouter {
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

		match self.routes.iter_mut().find(|(p, _)| p == pattern) {
			Some(route) => route.1 = handler,
			None => self.routes.push((pattern.to_owned(), handler)),
		}
		tracing::debug!(pattern, "registered glob route");
		Ok(self)
	}

	/// Finds the best registered pattern for `path`. Path segments are
	/// percent-decoded before they are compared.
	pub fn lookup(&self, path: &str) -> Option<(&str, &Arc<dyn Handler>)> {
		let mut best: Option<(usize, &(String, Arc<dyn Handler>))> = None;
		for route in &self.routes {
			if !path_match(&route.0, path) {
				continue;
			}

			let len = route.0.matches('/').count();
			if best.map_or(true, |(best_len, _)| len > best_len) {
				best = Some((len, route));
			}
		}
		best.map(|(_, (pattern, handler))| (pattern.as_str(), handler))
	}
}

impl Handler for GlobRouter {
	fn serve(&self, w: &mut dyn ResponseWriter, req: &mut Request) {
		let handler = self.resolve(req).handler;
		handler.serve(w, req);
	}

	fn as_router(&self) -> Option<&dyn Router> {
		Some(self)
	}
}

impl Router for GlobRouter {
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

pub(crate) fn path_match(pattern: &str, path: &str) -> bool {
	let path: Vec<_> = path.split('/').map(decode_segment).collect();

	pattern.split('/').enumerate().all(|(i, segment)| match segment {
		"*" => true,
		literal => path.get(i).map_or(false, |part| part == literal),
	})
}

#[cfg(test)]
mod test {
	use super::{path_match, GlobRouter};
	use crate::{handler_fn, write_str, BufferedResponse, Handler, Request, Router};
	use hyper::{body::Bytes, StatusCode};
	use std::sync::Arc;

	fn request(path: &str) -> Request {
		Request::new(Request::builder().uri(path).body(Bytes::new()).unwrap())
	}

	fn reply(body: &'static str) -> Arc<dyn Handler> {
		handler_fn(move |w, _req| write_str(w, body).unwrap())
	}

	#[test]
	fn matches_paths() {
		let cases = [
			("/x/", "/x/", true),
			("/x/*", "/x/", true),
			("/x/*", "/x", true),
			("/x/*/*", "/x", true),
			("/x/*/*", "/x/y", true),
			("/x/*", "/x/y/z", true),
			("/x/*/z", "/x/y/z", true),
			("/x/*/z", "/x/z", false),
			("/x/", "/x", false),
			("/y/*", "/x/y", false),
			("/a b/*", "/a%20b/c", true),
			("/a%20b", "/a%20b", false),
		];

		for (pattern, path, expected) in cases {
			assert_eq!(
				path_match(pattern, path),
				expected,
				"{} against {}",
				path,
				pattern
			);
		}
	}

	#[test]
	fn longest_pattern_wins() {
		let mut router = GlobRouter::new();
		router.register("/x/*", reply("a")).unwrap();
		router.register("/x/*/z", reply("b")).unwrap();

		let req = request("/x/y/z");
		assert_eq!(router.resolve(&req).pattern, Some("/x/*/z"));

		let mut res = BufferedResponse::new();
		router.serve(&mut res, &mut request("/x/y/z"));
		assert_eq!(res.body(), b"b");

		assert_eq!(router.resolve(&request("/x/y")).pattern, Some("/x/*"));
	}

	#[test]
	fn ties_go_to_first_registered() {
		let mut router = GlobRouter::new();
		router.register("/a/*", reply("first")).unwrap();
		router.register("/*/b", reply("second")).unwrap();

		assert_eq!(router.resolve(&request("/a/b")).pattern, Some("/a/*"));
	}

	#[test]
	fn resolve_is_stable() {
		let mut router = GlobRouter::new();
		router.register("/x/*", reply("a")).unwrap();
		router.register("/x/*/*", reply("b")).unwrap();

		let req = request("/x/1/2");
		let first = router.resolve(&req);
		let second = router.resolve(&req);
		assert_eq!(first.pattern, second.pattern);
		assert!(std::ptr::eq(
			first.handler as *const dyn Handler as *const u8,
			second.handler as *const dyn Handler as *const u8,
		));
	}

	#[test]
	fn reregistering_replaces() {
		let mut router = GlobRouter::new();
		router.register("/x", reply("old")).unwrap();
		router.register("/x", reply("new")).unwrap();

		let mut res = BufferedResponse::new();
		router.serve(&mut res, &mut request("/x"));
		assert_eq!(res.body(), b"new");
	}

	#[test]
	fn unmatched_is_not_found() {
		let mut router = GlobRouter::new();
		router.register("/x/*", reply("a")).unwrap();

		let req = request("/nope");
		assert!(!router.resolve(&req).is_match());

		let mut res = BufferedResponse::new();
		router.serve(&mut res, &mut request("/nope"));
		assert_eq!(res.status(), StatusCode::NOT_FOUND);
	}

	#[test]
	fn rejects_empty_pattern() {
		let mut router = GlobRouter::new();
		assert!(router.register("", reply("a")).is_err());
	}
}
