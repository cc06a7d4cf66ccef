use crate::{not_found, run_chain, Chain, Handler, Match, PatternError, Request, ResponseWriter, Router, ServeMux};
use parking_lot::RwLock;
use std::sync::{Arc, LazyLock};

/// Binds patterns to chains of handlers.
///
/// Requests are routed by the underlying router `R` and then run through the
/// matching chain with [`run_chain`]. A `MuxChain` is itself a handler, so it
/// can be handed to the server as the root handler or nested in another chain.
pub struct MuxChain<R = ServeMux> {
	router: R,
}

impl<R: Router + Default> Default for MuxChain<R> {
	fn default() -> Self {
		Self {
			router: R::default(),
		}
	}
}

impl<R: Router + Default> MuxChain<R> {
	pub fn new() -> Self {
		Self::default()
	}
}

impl<R: Router> MuxChain<R> {
	pub fn with_router(router: R) -> Self {
		Self { router }
	}

	/// Registers `handlers` under `pattern`. Handlers run in the given order
	/// until one of them writes a response; an empty chain answers 404.
	pub fn chain<I>(&mut self, pattern: &str, handlers: I) -> Result<&mut Self, PatternError>
	where
		I: IntoIterator<Item = Arc<dyn Handler>>,
	{
		let handlers: Chain = handlers.into_iter().collect();
		tracing::debug!(pattern, handlers = handlers.len(), "registered chain");
		self.router.handle(pattern, Arc::new(ChainHandler { handlers }))?;
		Ok(self)
	}
}

/// Builds a registry that runs `handlers` for every path.
pub fn chain_handlers<I>(handlers: I) -> Result<MuxChain, PatternError>
where
	I: IntoIterator<Item = Arc<dyn Handler>>,
{
	let mut mux = MuxChain::new();
	mux.chain("/", handlers)?;
	Ok(mux)
}

impl<R: Router> Handler for MuxChain<R> {
	fn serve(&self, w: &mut dyn ResponseWriter, req: &mut Request) {
		self.router.serve(w, req);
	}

	fn as_router(&self) -> Option<&dyn Router> {
		Some(self)
	}
}

impl<R: Router> Router for MuxChain<R> {
	fn handle(&mut self, pattern: &str, handler: Arc<dyn Handler>) -> Result<(), PatternError> {
		self.router.handle(pattern, handler)
	}

	fn resolve(&self, req: &Request) -> Match<'_> {
		self.router.resolve(req)
	}
}

struct ChainHandler {
	handlers: Chain,
}

impl Handler for ChainHandler {
	fn serve(&self, w: &mut dyn ResponseWriter, req: &mut Request) {
		if self.handlers.is_empty() {
			not_found(w);
			return;
		}
		run_chain(w, req, &self.handlers);
	}
}

static DEFAULT: LazyLock<RwLock<MuxChain>> = LazyLock::new(Default::default);

/// Registers a chain on the shared default registry.
///
/// Registration should finish before [`default_handler`] starts serving:
/// requests hold a read lock for their whole run.
pub fn chain<I>(pattern: &str, handlers: I) -> Result<(), PatternError>
where
	I: IntoIterator<Item = Arc<dyn Handler>>,
{
	DEFAULT.write().chain(pattern, handlers).map(|_| ())
}

/// Serves requests through the shared default registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultChain;

impl Handler for DefaultChain {
	fn serve(&self, w: &mut dyn ResponseWriter, req: &mut Request) {
		DEFAULT.read().serve(w, req);
	}
}

pub fn default_handler() -> Arc<dyn Handler> {
	Arc::new(DefaultChain)
}

#[cfg(test)]
mod test {
	use super::{chain, chain_handlers, default_handler, MuxChain};
	use crate::{handler_fn, write_str, BufferedResponse, GlobRouter, Handler, PathRouter, Request};
	use hyper::{body::Bytes, StatusCode};
	use std::sync::Arc;

	fn serve(handler: &dyn Handler, path: &str) -> BufferedResponse {
		let mut res = BufferedResponse::new();
		let mut req = Request::new(Request::builder().uri(path).body(Bytes::new()).unwrap());
		handler.serve(&mut res, &mut req);
		res
	}

	fn reply(body: &'static str) -> Arc<dyn Handler> {
		handler_fn(move |w, _req| write_str(w, body).unwrap())
	}

	#[test]
	fn routes_to_chains() {
		let mut mux: MuxChain = MuxChain::new();
		mux.chain("/", vec![reply("root")])
			.unwrap()
			.chain("/auth/", vec![handler_fn(|_w, _req| {}), reply("auth")])
			.unwrap();

		assert_eq!(serve(&mux, "/anything").body(), b"root");
		assert_eq!(serve(&mux, "/auth/login").body(), b"auth");
	}

	#[test]
	fn empty_chain_is_not_found() {
		let mut mux: MuxChain = MuxChain::new();
		mux.chain("/empty", Vec::new()).unwrap();

		assert_eq!(serve(&mux, "/empty").status(), StatusCode::NOT_FOUND);
	}

	#[test]
	fn unregistered_path_is_not_found() {
		let mut mux: MuxChain = MuxChain::new();
		mux.chain("/only", vec![reply("x")]).unwrap();

		assert_eq!(serve(&mux, "/other").status(), StatusCode::NOT_FOUND);
	}

	#[test]
	fn duplicate_pattern_is_rejected() {
		let mut mux: MuxChain = MuxChain::new();
		mux.chain("/a", vec![reply("x")]).unwrap();

		assert!(mux.chain("/a", vec![reply("y")]).is_err());
	}

	#[test]
	fn routers_as_chain_members() {
		let mut users = PathRouter::new();
		users
			.register(
				"/users/:id",
				handler_fn(|w, req| {
					let id = req.param("id").unwrap_or_default().to_owned();
					write_str(w, &id).unwrap();
				}),
			)
			.unwrap();

		let mux = chain_handlers(vec![Arc::new(users) as Arc<dyn Handler>, reply("fallback")]).unwrap();

		assert_eq!(serve(&mux, "/users/9").body(), b"9");
		assert_eq!(serve(&mux, "/teams/9").body(), b"fallback");
	}

	#[test]
	fn glob_backed_registry() {
		let mut mux = MuxChain::with_router(GlobRouter::new());
		mux.chain("/files/*/raw", vec![reply("raw")]).unwrap();
		mux.chain("/files/*", vec![reply("file")]).unwrap();

		assert_eq!(serve(&mux, "/files/a/raw").body(), b"raw");
		assert_eq!(serve(&mux, "/files/a").body(), b"file");
	}

	#[test]
	fn default_registry() {
		chain("/default-registry-test", vec![reply("shared")]).unwrap();

		assert_eq!(serve(default_handler().as_ref(), "/default-registry-test").body(), b"shared");
	}
}
