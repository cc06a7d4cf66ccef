use crate::{ResponseWriter, Request, Router};
use std::{
	fmt::{self, Debug, Formatter},
	sync::Arc,
};

/// Anything that can take part in a chain.
///
/// Handlers signal "I produced the response" by writing to the sink; a handler
/// that leaves it untouched lets the chain continue. Routers and chain-aware
/// handlers announce themselves through the capability queries so the chain
/// engine can treat them specially.
pub trait Handler: Send + Sync {
	fn serve(&self, w: &mut dyn ResponseWriter, req: &mut Request);

	fn as_chained(&self) -> Option<&dyn ChainedHandler> {
		None
	}

	fn as_router(&self) -> Option<&dyn Router> {
		None
	}
}

/// A handler that takes over the rest of its chain.
///
/// Implementations should hand `remaining` to [`run_chain`](crate::run_chain)
/// once their own work is set up, which lets them run code after the whole
/// suffix has completed.
pub trait ChainedHandler: Handler {
	fn serve_chain(&self, w: &mut dyn ResponseWriter, req: &mut Request, remaining: &[Arc<dyn Handler>]);
}

/// An ordered sequence of handlers.
pub type Chain = Arc<[Arc<dyn Handler>]>;

pub struct HandlerFn<F>(F);

impl<F> Handler for HandlerFn<F>
where
	F: Fn(&mut dyn ResponseWriter, &mut Request) + Send + Sync,
{
	fn serve(&self, w: &mut dyn ResponseWriter, req: &mut Request) {
		(self.0)(w, req)
	}
}

impl<F> Debug for HandlerFn<F> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str("HandlerFn")
	}
}

/// Wraps a closure as a plain handler.
pub fn handler_fn<F>(f: F) -> Arc<dyn Handler>
where
	F: Fn(&mut dyn ResponseWriter, &mut Request) + Send + Sync + 'static,
{
	Arc::new(HandlerFn(f))
}

pub struct ChainedFn<F>(F);

impl<F> Handler for ChainedFn<F>
where
	F: Fn(&mut dyn ResponseWriter, &mut Request, &[Arc<dyn Handler>]) + Send + Sync,
{
	fn serve(&self, w: &mut dyn ResponseWriter, req: &mut Request) {
		(self.0)(w, req, &[])
	}

	fn as_chained(&self) -> Option<&dyn ChainedHandler> {
		Some(self)
	}
}

impl<F> ChainedHandler for ChainedFn<F>
where
	F: Fn(&mut dyn ResponseWriter, &mut Request, &[Arc<dyn Handler>]) + Send + Sync,
{
	fn serve_chain(&self, w: &mut dyn ResponseWriter, req: &mut Request, remaining: &[Arc<dyn Handler>]) {
		(self.0)(w, req, remaining)
	}
}

impl<F> Debug for ChainedFn<F> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str("ChainedFn")
	}
}

/// Wraps a closure as a chain-aware handler.
pub fn chained_fn<F>(f: F) -> Arc<dyn Handler>
where
	F: Fn(&mut dyn ResponseWriter, &mut Request, &[Arc<dyn Handler>]) + Send + Sync + 'static,
{
	Arc::new(ChainedFn(f))
}
