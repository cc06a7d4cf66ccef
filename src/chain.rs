use crate::{checked::with_checked, Handler, Request, ResponseWriter};
use std::sync::Arc;

/// Runs `handlers` in order until one of them writes to the response.
///
/// Routers without a matching pattern are skipped, except when they are the
/// last handler. A chain-aware handler receives the rest of the chain and the
/// loop ends there, whether or not it wrote anything. Chain-aware handlers
/// call this again to continue.
pub fn run_chain(w: &mut dyn ResponseWriter, req: &mut Request, handlers: &[Arc<dyn Handler>]) {
	for (i, handler) in handlers.iter().enumerate() {
		let remaining = &handlers[i + 1..];
		if serve_step(&**handler, remaining, w, req) {
			return;
		}
	}
	tracing::trace!(path = req.path(), "chain completed without a response");
}

/// Serves a single chain member. Returns true once the chain should stop.
fn serve_step(
	handler: &dyn Handler,
	remaining: &[Arc<dyn Handler>],
	w: &mut dyn ResponseWriter,
	req: &mut Request,
) -> bool {
	if let Some(router) = handler.as_router() {
		if !router.resolve(req).is_match() && !remaining.is_empty() {
			tracing::trace!(path = req.path(), "skipping router without a matching pattern");
			return false;
		}
	}

	let mut handed_off = false;
	let written = with_checked(w, |w| match handler.as_chained() {
		Some(chained) => {
			handed_off = true;
			chained.serve_chain(w, req, remaining);
		}
		None => handler.serve(w, req),
	});
	handed_off || written
}
