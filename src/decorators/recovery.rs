use crate::{error, handler_fn, run_chain, ChainedHandler, Handler, Request, ResponseWriter};
use hyper::StatusCode;
use std::{
	any::Any,
	panic::{self, AssertUnwindSafe},
	sync::Arc,
};

/// Turns a panic anywhere in the handlers chained after it into a fallback
/// response. Place it first so that it covers the whole chain.
#[derive(Clone)]
pub struct PanicRecovery {
	recovery: Arc<dyn Handler>,
}

impl Default for PanicRecovery {
	fn default() -> Self {
		Self::new(handler_fn(|w, _req| {
			error(w, "internal server error", StatusCode::INTERNAL_SERVER_ERROR)
		}))
	}
}

impl PanicRecovery {
	pub fn new(recovery: Arc<dyn Handler>) -> Self {
		Self { recovery }
	}
}

impl Handler for PanicRecovery {
	fn serve(&self, w: &mut dyn ResponseWriter, req: &mut Request) {
		self.serve_chain(w, req, &[]);
	}

	fn as_chained(&self) -> Option<&dyn ChainedHandler> {
		Some(self)
	}
}

impl ChainedHandler for PanicRecovery {
	fn serve_chain(&self, w: &mut dyn ResponseWriter, req: &mut Request, remaining: &[Arc<dyn Handler>]) {
		let outcome = panic::catch_unwind(AssertUnwindSafe(|| run_chain(&mut *w, &mut *req, remaining)));

		if let Err(payload) = outcome {
			tracing::error!(
				method = %req.method(),
				path = req.path(),
				panic = panic_message(&*payload),
				"recovered from panic in handler chain"
			);
			if !w.reset() && w.has_written() == Some(true) {
				tracing::warn!(path = req.path(), "response already started, fallback follows partial output");
			}
			self.recovery.serve(w, req);
		}
	}
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
	payload
		.downcast_ref::<&str>()
		.copied()
		.or_else(|| payload.downcast_ref::<String>().map(String::as_str))
		.unwrap_or("non-string panic payload")
}
