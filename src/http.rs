use crate::{BufferedResponse, Handler, MuxChain, Request, Router};
use anyhow::{Context as _, Error, Result};
use hyper::{body::Body, service::Service, StatusCode};
use std::{
	convert::Infallible,
	future::{ready, Future, Ready},
	pin::Pin,
	sync::Arc,
	task::{Context, Poll},
};

pub use hyper;

fn default_error_handler(e: Error) -> hyper::Response<Body> {
	let mut res = hyper::Response::new(Body::from(e.to_string()));
	*res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
	res
}

/// A function that can convert an error into a response.
pub type ErrorHandler = fn(e: Error) -> hyper::Response<Body>;

/// Serves a root handler (usually a [`MuxChain`]) through hyper.
///
/// Hand it to `hyper::Server::serve`; every connection gets a [`ChainService`].
#[derive(Clone)]
pub struct HttpChain {
	handler: Arc<dyn Handler>,
	internal_error: ErrorHandler,
}

impl HttpChain {
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			handler,
			internal_error: default_error_handler,
		}
	}

	/// Replaces the response sent when a request body cannot be read.
	pub fn internal_error_handler(mut self, handler: ErrorHandler) -> Self {
		self.internal_error = handler;
		self
	}
}

impl<R: Router + 'static> From<MuxChain<R>> for HttpChain {
	fn from(mux: MuxChain<R>) -> Self {
		Self::new(Arc::new(mux))
	}
}

impl<T> Service<T> for HttpChain {
	type Response = ChainService;
	type Error = Infallible;
	type Future = Ready<Result<Self::Response, Self::Error>>;

	fn poll_ready(&mut self, _: &mut Context) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, _: T) -> Self::Future {
		ready(Ok(ChainService {
			handler: Arc::clone(&self.handler),
			internal_error: self.internal_error,
		}))
	}
}

/// Responsible for handling the actual HTTP requests from hyper.
///
/// The body is read in full, then the handler runs on tokio's blocking pool
/// against a buffered response. A panic that no recovery handler caught
/// becomes an error, and hyper drops the connection.
#[derive(Clone)]
pub struct ChainService {
	handler: Arc<dyn Handler>,
	internal_error: ErrorHandler,
}

impl Service<hyper::Request<Body>> for ChainService {
	type Response = hyper::Response<Body>;
	type Error = Error;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

	fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, req: hyper::Request<Body>) -> Self::Future {
		let handler = Arc::clone(&self.handler);
		let internal_error = self.internal_error;

		Box::pin(async move {
			let (parts, body) = req.into_parts();
			let body = match hyper::body::to_bytes(body).await {
				Ok(body) => body,
				Err(e) => return Ok(internal_error(Error::new(e).context("failed to read request body"))),
			};
			let mut req = Request::new(hyper::Request::from_parts(parts, body));

			let res = tokio::task::spawn_blocking(move || {
				let mut res = BufferedResponse::new();
				handler.serve(&mut res, &mut req);
				res
			})
			.await
			.map_err(|e| {
				tracing::error!(error = %e, "handler chain failed");
				e
			})
			.context("handler chain failed")?;

			Ok(res.into_response())
		})
	}
}
