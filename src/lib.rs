//! Chained HTTP handlers with glob, path-variable and method routing, built on hyper.
//!
//! ```no_run
//! use chainmux::{
//! 	decorators, handler_fn, hyper::Server, write_str, HttpChain, MuxChain, PathRouter,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! 	let addr = ([127, 0, 0, 1], 3000).into();
//!
//! 	let mut orders = PathRouter::new();
//! 	orders.register(
//! 		"/orders/:id",
//! 		handler_fn(|w, req| {
//! 			let id = req.param("id").unwrap_or_default().to_owned();
//! 			let _ = write_str(w, &id);
//! 		}),
//! 	)?;
//!
//! 	let mut handlers = decorators::standard();
//! 	handlers.push(Arc::new(orders));
//!
//! 	let mut mux: MuxChain = MuxChain::new();
//! 	mux.chain("/", handlers)?;
//!
//! 	let server = Server::bind(&addr).serve(HttpChain::from(mux));
//! 	println!("Listening on http://{}", addr);
//!
//! 	server.await?;
//! 	Ok(())
//! }
//! ```
//!
//! A chain runs its handlers in order until one of them writes to the response.
//! Handlers that only inspect the request or set headers let the chain carry
//! on. Routers in a chain are skipped when none of their patterns match, unless
//! they come last. Chain-aware handlers such as [`decorators::Gzip`] receive the
//! rest of the chain and decide how to run it.
//!
//! Routers are built during setup and only read while serving. Registering
//! routes while requests are in flight is not supported.

#[cfg(feature = "server")]
mod http;
#[cfg(feature = "server")]
pub use http::*;

mod chain;
mod checked;
mod error;
mod handler;
mod registry;
mod request;
mod response;

/// Chain-aware handlers for compression, access logging and panic recovery.
pub mod decorators;

/// Glob, path-variable, method and plain path routers.
pub mod router;

pub use chain::run_chain;
pub use checked::Checked;
pub use error::PatternError;
pub use handler::*;
pub use registry::*;
pub use request::{Params, Request};
pub use response::*;
pub use router::*;
