use chainmux::{
	decorators, error, handler_fn,
	hyper::{header::HeaderValue, Method, Server, StatusCode},
	write_str, Handler, HttpChain, MethodRouter, MuxChain, PathRouter, Request, ResponseWriter,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn echo(w: &mut dyn ResponseWriter, req: &mut Request) {
	let _ = write_str(w, req.path());
}

fn auth(w: &mut dyn ResponseWriter, req: &mut Request) {
	if req.param("auth") == Some("yes") {
		w.headers_mut().insert("x-auth", HeaderValue::from_static("yes"));
	} else {
		error(w, "?auth=yes required", StatusCode::FORBIDDEN);
	}
}

fn order(w: &mut dyn ResponseWriter, req: &mut Request) {
	let id = req.param("id").unwrap_or_default().to_owned();
	let size = req.param("size").unwrap_or_default().to_owned();
	let _ = write_str(w, &format!("order {} ({})", id, size));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let addr = ([127, 0, 0, 1], 3000).into();

	let mut orders = PathRouter::new();
	orders.register("/orders/:id/:size:large", handler_fn(order))?;

	let mut methods: MethodRouter = MethodRouter::new();
	methods.register(
		"DELETE /",
		handler_fn(|w, _req| error(w, "deletes are disabled", StatusCode::METHOD_NOT_ALLOWED)),
	)?;
	methods.register_methods("/", handler_fn(|_w, _req| {}), &[Method::GET, Method::POST])?;

	let echo = handler_fn(echo);
	let mut handlers = decorators::standard();
	handlers.extend([
		Arc::new(methods) as Arc<dyn Handler>,
		Arc::new(orders) as Arc<dyn Handler>,
		Arc::clone(&echo),
	]);

	let mut mux: MuxChain = MuxChain::new();
	mux.chain("/", handlers)?
		.chain("/auth/", vec![handler_fn(auth), echo])?
		.chain("/nothing", Vec::new())?;

	let server = Server::bind(&addr).serve(HttpChain::from(mux));
	tracing::info!(%addr, "listening");

	server.await?;
	Ok(())
}
