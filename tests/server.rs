use chainmux::{
	decorators::{Gzip, PanicRecovery},
	handler_fn,
	hyper::{self, body, service::Service, Body, Method, StatusCode},
	write_str, Handler, HttpChain, MethodRouter, MuxChain, PathRouter, Request, ResponseWriter,
};
use std::sync::{
	atomic::{AtomicUsize, Ordering},
	Arc,
};

fn echo_param(name: &'static str) -> Arc<dyn Handler> {
	handler_fn(move |w, req| {
		let value = req.param(name).unwrap_or("").to_owned();
		write_str(w, &value).unwrap();
	})
}

async fn send(chain: &mut HttpChain, method: Method, uri: &str, body: &str) -> hyper::Response<Body> {
	let mut svc = chain.call(()).await.unwrap();
	let req = hyper::Request::builder()
		.method(method)
		.uri(uri)
		.body(Body::from(body.to_owned()))
		.unwrap();
	svc.call(req).await.unwrap()
}

async fn text(res: hyper::Response<Body>) -> String {
	let bytes = body::to_bytes(res.into_body()).await.unwrap();
	String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn routes_through_chains() {
	let calls = Arc::new(AtomicUsize::new(0));
	let seen = Arc::clone(&calls);
	let count = handler_fn(move |_w, _req| {
		seen.fetch_add(1, Ordering::SeqCst);
	});

	let mut orders = PathRouter::new();
	orders.register("/order/:id", echo_param("id")).unwrap();

	let mut mux: MuxChain = MuxChain::new();
	mux.chain("/", vec![count, Arc::new(orders) as Arc<dyn Handler>])
		.unwrap()
		.chain("/empty/", Vec::new())
		.unwrap();
	let mut chain = HttpChain::from(mux);

	let res = send(&mut chain, Method::GET, "/order/42", "").await;
	assert_eq!(res.status(), StatusCode::OK);
	assert_eq!(text(res).await, "42");

	let res = send(&mut chain, Method::GET, "/nowhere", "").await;
	assert_eq!(res.status(), StatusCode::NOT_FOUND);

	let res = send(&mut chain, Method::GET, "/empty/x", "").await;
	assert_eq!(res.status(), StatusCode::NOT_FOUND);

	assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn method_overrides() {
	let mut methods: MethodRouter = MethodRouter::new();
	methods
		.register(
			"DELETE /",
			handler_fn(|w, _req| chainmux::error(w, "rejected", StatusCode::FORBIDDEN)),
		)
		.unwrap();
	methods
		.register("/", handler_fn(|w, _req| write_str(w, "accepted").unwrap()))
		.unwrap();

	let mut chain = HttpChain::new(Arc::new(methods));

	let res = send(&mut chain, Method::DELETE, "/thing", "").await;
	assert_eq!(res.status(), StatusCode::FORBIDDEN);

	let res = send(&mut chain, Method::GET, "/thing", "").await;
	assert_eq!(text(res).await, "accepted");
}

#[tokio::test]
async fn handlers_see_the_body() {
	let upper = handler_fn(|w: &mut dyn ResponseWriter, req: &mut Request| {
		let body = String::from_utf8_lossy(req.body()).to_uppercase();
		write_str(w, &body).unwrap();
	});
	let mut chain = HttpChain::new(upper);

	let res = send(&mut chain, Method::POST, "/", "shout").await;
	assert_eq!(text(res).await, "SHOUT");
}

#[tokio::test]
async fn recovered_panics_become_500() {
	let boom = handler_fn(|_w, _req| panic!("boom"));
	let mut mux: MuxChain = MuxChain::new();
	mux.chain("/", vec![Arc::new(PanicRecovery::default()) as Arc<dyn Handler>, boom])
		.unwrap();
	let mut chain = HttpChain::from(mux);

	let res = send(&mut chain, Method::GET, "/", "").await;
	assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn unrecovered_panics_fail_the_request() {
	let mut chain = HttpChain::new(handler_fn(|_w, _req| panic!("boom")));

	let mut svc = chain.call(()).await.unwrap();
	let req = hyper::Request::builder().uri("/").body(Body::empty()).unwrap();
	assert!(svc.call(req).await.is_err());
}

#[tokio::test]
async fn gzip_sets_encoding() {
	let mut mux: MuxChain = MuxChain::new();
	mux.chain(
		"/",
		vec![
			Arc::new(Gzip::default()) as Arc<dyn Handler>,
			handler_fn(|w, _req| write_str(w, "zipped").unwrap()),
		],
	)
	.unwrap();
	let mut chain = HttpChain::from(mux);

	let res = send(&mut chain, Method::GET, "/", "").await;
	assert_eq!(res.headers()["content-encoding"], "gzip");
}
