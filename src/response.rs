use crate::{Handler, Request};
use hyper::{
	header::{HeaderValue, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS},
	Body, HeaderMap, StatusCode,
};
use std::io;

/// The outbound half of a request. Status and headers must be set before the
/// first body write; later changes may not reach the client.
pub trait ResponseWriter {
	fn headers_mut(&mut self) -> &mut HeaderMap;

	fn write_status(&mut self, status: StatusCode);

	fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}

	/// `Some` when this sink tracks whether it has been written to.
	fn has_written(&self) -> Option<bool> {
		None
	}

	/// Discards the status, headers and body produced so far. Returns false
	/// when the response has already left and cannot be taken back.
	fn reset(&mut self) -> bool {
		false
	}
}

/// Collects a response in memory so it can be handed to hyper in one piece.
#[derive(Debug, Default)]
pub struct BufferedResponse {
	status: Option<StatusCode>,
	headers: HeaderMap,
	body: Vec<u8>,
}

impl BufferedResponse {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn status(&self) -> StatusCode {
		self.status.unwrap_or(StatusCode::OK)
	}

	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	pub fn body(&self) -> &[u8] {
		&self.body
	}

	pub fn into_response(self) -> hyper::Response<Body> {
		let mut res = hyper::Response::new(Body::from(self.body));
		*res.status_mut() = self.status.unwrap_or(StatusCode::OK);
		*res.headers_mut() = self.headers;
		res
	}
}

impl ResponseWriter for BufferedResponse {
	fn headers_mut(&mut self) -> &mut HeaderMap {
		&mut self.headers
	}

	fn write_status(&mut self, status: StatusCode) {
		match self.status {
			Some(current) => tracing::warn!(%current, ignored = %status, "superfluous status write"),
			None => self.status = Some(status),
		}
	}

	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		if self.status.is_none() {
			self.status = Some(StatusCode::OK);
		}
		self.body.extend_from_slice(buf);
		Ok(buf.len())
	}

	fn reset(&mut self) -> bool {
		self.status = None;
		self.headers.clear();
		self.body.clear();
		true
	}
}

pub fn write_str(w: &mut dyn ResponseWriter, s: &str) -> io::Result<()> {
	write_all(w, s.as_bytes())
}

pub fn write_all(w: &mut dyn ResponseWriter, mut buf: &[u8]) -> io::Result<()> {
	while !buf.is_empty() {
		match w.write(buf)? {
			0 => return Err(io::ErrorKind::WriteZero.into()),
			n => buf = &buf[n..],
		}
	}
	Ok(())
}

/// Replies with a plain-text error message and status.
pub fn error(w: &mut dyn ResponseWriter, message: &str, status: StatusCode) {
	let headers = w.headers_mut();
	headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
	headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
	w.write_status(status);
	if let Err(e) = write_str(w, message).and_then(|_| write_str(w, "\n")) {
		tracing::warn!(error = %e, "failed to write error body");
	}
}

pub fn not_found(w: &mut dyn ResponseWriter) {
	error(w, "404 page not found", StatusCode::NOT_FOUND);
}

/// Replies 404 to every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFound;

impl Handler for NotFound {
	fn serve(&self, w: &mut dyn ResponseWriter, _req: &mut Request) {
		not_found(w);
	}
}

/// Does nothing, letting a chain carry on past it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Noop;

impl Handler for Noop {
	fn serve(&self, _w: &mut dyn ResponseWriter, _req: &mut Request) {}
}
