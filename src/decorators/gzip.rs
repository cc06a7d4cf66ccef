use crate::{response::write_all, run_chain, ChainedHandler, Handler, Request, ResponseWriter};
use flate2::{write::GzEncoder, Compression};
use hyper::{
	header::{HeaderValue, CONTENT_ENCODING, CONTENT_LENGTH},
	HeaderMap, StatusCode,
};
use std::{io, io::Write, sync::Arc};

/// Gzip-encodes everything written by the handlers chained after it.
#[derive(Debug, Clone, Copy)]
pub struct Gzip {
	level: Compression,
}

impl Default for Gzip {
	fn default() -> Self {
		Self {
			level: Compression::default(),
		}
	}
}

impl Gzip {
	pub fn new(level: u32) -> Self {
		Self {
			level: Compression::new(level),
		}
	}
}

impl Handler for Gzip {
	fn serve(&self, w: &mut dyn ResponseWriter, req: &mut Request) {
		self.serve_chain(w, req, &[]);
	}

	fn as_chained(&self) -> Option<&dyn ChainedHandler> {
		Some(self)
	}
}

impl ChainedHandler for Gzip {
	fn serve_chain(&self, w: &mut dyn ResponseWriter, req: &mut Request, remaining: &[Arc<dyn Handler>]) {
		let mut gz = GzipWriter {
			inner: w,
			level: self.level,
			encoder: None,
		};
		run_chain(&mut gz, req, remaining);
		if let Err(e) = gz.finish() {
			tracing::warn!(error = %e, "failed to finish gzip stream");
		}
	}
}

/// Compresses writes on their way to `inner`.
///
/// The encoding header is set and the stream started by the first write, so a
/// chain that fails before producing output leaves the response untouched.
/// The stream is finished exactly once, by `finish` or else on drop.
struct GzipWriter<'a> {
	inner: &'a mut dyn ResponseWriter,
	level: Compression,
	encoder: Option<GzEncoder<Vec<u8>>>,
}

impl GzipWriter<'_> {
	fn finish(&mut self) -> io::Result<()> {
		match self.encoder.take() {
			Some(encoder) => {
				let rest = encoder.finish()?;
				write_all(self.inner, &rest)
			}
			None => Ok(()),
		}
	}
}

impl Drop for GzipWriter<'_> {
	fn drop(&mut self) {
		if let Err(e) = self.finish() {
			tracing::warn!(error = %e, "failed to finish gzip stream");
		}
	}
}

impl ResponseWriter for GzipWriter<'_> {
	fn headers_mut(&mut self) -> &mut HeaderMap {
		self.inner.headers_mut()
	}

	fn write_status(&mut self, status: StatusCode) {
		self.inner.write_status(status)
	}

	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		if self.encoder.is_none() {
			let headers = self.inner.headers_mut();
			headers.append(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
			// The encoded length differs from whatever the handler computed.
			headers.remove(CONTENT_LENGTH);
		}

		let level = self.level;
		let encoder = self
			.encoder
			.get_or_insert_with(|| GzEncoder::new(Vec::new(), level));
		let n = encoder.write(buf)?;
		write_all(self.inner, encoder.get_ref())?;
		encoder.get_mut().clear();
		Ok(n)
	}

	fn flush(&mut self) -> io::Result<()> {
		if let Some(encoder) = self.encoder.as_mut() {
			encoder.flush()?;
			write_all(self.inner, encoder.get_ref())?;
			encoder.get_mut().clear();
		}
		self.inner.flush()
	}

	fn reset(&mut self) -> bool {
		// A discarded stream is never finished.
		self.encoder = None;
		self.inner.reset()
	}
}
