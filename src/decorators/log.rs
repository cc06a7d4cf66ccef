use crate::{run_chain, ChainedHandler, Handler, Request, ResponseWriter};
use hyper::{HeaderMap, Method, StatusCode};
use std::{fmt::Write as _, io, sync::Arc, thread};
use tracing::Level;

/// Which request details an access log line carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogFields {
	pub method: bool,
	pub path: bool,
	pub status: bool,
	pub content_length: bool,
}

impl Default for LogFields {
	fn default() -> Self {
		Self {
			method: true,
			path: true,
			status: true,
			content_length: true,
		}
	}
}

/// Logs one line per request once the handlers chained after it are done.
///
/// The line is also written when the chain unwinds; a panic that left no
/// status behind is logged as a 500. Used as a plain handler it logs as soon as
/// it runs, before anything has been written.
#[derive(Debug, Clone, Copy)]
pub struct LogHandler {
	fields: LogFields,
	level: Level,
}

impl Default for LogHandler {
	fn default() -> Self {
		Self::new(LogFields::default(), Level::INFO)
	}
}

impl LogHandler {
	pub fn new(fields: LogFields, level: Level) -> Self {
		Self { fields, level }
	}

	fn line(&self, method: &Method, path: &str, status: StatusCode, written: usize) -> String {
		let mut line = String::new();
		if self.fields.method {
			let _ = write!(line, "{} ", method);
		}
		if self.fields.path {
			let _ = write!(line, "{} ", path);
		}
		if self.fields.status {
			let _ = write!(line, "{} ", status.as_u16());
		}
		if self.fields.content_length {
			let _ = write!(line, "{} ", written);
		}
		line.truncate(line.trim_end().len());
		line
	}

	fn emit(&self, line: &str) {
		// The tracing macros need the level as a constant.
		if self.level == Level::ERROR {
			tracing::error!(target: "chainmux::access", "{}", line);
		} else if self.level == Level::WARN {
			tracing::warn!(target: "chainmux::access", "{}", line);
		} else if self.level == Level::INFO {
			tracing::info!(target: "chainmux::access", "{}", line);
		} else if self.level == Level::DEBUG {
			tracing::debug!(target: "chainmux::access", "{}", line);
		} else {
			tracing::trace!(target: "chainmux::access", "{}", line);
		}
	}
}

impl Handler for LogHandler {
	fn serve(&self, _w: &mut dyn ResponseWriter, req: &mut Request) {
		self.emit(&self.line(req.method(), req.path(), StatusCode::OK, 0));
	}

	fn as_chained(&self) -> Option<&dyn ChainedHandler> {
		Some(self)
	}
}

impl ChainedHandler for LogHandler {
	fn serve_chain(&self, w: &mut dyn ResponseWriter, req: &mut Request, remaining: &[Arc<dyn Handler>]) {
		let mut counted = CountingWriter {
			log: self,
			method: req.method().clone(),
			path: req.path().to_owned(),
			inner: w,
			status: None,
			written: 0,
		};
		run_chain(&mut counted, req, remaining);
	}
}

/// Counts what passes through it and emits the access line when dropped.
struct CountingWriter<'a> {
	log: &'a LogHandler,
	method: Method,
	path: String,
	inner: &'a mut dyn ResponseWriter,
	status: Option<StatusCode>,
	written: usize,
}

impl Drop for CountingWriter<'_> {
	fn drop(&mut self) {
		let status = match self.status {
			Some(status) => status,
			None if thread::panicking() => StatusCode::INTERNAL_SERVER_ERROR,
			None => StatusCode::OK,
		};
		self.log
			.emit(&self.log.line(&self.method, &self.path, status, self.written));
	}
}

impl ResponseWriter for CountingWriter<'_> {
	fn headers_mut(&mut self) -> &mut HeaderMap {
		self.inner.headers_mut()
	}

	fn write_status(&mut self, status: StatusCode) {
		if self.status.is_none() {
			self.status = Some(status);
		}
		self.inner.write_status(status)
	}

	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		let n = self.inner.write(buf)?;
		self.written += n;
		Ok(n)
	}

	fn flush(&mut self) -> io::Result<()> {
		self.inner.flush()
	}

	fn reset(&mut self) -> bool {
		let reset = self.inner.reset();
		if reset {
			self.status = None;
			self.written = 0;
		}
		reset
	}
}
