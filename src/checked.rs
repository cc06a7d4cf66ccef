use crate::ResponseWriter;
use hyper::{HeaderMap, StatusCode};
use std::io;

/// Records whether anything has been written through it.
///
/// Every call to `write` counts, including empty ones. Once set the flag stays
/// set for the lifetime of the wrapper.
pub struct Checked<'a> {
	inner: &'a mut dyn ResponseWriter,
	written: bool,
}

impl<'a> Checked<'a> {
	pub fn new(inner: &'a mut dyn ResponseWriter) -> Self {
		Self {
			inner,
			written: false,
		}
	}

	pub fn written(&self) -> bool {
		self.written
	}
}

impl ResponseWriter for Checked<'_> {
	fn headers_mut(&mut self) -> &mut HeaderMap {
		self.inner.headers_mut()
	}

	fn write_status(&mut self, status: StatusCode) {
		self.inner.write_status(status)
	}

	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.written = true;
		self.inner.write(buf)
	}

	fn flush(&mut self) -> io::Result<()> {
		self.inner.flush()
	}

	fn has_written(&self) -> Option<bool> {
		Some(self.written)
	}

	fn reset(&mut self) -> bool {
		self.inner.reset()
	}
}

/// Runs `f` against a tracked view of `w`, reusing `w` itself when it already
/// tracks writes. Returns whether anything has been written.
pub fn with_checked<F>(w: &mut dyn ResponseWriter, f: F) -> bool
where
	F: FnOnce(&mut dyn ResponseWriter),
{
	if w.has_written().is_some() {
		f(&mut *w);
		return w.has_written().unwrap_or(false);
	}

	let mut checked = Checked::new(w);
	f(&mut checked);
	checked.written()
}
