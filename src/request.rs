use hyper::{body::Bytes, http::request::Builder, HeaderMap, Method, Uri};
use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use url::form_urlencoded;

/// Queryable request parameters. Starts out as the decoded query string;
/// routers may add to it (path variables land here too).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
	pairs: Vec<(String, String)>,
}

impl Params {
	pub fn parse(query: &str) -> Self {
		Self {
			pairs: form_urlencoded::parse(query.as_bytes())
				.into_owned()
				.collect(),
		}
	}

	/// First value bound to `name`.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.pairs
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}

	pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
		self.pairs
			.iter()
			.filter(move |(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}

	/// Replaces every value bound to `name`.
	pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
		let name = name.into();
		self.pairs.retain(|(key, _)| *key != name);
		self.pairs.push((name, value.into()));
	}

	pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.pairs.push((name.into(), value.into()));
	}

	pub fn contains(&self, name: &str) -> bool {
		self.pairs.iter().any(|(key, _)| key == name)
	}

	pub fn len(&self) -> usize {
		self.pairs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.pairs.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}
}

/// A fully buffered inbound request as seen by handlers.
#[derive(Debug)]
pub struct Request {
	inner: hyper::Request<Bytes>,
	params: Params,
}

impl Request {
	pub fn new(inner: hyper::Request<Bytes>) -> Self {
		let params = inner.uri().query().map(Params::parse).unwrap_or_default();
		Self { inner, params }
	}

	/// Shorthand for building test and internal requests.
	pub fn builder() -> Builder {
		hyper::Request::builder()
	}

	pub fn method(&self) -> &Method {
		self.inner.method()
	}

	pub fn uri(&self) -> &Uri {
		self.inner.uri()
	}

	/// The raw, still percent-encoded path.
	pub fn path(&self) -> &str {
		self.inner.uri().path()
	}

	/// The path split on `/`, each segment percent-decoded. An encoded `%2F`
	/// stays inside its segment.
	pub fn path_segments(&self) -> impl Iterator<Item = Cow<'_, str>> {
		self.path().split('/').map(decode_segment)
	}

	pub fn headers(&self) -> &HeaderMap {
		self.inner.headers()
	}

	pub fn body(&self) -> &Bytes {
		self.inner.body()
	}

	pub fn extensions(&self) -> &hyper::http::Extensions {
		self.inner.extensions()
	}

	pub fn extensions_mut(&mut self) -> &mut hyper::http::Extensions {
		self.inner.extensions_mut()
	}

	pub fn params(&self) -> &Params {
		&self.params
	}

	pub fn params_mut(&mut self) -> &mut Params {
		&mut self.params
	}

	/// Looks up a query-string or path-variable parameter.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name)
	}

	pub fn into_inner(self) -> hyper::Request<Bytes> {
		self.inner
	}
}

pub(crate) fn decode_segment(segment: &str) -> Cow<'_, str> {
	percent_decode_str(segment).decode_utf8_lossy()
}

impl From<hyper::Request<Bytes>> for Request {
	fn from(inner: hyper::Request<Bytes>) -> Self {
		Self::new(inner)
	}
}
