use super::{GlobRouter, Match, Router};
use crate::{Handler, PatternError, Request, ResponseWriter};
use std::{borrow::Cow, collections::HashMap, sync::Arc};

#[derive(Debug, Clone, PartialEq, Eq)]
struct PathVariable {
	name: String,
	default: Option<String>,
}

/// Routes patterns with named variable segments and exposes the captured
/// values as request parameters.
///
/// `/order/:id` routes like `/order/*` and a request for `/order/42` sees
/// `id=42`. Captured values are percent-decoded and replace any query
/// parameter of the same name; an empty segment binds an empty value. A
/// variable may carry a default, `/image/:size:100x100`, which is used when the
/// request path stops short of that segment or leaves it empty. Defaulted
/// variables can only be followed by other defaulted variables:
///
/// ```text
/// /image/:name/:size:100x100         valid
/// /image/:name:newimg/:size:100x100  valid
/// /image/:name:newimg/size           invalid
/// /image/:name:newimg/:size          invalid
/// ```
#[derive(Default)]
pub struct PathRouter {
	glob: GlobRouter,
	variables: HashMap<String, Vec<(usize, PathVariable)>>,
}

impl PathRouter {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_not_found(mut self, handler: Arc<dyn Handler>) -> Self {
		self.glob = self.glob.with_not_found(handler);
		self
	}

	pub fn register(&mut self, pattern: &str, handler: Arc<dyn Handler>) -> Result<&mut Self, PatternError> {
		let (glob, variables) = parse_pattern(pattern)?;
		self.glob.register(&glob, handler)?;
		self.variables.insert(glob, variables);
		Ok(self)
	}

	fn bind(&self, pattern: &str, req: &mut Request) {
		let variables = match self.variables.get(pattern) {
			Some(variables) if !variables.is_empty() => variables,
			_ => return,
		};

		let segments: Vec<String> = req.path_segments().map(Cow::into_owned).collect();
		let params = req.params_mut();
		for (i, variable) in variables {
			let value = match (segments.get(*i), &variable.default) {
				(Some(segment), _) if !segment.is_empty() => segment.as_str(),
				(_, Some(default)) => default.as_str(),
				(Some(empty), None) => empty.as_str(),
				(None, None) => continue,
			};
			params.set(variable.name.as_str(), value);
		}
	}
}

impl Handler for PathRouter {
	fn serve(&self, w: &mut dyn ResponseWriter, req: &mut Request) {
		let Match { handler, pattern } = self.resolve(req);
		if let Some(pattern) = pattern {
			self.bind(pattern, req);
		}
		handler.serve(w, req);
	}

	fn as_router(&self) -> Option<&dyn Router> {
		Some(self)
	}
}

impl Router for PathRouter {
	fn handle(&mut self, pattern: &str, handler: Arc<dyn Handler>) -> Result<(), PatternError> {
		self.register(pattern, handler).map(|_| ())
	}

	fn resolve(&self, req: &Request) -> Match<'_> {
		self.glob.resolve(req)
	}
}

/// Rewrites variable segments to wildcards and records where they sit.
fn parse_pattern(pattern: &str) -> Result<(String, Vec<(usize, PathVariable)>), PatternError> {
	let mut segments = Vec::new();
	let mut variables = Vec::new();
	let mut found_default = false;

	for (i, segment) in pattern.split('/').enumerate() {
		let decl = match segment.strip_prefix(':') {
			Some(decl) => decl,
			None if found_default => return Err(PatternError::DefaultOrder(pattern.to_owned())),
			None => {
				segments.push(segment);
				continue;
			}
		};

		let variable = match decl.split_once(':') {
			Some((name, default)) => {
				found_default = true;
				PathVariable {
					name: name.to_owned(),
					default: Some(default.to_owned()),
				}
			}
			None if found_default => return Err(PatternError::DefaultOrder(pattern.to_owned())),
			None => PathVariable {
				name: decl.to_owned(),
				default: None,
			},
		};

		if variable.name.is_empty() {
			return Err(PatternError::UnnamedVariable(pattern.to_owned()));
		}

		variables.push((i, variable));
		segments.push("*");
	}

	Ok((segments.join("/"), variables))
}
