use thiserror::Error;

/// Failures raised while registering patterns. Routing itself never fails: an
/// unmatched request resolves to the router's not-found handler instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
	#[error("pattern must not be empty")]
	Empty,

	#[error("pattern {0:?} is already registered")]
	Duplicate(String),

	#[error("invalid pattern {0:?}: cannot have defaulted component followed by non-defaulted component")]
	DefaultOrder(String),

	#[error("invalid pattern {0:?}: variable segment has no name")]
	UnnamedVariable(String),

	#[error("invalid method {0:?}")]
	InvalidMethod(String),
}
