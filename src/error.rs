//! Client-level error types shared across the transport, session, and request pipeline.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Backend returned a non-2xx status after all recovery attempts.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Response body could not be decoded into the caller's expected shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Credential-store failure.
	#[error("{0}")]
	Session(
		#[from]
		#[source]
		crate::session::SessionError,
	),
	/// Transport failure (DNS, TCP, TLS); never retried.
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// HTTP failure carrying the status code and the decoded error body.
///
/// Raised for any non-2xx outcome that is not recovered locally, including an
/// unauthorized request whose refresh-and-retry cycle was exhausted.
#[derive(Debug, ThisError)]
#[error("API error: {status}.")]
pub struct ApiError {
	/// HTTP status code returned by the backend.
	pub status: u16,
	/// Error body decoded per the response's declared content type.
	pub body: ErrorBody,
}
impl ApiError {
	/// Builds an error from a status code and decoded body.
	pub fn new(status: u16, body: ErrorBody) -> Self {
		Self { status, body }
	}

	/// Returns `true` when the backend rejected the request's credentials.
	pub fn is_unauthorized(&self) -> bool {
		self.status == 401
	}
}

/// Error payload decoded from a non-2xx response.
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorBody {
	/// Structured payload; the response declared a JSON content type.
	Json(JsonValue),
	/// Raw text payload for any other content type.
	Text(String),
}
impl ErrorBody {
	/// Extracts the backend's human-readable `message` field, when present.
	pub fn message(&self) -> Option<&str> {
		match self {
			Self::Json(value) => value.get("message").and_then(JsonValue::as_str),
			Self::Text(text) => Some(text),
		}
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Base origin URL cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A request path does not combine with the base origin into a valid URL.
	#[error("Request path `{path}` does not produce a valid URL.")]
	InvalidPath {
		/// Offending path fragment.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Caller-provided request body cannot be serialized to JSON.
	#[error("Request body could not be serialized to JSON.")]
	SerializeBody {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// No refresh credential is available for the current session.
	#[error("No refresh token is available for the current session.")]
	MissingRefreshToken,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for ConfigError {
	fn from(e: reqwest::Error) -> Self {
		Self::http_client_build(e)
	}
}

/// Malformed response body on an otherwise routable request.
#[derive(Debug, ThisError)]
#[error("Response body could not be decoded.")]
pub struct DecodeError {
	/// Structured parsing failure with the path to the offending field.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
	/// HTTP status code the body arrived with.
	pub status: u16,
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for TransportError {
	fn from(e: reqwest::Error) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn api_error_exposes_status_and_message() {
		let body = ErrorBody::Json(serde_json::json!({ "message": "Forbidden resource" }));
		let err = ApiError::new(403, body);

		assert!(!err.is_unauthorized());
		assert_eq!(err.to_string(), "API error: 403.");
		assert_eq!(err.body.message(), Some("Forbidden resource"));
	}

	#[test]
	fn text_body_message_returns_raw_text() {
		let body = ErrorBody::Text("upstream timed out".into());

		assert_eq!(body.message(), Some("upstream timed out"));
	}

	#[test]
	fn unauthorized_helper_matches_401_only() {
		let err = ApiError::new(401, ErrorBody::Text("Unauthorized".into()));

		assert!(err.is_unauthorized());
		assert!(matches!(Error::from(err), Error::Api(inner) if inner.status == 401));
	}
}
