//! Transport primitives for the resilient request pipeline.
//!
//! The module exposes [`HttpTransport`] alongside [`OutboundRequest`] and [`RawResponse`] so
//! downstream crates can integrate custom HTTP stacks. A transport executes exactly one
//! request and reports the raw status/body pair; HTTP error statuses are data for the
//! pipeline, not transport errors. Only connection-level failures surface as
//! [`TransportError`](crate::error::TransportError).

// std
use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")]
use reqwest::header::{CONTENT_TYPE, HeaderValue};
// self
use crate::{_prelude::*, error::TransportError, session::TokenSecret};

/// MIME type attached to JSON request bodies.
pub const APPLICATION_JSON: &str = "application/json";
/// Status code that triggers the refresh-and-retry protocol.
pub const UNAUTHORIZED: u16 = 401;

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing admin API requests.
///
/// The trait is the client's only dependency on an HTTP implementation. Callers provide an
/// implementation (typically behind `Arc<T>` where `T: HttpTransport`) and the client hands it
/// fully-built [`OutboundRequest`] values. Implementations must be `Send + Sync + 'static` so
/// they can be shared across client clones without additional wrappers.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes a single request, resolving with the raw response.
	///
	/// Non-2xx statuses are successful executions from the transport's point of view; only
	/// connection-level failures (DNS, TCP, TLS, IO) map to [`TransportError`].
	fn execute(&self, request: OutboundRequest) -> TransportFuture<'_>;
}

/// HTTP verbs supported by the admin API surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// Idempotent read.
	Get,
	/// Resource creation or RPC-style action.
	Post,
	/// Partial update.
	Patch,
	/// Full replacement.
	Put,
	/// Resource removal.
	Delete,
}
impl Method {
	/// Returns the canonical uppercase verb label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Patch => "PATCH",
			Method::Put => "PUT",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
#[cfg(feature = "reqwest")]
impl From<Method> for reqwest::Method {
	fn from(method: Method) -> Self {
		match method {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
			Method::Patch => reqwest::Method::PATCH,
			Method::Put => reqwest::Method::PUT,
			Method::Delete => reqwest::Method::DELETE,
		}
	}
}

/// Fully-built request descriptor handed to an [`HttpTransport`].
///
/// The descriptor is `Clone` so the pipeline can reissue the identical request once after a
/// credential refresh, swapping only the bearer secret.
#[derive(Clone, Debug)]
pub struct OutboundRequest {
	method: Method,
	url: Url,
	bearer: Option<TokenSecret>,
	body: Option<Vec<u8>>,
}
impl OutboundRequest {
	/// Creates a descriptor for the provided verb and absolute URL.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, bearer: None, body: None }
	}

	/// Sets or clears the ambient bearer credential.
	pub fn with_bearer(mut self, bearer: Option<TokenSecret>) -> Self {
		self.bearer = bearer;

		self
	}

	/// Attaches a pre-serialized JSON body.
	pub fn with_body(mut self, body: Vec<u8>) -> Self {
		self.body = Some(body);

		self
	}

	/// Returns the request verb.
	pub fn method(&self) -> Method {
		self.method
	}

	/// Returns the absolute request URL.
	pub fn url(&self) -> &Url {
		&self.url
	}

	/// Returns the attached bearer credential, if any.
	pub fn bearer(&self) -> Option<&TokenSecret> {
		self.bearer.as_ref()
	}

	/// Returns the serialized body, if any.
	pub fn body(&self) -> Option<&[u8]> {
		self.body.as_deref()
	}

	/// Whether a `Content-Type: application/json` header accompanies the request.
	///
	/// Attached for every verb except `GET` and `DELETE`, matching the backend's expectation
	/// that only mutating verbs carry JSON payloads.
	pub fn json_content_type(&self) -> bool {
		!matches!(self.method, Method::Get | Method::Delete)
	}
}

/// Raw response captured by a transport before the pipeline decodes it.
#[derive(Clone, Debug, Default)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Declared `Content-Type` header value, if any.
	pub content_type: Option<String>,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// Returns `true` for any 2xx status.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns `true` when the response declares a JSON content type.
	pub fn is_json(&self) -> bool {
		self.content_type.as_deref().is_some_and(|value| value.contains(APPLICATION_JSON))
	}

	/// Returns the body as text, replacing invalid UTF-8 sequences.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn execute(&self, request: OutboundRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder = client.request(request.method().into(), request.url().clone());

			if request.json_content_type() {
				builder =
					builder.header(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
			}
			if let Some(bearer) = request.bearer() {
				builder = builder.bearer_auth(bearer.expose());
			}
			if let Some(body) = request.body() {
				builder = builder.body(body.to_vec());
			}

			let response = builder.send().await.map_err(TransportError::network)?;
			let status = response.status().as_u16();
			let content_type = response
				.headers()
				.get(CONTENT_TYPE)
				.and_then(|value| value.to_str().ok())
				.map(str::to_owned);
			let body = response.bytes().await.map_err(TransportError::network)?.to_vec();

			Ok(RawResponse { status, content_type, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn request(method: Method) -> OutboundRequest {
		let url = Url::parse("http://localhost:3000/v1/admin/users")
			.expect("Failed to parse fixture URL.");

		OutboundRequest::new(method, url)
	}

	#[test]
	fn content_type_is_attached_only_for_mutating_verbs() {
		assert!(!request(Method::Get).json_content_type());
		assert!(!request(Method::Delete).json_content_type());
		assert!(request(Method::Post).json_content_type());
		assert!(request(Method::Patch).json_content_type());
		assert!(request(Method::Put).json_content_type());
	}

	#[test]
	fn raw_response_classifies_status_and_content_type() {
		let ok = RawResponse {
			status: 204,
			content_type: Some("application/json; charset=utf-8".into()),
			body: Vec::new(),
		};

		assert!(ok.is_success());
		assert!(ok.is_json());

		let failed = RawResponse { status: 502, content_type: Some("text/html".into()), ..ok };

		assert!(!failed.is_success());
		assert!(!failed.is_json());
	}

	#[test]
	fn bearer_is_redacted_in_debug_output() {
		let described = format!(
			"{:?}",
			request(Method::Get).with_bearer(Some(crate::session::TokenSecret::new("secret")))
		);

		assert!(!described.contains("secret"));
		assert!(described.contains("<redacted>"));
	}
}
