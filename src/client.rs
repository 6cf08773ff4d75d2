//! Resilient request pipeline for the Tavuel admin API.
//!
//! [`ApiClient`] issues requests against a single configured origin, attaches the ambient
//! bearer credential from the injected store, and transparently recovers from exactly one
//! class of failure: an expired or invalid credential. A 401 routes through the single-flight
//! [`RefreshCoordinator`]; on renewal the identical request is reissued exactly once with the
//! refreshed credential. If the refresh is rejected—or the retried request 401s again—the
//! client clears local credential state, fires a best-effort logout notice, redirects the user
//! agent via the [`SessionGateway`], and fails the call with `ApiError(401)`. Every other
//! non-2xx status surfaces directly; network-level failures are never retried.

mod config;

pub use config::{API_URL_ENV, ClientConfig};

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{ApiError, ConfigError, DecodeError, ErrorBody},
	http::{HttpTransport, Method, OutboundRequest, RawResponse, UNAUTHORIZED},
	obs::{self, RequestKind, RequestOutcome, RequestSpan},
	query::QueryPairs,
	refresh::{RefreshCoordinator, RefreshMetrics, RefreshOutcome},
	session::{AuthSession, CredentialStore, SessionGateway, TokenSecret},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestTransport>;

/// Serializes as the backend's empty JSON object body, `{}`.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct EmptyBody {}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
	email: &'a str,
	password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
	refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshGrant {
	access_token: TokenSecret,
	#[serde(default)]
	refresh_token: Option<TokenSecret>,
	#[serde(default)]
	expires_in: Option<i64>,
}

/// Payload returned by the login endpoint; the `user` profile is an opaque backend shape.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
	/// Short-lived access token.
	pub access_token: TokenSecret,
	/// Long-lived refresh token, when the backend issues one.
	#[serde(default)]
	pub refresh_token: Option<TokenSecret>,
	/// Access token lifetime in seconds, when reported.
	#[serde(default)]
	pub expires_in: Option<i64>,
	/// Authenticated admin profile as the backend shaped it.
	#[serde(default)]
	pub user: JsonValue,
}

/// Resilient client for a single backend origin.
///
/// The client owns the transport, credential store, session gateway, and refresh coordinator
/// so callers can issue requests without knowing about token lifecycle. Clones share all of
/// them, which is what makes the single-flight refresh invariant hold process-wide.
pub struct ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	transport: Arc<T>,
	store: Arc<dyn CredentialStore>,
	gateway: Arc<dyn SessionGateway>,
	config: ClientConfig,
	coordinator: Arc<RefreshCoordinator>,
	refresh_metrics: Arc<RefreshMetrics>,
}
impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(
		config: ClientConfig,
		transport: impl Into<Arc<T>>,
		store: Arc<dyn CredentialStore>,
		gateway: Arc<dyn SessionGateway>,
	) -> Self {
		Self {
			transport: transport.into(),
			store,
			gateway,
			config,
			coordinator: Default::default(),
			refresh_metrics: Default::default(),
		}
	}

	/// Returns the active configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Returns the shared refresh counters.
	pub fn refresh_metrics(&self) -> &RefreshMetrics {
		&self.refresh_metrics
	}

	/// Issues a `GET` request, appending the defined query parameters.
	pub async fn get<R>(&self, path: &str, query: Option<QueryPairs>) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.dispatch(Method::Get, path, query, None).await
	}

	/// Issues a `POST` request with a JSON body.
	pub async fn post<R, B>(&self, path: &str, body: &B) -> Result<R>
	where
		R: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		self.dispatch(Method::Post, path, None, Some(Self::encode_body(body)?)).await
	}

	/// Issues a `PATCH` request with a JSON body.
	pub async fn patch<R, B>(&self, path: &str, body: &B) -> Result<R>
	where
		R: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		self.dispatch(Method::Patch, path, None, Some(Self::encode_body(body)?)).await
	}

	/// Issues a `PUT` request with a JSON body.
	pub async fn put<R, B>(&self, path: &str, body: &B) -> Result<R>
	where
		R: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		self.dispatch(Method::Put, path, None, Some(Self::encode_body(body)?)).await
	}

	/// Issues a `DELETE` request.
	pub async fn delete<R>(&self, path: &str) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.dispatch(Method::Delete, path, None, None).await
	}

	/// Authenticates against the login endpoint and persists the issued session.
	pub async fn login(&self, email: &str, password: &str) -> Result<LoginPayload> {
		let body = Self::encode_body(&LoginRequest { email, password })?;
		let url = self.config.endpoint(self.config.login_path(), None)?;
		let request = OutboundRequest::new(Method::Post, url).with_body(body);
		let response = self.transport.execute(request).await?;

		if !response.is_success() {
			return Err(
				ApiError::new(response.status, Self::decode_error_body(&response)).into()
			);
		}

		let payload: LoginPayload = Self::decode_payload(&response)?;
		let mut session = AuthSession {
			access_token: payload.access_token.clone(),
			refresh_token: payload.refresh_token.clone(),
			expires_at: None,
		};

		if let Some(expires_in) = payload.expires_in {
			session.expires_at = Some(OffsetDateTime::now_utc() + Duration::seconds(expires_in));
		}

		self.store.save(session).await?;

		Ok(payload)
	}

	/// Ends the current session: best-effort server notice, then local credential wipe.
	pub async fn logout(&self) -> Result<()> {
		self.notify_logout().await;
		self.store.clear().await?;

		Ok(())
	}

	async fn dispatch<R>(
		&self,
		method: Method,
		path: &str,
		query: Option<QueryPairs>,
		body: Option<Vec<u8>>,
	) -> Result<R>
	where
		R: DeserializeOwned,
	{
		let span = RequestSpan::new(RequestKind::Call, method.as_str());

		obs::record_request_outcome(RequestKind::Call, RequestOutcome::Attempt);

		let result = span.instrument(self.dispatch_inner(method, path, query, body)).await;

		match &result {
			Ok(_) => obs::record_request_outcome(RequestKind::Call, RequestOutcome::Success),
			Err(_) => obs::record_request_outcome(RequestKind::Call, RequestOutcome::Failure),
		}

		result
	}

	async fn dispatch_inner<R>(
		&self,
		method: Method,
		path: &str,
		query: Option<QueryPairs>,
		body: Option<Vec<u8>>,
	) -> Result<R>
	where
		R: DeserializeOwned,
	{
		let url = self.config.endpoint(path, query.as_ref())?;
		let request = self.build_request(method, url, body).await?;
		let response = self.transport.execute(request.clone()).await?;

		if response.status != UNAUTHORIZED {
			return Self::finish(response);
		}

		match self.coordinate_refresh().await {
			RefreshOutcome::Renewed => {
				let retried = self.reattach_credential(request).await?;
				let retry_response = self.transport.execute(retried).await?;

				// A 401 on the retried request means the renewed credential was rejected
				// too; no second refresh is attempted for this call.
				if retry_response.status != UNAUTHORIZED {
					return Self::finish(retry_response);
				}

				Err(self.escalate(retry_response).await)
			},
			RefreshOutcome::Rejected => Err(self.escalate(response).await),
		}
	}

	async fn build_request(
		&self,
		method: Method,
		url: Url,
		body: Option<Vec<u8>>,
	) -> Result<OutboundRequest> {
		let session = self.store.load().await?;
		let mut request = OutboundRequest::new(method, url)
			.with_bearer(session.map(|session| session.access_token));

		if let Some(body) = body {
			request = request.with_body(body);
		}

		Ok(request)
	}

	/// Rebuilds the identical request with the credential the refresh just persisted.
	async fn reattach_credential(&self, request: OutboundRequest) -> Result<OutboundRequest> {
		let session = self.store.load().await?;

		Ok(request.with_bearer(session.map(|session| session.access_token)))
	}

	async fn coordinate_refresh(&self) -> RefreshOutcome {
		let span = RequestSpan::new(RequestKind::Refresh, "coordinate");

		span.instrument(self.coordinator.coordinate(|| self.perform_refresh())).await
	}

	async fn perform_refresh(&self) -> Result<()> {
		self.refresh_metrics.record_attempt();
		obs::record_request_outcome(RequestKind::Refresh, RequestOutcome::Attempt);

		let result = self.renew_credentials().await;

		match &result {
			Ok(()) => {
				self.refresh_metrics.record_success();
				obs::record_request_outcome(RequestKind::Refresh, RequestOutcome::Success);
			},
			Err(_) => {
				self.refresh_metrics.record_failure();
				obs::record_request_outcome(RequestKind::Refresh, RequestOutcome::Failure);
			},
		}

		result
	}

	/// Exchanges the refresh token and persists the renewed session before returning, so the
	/// immediately-following retry reads the new credential from the store.
	async fn renew_credentials(&self) -> Result<()> {
		let session = self.store.load().await?;
		let refresh_token = session
			.as_ref()
			.and_then(|session| session.refresh_token.clone())
			.ok_or(ConfigError::MissingRefreshToken)?;
		let url = self.config.endpoint(self.config.refresh_path(), None)?;
		let body =
			Self::encode_body(&RefreshRequest { refresh_token: refresh_token.expose() })?;
		let request = OutboundRequest::new(Method::Post, url).with_body(body);
		let response = self.transport.execute(request).await?;

		if !response.is_success() {
			return Err(
				ApiError::new(response.status, Self::decode_error_body(&response)).into()
			);
		}

		let grant: RefreshGrant = Self::decode_payload(&response)?;
		let renewed = AuthSession {
			access_token: grant.access_token,
			// Backends that do not rotate refresh tokens keep the previous one valid.
			refresh_token: grant.refresh_token.or(Some(refresh_token)),
			expires_at: grant
				.expires_in
				.map(|seconds| OffsetDateTime::now_utc() + Duration::seconds(seconds)),
		};

		self.store.save(renewed).await?;

		Ok(())
	}

	/// Unrecoverable authentication failure: wipe credentials, notify the backend on a
	/// best-effort basis, redirect to login exactly once, and surface `ApiError(401)`.
	async fn escalate(&self, response: RawResponse) -> Error {
		let _ = self.store.clear().await;

		self.notify_logout().await;
		self.gateway.redirect_to_login();

		ApiError::new(response.status, Self::decode_error_body(&response)).into()
	}

	// Failure here must never block the redirect.
	async fn notify_logout(&self) {
		let Ok(url) = self.config.endpoint(self.config.logout_path(), None) else {
			return;
		};
		let request = OutboundRequest::new(Method::Post, url);
		let _ = self.transport.execute(request).await;
	}

	fn finish<R>(response: RawResponse) -> Result<R>
	where
		R: DeserializeOwned,
	{
		if !response.is_success() {
			return Err(
				ApiError::new(response.status, Self::decode_error_body(&response)).into()
			);
		}

		Self::decode_payload(&response)
	}

	fn decode_payload<R>(response: &RawResponse) -> Result<R>
	where
		R: DeserializeOwned,
	{
		if response.is_json() {
			let mut deserializer = serde_json::Deserializer::from_slice(&response.body);

			serde_path_to_error::deserialize(&mut deserializer)
				.map_err(|source| DecodeError { source, status: response.status }.into())
		} else {
			serde_path_to_error::deserialize(JsonValue::String(response.text()))
				.map_err(|source| DecodeError { source, status: response.status }.into())
		}
	}

	fn decode_error_body(response: &RawResponse) -> ErrorBody {
		if response.is_json()
			&& let Ok(value) = serde_json::from_slice(&response.body)
		{
			return ErrorBody::Json(value);
		}

		ErrorBody::Text(response.text())
	}

	fn encode_body<B>(body: &B) -> Result<Vec<u8>>
	where
		B: ?Sized + Serialize,
	{
		serde_json::to_vec(body).map_err(|source| ConfigError::SerializeBody { source }.into())
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestTransport> {
	/// Creates a client backed by the crate's default reqwest transport.
	pub fn new(
		config: ClientConfig,
		store: Arc<dyn CredentialStore>,
		gateway: Arc<dyn SessionGateway>,
	) -> Self {
		Self::with_transport(config, ReqwestTransport::default(), store, gateway)
	}
}
impl<T> Clone for ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			store: self.store.clone(),
			gateway: self.gateway.clone(),
			config: self.config.clone(),
			coordinator: self.coordinator.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
		}
	}
}
impl<T> Debug for ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient").field("config", &self.config).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn empty_body_serializes_as_empty_object() {
		let payload =
			serde_json::to_string(&EmptyBody {}).expect("Failed to serialize empty body.");

		assert_eq!(payload, "{}");
	}

	#[test]
	fn refresh_request_uses_the_backend_wire_casing() {
		let payload = serde_json::to_value(RefreshRequest { refresh_token: "r-1" })
			.expect("Failed to serialize refresh request.");

		assert_eq!(payload, serde_json::json!({ "refreshToken": "r-1" }));
	}

	#[test]
	fn login_payload_tolerates_missing_optional_fields() {
		let payload: LoginPayload =
			serde_json::from_value(serde_json::json!({ "accessToken": "a-1" }))
				.expect("Failed to deserialize minimal login payload.");

		assert_eq!(payload.access_token.expose(), "a-1");
		assert!(payload.refresh_token.is_none());
		assert!(payload.expires_in.is_none());
		assert!(payload.user.is_null());
	}
}
