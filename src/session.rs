//! Credential state: the bearer session record, storage contracts, and the logout gateway.
//!
//! The crate implements the bearer-token transport variant: an access/refresh pair lives in an
//! injected [`CredentialStore`] and is attached to requests as an `Authorization: Bearer`
//! header. The store is a constructor dependency of the client, never an ambient global, so
//! fakes drop in trivially for tests.

pub mod claims;
pub mod file;
pub mod memory;

mod secret;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use secret::TokenSecret;

// self
use crate::_prelude::*;

/// Boxed future returned by [`CredentialStore`] operations.
pub type SessionFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SessionError>> + 'a + Send>>;

/// Persistence contract for the ambient bearer session.
///
/// The client reads the store before attaching credentials and writes it after a successful
/// refresh, so a persisted session must be visible to the immediately-following request.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Fetches the current session, if one is present.
	fn load(&self) -> SessionFuture<'_, Option<AuthSession>>;

	/// Persists or replaces the current session.
	fn save(&self, session: AuthSession) -> SessionFuture<'_, ()>;

	/// Removes all persisted credential state.
	fn clear(&self) -> SessionFuture<'_, ()>;
}

/// Navigation hook invoked on unrecoverable authentication failure.
///
/// The embedding application owns routing; the client only guarantees the hook fires exactly
/// once per escalated request, after local credential state has been cleared.
pub trait SessionGateway
where
	Self: Send + Sync,
{
	/// Forces the user agent to the login entry point.
	fn redirect_to_login(&self);
}

/// Gateway that ignores escalations; suitable for headless tooling.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullGateway;
impl SessionGateway for NullGateway {
	fn redirect_to_login(&self) {}
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum SessionError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Ambient bearer session attached to outgoing requests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
	/// Short-lived access token sent as the `Authorization` header.
	pub access_token: TokenSecret,
	/// Long-lived refresh token exchanged at the refresh endpoint.
	pub refresh_token: Option<TokenSecret>,
	/// Access token expiry, when the backend reported one.
	#[serde(default, with = "time::serde::timestamp::option")]
	pub expires_at: Option<OffsetDateTime>,
}
impl AuthSession {
	/// Creates a session holding only an access token.
	pub fn new(access_token: impl Into<String>) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: None,
			expires_at: None,
		}
	}

	/// Attaches a refresh token.
	pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
		self.refresh_token = Some(TokenSecret::new(refresh_token));

		self
	}

	/// Sets the access token expiry instant.
	pub fn with_expires_at(mut self, expires_at: OffsetDateTime) -> Self {
		self.expires_at = Some(expires_at);

		self
	}

	/// Returns `true` when the session's known expiry falls within `window` of `now`.
	///
	/// A session without a recorded expiry is assumed live; guards that need a stricter answer
	/// can decode the token's own claim via [`claims::expires_within`].
	pub fn expires_within(&self, now: OffsetDateTime, window: Duration) -> bool {
		self.expires_at.is_some_and(|expires_at| expires_at - now <= window)
	}
}
