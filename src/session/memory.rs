//! Thread-safe in-memory [`CredentialStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	session::{AuthSession, CredentialStore, SessionFuture},
};

type SessionSlot = Arc<RwLock<Option<AuthSession>>>;

/// Thread-safe storage backend that keeps the session in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(SessionSlot);
impl MemoryStore {
	/// Creates a store pre-populated with `session`.
	pub fn with_session(session: AuthSession) -> Self {
		Self(Arc::new(RwLock::new(Some(session))))
	}
}
impl CredentialStore for MemoryStore {
	fn load(&self) -> SessionFuture<'_, Option<AuthSession>> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(slot.read().clone()) })
	}

	fn save(&self, session: AuthSession) -> SessionFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			*slot.write() = Some(session);

			Ok(())
		})
	}

	fn clear(&self) -> SessionFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			*slot.write() = None;

			Ok(())
		})
	}
}
