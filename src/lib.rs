//! Resilient client for the Tavuel admin API—bearer auth, single-flight token refresh, and
//! transparent retry in one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod admin;
pub mod client;
pub mod error;
pub mod http;
pub mod obs;
pub mod query;
pub mod refresh;
pub mod session;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	// std
	use std::sync::atomic::{AtomicUsize, Ordering};

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::{ApiClient, ClientConfig},
		http::ReqwestTransport,
		session::{AuthSession, CredentialStore, MemoryStore, SessionGateway},
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = ApiClient<ReqwestTransport>;

	/// Session gateway double that counts forced navigations to the login page.
	#[derive(Debug, Default)]
	pub struct RecordingGateway(AtomicUsize);
	impl RecordingGateway {
		/// Returns the number of login redirects observed so far.
		pub fn redirects(&self) -> usize {
			self.0.load(Ordering::SeqCst)
		}
	}
	impl SessionGateway for RecordingGateway {
		fn redirect_to_login(&self) {
			self.0.fetch_add(1, Ordering::SeqCst);
		}
	}

	/// Constructs an [`ApiClient`] against `base_url` backed by an in-memory credential store and
	/// a redirect-recording gateway.
	pub fn build_test_client(
		base_url: &str,
	) -> (ReqwestTestClient, Arc<MemoryStore>, Arc<RecordingGateway>) {
		let base = Url::parse(base_url).expect("Failed to parse test base URL.");
		let config = ClientConfig::new(base);
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn CredentialStore> = store_backend.clone();
		let gateway_backend = Arc::new(RecordingGateway::default());
		let gateway: Arc<dyn SessionGateway> = gateway_backend.clone();
		let client = ApiClient::new(config, store, gateway);

		(client, store_backend, gateway_backend)
	}

	/// Seeds the store with a bearer session fixture.
	pub async fn seed_session(store: &MemoryStore, access: &str, refresh: Option<&str>) {
		let mut session = AuthSession::new(access);

		if let Some(refresh) = refresh {
			session = session.with_refresh_token(refresh);
		}

		store.save(session).await.expect("Failed to seed session fixture into the store.");
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")] pub use reqwest::Client as ReqwestClient;
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value as JsonValue;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {httpmock as _, tavuel_api_client as _};
