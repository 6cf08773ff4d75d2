//! Client configuration: base origin and well-known auth endpoint paths.

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError, query::QueryPairs};

/// Environment variable overriding the default API origin.
pub const API_URL_ENV: &str = "TAVUEL_API_URL";

const DEFAULT_BASE_URL: &str = "http://localhost:3000/v1";
const DEFAULT_LOGIN_PATH: &str = "/auth/login";
const DEFAULT_REFRESH_PATH: &str = "/auth/refresh";
const DEFAULT_LOGOUT_PATH: &str = "/auth/logout";

/// Immutable configuration shared by every request a client issues.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	base: Url,
	login_path: String,
	refresh_path: String,
	logout_path: String,
}
impl ClientConfig {
	/// Creates a configuration for the provided base origin with default auth paths.
	pub fn new(base: Url) -> Self {
		Self {
			base,
			login_path: DEFAULT_LOGIN_PATH.into(),
			refresh_path: DEFAULT_REFRESH_PATH.into(),
			logout_path: DEFAULT_LOGOUT_PATH.into(),
		}
	}

	/// Reads the base origin from [`API_URL_ENV`], falling back to the local default.
	pub fn from_env() -> Result<Self, ConfigError> {
		let raw = env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.into());
		let base = Url::parse(&raw).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		Ok(Self::new(base))
	}

	/// Overrides the login endpoint path.
	pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
		self.login_path = path.into();

		self
	}

	/// Overrides the refresh endpoint path.
	pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
		self.refresh_path = path.into();

		self
	}

	/// Overrides the logout endpoint path.
	pub fn with_logout_path(mut self, path: impl Into<String>) -> Self {
		self.logout_path = path.into();

		self
	}

	/// Returns the configured base origin.
	pub fn base(&self) -> &Url {
		&self.base
	}

	/// Returns the login endpoint path.
	pub fn login_path(&self) -> &str {
		&self.login_path
	}

	/// Returns the refresh endpoint path.
	pub fn refresh_path(&self) -> &str {
		&self.refresh_path
	}

	/// Returns the logout endpoint path.
	pub fn logout_path(&self) -> &str {
		&self.logout_path
	}

	/// Builds the absolute URL for `path`, appending the defined query parameters.
	///
	/// The base origin's own path segment (e.g. a `/v1` prefix) is preserved; `path` is
	/// concatenated rather than resolved, matching how the backend mounts its routes.
	pub fn endpoint(&self, path: &str, query: Option<&QueryPairs>) -> Result<Url, ConfigError> {
		let mut raw =
			String::with_capacity(self.base.as_str().len() + path.len() + 1);

		raw.push_str(self.base.as_str().trim_end_matches('/'));

		if !path.starts_with('/') {
			raw.push('/');
		}

		raw.push_str(path);

		let mut url = Url::parse(&raw)
			.map_err(|source| ConfigError::InvalidPath { path: path.into(), source })?;

		if let Some(query) = query {
			query.apply(&mut url);
		}

		Ok(url)
	}
}
