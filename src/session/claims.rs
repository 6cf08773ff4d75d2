//! Best-effort JWT expiry inspection for routing guards.
//!
//! Guards redirecting unauthenticated sessions need to know whether a bearer token is about to
//! expire without holding the backend's signing key. The helpers here decode the unverified
//! `exp` claim from the token payload and apply the guard leeway: a token expiring within 30
//! seconds is treated as already expired. The request pipeline itself never consults these
//! helpers; a stale token simply 401s and goes through the refresh protocol.

// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
// self
use crate::_prelude::*;

/// Leeway applied by routing guards: tokens expiring this soon count as expired.
pub const GUARD_LEEWAY: Duration = Duration::seconds(30);

#[derive(Debug, Deserialize)]
struct Claims {
	exp: i64,
}

/// Decodes the unverified `exp` claim from a compact JWT, if present and well-formed.
pub fn token_expiry(token: &str) -> Option<OffsetDateTime> {
	let payload = token.split('.').nth(1)?;
	let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
	let claims: Claims = serde_json::from_slice(&bytes).ok()?;

	OffsetDateTime::from_unix_timestamp(claims.exp).ok()
}

/// Returns `true` when the token expires within `leeway` of now.
///
/// Tokens whose expiry cannot be decoded are treated as expired, so guards fail toward the
/// login page rather than toward a broken session.
pub fn expires_within(token: &str, leeway: Duration) -> bool {
	match token_expiry(token) {
		Some(expiry) => expiry - OffsetDateTime::now_utc() <= leeway,
		None => true,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn forge_token(exp: i64) -> String {
		let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
		let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp}}}"#));

		format!("{header}.{payload}.signature")
	}

	#[test]
	fn expiry_claim_is_decoded_without_verification() {
		let exp = 1_900_000_000;
		let expiry =
			token_expiry(&forge_token(exp)).expect("Failed to decode forged expiry claim.");

		assert_eq!(expiry.unix_timestamp(), exp);
	}

	#[test]
	fn leeway_treats_imminent_expiry_as_expired() {
		let soon = (OffsetDateTime::now_utc() + Duration::seconds(10)).unix_timestamp();
		let later = (OffsetDateTime::now_utc() + Duration::hours(1)).unix_timestamp();

		assert!(expires_within(&forge_token(soon), GUARD_LEEWAY));
		assert!(!expires_within(&forge_token(later), GUARD_LEEWAY));
	}

	#[test]
	fn malformed_tokens_count_as_expired() {
		assert!(token_expiry("not-a-jwt").is_none());
		assert!(expires_within("not-a-jwt", GUARD_LEEWAY));
		assert!(expires_within("a.%%%.c", GUARD_LEEWAY));
	}
}
