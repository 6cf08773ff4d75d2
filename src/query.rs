//! Query-string construction for admin API requests.
//!
//! Only defined parameters reach the wire: `push_opt` silently drops `None` values so optional
//! filters never appear in the URL. Percent-encoding is delegated to [`Url`].

// self
use crate::_prelude::*;

/// Ordered collection of query parameters with scalar values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryPairs(Vec<(String, String)>);
impl QueryPairs {
	/// Creates an empty collection.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns `true` when no parameters have been recorded.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns the number of recorded parameters.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Records a parameter, coercing the value to its string form.
	pub fn push(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
		self.0.push((key.into(), value.into().into_string()));
	}

	/// Records a parameter only when the value is defined.
	pub fn push_opt<V>(&mut self, key: impl Into<String>, value: Option<V>)
	where
		V: Into<QueryValue>,
	{
		if let Some(value) = value {
			self.push(key, value);
		}
	}

	/// Builder-style variant of [`push`](Self::push).
	pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
		self.push(key, value);

		self
	}

	/// Builder-style variant of [`push_opt`](Self::push_opt).
	pub fn with_opt<V>(mut self, key: impl Into<String>, value: Option<V>) -> Self
	where
		V: Into<QueryValue>,
	{
		self.push_opt(key, value);

		self
	}

	/// Appends the recorded parameters to `url`, leaving it untouched when empty.
	pub fn apply(&self, url: &mut Url) {
		if self.0.is_empty() {
			return;
		}

		let mut pairs = url.query_pairs_mut();

		for (key, value) in &self.0 {
			pairs.append_pair(key, value);
		}
	}

	/// Iterates over the recorded key/value pairs.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
	}
}

/// Scalar query parameter value prior to string coercion.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryValue {
	/// Boolean flag, rendered as `true`/`false`.
	Bool(bool),
	/// Signed integer.
	Int(i64),
	/// Unsigned integer.
	UInt(u64),
	/// Free-form text.
	Text(String),
}
impl QueryValue {
	fn into_string(self) -> String {
		match self {
			Self::Bool(value) => value.to_string(),
			Self::Int(value) => value.to_string(),
			Self::UInt(value) => value.to_string(),
			Self::Text(value) => value,
		}
	}
}
impl From<bool> for QueryValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}
impl From<i32> for QueryValue {
	fn from(value: i32) -> Self {
		Self::Int(value.into())
	}
}
impl From<i64> for QueryValue {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}
impl From<u32> for QueryValue {
	fn from(value: u32) -> Self {
		Self::UInt(value.into())
	}
}
impl From<u64> for QueryValue {
	fn from(value: u64) -> Self {
		Self::UInt(value)
	}
}
impl From<&str> for QueryValue {
	fn from(value: &str) -> Self {
		Self::Text(value.into())
	}
}
impl From<String> for QueryValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn base_url() -> Url {
		Url::parse("http://localhost:3000/v1/admin/users").expect("Failed to parse fixture URL.")
	}

	#[test]
	fn defined_parameters_are_string_coerced() {
		let query = QueryPairs::new().with("role", "ADMIN").with("limit", 50_u32).with("active", true);
		let mut url = base_url();

		query.apply(&mut url);

		assert_eq!(url.query(), Some("role=ADMIN&limit=50&active=true"));
	}

	#[test]
	fn undefined_parameters_never_reach_the_url() {
		let query = QueryPairs::new()
			.with_opt("role", Some("ADMIN"))
			.with_opt::<&str>("search", None)
			.with_opt::<u32>("page", None);
		let mut url = base_url();

		query.apply(&mut url);

		assert_eq!(query.len(), 1);
		assert_eq!(url.query(), Some("role=ADMIN"));
	}

	#[test]
	fn empty_collection_leaves_url_without_query() {
		let query = QueryPairs::new();
		let mut url = base_url();

		query.apply(&mut url);

		assert!(query.is_empty());
		assert_eq!(url.query(), None);
		assert!(!url.as_str().contains('?'));
	}

	#[test]
	fn values_are_percent_encoded() {
		let query = QueryPairs::new().with("search", "ana maria");
		let mut url = base_url();

		query.apply(&mut url);

		assert_eq!(url.query(), Some("search=ana+maria"));
	}
}
