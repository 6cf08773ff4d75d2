//! Typed surface over the `/admin` and `/verification` endpoint families.
//!
//! Every method is a thin wrapper around the verb surface of [`ApiClient`]: paths and query
//! parameters are typed here, payload shapes stay with the backend. Callers pick the row type
//! they expect (`serde_json::Value` is always a valid choice); the client performs no schema
//! validation of its own.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	client::{ApiClient, EmptyBody},
	http::HttpTransport,
	query::QueryPairs,
};

/// Pagination envelope returned by the backend's list endpoints.
#[derive(Clone, Debug, Deserialize)]
pub struct Page<T> {
	/// Rows for the requested page.
	pub data: Vec<T>,
	/// Pagination bookkeeping.
	pub meta: PageMeta,
}

/// Pagination bookkeeping attached to every [`Page`].
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
	/// Total number of rows across all pages.
	pub total: u64,
	/// One-based page index.
	pub page: u32,
	/// Page size the backend applied.
	pub limit: u32,
	/// Total number of pages.
	pub total_pages: u32,
}

/// Filters for the user list endpoint.
#[derive(Clone, Debug, Default)]
pub struct UserListQuery {
	/// One-based page index.
	pub page: Option<u32>,
	/// Page size.
	pub limit: Option<u32>,
	/// Free-text search over name/email.
	pub search: Option<String>,
	/// Role filter (`CLIENT`, `PROVIDER`, `ADMIN`).
	pub role: Option<String>,
	/// Account status filter.
	pub status: Option<String>,
}
impl UserListQuery {
	fn into_query(self) -> QueryPairs {
		QueryPairs::new()
			.with_opt("page", self.page)
			.with_opt("limit", self.limit)
			.with_opt("search", self.search)
			.with_opt("role", self.role)
			.with_opt("status", self.status)
	}
}

/// Filters for the provider list endpoint.
#[derive(Clone, Debug, Default)]
pub struct ProviderListQuery {
	/// One-based page index.
	pub page: Option<u32>,
	/// Page size.
	pub limit: Option<u32>,
	/// Free-text search.
	pub search: Option<String>,
	/// Verification pipeline state filter.
	pub verification_status: Option<String>,
}
impl ProviderListQuery {
	fn into_query(self) -> QueryPairs {
		QueryPairs::new()
			.with_opt("page", self.page)
			.with_opt("limit", self.limit)
			.with_opt("search", self.search)
			.with_opt("verificationStatus", self.verification_status)
	}
}

/// Filters for the booking list endpoint.
#[derive(Clone, Debug, Default)]
pub struct BookingListQuery {
	/// One-based page index.
	pub page: Option<u32>,
	/// Page size.
	pub limit: Option<u32>,
	/// Free-text search.
	pub search: Option<String>,
	/// Booking status filter.
	pub status: Option<String>,
	/// Inclusive range start (ISO date).
	pub start_date: Option<String>,
	/// Inclusive range end (ISO date).
	pub end_date: Option<String>,
}
impl BookingListQuery {
	fn into_query(self) -> QueryPairs {
		QueryPairs::new()
			.with_opt("page", self.page)
			.with_opt("limit", self.limit)
			.with_opt("search", self.search)
			.with_opt("status", self.status)
			.with_opt("startDate", self.start_date)
			.with_opt("endDate", self.end_date)
	}
}

/// Filters for the PQRS ticket list endpoint.
#[derive(Clone, Debug, Default)]
pub struct PqrsListQuery {
	/// One-based page index.
	pub page: Option<u32>,
	/// Page size.
	pub limit: Option<u32>,
	/// Free-text search.
	pub search: Option<String>,
	/// Ticket status filter.
	pub status: Option<String>,
	/// Ticket type filter (petition, complaint, claim, suggestion).
	pub ticket_type: Option<String>,
	/// Priority filter.
	pub priority: Option<String>,
}
impl PqrsListQuery {
	fn into_query(self) -> QueryPairs {
		QueryPairs::new()
			.with_opt("page", self.page)
			.with_opt("limit", self.limit)
			.with_opt("search", self.search)
			.with_opt("status", self.status)
			.with_opt("type", self.ticket_type)
			.with_opt("priority", self.priority)
	}
}

/// Filters for the payment list endpoint.
#[derive(Clone, Debug, Default)]
pub struct PaymentListQuery {
	/// One-based page index.
	pub page: Option<u32>,
	/// Page size.
	pub limit: Option<u32>,
	/// Payment status filter.
	pub status: Option<String>,
}
impl PaymentListQuery {
	fn into_query(self) -> QueryPairs {
		QueryPairs::new()
			.with_opt("page", self.page)
			.with_opt("limit", self.limit)
			.with_opt("status", self.status)
	}
}

/// Plain page/limit query used by queue-style endpoints.
#[derive(Clone, Copy, Debug, Default)]
pub struct PageQuery {
	/// One-based page index.
	pub page: Option<u32>,
	/// Page size.
	pub limit: Option<u32>,
}
impl PageQuery {
	fn into_query(self) -> QueryPairs {
		QueryPairs::new().with_opt("page", self.page).with_opt("limit", self.limit)
	}
}

/// Inclusive date range for the report endpoints.
#[derive(Clone, Debug)]
pub struct ReportRange {
	/// Inclusive range start (ISO date).
	pub start_date: String,
	/// Inclusive range end (ISO date).
	pub end_date: String,
}
impl ReportRange {
	fn into_query(self) -> QueryPairs {
		QueryPairs::new().with("startDate", self.start_date).with("endDate", self.end_date)
	}
}

/// Resolution submitted when closing a PQRS ticket.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PqrsResolution {
	/// Resolution kind (e.g. `FULL_REFUND`, `PARTIAL_REFUND`, `NO_REFUND`).
	pub resolution_type: String,
	/// Refund amount for partial resolutions.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub refund_amount: Option<f64>,
	/// Free-text resolution summary shown to the claimant.
	pub resolution: String,
}

/// Fields for creating a service category.
#[derive(Clone, Debug, Serialize)]
pub struct NewCategory {
	/// Display name.
	pub name: String,
	/// URL-safe identifier.
	pub slug: String,
	/// Customer-facing description.
	pub description: String,
}

/// Partial update for a service category.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CategoryPatch {
	/// Replacement display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Replacement description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

/// Fields for creating a service inside a category.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewService {
	/// Display name.
	pub name: String,
	/// URL-safe identifier.
	pub slug: String,
	/// Customer-facing description.
	pub description: String,
	/// Suggested base price.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub base_price: Option<f64>,
}

/// Partial update for a service.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePatch {
	/// Replacement display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Replacement description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Replacement base price.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub base_price: Option<f64>,
}

/// Fields for provisioning a platform administrator.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdmin {
	/// Login email.
	pub email: String,
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Initial password.
	pub password: String,
}

#[derive(Serialize)]
struct StatusUpdate<'a> {
	status: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	reason: Option<&'a str>,
}

#[derive(Serialize)]
struct ReasonBody<'a> {
	reason: &'a str,
}

#[derive(Serialize)]
struct ContentBody<'a> {
	content: &'a str,
}

/// Typed wrapper over the admin endpoint families.
pub struct AdminApi<T>
where
	T: ?Sized + HttpTransport,
{
	client: ApiClient<T>,
}
impl<T> AdminApi<T>
where
	T: ?Sized + HttpTransport,
{
	/// Wraps an existing client.
	pub fn new(client: ApiClient<T>) -> Self {
		Self { client }
	}

	/// Returns the underlying client.
	pub fn client(&self) -> &ApiClient<T> {
		&self.client
	}

	/// Fetches the aggregate dashboard statistics.
	pub async fn dashboard_stats<R>(&self) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.get("/admin/dashboard", None).await
	}

	/// Lists platform users.
	pub async fn users<R>(&self, query: UserListQuery) -> Result<Page<R>>
	where
		R: DeserializeOwned,
	{
		self.client.get("/admin/users", Some(query.into_query())).await
	}

	/// Fetches a single user.
	pub async fn user_detail<R>(&self, id: &str) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.get(&format!("/admin/users/{id}"), None).await
	}

	/// Updates a user's account status with an optional moderation reason.
	pub async fn update_user_status<R>(
		&self,
		id: &str,
		status: &str,
		reason: Option<&str>,
	) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client
			.patch(&format!("/admin/users/{id}/status"), &StatusUpdate { status, reason })
			.await
	}

	/// Lists providers.
	pub async fn providers<R>(&self, query: ProviderListQuery) -> Result<Page<R>>
	where
		R: DeserializeOwned,
	{
		self.client.get("/admin/providers", Some(query.into_query())).await
	}

	/// Fetches a single provider.
	pub async fn provider_detail<R>(&self, id: &str) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.get(&format!("/admin/providers/{id}"), None).await
	}

	/// Lists providers awaiting verification review.
	pub async fn verification_queue<R>(&self, query: PageQuery) -> Result<Page<R>>
	where
		R: DeserializeOwned,
	{
		self.client.get("/verification", Some(query.into_query())).await
	}

	/// Fetches a verification case.
	pub async fn verification_detail<R>(&self, id: &str) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.get(&format!("/verification/{id}"), None).await
	}

	/// Approves a provider's verification.
	pub async fn approve_verification<R>(&self, id: &str) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.patch(&format!("/verification/{id}/approve"), &EmptyBody {}).await
	}

	/// Rejects a provider's verification with a reason.
	pub async fn reject_verification<R>(&self, id: &str, reason: &str) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.patch(&format!("/verification/{id}/reject"), &ReasonBody { reason }).await
	}

	/// Lists bookings.
	pub async fn bookings<R>(&self, query: BookingListQuery) -> Result<Page<R>>
	where
		R: DeserializeOwned,
	{
		self.client.get("/admin/bookings", Some(query.into_query())).await
	}

	/// Fetches a single booking.
	pub async fn booking_detail<R>(&self, id: &str) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.get(&format!("/admin/bookings/{id}"), None).await
	}

	/// Fetches a booking's status history.
	pub async fn booking_timeline<R>(&self, id: &str) -> Result<Vec<R>>
	where
		R: DeserializeOwned,
	{
		self.client.get(&format!("/admin/bookings/{id}/timeline"), None).await
	}

	/// Fetches a booking's evidence uploads grouped by party.
	pub async fn booking_evidence<R>(&self, id: &str) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.get(&format!("/admin/bookings/{id}/evidence"), None).await
	}

	/// Cancels a booking on behalf of the platform.
	pub async fn cancel_booking<R>(&self, id: &str, reason: &str) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.patch(&format!("/admin/bookings/{id}/cancel"), &ReasonBody { reason }).await
	}

	/// Lists PQRS tickets.
	pub async fn pqrs<R>(&self, query: PqrsListQuery) -> Result<Page<R>>
	where
		R: DeserializeOwned,
	{
		self.client.get("/admin/pqrs", Some(query.into_query())).await
	}

	/// Fetches a single PQRS ticket.
	pub async fn pqrs_detail<R>(&self, id: &str) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.get(&format!("/admin/pqrs/{id}"), None).await
	}

	/// Assigns a ticket to the calling administrator.
	pub async fn assign_pqrs<R>(&self, id: &str) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.patch(&format!("/admin/pqrs/{id}/assign"), &EmptyBody {}).await
	}

	/// Posts a response into the ticket's message thread.
	pub async fn respond_pqrs<R>(&self, id: &str, content: &str) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.post(&format!("/admin/pqrs/{id}/respond"), &ContentBody { content }).await
	}

	/// Resolves a ticket with the provided resolution.
	pub async fn resolve_pqrs<R>(&self, id: &str, resolution: &PqrsResolution) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.patch(&format!("/admin/pqrs/{id}/resolve"), resolution).await
	}

	/// Escalates a ticket with a reason.
	pub async fn escalate_pqrs<R>(&self, id: &str, reason: &str) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.patch(&format!("/admin/pqrs/{id}/escalate"), &ReasonBody { reason }).await
	}

	/// Lists service categories.
	pub async fn categories<R>(&self) -> Result<Vec<R>>
	where
		R: DeserializeOwned,
	{
		self.client.get("/admin/categories", None).await
	}

	/// Creates a service category.
	pub async fn create_category<R>(&self, body: &NewCategory) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.post("/admin/categories", body).await
	}

	/// Applies a partial category update.
	pub async fn update_category<R>(&self, id: &str, body: &CategoryPatch) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.patch(&format!("/admin/categories/{id}"), body).await
	}

	/// Toggles a category's visibility.
	pub async fn toggle_category<R>(&self, id: &str) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.patch(&format!("/admin/categories/{id}/toggle"), &EmptyBody {}).await
	}

	/// Creates a service inside a category.
	pub async fn create_service<R>(&self, category_id: &str, body: &NewService) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.post(&format!("/admin/categories/{category_id}/services"), body).await
	}

	/// Applies a partial service update.
	pub async fn update_service<R>(&self, id: &str, body: &ServicePatch) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.patch(&format!("/admin/services/{id}"), body).await
	}

	/// Fetches the platform configuration entries.
	pub async fn system_config<R>(&self) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.get("/admin/config", None).await
	}

	/// Replaces platform configuration entries.
	pub async fn update_system_config<R, B>(&self, body: &B) -> Result<R>
	where
		R: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		self.client.patch("/admin/config", body).await
	}

	/// Provisions a platform administrator account.
	pub async fn create_admin<R>(&self, body: &NewAdmin) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.post("/admin/admins", body).await
	}

	/// Fetches the revenue report for a date range.
	pub async fn revenue_report<R>(&self, range: ReportRange) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.get("/admin/reports/revenue", Some(range.into_query())).await
	}

	/// Fetches the bookings report for a date range.
	pub async fn bookings_report<R>(&self, range: ReportRange) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.get("/admin/reports/bookings", Some(range.into_query())).await
	}

	/// Fetches the provider performance report for a date range.
	pub async fn providers_report<R>(&self, range: ReportRange) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.client.get("/admin/reports/providers", Some(range.into_query())).await
	}

	/// Lists payment records.
	pub async fn payments<R>(&self, query: PaymentListQuery) -> Result<Page<R>>
	where
		R: DeserializeOwned,
	{
		self.client.get("/admin/payments", Some(query.into_query())).await
	}
}
impl<T> Clone for AdminApi<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self { client: self.client.clone() }
	}
}
impl<T> Debug for AdminApi<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AdminApi").field("client", &self.client).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn list_queries_drop_undefined_filters() {
		let query = UserListQuery {
			page: Some(2),
			limit: Some(50),
			role: Some("ADMIN".into()),
			..Default::default()
		}
		.into_query();
		let pairs: Vec<_> = query.iter().collect();

		assert_eq!(pairs, vec![("page", "2"), ("limit", "50"), ("role", "ADMIN")]);
	}

	#[test]
	fn pqrs_type_filter_uses_the_wire_key() {
		let query = PqrsListQuery {
			ticket_type: Some("CLAIM".into()),
			..Default::default()
		}
		.into_query();
		let pairs: Vec<_> = query.iter().collect();

		assert_eq!(pairs, vec![("type", "CLAIM")]);
	}

	#[test]
	fn resolution_serializes_in_camel_case_and_omits_missing_refund() {
		let full = PqrsResolution {
			resolution_type: "FULL_REFUND".into(),
			refund_amount: None,
			resolution: "Refunded in full.".into(),
		};
		let payload = serde_json::to_value(&full).expect("Failed to serialize resolution.");

		assert_eq!(
			payload,
			serde_json::json!({
				"resolutionType": "FULL_REFUND",
				"resolution": "Refunded in full.",
			}),
		);

		let partial = PqrsResolution { refund_amount: Some(25_000.0), ..full };
		let payload = serde_json::to_value(&partial).expect("Failed to serialize resolution.");

		assert_eq!(payload["refundAmount"], serde_json::json!(25_000.0));
	}

	#[test]
	fn status_update_omits_missing_reason() {
		let payload = serde_json::to_value(StatusUpdate { status: "BANNED", reason: None })
			.expect("Failed to serialize status update.");

		assert_eq!(payload, serde_json::json!({ "status": "BANNED" }));
	}

	#[test]
	fn report_range_renders_camel_case_keys() {
		let query = ReportRange {
			start_date: "2025-01-01".into(),
			end_date: "2025-01-31".into(),
		}
		.into_query();
		let pairs: Vec<_> = query.iter().collect();

		assert_eq!(pairs, vec![("startDate", "2025-01-01"), ("endDate", "2025-01-31")]);
	}
}
