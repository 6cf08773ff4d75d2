#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde::Deserialize;
// self
use tavuel_api_client::{
	_preludet::*,
	admin::{AdminApi, PqrsResolution, UserListQuery},
	session::CredentialStore,
};

#[derive(Debug, Deserialize)]
struct UserRow {
	id: String,
	email: String,
}

#[tokio::test]
async fn user_list_sends_filters_and_decodes_the_page_envelope() {
	let server = MockServer::start_async().await;
	let (client, store, _) = build_test_client(&server.base_url());

	seed_session(&store, "valid-access", None).await;

	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/admin/users")
				.query_param("page", "2")
				.query_param("limit", "25")
				.query_param("role", "PROVIDER")
				.header("authorization", "Bearer valid-access");
			then.status(200).header("content-type", "application/json").body(
				"{\"data\":[{\"id\":\"u-9\",\"email\":\"p@tavuel.co\"}],\
				 \"meta\":{\"total\":26,\"page\":2,\"limit\":25,\"totalPages\":2}}",
			);
		})
		.await;
	let admin = AdminApi::new(client);
	let page = admin
		.users::<UserRow>(UserListQuery {
			page: Some(2),
			limit: Some(25),
			role: Some("PROVIDER".into()),
			..Default::default()
		})
		.await
		.expect("User list should succeed.");

	mock.assert_async().await;

	assert_eq!(page.data.len(), 1);
	assert_eq!(page.data[0].id, "u-9");
	assert_eq!(page.data[0].email, "p@tavuel.co");
	assert_eq!(page.meta.total, 26);
	assert_eq!(page.meta.total_pages, 2);
}

#[tokio::test]
async fn resolving_a_ticket_patches_the_exact_resolution_payload() {
	let server = MockServer::start_async().await;
	let (client, store, _) = build_test_client(&server.base_url());

	seed_session(&store, "valid-access", None).await;

	let mock = server
		.mock_async(|when, then| {
			when.method(PATCH)
				.path("/admin/pqrs/T-7/resolve")
				.header("content-type", "application/json")
				.json_body(serde_json::json!({
					"resolutionType": "PARTIAL_REFUND",
					"refundAmount": 25_000.0,
					"resolution": "Half refunded after provider review.",
				}));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":\"T-7\",\"status\":\"RESOLVED\"}");
		})
		.await;
	let admin = AdminApi::new(client);
	let ticket: JsonValue = admin
		.resolve_pqrs(
			"T-7",
			&PqrsResolution {
				resolution_type: "PARTIAL_REFUND".into(),
				refund_amount: Some(25_000.0),
				resolution: "Half refunded after provider review.".into(),
			},
		)
		.await
		.expect("Resolution should succeed.");

	mock.assert_async().await;

	assert_eq!(ticket["status"], "RESOLVED");
}

#[tokio::test]
async fn approving_verification_sends_an_empty_json_object() {
	let server = MockServer::start_async().await;
	let (client, store, _) = build_test_client(&server.base_url());

	seed_session(&store, "valid-access", None).await;

	let mock = server
		.mock_async(|when, then| {
			when.method(PATCH)
				.path("/verification/v-3/approve")
				.header("content-type", "application/json")
				.json_body(serde_json::json!({}));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":\"v-3\",\"verificationStatus\":\"APPROVED\"}");
		})
		.await;
	let admin = AdminApi::new(client);
	let case: JsonValue =
		admin.approve_verification("v-3").await.expect("Approval should succeed.");

	mock.assert_async().await;

	assert_eq!(case["verificationStatus"], "APPROVED");
}

#[tokio::test]
async fn login_persists_the_session_used_by_subsequent_requests() {
	let server = MockServer::start_async().await;
	let (client, store, _) = build_test_client(&server.base_url());

	let login = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/login")
				.header("content-type", "application/json")
				.json_body(serde_json::json!({
					"email": "root@tavuel.co",
					"password": "hunter2",
				}));
			then.status(200).header("content-type", "application/json").body(
				"{\"accessToken\":\"issued-access\",\"refreshToken\":\"issued-refresh\",\
				 \"user\":{\"id\":\"a-1\",\"role\":\"ADMIN\"}}",
			);
		})
		.await;
	let dashboard = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/admin/dashboard")
				.header("authorization", "Bearer issued-access");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"totalUsers\":42}");
		})
		.await;
	let payload = client.login("root@tavuel.co", "hunter2").await.expect("Login should succeed.");

	login.assert_async().await;

	assert_eq!(payload.user["role"], "ADMIN");

	let session = store
		.load()
		.await
		.expect("Store read should succeed.")
		.expect("Login must persist a session.");

	assert_eq!(session.access_token.expose(), "issued-access");

	let admin = AdminApi::new(client);
	let stats: JsonValue =
		admin.dashboard_stats().await.expect("Dashboard fetch should use the issued bearer.");

	dashboard.assert_async().await;

	assert_eq!(stats["totalUsers"], 42);
}

#[tokio::test]
async fn logout_notifies_the_backend_and_clears_the_store() {
	let server = MockServer::start_async().await;
	let (client, store, gateway) = build_test_client(&server.base_url());

	seed_session(&store, "valid-access", Some("valid-refresh")).await;

	let logout = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/logout");
			then.status(204);
		})
		.await;
	client.logout().await.expect("Logout should succeed.");

	logout.assert_async().await;

	assert!(store.load().await.expect("Store read should succeed.").is_none());
	// Caller-initiated logout is not an escalation; navigation stays with the caller.
	assert_eq!(gateway.redirects(), 0);
}
