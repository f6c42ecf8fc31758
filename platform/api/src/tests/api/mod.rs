use std::sync::Arc;
use std::time::Duration;

use common::context::Handler;
use common::prelude::FutureTimeout;
use hyper::StatusCode;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use crate::api::run;
use crate::config::{ApiConfig, AppConfig};
use crate::global::GlobalState;
use crate::tests::global::mock_global_state;

mod jwt;

/// A config bound to a free local port, and the base url to reach it.
pub fn server_config() -> (AppConfig, String) {
	let port = portpicker::pick_unused_port().expect("failed to pick port");

	let config = AppConfig {
		api: ApiConfig {
			bind_address: format!("127.0.0.1:{port}").parse().unwrap(),
		},
		..Default::default()
	};

	(config, format!("http://127.0.0.1:{port}"))
}

pub async fn start_server(global: &Arc<GlobalState>) -> JoinHandle<anyhow::Result<()>> {
	let handle = tokio::spawn(run(global.clone()));

	// We need to wait for the server to start
	tokio::time::sleep(Duration::from_millis(300)).await;

	handle
}

pub async fn shutdown(
	global: Arc<GlobalState>,
	client: reqwest::Client,
	handler: Handler,
	handle: JoinHandle<anyhow::Result<()>>,
) {
	// The client uses Keep-Alive, so we need to drop it to release the global context
	drop(global);
	drop(client);

	handler
		.cancel()
		.timeout(Duration::from_secs(1))
		.await
		.expect("failed to cancel context");

	handle
		.timeout(Duration::from_secs(1))
		.await
		.expect("failed to cancel api")
		.expect("api failed")
		.expect("api failed");
}

#[tokio::test]
async fn test_health() {
	let (config, url) = server_config();
	let (global, handler) = mock_global_state(config).await;

	let handle = start_server(&global).await;

	let client = reqwest::Client::new();
	let resp = client
		.get(format!("{url}/health"))
		.send()
		.await
		.expect("failed to get health");

	assert_eq!(resp.status(), StatusCode::OK);
	let body = resp.text().await.expect("failed to read body");
	assert_eq!(body, "{\"status\":\"ok\"}");

	shutdown(global, client, handler, handle).await;
}

#[tokio::test]
async fn test_not_found() {
	let (config, url) = server_config();
	let (global, handler) = mock_global_state(config).await;

	let handle = start_server(&global).await;

	let client = reqwest::Client::new();
	let resp = client
		.get(format!("{url}/does/not/exist"))
		.send()
		.await
		.expect("failed to send request");

	assert_eq!(resp.status(), StatusCode::NOT_FOUND);
	let body: Value = resp.json().await.expect("failed to read body");
	assert_eq!(body, json!({ "message": "not found", "success": false }));

	shutdown(global, client, handler, handle).await;
}

#[tokio::test]
async fn test_cors_headers() {
	let (config, url) = server_config();
	let (global, handler) = mock_global_state(config).await;

	let handle = start_server(&global).await;

	let client = reqwest::Client::new();
	let resp = client
		.request(reqwest::Method::OPTIONS, format!("{url}/gql"))
		.header("Origin", "http://example.com")
		.header("Access-Control-Request-Method", "POST")
		.send()
		.await
		.expect("failed to send preflight");

	assert_eq!(resp.status(), StatusCode::OK);
	let headers = resp.headers();
	assert_eq!(headers["access-control-allow-origin"], "*");
	assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
	assert_eq!(headers["access-control-allow-headers"], "Content-Type, Authorization");

	let resp = client
		.get(format!("{url}/health"))
		.send()
		.await
		.expect("failed to get health");
	assert_eq!(resp.headers()["access-control-allow-origin"], "*");

	shutdown(global, client, handler, handle).await;
}

#[tokio::test]
async fn test_playground() {
	let (config, url) = server_config();
	let (global, handler) = mock_global_state(config).await;

	let handle = start_server(&global).await;

	let client = reqwest::Client::new();
	let resp = client
		.get(format!("{url}/gql/playground"))
		.send()
		.await
		.expect("failed to get playground");

	assert_eq!(resp.status(), StatusCode::OK);
	assert_eq!(resp.headers()["content-type"], "text/html");
	let body = resp.text().await.expect("failed to read body");
	assert!(body.contains("/gql"));

	shutdown(global, client, handler, handle).await;
}

#[tokio::test]
async fn test_gql_over_http() {
	let (config, url) = server_config();
	let (global, handler) = mock_global_state(config).await;

	let handle = start_server(&global).await;

	let client = reqwest::Client::new();

	let resp = client
		.post(format!("{url}/gql"))
		.json(&json!({ "query": "{ currentUser { id } allMessages { id } }" }))
		.send()
		.await
		.expect("failed to post query");
	assert_eq!(resp.status(), StatusCode::OK);
	let body: Value = resp.json().await.expect("failed to read body");
	assert_eq!(body["data"], json!({ "currentUser": null, "allMessages": [] }));
	assert!(body.get("errors").is_none());

	let resp = client
		.get(format!("{url}/gql"))
		.query(&[("query", "{ currentUser { id } }")])
		.send()
		.await
		.expect("failed to get query");
	assert_eq!(resp.status(), StatusCode::OK);
	let body: Value = resp.json().await.expect("failed to read body");
	assert_eq!(body["data"], json!({ "currentUser": null }));

	// Batched requests get a batched response.
	let resp = client
		.post(format!("{url}/gql"))
		.json(&json!([
			{ "query": "{ allMessages { id } }" },
			{ "query": "{ currentUser { username } }" },
		]))
		.send()
		.await
		.expect("failed to post batch");
	assert_eq!(resp.status(), StatusCode::OK);
	let body: Value = resp.json().await.expect("failed to read body");
	assert_eq!(body.as_array().map(Vec::len), Some(2));
	assert_eq!(body[0]["data"], json!({ "allMessages": [] }));
	assert_eq!(body[1]["data"], json!({ "currentUser": null }));

	let resp = client
		.post(format!("{url}/gql"))
		.header("Content-Type", "application/json")
		.body("{ not json")
		.send()
		.await
		.expect("failed to post query");
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	let body: Value = resp.json().await.expect("failed to read body");
	assert_eq!(body, json!({ "message": "failed to parse body", "success": false }));

	let resp = client
		.put(format!("{url}/gql"))
		.send()
		.await
		.expect("failed to send request");
	assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

	shutdown(global, client, handler, handle).await;
}
