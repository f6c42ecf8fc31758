use std::sync::Arc;

use anyhow::Context as _;
use common::http::RouteError;
use common::make_response;
use hyper::{Body, Server, StatusCode};
use routerify::{Router, RouterService};
use serde_json::json;

use self::error::ApiError;
use crate::global::GlobalState;

pub mod auth;
pub mod error;
pub mod gql;
pub mod health;
pub mod jwt;
pub mod middleware;
pub mod request_context;
pub mod token_auth;

pub fn routes(global: &Arc<GlobalState>) -> Router<Body, RouteError<ApiError>> {
	let weak = Arc::downgrade(global);
	Router::builder()
		.data(weak)
		.data(gql::schema())
		// The CORS middleware adds the CORS headers to the response
		.middleware(middleware::cors::cors_middleware(global))
		// The auth middleware attaches the request context and resolves the user from the
		// Authorization header. It never fails the request, invalid tokens stay anonymous.
		.middleware(middleware::auth::auth_middleware(global))
		.get("/health", health::health)
		.any_method(gql::GQL_PATH, gql::handlers::graphql_handler)
		.get("/gql/playground", gql::handlers::playground_handler)
		.any_method("/api-token-auth", token_auth::token_auth_handler)
		.any(|_| async move {
			Ok(make_response!(
				StatusCode::NOT_FOUND,
				json!({
					"message": "not found",
					"success": false,
				})
			))
		})
		.err_handler_with_info(common::http::error_handler::<ApiError>)
		.build()
		.expect("failed to build router")
}

pub async fn run(global: Arc<GlobalState>) -> anyhow::Result<()> {
	let bind_address = global.config.api.bind_address;

	// The router only keeps a Weak reference to the global state, so keep-alive
	// connections do not hold it past shutdown.
	let service = RouterService::new(routes(&global))
		.map_err(|err| anyhow::anyhow!("failed to create router service: {err}"))?;

	let server = Server::try_bind(&bind_address)
		.with_context(|| format!("failed to bind {bind_address}"))?
		.serve(service);

	tracing::info!("Listening on {}", server.local_addr());

	let ctx = global.ctx.clone();
	drop(global);

	server
		.with_graceful_shutdown(async move { ctx.done().await })
		.await
		.context("api server failed")
}
