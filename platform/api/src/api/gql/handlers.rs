use common::http::ext::*;
use hyper::{header, Body, Method, Request, Response, StatusCode};
use routerify::prelude::RequestExt;

use super::ext::RequestExt as _;
use super::{playground_html, MySchema};
use crate::api::error::Result;
use crate::api::request_context::RequestContext;
use crate::global::GlobalState;

/// Executes GraphQL over GET (query string) or POST (JSON body, a single
/// request or a batch).
#[tracing::instrument(name = "gql", skip_all, fields(method = %req.method()))]
pub async fn graphql_handler(req: Request<Body>) -> Result<Response<Body>> {
	if req.method() == Method::OPTIONS {
		return Ok(Response::builder()
			.status(StatusCode::OK)
			.body(Body::empty())
			.expect("failed to build response"));
	}

	let schema = req
		.data::<MySchema>()
		.map_err_route("failed to get schema")?
		.clone();

	let global = req.get_global::<GlobalState>()?;

	let context = req.context::<RequestContext>().unwrap_or_default();

	let method = req.method().clone();
	let request = match method {
		Method::POST => {
			let content_type = req
				.headers()
				.get(header::CONTENT_TYPE)
				.and_then(|val| val.to_str().ok())
				.map(str::to_string);

			let body = hyper::body::to_bytes(req.into_body())
				.await
				.map_err_route((StatusCode::BAD_REQUEST, "failed to read body"))?;

			async_graphql::http::receive_batch_body(content_type, body.as_ref(), Default::default())
				.await
				.map_err_route((StatusCode::BAD_REQUEST, "failed to parse body"))?
		}
		Method::GET => {
			let query = req
				.uri()
				.query()
				.map_err_route((StatusCode::BAD_REQUEST, "missing query string"))?;

			async_graphql::http::parse_query_string(query)
				.map_err_route((StatusCode::BAD_REQUEST, "failed to parse query string"))?
				.into()
		}
		_ => {
			return Err((StatusCode::METHOD_NOT_ALLOWED, "method not allowed").into());
		}
	}
	.provide_global(global)
	.provide_context(context);

	let response = schema.execute_batch(request).await;

	let body = serde_json::to_string(&response).map_err_route("failed to serialize response")?;

	Ok(Response::builder()
		.status(StatusCode::OK)
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from(body))
		.expect("failed to build response"))
}

pub async fn playground_handler(_: Request<Body>) -> Result<Response<Body>> {
	Ok(Response::builder()
		.status(StatusCode::OK)
		.header(header::CONTENT_TYPE, "text/html")
		.body(Body::from(playground_html()))
		.expect("failed to build response"))
}
