use common::http::ext::*;
use common::make_response;
use hyper::{header, Body, Method, Request, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::error::Result;
use super::jwt::{AuthJwtPayload, JwtState};
use crate::global::GlobalState;

const REQUIRED_FIELD: &str = "This field is required.";
const INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials.";

#[derive(Debug, Default, Deserialize)]
struct Credentials {
	username: Option<String>,
	password: Option<String>,
}

impl Credentials {
	fn from_form(body: &[u8]) -> Self {
		url::form_urlencoded::parse(body).fold(Self::default(), |mut credentials, (key, value)| {
			match key.as_ref() {
				"username" => credentials.username = Some(value.into_owned()),
				"password" => credentials.password = Some(value.into_owned()),
				_ => {}
			}
			credentials
		})
	}

	/// Field errors for every credential that is absent or empty.
	fn missing_fields(&self) -> Map<String, Value> {
		[("username", &self.username), ("password", &self.password)]
			.into_iter()
			.filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
			.map(|(field, _)| (field.to_string(), json!([REQUIRED_FIELD])))
			.collect()
	}
}

/// Exchanges a username and password, sent as JSON or as a form, for a
/// signed token.
#[tracing::instrument(name = "token_auth", skip_all)]
pub async fn token_auth_handler(req: Request<Body>) -> Result<Response<Body>> {
	if req.method() == Method::OPTIONS {
		return Ok(Response::builder()
			.status(StatusCode::OK)
			.body(Body::empty())
			.expect("failed to build response"));
	}

	if req.method() != Method::POST {
		return Err((StatusCode::METHOD_NOT_ALLOWED, "method not allowed").into());
	}

	let global = req.get_global::<GlobalState>()?;

	let is_json = req
		.headers()
		.get(header::CONTENT_TYPE)
		.and_then(|val| val.to_str().ok())
		.is_some_and(|val| val.starts_with("application/json"));

	let body = hyper::body::to_bytes(req.into_body())
		.await
		.map_err_route((StatusCode::BAD_REQUEST, "failed to read body"))?;

	let credentials: Credentials = if is_json {
		serde_json::from_slice(&body).map_err_route((StatusCode::BAD_REQUEST, "invalid json body"))?
	} else {
		Credentials::from_form(&body)
	};

	let missing = credentials.missing_fields();
	if !missing.is_empty() {
		return Err((StatusCode::BAD_REQUEST, Value::Object(missing)).into());
	}

	let username = credentials.username.unwrap_or_default();
	let password = credentials.password.unwrap_or_default();

	let user = global
		.db
		.user_by_username(&username)
		.await
		.map_err_route("failed to fetch user")?
		.filter(|user| user.is_active && user.verify_password(&password));

	let Some(user) = user else {
		tracing::debug!(username = %username, "rejected login");
		return Err((StatusCode::BAD_REQUEST, json!({ "non_field_errors": [INVALID_CREDENTIALS] })).into());
	};

	let token = AuthJwtPayload::new(&user, &global.config.jwt)
		.serialize(&global.config.jwt)
		.map_err_route("failed to sign token")?;

	tracing::info!(user_id = user.id, "issued token");

	Ok(make_response!(StatusCode::OK, json!({ "token": token })))
}
