use std::sync::Arc;

use common::http::ext::RequestGlobalExt;
use common::http::RouteError;
use hyper::http::header;
use hyper::Body;
use routerify::prelude::RequestExt;
use routerify::Middleware;

use crate::api::auth::{authenticate, is_jwt_header};
use crate::api::error::ApiError;
use crate::api::request_context::RequestContext;
use crate::global::GlobalState;

/// Attaches a [`RequestContext`] to every request and fills in the user when
/// the request carries a valid `JWT <token>` header. A bad token never fails
/// the request, it stays anonymous.
pub fn auth_middleware(_: &Arc<GlobalState>) -> Middleware<Body, RouteError<ApiError>> {
	Middleware::pre(|req| async move {
		let context = RequestContext::default();
		req.set_context(context.clone());

		let Some(token) = req.headers().get(header::AUTHORIZATION) else {
			return Ok(req);
		};

		if !is_jwt_header(token) {
			return Ok(req);
		}

		let global = req.get_global::<GlobalState>()?;

		match authenticate(&global, token).await {
			Ok(user) => {
				tracing::trace!(user_id = user.id, "authenticated request");
				context.set_auth(user).await;
			}
			Err(err) => tracing::debug!(error = %err, "ignoring invalid authorization header"),
		}

		Ok(req)
	})
}
