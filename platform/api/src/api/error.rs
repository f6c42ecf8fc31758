use common::http::RouteError;

use crate::database::DatabaseError;

pub type Result<T, E = RouteError<ApiError>> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
	#[error("failed to read http body: {0}")]
	ParseHttpBody(#[from] hyper::Error),
	#[error("failed to parse gql request: {0}")]
	ParseGql(#[from] async_graphql::ParseRequestError),
	#[error("failed to parse json body: {0}")]
	ParseJson(#[from] serde_json::Error),
	#[error("database error: {0}")]
	Database(#[from] DatabaseError),
	#[error("failed to sign token: {0}")]
	Jwt(#[from] jwt::Error),
}
