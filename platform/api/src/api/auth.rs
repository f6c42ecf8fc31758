use std::sync::Arc;

use hyper::header::HeaderValue;

use super::jwt::{AuthJwtPayload, JwtState};
use crate::database::{DatabaseError, User};
use crate::global::GlobalState;

/// The scheme expected in the `Authorization` header: `JWT <token>`.
pub const AUTH_HEADER_PREFIX: &str = "JWT";

/// Why an `Authorization` header did not authenticate the request.
///
/// None of these fail the request, the request simply stays anonymous.
#[derive(thiserror::Error, Debug)]
pub enum VerificationError {
	#[error("authorization header must be ascii only")]
	HeaderNotAscii,
	#[error("authorization header must be `{AUTH_HEADER_PREFIX} <token>`")]
	MalformedHeader,
	#[error("signing key is unusable")]
	InvalidKey,
	#[error("invalid token: {0}")]
	InvalidToken(#[from] jwt::Error),
	#[error("token was issued by someone else")]
	InvalidIssuer,
	#[error("token has expired")]
	Expired,
	#[error("token is not valid yet")]
	NotYetValid,
	#[error("token is missing required claims")]
	MissingClaims,
	#[error("token refers to an unknown user")]
	UnknownUser,
	#[error("user is inactive")]
	InactiveUser,
	#[error("failed to fetch user: {0}")]
	Storage(#[from] DatabaseError),
}

/// Whether the header asks for JWT authentication at all. The prefix is case
/// sensitive, anything else is left alone.
pub fn is_jwt_header(header: &HeaderValue) -> bool {
	header.as_bytes().starts_with(AUTH_HEADER_PREFIX.as_bytes())
}

/// Extracts the token from `JWT <token>`. The header must have exactly two
/// parts.
pub fn token_from_header(header: &HeaderValue) -> Result<&str, VerificationError> {
	let value = header.to_str().map_err(|_| VerificationError::HeaderNotAscii)?;

	let mut parts = value.split_whitespace();
	match (parts.next(), parts.next(), parts.next()) {
		(Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case(AUTH_HEADER_PREFIX) => Ok(token),
		_ => Err(VerificationError::MalformedHeader),
	}
}

/// Resolves the user a `JWT <token>` header identifies.
pub async fn authenticate(global: &Arc<GlobalState>, header: &HeaderValue) -> Result<User, VerificationError> {
	let token = token_from_header(header)?;
	let payload = AuthJwtPayload::verify(&global.config.jwt, token)?;

	let user = global
		.db
		.user_by_id(payload.user_id)
		.await?
		.filter(|user| user.username == payload.username)
		.ok_or(VerificationError::UnknownUser)?;

	if !user.is_active {
		return Err(VerificationError::InactiveUser);
	}

	Ok(user)
}
