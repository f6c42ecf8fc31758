use chrono::{DateTime, Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use jwt::{Claims, Header, RegisteredClaims, SignWithKey, Token, VerifyWithKey};
use serde_json::Value;
use sha2::Sha256;

use super::auth::VerificationError;
use crate::config::JwtConfig;
use crate::database::User;

const USER_ID_CLAIM: &str = "user_id";
const USERNAME_CLAIM: &str = "username";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthJwtPayload {
	pub user_id: i64,
	pub username: String,
	pub expiration: Option<DateTime<Utc>>,
	pub issued_at: DateTime<Utc>,
	pub not_before: Option<DateTime<Utc>>,
}

impl AuthJwtPayload {
	/// A payload for `user` that expires after the configured lifetime. A
	/// lifetime past the representable range is capped at the latest date.
	pub fn new(user: &User, config: &JwtConfig) -> Self {
		let issued_at = Utc::now();
		let expiration = i64::try_from(config.expiration_secs)
			.ok()
			.and_then(Duration::try_seconds)
			.and_then(|lifetime| issued_at.checked_add_signed(lifetime))
			.unwrap_or(DateTime::<Utc>::MAX_UTC);

		Self {
			user_id: user.id,
			username: user.username.clone(),
			expiration: Some(expiration),
			issued_at,
			not_before: None,
		}
	}
}

pub trait JwtState: Sized {
	fn to_claims(&self) -> Claims;

	fn from_claims(claims: &Claims) -> Option<Self>;

	fn serialize(&self, config: &JwtConfig) -> Result<String, jwt::Error> {
		let key = Hmac::<Sha256>::new_from_slice(config.secret.as_bytes()).map_err(|_| jwt::Error::InvalidSignature)?;
		let mut claims = self.to_claims();

		claims.registered.issuer = Some(config.issuer.clone());

		if claims.registered.issued_at.is_none() {
			claims.registered.issued_at = Some(Utc::now().timestamp() as u64);
		}

		claims.sign_with_key(&key)
	}

	fn verify(config: &JwtConfig, token: &str) -> Result<Self, VerificationError> {
		let key = Hmac::<Sha256>::new_from_slice(config.secret.as_bytes()).map_err(|_| VerificationError::InvalidKey)?;
		let token: Token<Header, Claims, _> = token.verify_with_key(&key)?;

		let claims = token.claims();

		if claims.registered.issuer.as_ref() != Some(&config.issuer) {
			return Err(VerificationError::InvalidIssuer);
		}

		let now = Utc::now();

		let iat = claims
			.registered
			.issued_at
			.and_then(timestamp)
			.ok_or(VerificationError::MissingClaims)?;
		if iat > now {
			return Err(VerificationError::NotYetValid);
		}

		if let Some(nbf) = claims.registered.not_before.and_then(timestamp) {
			if nbf > now {
				return Err(VerificationError::NotYetValid);
			}
		}

		if let Some(exp) = claims.registered.expiration.and_then(timestamp) {
			if exp < now {
				return Err(VerificationError::Expired);
			}
		}

		Self::from_claims(claims).ok_or(VerificationError::MissingClaims)
	}
}

fn timestamp(secs: u64) -> Option<DateTime<Utc>> {
	Utc.timestamp_opt(i64::try_from(secs).ok()?, 0).single()
}

impl JwtState for AuthJwtPayload {
	fn to_claims(&self) -> Claims {
		let mut claims = Claims::new(RegisteredClaims {
			issuer: None,
			subject: Some(self.user_id.to_string()),
			audience: None,
			expiration: self.expiration.map(|x| x.timestamp() as u64),
			not_before: self.not_before.map(|x| x.timestamp() as u64),
			issued_at: Some(self.issued_at.timestamp() as u64),
			json_web_token_id: None,
		});

		claims.private.insert(USER_ID_CLAIM.to_string(), Value::from(self.user_id));
		claims
			.private
			.insert(USERNAME_CLAIM.to_string(), Value::from(self.username.clone()));

		claims
	}

	fn from_claims(claims: &Claims) -> Option<Self> {
		Some(Self {
			user_id: claims.private.get(USER_ID_CLAIM)?.as_i64()?,
			username: claims.private.get(USERNAME_CLAIM)?.as_str()?.to_string(),
			expiration: claims.registered.expiration.and_then(timestamp),
			issued_at: claims.registered.issued_at.and_then(timestamp)?,
			not_before: claims.registered.not_before.and_then(timestamp),
		})
	}
}
