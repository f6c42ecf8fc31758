use chrono::{Duration, Timelike, Utc};

use crate::api::auth::VerificationError;
use crate::api::jwt::{AuthJwtPayload, JwtState};
use crate::config::JwtConfig;

fn payload() -> AuthJwtPayload {
	let now = Utc::now().with_nanosecond(0).unwrap();

	AuthJwtPayload {
		user_id: 7,
		username: "alice".to_string(),
		expiration: Some(now + Duration::seconds(60)),
		issued_at: now,
		not_before: None,
	}
}

#[test]
fn test_jwt_roundtrip() {
	let config = JwtConfig::default();
	let payload = payload();

	let token = payload.serialize(&config).expect("failed to sign token");
	assert_eq!(token.split('.').count(), 3);

	let verified = AuthJwtPayload::verify(&config, &token).expect("failed to verify token");
	assert_eq!(verified, payload);
}

#[test]
fn test_jwt_wrong_secret() {
	let token = payload().serialize(&JwtConfig::default()).unwrap();

	let config = JwtConfig {
		secret: "another-secret".to_string(),
		..Default::default()
	};

	let err = AuthJwtPayload::verify(&config, &token).unwrap_err();
	assert!(matches!(err, VerificationError::InvalidToken(_)), "{err}");
}

#[test]
fn test_jwt_tampered() {
	let config = JwtConfig::default();
	let token = payload().serialize(&config).unwrap();

	let other = AuthJwtPayload {
		user_id: 1,
		..payload()
	}
	.serialize(&config)
	.unwrap();

	// Swap in the claims of another token while keeping the signature.
	let mut parts = token.split('.').collect::<Vec<_>>();
	parts[1] = other.split('.').nth(1).unwrap();
	let tampered = parts.join(".");

	let err = AuthJwtPayload::verify(&config, &tampered).unwrap_err();
	assert!(matches!(err, VerificationError::InvalidToken(_)), "{err}");

	let err = AuthJwtPayload::verify(&config, "not-a-token").unwrap_err();
	assert!(matches!(err, VerificationError::InvalidToken(_)), "{err}");
}

#[test]
fn test_jwt_wrong_issuer() {
	let token = payload()
		.serialize(&JwtConfig {
			issuer: "someone-else".to_string(),
			..Default::default()
		})
		.unwrap();

	let err = AuthJwtPayload::verify(&JwtConfig::default(), &token).unwrap_err();
	assert!(matches!(err, VerificationError::InvalidIssuer), "{err}");
}

#[test]
fn test_jwt_expired() {
	let config = JwtConfig::default();
	let now = Utc::now();

	let token = AuthJwtPayload {
		expiration: Some(now - Duration::seconds(10)),
		issued_at: now - Duration::seconds(70),
		..payload()
	}
	.serialize(&config)
	.unwrap();

	let err = AuthJwtPayload::verify(&config, &token).unwrap_err();
	assert!(matches!(err, VerificationError::Expired), "{err}");
}

#[test]
fn test_jwt_not_yet_valid() {
	let config = JwtConfig::default();
	let now = Utc::now();

	let token = AuthJwtPayload {
		issued_at: now + Duration::seconds(60),
		..payload()
	}
	.serialize(&config)
	.unwrap();
	let err = AuthJwtPayload::verify(&config, &token).unwrap_err();
	assert!(matches!(err, VerificationError::NotYetValid), "{err}");

	let token = AuthJwtPayload {
		not_before: Some(now + Duration::seconds(60)),
		..payload()
	}
	.serialize(&config)
	.unwrap();
	let err = AuthJwtPayload::verify(&config, &token).unwrap_err();
	assert!(matches!(err, VerificationError::NotYetValid), "{err}");
}

#[test]
fn test_jwt_missing_claims() {
	use hmac::{Hmac, Mac};
	use jwt::{Claims, RegisteredClaims, SignWithKey};
	use sha2::Sha256;

	let config = JwtConfig::default();
	let key = Hmac::<Sha256>::new_from_slice(config.secret.as_bytes()).unwrap();

	// Properly signed, but without the user claims.
	let token = Claims::new(RegisteredClaims {
		issuer: Some(config.issuer.clone()),
		subject: None,
		audience: None,
		expiration: None,
		not_before: None,
		issued_at: Some(Utc::now().timestamp() as u64),
		json_web_token_id: None,
	})
	.sign_with_key(&key)
	.unwrap();

	let err = AuthJwtPayload::verify(&config, &token).unwrap_err();
	assert!(matches!(err, VerificationError::MissingClaims), "{err}");
}

#[test]
fn test_payload_lifetime() {
	let config = JwtConfig {
		expiration_secs: 120,
		..Default::default()
	};

	let user = crate::database::User {
		id: 3,
		username: "bob".to_string(),
		password_hash: String::new(),
		is_active: true,
		date_joined: Utc::now(),
	};

	let payload = AuthJwtPayload::new(&user, &config);
	assert_eq!(payload.user_id, 3);
	assert_eq!(payload.username, "bob");
	assert_eq!(payload.expiration, Some(payload.issued_at + Duration::seconds(120)));
}

#[test]
fn test_payload_lifetime_out_of_range() {
	let config = JwtConfig {
		expiration_secs: 10_000_000_000_000_000,
		..Default::default()
	};

	let user = crate::database::User {
		id: 3,
		username: "bob".to_string(),
		password_hash: String::new(),
		is_active: true,
		date_joined: Utc::now(),
	};

	let payload = AuthJwtPayload::new(&user, &config);
	assert_eq!(payload.expiration, Some(chrono::DateTime::<Utc>::MAX_UTC));

	let token = payload.serialize(&config).expect("failed to sign token");
	let verified = AuthJwtPayload::verify(&config, &token).expect("failed to verify token");
	assert_eq!(verified.user_id, 3);

	let config = JwtConfig {
		expiration_secs: u64::MAX,
		..Default::default()
	};
	assert_eq!(
		AuthJwtPayload::new(&user, &config).expiration,
		Some(chrono::DateTime::<Utc>::MAX_UTC)
	);
}
