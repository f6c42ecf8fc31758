use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
	/// The unique identifier for the user.
	pub id: i64,
	/// The username of the user.
	pub username: String,
	/// The hashed password of the user. (argon2)
	pub password_hash: String,
	/// Inactive users can neither log in nor use existing tokens.
	pub is_active: bool,
	/// The time the user was created.
	pub date_joined: DateTime<Utc>,
}

impl User {
	/// Uses argon2 to verify the password hash against the provided password.
	pub fn verify_password(&self, password: &str) -> bool {
		let hash = match PasswordHash::new(&self.password_hash) {
			Ok(hash) => hash,
			Err(err) => {
				tracing::error!(user_id = self.id, "failed to parse password hash: {}", err);
				return false;
			}
		};

		Argon2::default().verify_password(password.as_bytes(), &hash).is_ok()
	}

	/// Generates a new password hash using argon2.
	pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
		let salt = SaltString::generate(&mut OsRng);

		Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
	}

	/// Validates a username.
	pub fn validate_username(username: &str) -> Result<(), &'static str> {
		if username.is_empty() {
			return Err("Username must not be empty");
		}

		if username.chars().count() > 150 {
			return Err("Username must be at most 150 characters long");
		}

		if !username
			.chars()
			.all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
		{
			return Err("Username may only contain letters, digits and @/./+/-/_ characters");
		}

		Ok(())
	}
}
