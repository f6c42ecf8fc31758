use std::str::FromStr;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool};
use sqlx::ConnectOptions;

use super::{Database, DatabaseError, Message, MessageFilter, Result, User};

const MESSAGE_COLUMNS: &str = "id, user_id, message, creation_date";
const USER_COLUMNS: &str = "id, username, password_hash, is_active, date_joined";

pub struct PgDatabase {
	pool: PgPool,
}

impl PgDatabase {
	pub async fn connect(uri: &str) -> Result<Self> {
		let pool = PgPool::connect_with(PgConnectOptions::from_str(uri)?.disable_statement_logging()).await?;

		sqlx::migrate!("./migrations").run(&pool).await?;

		Ok(Self { pool })
	}
}

/// Escapes LIKE wildcards so user input only ever matches literally.
fn escape_like(input: &str) -> String {
	let mut escaped = String::with_capacity(input.len());
	for c in input.chars() {
		if matches!(c, '%' | '_' | '\\') {
			escaped.push('\\');
		}
		escaped.push(c);
	}
	escaped
}

#[async_trait]
impl Database for PgDatabase {
	async fn create_message(&self, author_id: i64, text: &str) -> Result<Message> {
		sqlx::query_as(&format!(
			"INSERT INTO messages (user_id, message, creation_date) VALUES ($1, $2, NOW()) RETURNING {MESSAGE_COLUMNS}"
		))
		.bind(author_id)
		.bind(text)
		.fetch_one(&self.pool)
		.await
		.map_err(|err| match err {
			sqlx::Error::Database(e) if e.is_foreign_key_violation() => DatabaseError::UnknownUser(author_id),
			err => err.into(),
		})
	}

	async fn message_by_id(&self, id: i64) -> Result<Option<Message>> {
		Ok(
			sqlx::query_as(&format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1"))
				.bind(id)
				.fetch_optional(&self.pool)
				.await?,
		)
	}

	async fn messages(&self, filter: &MessageFilter) -> Result<Vec<Message>> {
		let messages: Vec<Message> = match &filter.text_icontains {
			Some(needle) => {
				sqlx::query_as(&format!(
					"SELECT {MESSAGE_COLUMNS} FROM messages WHERE message ILIKE '%' || $1 || '%' ESCAPE '\\' ORDER BY id"
				))
				.bind(escape_like(needle))
				.fetch_all(&self.pool)
				.await?
			}
			None => {
				sqlx::query_as(&format!("SELECT {MESSAGE_COLUMNS} FROM messages ORDER BY id"))
					.fetch_all(&self.pool)
					.await?
			}
		};

		Ok(messages)
	}

	async fn messages_by_author(&self, author_id: i64) -> Result<Vec<Message>> {
		Ok(
			sqlx::query_as(&format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE user_id = $1 ORDER BY id"))
				.bind(author_id)
				.fetch_all(&self.pool)
				.await?,
		)
	}

	async fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
		sqlx::query_as(&format!(
			"INSERT INTO users (username, password_hash) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
		))
		.bind(username)
		.bind(password_hash)
		.fetch_one(&self.pool)
		.await
		.map_err(|err| match err {
			sqlx::Error::Database(e) if e.is_unique_violation() => DatabaseError::UsernameTaken(username.to_string()),
			err => err.into(),
		})
	}

	async fn users_by_id(&self, ids: &[i64]) -> Result<Vec<User>> {
		Ok(
			sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"))
				.bind(ids)
				.fetch_all(&self.pool)
				.await?,
		)
	}

	async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
		Ok(
			sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1"))
				.bind(username)
				.fetch_optional(&self.pool)
				.await?,
		)
	}
}
