use std::sync::Arc;

use async_trait::async_trait;

mod memory;
mod message;
mod postgres;
mod user;

pub use memory::MemoryDatabase;
pub use message::*;
pub use postgres::PgDatabase;
pub use user::*;

pub type Result<T, E = DatabaseError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
	#[error("sqlx error: {0}")]
	Sqlx(#[from] sqlx::Error),
	#[error("migration error: {0}")]
	Migrate(#[from] sqlx::migrate::MigrateError),
	#[error("username already taken: {0}")]
	UsernameTaken(String),
	#[error("user {0} does not exist")]
	UnknownUser(i64),
	#[error("unsupported database uri: {0}")]
	UnsupportedUri(String),
}

/// Storage for users and their messages.
///
/// Every method is a single statement, so each create is atomic on its own.
#[async_trait]
pub trait Database: Send + Sync + 'static {
	/// Inserts a message owned by `author_id`. The creation date is set by the
	/// store at insert time.
	async fn create_message(&self, author_id: i64, text: &str) -> Result<Message>;

	async fn message_by_id(&self, id: i64) -> Result<Option<Message>>;

	/// All messages matching `filter`, in insertion order.
	async fn messages(&self, filter: &MessageFilter) -> Result<Vec<Message>>;

	async fn messages_by_author(&self, author_id: i64) -> Result<Vec<Message>>;

	async fn create_user(&self, username: &str, password_hash: &str) -> Result<User>;

	async fn users_by_id(&self, ids: &[i64]) -> Result<Vec<User>>;

	async fn user_by_username(&self, username: &str) -> Result<Option<User>>;

	async fn user_by_id(&self, id: i64) -> Result<Option<User>> {
		Ok(self.users_by_id(&[id]).await?.into_iter().next())
	}
}

/// Opens the store named by `uri`: `postgres://` (migrations are applied on
/// connect) or `memory://`.
pub async fn connect(uri: &str) -> Result<Arc<dyn Database>> {
	if uri.starts_with("memory://") {
		tracing::warn!("using in-memory database, data will be lost on shutdown");
		return Ok(Arc::new(MemoryDatabase::default()));
	}

	if uri.starts_with("postgres://") || uri.starts_with("postgresql://") {
		return Ok(Arc::new(PgDatabase::connect(uri).await?));
	}

	Err(DatabaseError::UnsupportedUri(uri.to_string()))
}
