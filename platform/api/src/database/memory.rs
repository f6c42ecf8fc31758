use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{Database, DatabaseError, Message, MessageFilter, Result, User};

#[derive(Default)]
struct Tables {
	users: Vec<User>,
	messages: Vec<Message>,
}

/// A process-local store, used by tests and `memory://` development runs.
///
/// Ids are assigned sequentially from 1, like a fresh serial column.
#[derive(Default)]
pub struct MemoryDatabase {
	tables: RwLock<Tables>,
}

#[async_trait]
impl Database for MemoryDatabase {
	async fn create_message(&self, author_id: i64, text: &str) -> Result<Message> {
		let mut tables = self.tables.write().await;

		if !tables.users.iter().any(|u| u.id == author_id) {
			return Err(DatabaseError::UnknownUser(author_id));
		}

		let message = Message {
			id: tables.messages.len() as i64 + 1,
			author_id,
			text: text.to_string(),
			created_at: Utc::now(),
		};

		tables.messages.push(message.clone());

		Ok(message)
	}

	async fn message_by_id(&self, id: i64) -> Result<Option<Message>> {
		Ok(self.tables.read().await.messages.iter().find(|m| m.id == id).cloned())
	}

	async fn messages(&self, filter: &MessageFilter) -> Result<Vec<Message>> {
		Ok(self
			.tables
			.read()
			.await
			.messages
			.iter()
			.filter(|m| filter.matches(m))
			.cloned()
			.collect())
	}

	async fn messages_by_author(&self, author_id: i64) -> Result<Vec<Message>> {
		Ok(self
			.tables
			.read()
			.await
			.messages
			.iter()
			.filter(|m| m.author_id == author_id)
			.cloned()
			.collect())
	}

	async fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
		let mut tables = self.tables.write().await;

		if tables.users.iter().any(|u| u.username == username) {
			return Err(DatabaseError::UsernameTaken(username.to_string()));
		}

		let user = User {
			id: tables.users.len() as i64 + 1,
			username: username.to_string(),
			password_hash: password_hash.to_string(),
			is_active: true,
			date_joined: Utc::now(),
		};

		tables.users.push(user.clone());

		Ok(user)
	}

	async fn users_by_id(&self, ids: &[i64]) -> Result<Vec<User>> {
		Ok(self
			.tables
			.read()
			.await
			.users
			.iter()
			.filter(|u| ids.contains(&u.id))
			.cloned()
			.collect())
	}

	async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
		Ok(self.tables.read().await.users.iter().find(|u| u.username == username).cloned())
	}
}

impl MemoryDatabase {
	/// Marks a user inactive. Only the in-memory store supports this, it exists
	/// so auth paths for disabled accounts can be exercised.
	pub async fn deactivate_user(&self, id: i64) -> bool {
		match self.tables.write().await.users.iter_mut().find(|u| u.id == id) {
			Some(user) => {
				user.is_active = false;
				true
			}
			None => false,
		}
	}
}
