use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::dataloader::{DataLoader, Loader};

use crate::database::{Database, DatabaseError, User};

/// Batches the `user` lookups of a message listing into one query.
pub struct UserByIdLoader {
	db: Arc<dyn Database>,
}

impl UserByIdLoader {
	pub fn new(db: Arc<dyn Database>) -> DataLoader<Self> {
		DataLoader::new(Self { db }, tokio::spawn)
	}
}

impl Loader<i64> for UserByIdLoader {
	type Error = Arc<DatabaseError>;
	type Value = User;

	async fn load(&self, keys: &[i64]) -> Result<HashMap<i64, Self::Value>, Self::Error> {
		let users = self.db.users_by_id(keys).await.map_err(|err| {
			tracing::error!(error = %err, "failed to load users");
			Arc::new(err)
		})?;

		Ok(users.into_iter().map(|user| (user.id, user)).collect())
	}
}
