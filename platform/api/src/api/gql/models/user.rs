use async_graphql::{ComplexObject, Context, SimpleObject};

use super::date::DateRFC3339;
use super::message::Message;
use crate::api::gql::error::Result;
use crate::api::gql::ext::ContextExt;
use crate::database;

/// A registered user. Credentials are never exposed.
#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct User {
	pub id: i64,
	pub username: String,
	pub date_joined: DateRFC3339,
}

#[ComplexObject]
impl User {
	/// Messages written by this user, oldest first.
	async fn messages(&self, ctx: &Context<'_>) -> Result<Vec<Message>> {
		let global = ctx.get_global();

		let messages = global.db.messages_by_author(self.id).await?;

		Ok(messages.into_iter().map(Into::into).collect())
	}
}

impl From<database::User> for User {
	fn from(value: database::User) -> Self {
		Self {
			id: value.id,
			username: value.username,
			date_joined: value.date_joined.into(),
		}
	}
}
