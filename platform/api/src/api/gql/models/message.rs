use async_graphql::{ComplexObject, Context, SimpleObject, ID};

use super::date::DateRFC3339;
use super::global_id::to_global_id;
use super::user::User;
use crate::api::gql::error::Result;
use crate::api::gql::ext::ContextExt;
use crate::database;

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Message {
	pub id: i64,
	/// The message text.
	pub message: String,
	pub creation_date: DateRFC3339,

	#[graphql(skip)]
	pub author_id: i64,
}

#[ComplexObject]
impl Message {
	/// The base64 encoded `Message:<id>` identifier.
	async fn global_id(&self) -> ID {
		ID(to_global_id("Message", self.id))
	}

	/// The author of the message.
	async fn user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
		let global = ctx.get_global();

		let user = global.user_by_id_loader.load_one(self.author_id).await?;

		Ok(user.map(Into::into))
	}
}

impl From<database::Message> for Message {
	fn from(value: database::Message) -> Self {
		Self {
			id: value.id,
			message: value.text,
			creation_date: value.created_at.into(),
			author_id: value.author_id,
		}
	}
}
