use async_graphql::{Context, InputObject, Object};

use crate::api::gql::error::{GqlError, OptionExt, Result};
use crate::api::gql::ext::ContextExt;
use crate::api::gql::models::global_id::MessageId;
use crate::api::gql::models::message::Message;
use crate::database::MessageFilter;

/// Filters for `allMessages`.
#[derive(InputObject, Default)]
#[graphql(name = "MessageFilter")]
pub struct MessageFilterInput {
	/// Only messages whose text contains this value, ignoring case.
	#[graphql(name = "message_icontains")]
	pub message_icontains: Option<String>,
}

impl From<MessageFilterInput> for MessageFilter {
	fn from(value: MessageFilterInput) -> Self {
		Self {
			text_icontains: value.message_icontains,
		}
	}
}

#[derive(Default)]
pub struct MessageQuery;

#[Object]
impl MessageQuery {
	/// Get a single message by its id or global id.
	async fn message(
		&self,
		ctx: &Context<'_>,
		#[graphql(desc = "The integer or global id of the message.")] id: MessageId,
	) -> Result<Message> {
		let global = ctx.get_global();

		global
			.db
			.message_by_id(id.0)
			.await?
			.map_err_gql(GqlError::NotFound("message"))
			.map(Into::into)
	}

	/// All messages in the order they were created.
	async fn all_messages(
		&self,
		ctx: &Context<'_>,
		#[graphql(desc = "Narrows the listing down.")] filter: Option<MessageFilterInput>,
	) -> Result<Vec<Message>> {
		let global = ctx.get_global();

		let filter = filter.map(MessageFilter::from).unwrap_or_default();
		let messages = global.db.messages(&filter).await?;

		Ok(messages.into_iter().map(Into::into).collect())
	}
}
