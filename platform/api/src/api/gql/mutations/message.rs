use std::collections::BTreeMap;

use async_graphql::{Context, Json, Object, SimpleObject};
use hyper::StatusCode;

use crate::api::gql::error::Result;
use crate::api::gql::ext::ContextExt;
use crate::api::gql::models::message::Message;

/// Field name to the validation messages for that field.
pub type FormErrors = BTreeMap<String, Vec<String>>;

/// The outcome of `createMessage`. Validation and permission failures are
/// reported through `status` and `formErrors` rather than GraphQL errors.
#[derive(SimpleObject)]
pub struct CreateMessagePayload {
	/// An HTTP-like status code: 200, 400 or 403.
	pub status: i32,
	pub form_errors: Option<Json<FormErrors>>,
	/// The stored message, only set on success.
	pub message: Option<Message>,
}

impl CreateMessagePayload {
	fn created(message: Message) -> Self {
		Self {
			status: StatusCode::OK.as_u16().into(),
			form_errors: None,
			message: Some(message),
		}
	}

	fn invalid(errors: FormErrors) -> Self {
		Self {
			status: StatusCode::BAD_REQUEST.as_u16().into(),
			form_errors: Some(Json(errors)),
			message: None,
		}
	}

	fn forbidden() -> Self {
		Self {
			status: StatusCode::FORBIDDEN.as_u16().into(),
			form_errors: None,
			message: None,
		}
	}
}

/// Trims the text and rejects it when nothing is left.
pub fn validate_message(text: &str) -> std::result::Result<&str, FormErrors> {
	let text = text.trim();

	if text.is_empty() {
		return Err(FormErrors::from([(
			"message".to_string(),
			vec!["Please enter a message.".to_string()],
		)]));
	}

	Ok(text)
}

#[derive(Default)]
pub struct MessageMutation;

#[Object]
impl MessageMutation {
	/// Post a message as the authenticated user.
	async fn create_message(
		&self,
		ctx: &Context<'_>,
		#[graphql(desc = "The message text, surrounding whitespace is removed.")] message: String,
	) -> Result<CreateMessagePayload> {
		let global = ctx.get_global();

		let Some(user) = ctx.get_req_context().auth().await else {
			return Ok(CreateMessagePayload::forbidden());
		};

		let text = match validate_message(&message) {
			Ok(text) => text,
			Err(errors) => return Ok(CreateMessagePayload::invalid(errors)),
		};

		let created = global.db.create_message(user.id, text).await?;

		tracing::debug!(message_id = created.id, user_id = user.id, "message created");

		Ok(CreateMessagePayload::created(created.into()))
	}
}
