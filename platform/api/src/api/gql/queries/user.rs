use async_graphql::{Context, Object};

use crate::api::gql::ext::ContextExt;
use crate::api::gql::models::user::User;

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
	/// The user the request is authenticated as, `null` for anonymous requests.
	async fn current_user(&self, ctx: &Context<'_>) -> Option<User> {
		ctx.get_req_context().auth().await.map(Into::into)
	}
}
