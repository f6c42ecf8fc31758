use std::sync::Arc;

use tokio::sync::RwLock;

use crate::database::User;

#[derive(Default, Clone)]
pub struct ContextData {
	pub auth: Option<User>,
}

/// Per request state shared between the middlewares and the GraphQL
/// resolvers.
#[derive(Default, Clone)]
pub struct RequestContext(Arc<RwLock<ContextData>>);

impl RequestContext {
	pub async fn set_auth(&self, user: User) {
		let mut guard = self.0.write().await;
		guard.auth = Some(user);
	}

	/// The authenticated user, `None` for anonymous requests.
	pub async fn auth(&self) -> Option<User> {
		self.0.read().await.auth.clone()
	}
}
