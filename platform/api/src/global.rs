use std::sync::Arc;

use async_graphql::dataloader::DataLoader;
use common::context::Context;

use crate::config::AppConfig;
use crate::database::Database;
use crate::dataloader::user::UserByIdLoader;

pub struct GlobalState {
	pub config: AppConfig,
	pub db: Arc<dyn Database>,
	pub ctx: Context,
	pub user_by_id_loader: DataLoader<UserByIdLoader>,
}

impl GlobalState {
	pub fn new(config: AppConfig, db: Arc<dyn Database>, ctx: Context) -> Self {
		Self {
			user_by_id_loader: UserByIdLoader::new(db.clone()),
			config,
			db,
			ctx,
		}
	}
}
