use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use async_graphql::SDLExportOptions;
use clap::Parser;
use common::context::Context;
use common::{logging, signal};
use tokio::signal::unix::SignalKind;
use tokio::{select, time};

use crate::api::gql::schema;
use crate::config::{Cli, Command};
use crate::database::{Database, User};

mod api;
mod config;
mod database;
mod dataloader;
mod global;


#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	if cli.export_gql {
		let schema = schema();

		println!(
			"{}",
			schema.sdl_with_options(
				SDLExportOptions::default()
					.sorted_arguments()
					.sorted_enum_items()
					.sorted_fields()
			)
		);

		return Ok(());
	}

	let config = config::AppConfig::parse(cli.config_file)?;

	logging::init(&config.logging.level, config.logging.mode)?;

	if let Some(file) = &config.config_file {
		tracing::info!(file = %file, "loaded config from file");
	}

	tracing::debug!(
		name = %config.name,
		bind_address = %config.api.bind_address,
		"config loaded"
	);

	let db = database::connect(&config.database.uri).await?;

	if let Some(Command::CreateUser { username, password }) = cli.command {
		return create_user(db.as_ref(), &username, &password).await;
	}

	let (ctx, handler) = Context::new();

	let global = Arc::new(global::GlobalState::new(config, db, ctx));

	let api_future = tokio::spawn(api::run(global.clone()));

	// Listen on both sigint and sigterm and cancel the context when either is received
	let mut signal_handler = signal::SignalHandler::new()
		.with_signal(SignalKind::interrupt())
		.with_signal(SignalKind::terminate());

	select! {
		r = api_future => tracing::error!("api stopped unexpectedly: {:?}", r),
		_ = signal_handler.recv() => tracing::info!("shutting down"),
	}

	// We cannot have a context in scope when we cancel the handler, otherwise it will deadlock.
	drop(global);

	tracing::info!("waiting for tasks to finish");

	select! {
		_ = time::sleep(Duration::from_secs(60)) => tracing::warn!("force shutting down"),
		_ = signal_handler.recv() => tracing::warn!("force shutting down"),
		_ = handler.cancel() => tracing::info!("shutting down"),
	}

	Ok(())
}

async fn create_user(db: &dyn Database, username: &str, password: &str) -> Result<()> {
	User::validate_username(username).map_err(|err| anyhow::anyhow!("invalid username: {err}"))?;

	if password.is_empty() {
		anyhow::bail!("password must not be empty");
	}

	let password_hash =
		User::hash_password(password).map_err(|err| anyhow::anyhow!("failed to hash password: {err}"))?;

	let user = db
		.create_user(username, &password_hash)
		.await
		.context("failed to create user")?;

	tracing::info!(user_id = user.id, username = %user.username, "user created");
	println!("{}", user.id);

	Ok(())
}
