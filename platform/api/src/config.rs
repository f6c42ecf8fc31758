use std::net::SocketAddr;

use anyhow::Result;
use common::config::LoggingConfig;
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "MSGBOARD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// The API is the backend for the message board
pub struct AppConfig {
	/// The path to the config file
	pub config_file: Option<String>,

	/// Name of this instance
	pub name: String,

	///  The logging config
	pub logging: LoggingConfig,

	/// API Config
	pub api: ApiConfig,

	/// Database Config
	pub database: DatabaseConfig,

	/// JWT Config
	pub jwt: JwtConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
	/// Bind address for the API
	pub bind_address: SocketAddr,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			bind_address: SocketAddr::from(([0, 0, 0, 0, 0, 0, 0, 0], 8000)),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
	/// The database URL to use, `postgres://...` or `memory://`
	pub uri: String,
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		Self {
			uri: "postgres://root@localhost:5432/message_board".to_string(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
	/// JWT secret
	pub secret: String,

	/// JWT issuer
	pub issuer: String,

	/// How long issued tokens stay valid, in seconds
	pub expiration_secs: u64,
}

impl Default for JwtConfig {
	fn default() -> Self {
		Self {
			secret: "message-board".to_string(),
			issuer: "message-board".to_string(),
			expiration_secs: 300,
		}
	}
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			config_file: Some("config".to_string()),
			name: "message-board-api".to_string(),
			logging: LoggingConfig::default(),
			api: ApiConfig::default(),
			database: DatabaseConfig::default(),
			jwt: JwtConfig::default(),
		}
	}
}

#[derive(Debug, clap::Parser)]
#[command(version, about = "Message board GraphQL API")]
pub struct Cli {
	/// The path to the config file, the default `config` file is optional
	#[arg(long, short)]
	pub config_file: Option<String>,

	/// Print the GraphQL schema to stdout and exit
	#[arg(long)]
	pub export_gql: bool,

	#[command(subcommand)]
	pub command: Option<Command>,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
	/// Create a user that can log in through /api-token-auth
	CreateUser {
		#[arg(long)]
		username: String,
		#[arg(long)]
		password: String,
	},
}

impl AppConfig {
	/// Loads the config. An explicitly named file (flag or
	/// `MSGBOARD_CONFIG_FILE`) must exist, the default one may be missing.
	pub fn parse(config_file: Option<String>) -> Result<Self> {
		let explicit = config_file.or_else(|| std::env::var(format!("{ENV_PREFIX}_CONFIG_FILE")).ok());
		let required = explicit.is_some();
		let file = explicit.or(Self::default().config_file);

		let (mut config, config_file) = common::config::parse::<Self>(ENV_PREFIX, file.as_deref(), required)?;

		config.config_file = config_file;

		Ok(config)
	}
}
