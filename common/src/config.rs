use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::logging;

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
	/// The log level to use, this is a tracing env filter
	pub level: String,

	/// What logging mode we should use
	pub mode: logging::Mode,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			mode: logging::Mode::Default,
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read config file {path}: {source}")]
	Io { path: String, source: std::io::Error },
	#[error("config file not found: {0}")]
	NotFound(String),
	#[error("unsupported config file extension: {0}")]
	UnsupportedFormat(String),
	#[error("failed to parse toml: {0}")]
	Toml(#[from] toml::de::Error),
	#[error("failed to parse yaml: {0}")]
	Yaml(#[from] serde_yaml::Error),
	#[error("failed to parse json: {0}")]
	Json(#[from] serde_json::Error),
	#[error("invalid environment variable {key}: {message}")]
	Env { key: String, message: String },
	#[error("invalid value at {path}: {message}")]
	Invalid { path: String, message: String },
}

const FILE_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Builds a config from, in increasing priority: `C::default()`, the config
/// file, and environment variables named `{prefix}_{SECTION}__{KEY}`.
///
/// A missing config file is only an error when `file_required` is set.
/// Returns the config together with the canonical path of the file that was
/// loaded, if any.
pub fn parse<C>(env_prefix: &str, config_file: Option<&str>, file_required: bool) -> Result<(C, Option<String>)>
where
	C: Default + Serialize + DeserializeOwned,
{
	let mut value = serde_json::to_value(C::default())?;
	let mut config_path = None;

	if let Some(path) = config_file {
		match load_file(path)? {
			Some((file_value, location)) => {
				merge(&mut value, file_value);
				config_path = Some(location);
			}
			None if file_required => return Err(ConfigError::NotFound(path.to_string())),
			None => tracing::debug!(path, "config file not found, using defaults"),
		}
	}

	apply_env(&mut value, env_prefix, std::env::vars())?;

	let mut ignored = Vec::new();
	let mut on_ignored = |path: serde_ignored::Path<'_>| ignored.push(path.to_string());
	let deserializer = serde_ignored::Deserializer::new(value, &mut on_ignored);
	let config = serde_path_to_error::deserialize(deserializer).map_err(|err| ConfigError::Invalid {
		path: err.path().to_string(),
		message: err.inner().to_string(),
	})?;

	for key in ignored {
		tracing::warn!(key, "unknown config key ignored");
	}

	Ok((config, config_path))
}

fn load_file(path: &str) -> Result<Option<(Value, String)>> {
	let candidates = if Path::new(path).extension().is_some() {
		vec![path.to_string()]
	} else {
		FILE_EXTENSIONS.iter().map(|ext| format!("{path}.{ext}")).collect()
	};

	let Some(found) = candidates.into_iter().find(|p| Path::new(p).is_file()) else {
		return Ok(None);
	};

	let content = std::fs::read_to_string(&found).map_err(|source| ConfigError::Io {
		path: found.clone(),
		source,
	})?;

	let extension = Path::new(&found)
		.extension()
		.and_then(|ext| ext.to_str())
		.unwrap_or_default()
		.to_lowercase();

	let value = match extension.as_str() {
		"toml" => toml::from_str::<Value>(&content)?,
		"yaml" | "yml" => serde_yaml::from_str::<Value>(&content)?,
		"json" => serde_json::from_str::<Value>(&content)?,
		_ => return Err(ConfigError::UnsupportedFormat(found)),
	};

	let location = std::fs::canonicalize(&found)
		.map(|p| p.display().to_string())
		.unwrap_or(found);

	Ok(Some((value, location)))
}

fn merge(base: &mut Value, overlay: Value) {
	match (base, overlay) {
		(Value::Object(base), Value::Object(overlay)) => {
			for (key, value) in overlay {
				match base.get_mut(&key) {
					Some(existing) => merge(existing, value),
					None => {
						base.insert(key, value);
					}
				}
			}
		}
		(base, overlay) => *base = overlay,
	}
}

pub(crate) fn apply_env(value: &mut Value, prefix: &str, vars: impl Iterator<Item = (String, String)>) -> Result<()> {
	let prefix = format!("{}_", prefix.to_uppercase());

	for (key, raw) in vars {
		let Some(name) = key.strip_prefix(&prefix) else {
			continue;
		};

		let path = name.to_lowercase().split("__").map(str::to_string).collect::<Vec<_>>();
		if path.iter().any(String::is_empty) {
			return Err(ConfigError::Env {
				key,
				message: "empty key segment".to_string(),
			});
		}

		let slot = lookup_or_insert(value, &path).ok_or_else(|| ConfigError::Env {
			key: key.clone(),
			message: "path crosses a non-table value".to_string(),
		})?;

		*slot = coerce(slot, &raw).map_err(|message| ConfigError::Env { key, message })?;
	}

	Ok(())
}

fn lookup_or_insert<'a>(value: &'a mut Value, path: &[String]) -> Option<&'a mut Value> {
	let Some((first, rest)) = path.split_first() else {
		return Some(value);
	};

	if value.is_null() {
		*value = Value::Object(Map::new());
	}

	let child = value.as_object_mut()?.entry(first.clone()).or_insert(Value::Null);

	lookup_or_insert(child, rest)
}

/// Env values are strings; the default value already at the slot decides
/// which type they are read as.
fn coerce(current: &Value, raw: &str) -> std::result::Result<Value, String> {
	match current {
		Value::Bool(_) => raw
			.parse::<bool>()
			.map(Value::Bool)
			.map_err(|_| format!("expected a boolean, got {raw:?}")),
		Value::Number(_) => {
			if let Ok(n) = raw.parse::<i64>() {
				Ok(Value::from(n))
			} else if let Ok(n) = raw.parse::<u64>() {
				Ok(Value::from(n))
			} else {
				raw.parse::<f64>()
					.map(Value::from)
					.map_err(|_| format!("expected a number, got {raw:?}"))
			}
		}
		Value::Array(_) => Ok(Value::Array(
			raw.split(',')
				.filter(|s| !s.is_empty())
				.map(|s| Value::String(s.trim().to_string()))
				.collect(),
		)),
		Value::Object(_) => Err("cannot assign a value to a config section".to_string()),
		Value::Null | Value::String(_) => Ok(Value::String(raw.to_string())),
	}
}
