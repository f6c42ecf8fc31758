use async_graphql::{Description, InputValueError, InputValueResult, Scalar, ScalarType, Value};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// The GraphQL type names a message global id may carry.
const MESSAGE_TYPE_NAMES: &[&str] = &["Message", "MessageType"];

/// Encodes `<type>:<id>` as base64, the format clients use to refetch nodes.
pub fn to_global_id(type_name: &str, id: i64) -> String {
	STANDARD.encode(format!("{type_name}:{id}"))
}

/// Splits a global id back into its type name and primary key.
pub fn from_global_id(global_id: &str) -> Option<(String, i64)> {
	let decoded = STANDARD.decode(global_id).ok()?;
	let decoded = String::from_utf8(decoded).ok()?;
	let (type_name, id) = decoded.split_once(':')?;

	Some((type_name.to_string(), id.parse().ok()?))
}

/// A message id: either the integer primary key or the message's global id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Description)]
pub struct MessageId(pub i64);

#[Scalar(name = "MessageId", use_type_description)]
impl ScalarType for MessageId {
	fn parse(value: Value) -> InputValueResult<Self> {
		match value {
			Value::Number(n) => n
				.as_i64()
				.map(MessageId)
				.ok_or_else(|| InputValueError::custom("id must be an integer")),
			Value::String(s) => {
				if let Ok(id) = s.trim().parse::<i64>() {
					return Ok(MessageId(id));
				}

				match from_global_id(&s) {
					Some((type_name, id)) if MESSAGE_TYPE_NAMES.contains(&type_name.as_str()) => Ok(MessageId(id)),
					Some((type_name, _)) => Err(InputValueError::custom(format!(
						"expected a message id, got an id of type {type_name}"
					))),
					None => Err(InputValueError::custom("invalid message id")),
				}
			}
			_ => Err(InputValueError::expected_type(value)),
		}
	}

	fn is_valid(value: &Value) -> bool {
		matches!(value, Value::Number(_) | Value::String(_))
	}

	fn to_value(&self) -> Value {
		Value::Number(self.0.into())
	}
}
