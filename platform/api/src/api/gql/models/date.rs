use async_graphql::{InputValueError, InputValueResult, Scalar, ScalarType, Value};
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateRFC3339(pub DateTime<Utc>);

#[Scalar]
impl ScalarType for DateRFC3339 {
	fn parse(value: Value) -> InputValueResult<Self> {
		match value {
			Value::String(s) => DateTime::parse_from_rfc3339(&s)
				.map(|dt| DateRFC3339(dt.with_timezone(&Utc)))
				.map_err(|e| InputValueError::custom(e.to_string())),
			Value::Number(n) => n
				.as_i64()
				.and_then(|n| Utc.timestamp_opt(n, 0).single())
				.map(DateRFC3339)
				.ok_or_else(|| InputValueError::custom("Invalid number")),
			_ => Err(InputValueError::custom("Invalid value")),
		}
	}

	fn to_value(&self) -> Value {
		Value::String(self.0.to_rfc3339_opts(SecondsFormat::Micros, false))
	}
}

impl From<DateTime<Utc>> for DateRFC3339 {
	fn from(dt: DateTime<Utc>) -> Self {
		DateRFC3339(dt)
	}
}
