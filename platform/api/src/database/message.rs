use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Message {
	/// The unique identifier for the message.
	pub id: i64,
	/// The user who wrote the message.
	#[sqlx(rename = "user_id")]
	pub author_id: i64,
	/// The trimmed message text, never empty.
	#[sqlx(rename = "message")]
	pub text: String,
	/// The time the message was stored.
	#[sqlx(rename = "creation_date")]
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFilter {
	/// Case-insensitive substring the text must contain.
	pub text_icontains: Option<String>,
}

impl MessageFilter {
	pub fn matches(&self, message: &Message) -> bool {
		match &self.text_icontains {
			Some(needle) => message.text.to_lowercase().contains(&needle.to_lowercase()),
			None => true,
		}
	}
}
