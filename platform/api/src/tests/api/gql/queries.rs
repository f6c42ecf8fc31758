use async_graphql::{Request, Variables};
use serde_json::json;

use super::execute;
use crate::api::gql::models::global_id::to_global_id;
use crate::config::AppConfig;
use crate::tests::global::{create_user, mock_global_state};

#[tokio::test]
async fn test_current_user() {
	let (global, handler) = mock_global_state(AppConfig::default()).await;

	let user = create_user(&global, "alice", "password").await;
	global.db.create_message(user.id, "first").await.unwrap();

	let query = "{ currentUser { id username dateJoined messages { message } } }";

	let res = execute(&global, None, query).await;
	assert!(res.errors.is_empty(), "{:?}", res.errors);
	assert_eq!(res.data.into_json().unwrap(), json!({ "currentUser": null }));

	let res = execute(&global, Some(&user), query).await;
	assert!(res.errors.is_empty(), "{:?}", res.errors);
	let data = res.data.into_json().unwrap();
	assert_eq!(data["currentUser"]["id"], json!(user.id));
	assert_eq!(data["currentUser"]["username"], json!("alice"));
	assert!(data["currentUser"]["dateJoined"].is_string());
	assert_eq!(data["currentUser"]["messages"], json!([{ "message": "first" }]));

	drop(global);
	handler.cancel().await;
}

#[tokio::test]
async fn test_password_not_exposed() {
	let (global, handler) = mock_global_state(AppConfig::default()).await;

	let user = create_user(&global, "alice", "password").await;

	let res = execute(&global, Some(&user), "{ currentUser { passwordHash } }").await;
	assert_eq!(res.errors.len(), 1);

	drop(global);
	handler.cancel().await;
}

#[tokio::test]
async fn test_all_messages() {
	let (global, handler) = mock_global_state(AppConfig::default()).await;

	let alice = create_user(&global, "alice", "password").await;
	let bob = create_user(&global, "bob", "password").await;

	global.db.create_message(alice.id, "Hello World").await.unwrap();
	global.db.create_message(bob.id, "goodbye").await.unwrap();
	global.db.create_message(alice.id, "hello again").await.unwrap();

	let res = execute(&global, None, "{ allMessages { id message user { username } } }").await;
	assert!(res.errors.is_empty(), "{:?}", res.errors);
	assert_eq!(
		res.data.into_json().unwrap(),
		json!({
			"allMessages": [
				{ "id": 1, "message": "Hello World", "user": { "username": "alice" } },
				{ "id": 2, "message": "goodbye", "user": { "username": "bob" } },
				{ "id": 3, "message": "hello again", "user": { "username": "alice" } },
			]
		})
	);

	let query = r#"{ allMessages(filter: { message_icontains: "HELLO" }) { id } }"#;
	let res = execute(&global, None, query).await;
	assert!(res.errors.is_empty(), "{:?}", res.errors);
	assert_eq!(
		res.data.into_json().unwrap(),
		json!({ "allMessages": [{ "id": 1 }, { "id": 3 }] })
	);

	let query = r#"{ allMessages(filter: { message_icontains: "nothing like this" }) { id } }"#;
	let res = execute(&global, None, query).await;
	assert_eq!(res.data.into_json().unwrap(), json!({ "allMessages": [] }));

	let query = "{ allMessages(filter: {}) { id } }";
	let res = execute(&global, None, query).await;
	assert_eq!(
		res.data.into_json().unwrap(),
		json!({ "allMessages": [{ "id": 1 }, { "id": 2 }, { "id": 3 }] })
	);

	drop(global);
	handler.cancel().await;
}

#[tokio::test]
async fn test_message_by_id() {
	let (global, handler) = mock_global_state(AppConfig::default()).await;

	let user = create_user(&global, "alice", "password").await;
	let message = global.db.create_message(user.id, "hello").await.unwrap();

	let query = "query ($id: MessageId!) { message(id: $id) { id globalId message creationDate user { id } } }";

	let global_id = to_global_id("Message", message.id);
	let legacy_id = to_global_id("MessageType", message.id);

	for id in [json!(message.id), json!(message.id.to_string()), json!(global_id), json!(legacy_id)] {
		let request = Request::new(query).variables(Variables::from_json(json!({ "id": id.clone() })));
		let res = execute(&global, None, request).await;
		assert!(res.errors.is_empty(), "{id}: {:?}", res.errors);

		let data = res.data.into_json().unwrap();
		assert_eq!(data["message"]["id"], json!(message.id), "{id}");
		assert_eq!(data["message"]["globalId"], json!(global_id), "{id}");
		assert_eq!(data["message"]["message"], json!("hello"), "{id}");
		assert_eq!(data["message"]["user"]["id"], json!(user.id), "{id}");
		assert!(data["message"]["creationDate"].is_string());
	}

	drop(global);
	handler.cancel().await;
}

#[tokio::test]
async fn test_message_not_found() {
	let (global, handler) = mock_global_state(AppConfig::default()).await;

	let res = execute(&global, None, "{ message(id: 42) { id } }").await;
	assert_eq!(res.errors.len(), 1);
	assert_eq!(res.errors[0].message, "message not found");

	let extensions = res.errors[0].extensions.as_ref().expect("missing extensions");
	assert_eq!(extensions.get("kind"), Some(&async_graphql::Value::from("NotFound")));

	let res = execute(&global, None, "{ message(id: \"VXNlcjox\") { id } }").await;
	assert_eq!(res.errors.len(), 1, "a User global id must not resolve to a message");

	drop(global);
	handler.cancel().await;
}
