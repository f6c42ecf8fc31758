use async_graphql::ErrorExtensions;

use crate::api::gql::error::{GqlError, GqlErrorInterface, OptionExt};
use crate::database::DatabaseError;

#[test]
fn test_not_found_extensions() {
	let err = GqlErrorInterface::from(GqlError::NotFound("message")).extend();

	assert_eq!(err.message, "message not found");

	let extensions = err.extensions.expect("missing extensions");
	assert_eq!(extensions.get("kind"), Some(&async_graphql::Value::from("NotFound")));
	assert_eq!(
		extensions.get("reason"),
		Some(&async_graphql::Value::from("message not found"))
	);
}

#[test]
fn test_database_error_is_hidden() {
	let err = GqlErrorInterface::from(DatabaseError::UnknownUser(5)).extend();

	assert_eq!(err.message, "database error");
	let extensions = err.extensions.expect("missing extensions");
	assert_eq!(extensions.get("kind"), Some(&async_graphql::Value::from("Database")));
	assert_eq!(extensions.get("reason"), Some(&async_graphql::Value::from("database error")));
}

#[test]
fn test_map_err_gql() {
	assert_eq!(Some(3).map_err_gql(GqlError::NotFound("thing")).ok(), Some(3));

	let err = None::<()>.map_err_gql(GqlError::NotFound("thing")).unwrap_err().extend();
	assert_eq!(err.message, "thing not found");
}
