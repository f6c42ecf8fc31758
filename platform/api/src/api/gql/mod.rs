use async_graphql::http::GraphiQLSource;
use async_graphql::{extensions, EmptySubscription, Schema};

pub mod error;
pub mod ext;
pub mod handlers;
pub mod models;
pub mod mutations;
pub mod queries;

pub type MySchema = Schema<queries::Query, mutations::Mutation, EmptySubscription>;

/// Where the GraphQL endpoint is mounted.
pub const GQL_PATH: &str = "/gql";

pub fn schema() -> MySchema {
	Schema::build(queries::Query::default(), mutations::Mutation::default(), EmptySubscription)
		.extension(extensions::Analyzer)
		.extension(extensions::Tracing)
		.limit_complexity(200) // We don't want to allow too complex queries to be executed
		.limit_depth(16)
		.finish()
}

pub fn playground_html() -> String {
	GraphiQLSource::build().endpoint(GQL_PATH).title("Message Board").finish()
}
