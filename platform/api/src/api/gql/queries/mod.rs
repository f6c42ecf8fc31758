use async_graphql::MergedObject;

mod message;
mod user;

#[derive(Default, MergedObject)]
/// The root query type which contains root level fields.
pub struct Query(user::UserQuery, message::MessageQuery);
