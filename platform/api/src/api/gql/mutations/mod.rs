use async_graphql::MergedObject;

pub mod message;

#[derive(Default, MergedObject)]
/// The root mutation type which contains root level fields.
pub struct Mutation(message::MessageMutation);
