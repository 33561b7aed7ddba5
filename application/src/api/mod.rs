//! GraphQL API definitions.

pub mod invoice;
mod query;
pub mod user;

use juniper::{EmptyMutation, EmptySubscription};

use crate::Context;

pub use self::{invoice::PaymentDate, query::Query, user::User};

/// GraphQL schema.
pub type Schema = juniper::RootNode<
    'static,
    Query,
    EmptyMutation<Context>,
    EmptySubscription<Context>,
>;

/// Creates a new [`Schema`].
#[must_use]
pub fn schema() -> Schema {
    Schema::new(Query, EmptyMutation::new(), EmptySubscription::new())
}
