//! [`Query`] collection related to a single [`User`].

use common::operations::By;

use crate::domain::{user::session, User};
#[cfg(doc)]
use crate::Query;

use super::ApiQuery;

/// Queries a [`User`] by its [`session::Token`].
pub type ByToken = ApiQuery<By<Option<User>, session::Token>>;
