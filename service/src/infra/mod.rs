//! Infrastructure layer.

pub mod auth_api;

pub use self::auth_api::AuthApi;
#[cfg(feature = "http")]
pub use self::auth_api::{http, Http};
