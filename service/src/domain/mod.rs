//! Domain definitions.

pub mod invoice;
pub mod route;
pub mod user;

pub use self::{invoice::Invoice, user::User};
