//! [`AuthApi`]-related implementations.

#[cfg(feature = "http")]
pub mod http;

use derive_more::{Display, Error as StdError, From};
use secrecy::SecretBox;

use crate::domain::user::{self, session};
#[cfg(doc)]
use crate::domain::User;

#[cfg(feature = "http")]
pub use self::http::Http;

/// Operation of the upstream authentication API.
pub use common::Handler as AuthApi;

/// [`AuthApi`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "http")]
    /// [`Http`] error.
    Http(http::Error),
}

/// Credentials a [`User`] authenticates with.
#[derive(Debug)]
pub struct Credentials {
    /// [`user::Email`] of a [`User`].
    pub email: user::Email,

    /// [`user::Password`] of a [`User`].
    pub password: SecretBox<user::Password>,
}

/// Outcome of authenticating with [`Credentials`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Authentication {
    /// [`Credentials`] are accepted and a new [`session::Token`] is issued.
    Granted(session::Token),

    /// [`Credentials`] are rejected.
    Denied {
        /// Human-readable reason provided by the upstream, if any.
        message: Option<String>,
    },
}
