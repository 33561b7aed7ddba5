//! [`User`] definitions.

pub mod company;
pub mod session;

use derive_more::{AsRef, Display, From, Into};
use secrecy::{zeroize::Zeroize, CloneableSecret};
use serde::Deserialize;

pub use self::{company::Company, session::Session};

/// Platform user, as provided by the upstream authentication API.
#[derive(Clone, Debug, Deserialize)]
pub struct User {
    /// ID of this [`User`].
    pub id: Id,

    /// Full [`Name`] of this [`User`].
    pub full_name: Name,

    /// First [`Name`] of this [`User`].
    #[serde(default)]
    pub first_name: Option<Name>,

    /// Last [`Name`] of this [`User`].
    #[serde(default)]
    pub last_name: Option<Name>,

    /// [`Email`] of this [`User`].
    pub email: Email,

    /// [`Phone`] of this [`User`].
    #[serde(default)]
    pub phone: Option<Phone>,

    /// [`Roles`] of this [`User`].
    #[serde(default)]
    pub roles: Roles,

    /// Indicator whether this [`User`] has been verified.
    #[serde(default)]
    pub verified: bool,

    /// [`Company`] this [`User`] belongs to.
    #[serde(default, rename = "Company")]
    pub company: Option<Company>,
}

/// ID of a [`User`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
)]
pub struct Id(i64);

/// Name of a [`User`].
#[derive(AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Name(String);

/// Email address of a [`User`].
#[derive(AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is not blank.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        !address.as_ref().trim().is_empty()
    }
}

/// Password of a [`User`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Password(String);

impl Password {
    /// Creates a new [`Password`] if the given `password` is not empty.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        Self::check(&password).then_some(Self(password))
    }

    /// Checks whether the given `password` is a valid [`Password`].
    fn check(password: impl AsRef<str>) -> bool {
        !password.as_ref().is_empty()
    }
}

impl AsRef<str> for Password {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Phone number of a [`User`].
#[derive(AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Phone(String);

/// Roles of a [`User`], as a raw upstream value.
#[derive(AsRef, Clone, Debug, Default, Deserialize, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Roles(String);
