//! [`Company`] definitions.

use derive_more::{AsRef, Display, From, Into};
use serde::{Deserialize, Deserializer};

#[cfg(doc)]
use crate::domain::User;

/// Company a [`User`] belongs to.
#[derive(Clone, Debug, Deserialize)]
pub struct Company {
    /// ID of this [`Company`].
    pub id: Id,

    /// [`Name`] of this [`Company`].
    pub name: Name,

    /// Postal [`Address`] of this [`Company`].
    #[serde(flatten)]
    pub address: Address,

    /// [`Currency`] this [`Company`] is invoiced in by default.
    pub default_currency: Currency,

    /// Indicator whether this [`Company`] has been approved.
    #[serde(default)]
    pub approved: bool,
}

/// ID of a [`Company`].
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

/// Name of a [`Company`].
#[derive(AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Name(String);

/// Postal address of a [`Company`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Address {
    /// First line of this [`Address`].
    #[serde(rename = "address_line_1")]
    pub line1: String,

    /// Optional second line of this [`Address`].
    #[serde(
        default,
        rename = "address_line_2",
        deserialize_with = "non_blank"
    )]
    pub line2: Option<String>,

    /// City of this [`Address`].
    #[serde(rename = "address_city")]
    pub city: String,

    /// State or region of this [`Address`].
    #[serde(rename = "address_state")]
    pub state: String,

    /// Postal code of this [`Address`].
    #[serde(rename = "address_zip")]
    pub zip: String,

    /// Country of this [`Address`].
    #[serde(rename = "address_country")]
    pub country: String,
}

/// Currency code, normalized to upper case.
#[derive(AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[serde(from = "String")]
pub struct Currency(String);

impl From<String> for Currency {
    fn from(code: String) -> Self {
        Self(code.trim().to_uppercase())
    }
}

/// Deserializes an optional string, treating a blank one as missing.
fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|s| !s.trim().is_empty()))
}
