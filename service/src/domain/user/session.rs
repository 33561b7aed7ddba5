//! [`Session`] definitions.

use std::fmt;

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use common::{unit, DateTime, DateTimeOf};
use derive_more::{AsRef, Debug, Display, Error, From};
use serde::{de, Deserialize, Deserializer};

#[cfg(doc)]
use crate::domain::User;

/// Name of the cookie carrying a [`Token`].
pub const COOKIE_NAME: &str = "auth-token";

/// Session of a [`User`], identified by its [`Token`].
///
/// Used only as a marker of the [`DateTimeOf`] kinds related to sessions.
#[derive(Clone, Copy, Debug)]
pub enum Session {}

/// [`DateTimeOf`] of a [`Session`] expiration.
pub type ExpirationDateTime = DateTimeOf<(Session, unit::Expiration)>;

/// Opaque bearer token of a [`Session`].
///
/// Consists of three `.`-separated segments, of which only the middle one
/// (the [`Claims`] payload) is inspected. The signature is never verified.
#[derive(AsRef, Clone, Debug, Eq, PartialEq)]
#[as_ref(str)]
#[debug("Token(..)")]
pub struct Token(String);

impl Token {
    /// Separator of the [`Token`] segments.
    const SEPARATOR: char = '.';

    /// [`base64`] engine decoding the [`Claims`] payload.
    ///
    /// Accepts both standard and URL-safe alphabets (the former is mapped onto
    /// the latter before decoding), with or without padding.
    const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
        &alphabet::URL_SAFE,
        GeneralPurposeConfig::new()
            .with_decode_padding_mode(DecodePaddingMode::Indifferent)
            .with_decode_allow_trailing_bits(true),
    );

    /// Creates a new [`Token`] out of the provided raw value.
    ///
    /// [`None`] is returned for an empty value, which denotes no [`Token`].
    #[must_use]
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        (!token.is_empty()).then_some(Self(token))
    }

    /// Decodes the [`Claims`] of this [`Token`] without verifying it.
    ///
    /// # Errors
    ///
    /// If the payload segment is missing or cannot be decoded into [`Claims`].
    pub fn claims(&self) -> Result<Claims, DecodeError> {
        use DecodeError as E;

        let payload = self
            .0
            .splitn(3, Self::SEPARATOR)
            .nth(1)
            .filter(|p| !p.is_empty())
            .ok_or(E::MissingPayload)?
            .replace('+', "-")
            .replace('/', "_");
        let json = Self::PAYLOAD_ENGINE.decode(payload)?;

        let claims = serde_json::from_slice::<serde_json::Value>(&json)?;
        if !claims.is_object() {
            return Err(E::NotAnObject);
        }
        Ok(serde_json::from_value(claims)?)
    }

    /// Classifies this [`Token`] at the provided `now` moment.
    ///
    /// Never fails: a [`Token`] which cannot be decoded is reported as
    /// [`Status::Malformed`].
    #[must_use]
    pub fn status(&self, now: DateTime) -> Status {
        match self.claims() {
            Ok(claims) => {
                if claims.is_expired_at(now) {
                    Status::Expired
                } else {
                    Status::Valid
                }
            }
            Err(e) => {
                tracing::debug!("malformed `Session` token: {e}");
                Status::Malformed
            }
        }
    }

    /// Indicates whether this [`Token`] cannot be used at the provided `now`
    /// moment anymore.
    ///
    /// Fails closed: any [`Token`] which is not [`Status::Valid`] is expired.
    #[must_use]
    pub fn is_expired(&self, now: DateTime) -> bool {
        self.status(now) != Status::Valid
    }
}

/// Claims carried by a [`Token`] payload.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct Claims {
    /// Moment the [`Token`] expires at.
    #[serde(default)]
    exp: Option<NumericDate>,
}

impl Claims {
    /// Returns the [`ExpirationDateTime`] of these [`Claims`], if any.
    #[must_use]
    pub fn expires_at(&self) -> Option<ExpirationDateTime> {
        self.exp.and_then(|NumericDate(secs)| {
            ExpirationDateTime::from_unix_timestamp(secs)
        })
    }

    /// Indicates whether these [`Claims`] are expired at the provided `now`
    /// moment.
    ///
    /// [`Claims`] without an expiration are always expired. The expiration
    /// moment itself is not expired yet.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime) -> bool {
        self.exp
            .map_or(true, |NumericDate(exp)| exp < now.unix_timestamp())
    }
}

/// Unix timestamp in whole seconds, rounded down from a fractional one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct NumericDate(i64);

impl<'de> Deserialize<'de> for NumericDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        /// [`de::Visitor`] of a [`NumericDate`].
        struct Visitor;

        impl de::Visitor<'_> for Visitor {
            type Value = NumericDate;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a numeric Unix timestamp")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(NumericDate(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(NumericDate(i64::try_from(v).unwrap_or(i64::MAX)))
            }

            #[expect(
                clippy::cast_possible_truncation,
                reason = "saturates on out of range values"
            )]
            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                if v.is_finite() {
                    Ok(NumericDate(v.floor() as i64))
                } else {
                    Err(E::custom("non-finite Unix timestamp"))
                }
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}

/// Classification of a [`Token`] at some moment.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Status {
    /// [`Token`] is not expired yet.
    #[display("valid")]
    Valid,

    /// [`Token`] is expired or carries no expiration.
    #[display("expired")]
    Expired,

    /// [`Token`] cannot be decoded.
    #[display("malformed")]
    Malformed,
}

/// Error of decoding [`Claims`] out of a [`Token`].
#[derive(Debug, Display, Error, From)]
pub enum DecodeError {
    /// [`Token`] has no payload segment.
    #[from(ignore)]
    #[display("`Token` has no payload segment")]
    MissingPayload,

    /// Payload segment is not a valid [`base64`].
    #[display("Payload is not a valid base64: {_0}")]
    Base64(base64::DecodeError),

    /// Payload is not a valid JSON.
    #[display("Payload is not a valid JSON: {_0}")]
    Json(serde_json::Error),

    /// Payload is not a JSON object.
    #[from(ignore)]
    #[display("Payload is not a JSON object")]
    NotAnObject,
}
