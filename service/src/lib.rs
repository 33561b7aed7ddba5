//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;

use common::TimeZone;

#[cfg(doc)]
use infra::AuthApi;

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [`TimeZone`] the calendar computations are performed in.
    pub time_zone: TimeZone,
}

impl From<TimeZone> for Config {
    fn from(time_zone: TimeZone) -> Self {
        Self { time_zone }
    }
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Api> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`AuthApi`] of this [`Service`].
    api: Api,
}

impl<Api> Service<Api> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub fn new(config: Config, api: Api) -> Self {
        Self { config, api }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`AuthApi`] of this [`Service`].
    #[must_use]
    pub fn api(&self) -> &Api {
        &self.api
    }
}
