//! [`User`]-related definitions.

use derive_more::{Display, From};
use juniper::{graphql_object, GraphQLScalar, ID};
use service::domain;

use crate::Context;

/// A [`User`] of the platform.
#[derive(Clone, Debug, From)]
pub struct User(domain::User);

/// A `User` of the platform, as provided by the authentication service.
#[graphql_object(context = Context)]
impl User {
    /// Unique identifier of this `User`.
    pub fn id(&self) -> ID {
        ID::new(self.0.id.to_string())
    }

    /// Full name of this `User`.
    pub fn full_name(&self) -> Name {
        self.0.full_name.to_string().into()
    }

    /// First name of this `User`.
    pub fn first_name(&self) -> Option<Name> {
        self.0.first_name.as_ref().map(|n| n.to_string().into())
    }

    /// Last name of this `User`.
    pub fn last_name(&self) -> Option<Name> {
        self.0.last_name.as_ref().map(|n| n.to_string().into())
    }

    /// Email of this `User`.
    pub fn email(&self) -> Email {
        self.0.email.to_string().into()
    }

    /// Phone of this `User`.
    pub fn phone(&self) -> Option<Phone> {
        self.0.phone.as_ref().map(|p| p.to_string().into())
    }

    /// Roles of this `User`.
    pub fn roles(&self) -> String {
        self.0.roles.to_string()
    }

    /// Indicator whether this `User` has been verified.
    pub fn verified(&self) -> bool {
        self.0.verified
    }

    /// `Company` this `User` belongs to.
    pub fn company(&self) -> Option<Company> {
        self.0.company.clone().map(Company)
    }
}

/// A company a [`User`] belongs to.
#[derive(Clone, Debug)]
pub struct Company(domain::user::Company);

/// A company a `User` belongs to.
#[graphql_object(context = Context)]
impl Company {
    /// Unique identifier of this `Company`.
    pub fn id(&self) -> ID {
        ID::new(self.0.id.to_string())
    }

    /// Name of this `Company`.
    pub fn name(&self) -> String {
        self.0.name.to_string()
    }

    /// First line of this `Company` address.
    pub fn address_line1(&self) -> &str {
        &self.0.address.line1
    }

    /// Second line of this `Company` address.
    pub fn address_line2(&self) -> Option<&str> {
        self.0.address.line2.as_deref()
    }

    /// City of this `Company` address.
    pub fn city(&self) -> &str {
        &self.0.address.city
    }

    /// State of this `Company` address.
    pub fn state(&self) -> &str {
        &self.0.address.state
    }

    /// ZIP code of this `Company` address.
    pub fn zip(&self) -> &str {
        &self.0.address.zip
    }

    /// Country of this `Company` address.
    pub fn country(&self) -> &str {
        &self.0.address.country
    }

    /// Currency this `Company` is billed in by default.
    pub fn default_currency(&self) -> String {
        self.0.default_currency.to_string()
    }

    /// Indicator whether this `Company` has been approved.
    pub fn approved(&self) -> bool {
        self.0.approved
    }
}

/// Name of a `User`.
#[derive(Clone, Debug, Display, From, GraphQLScalar)]
#[graphql(name = "UserName", transparent)]
pub struct Name(String);

/// Email of a `User`.
#[derive(Clone, Debug, Display, From, GraphQLScalar)]
#[graphql(name = "UserEmail", transparent)]
pub struct Email(String);

/// Phone of a `User`.
#[derive(Clone, Debug, Display, From, GraphQLScalar)]
#[graphql(name = "UserPhone", transparent)]
pub struct Phone(String);
