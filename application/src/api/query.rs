//! GraphQL [`Query`]s definitions.

use common::LocalDate;
use juniper::graphql_object;
use service::{query, Query as _};

use crate::{api, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the profile of the currently authenticated `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request carries no session, or the
    ///                              session is not recognized;
    /// - `PROFILE_UNAVAILABLE` - the authentication service failed to provide
    ///                           the profile.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myUser",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_user(ctx: &Context) -> Result<api::User, Error> {
        ctx.current_user().await.map(|u| u.clone().into())
    }

    /// Calculates the next payment date of an invoice.
    ///
    /// The payment happens at 06:00 on the day of month of the
    /// `paymentCycleDate`, in the month of the `invoiceDueDate`, or in the
    /// following month if that moment precedes the `invoiceDueDate`.
    ///
    /// Returns `null` if any of the dates is omitted.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "nextPaymentDate",
            invoice_due_date = ?invoice_due_date,
            otel.name = Self::SPAN_NAME,
            payment_cycle_date = ?payment_cycle_date,
        ),
    )]
    pub async fn next_payment_date(
        invoice_due_date: Option<LocalDate>,
        payment_cycle_date: Option<LocalDate>,
        ctx: &Context,
    ) -> Option<api::PaymentDate> {
        let time_zone = &ctx.service().config().time_zone;
        ctx.service()
            .execute(query::invoice::NextPaymentDate {
                invoice_due_date,
                payment_cycle_date,
            })
            .await
            .unwrap_or_else(|e| match e {})
            .map(|out| api::PaymentDate::new(out, time_zone))
    }

    /// Returns the identifier of the time zone the dates are calculated in.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "timeZone",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub fn time_zone(ctx: &Context) -> String {
        ctx.service().config().time_zone.to_string()
    }
}
