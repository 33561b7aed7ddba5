//! Invoice-related definitions.

use common::{DateTime, TimeZone};
use juniper::GraphQLObject;
use service::query::invoice;

/// Next payment of an invoice.
#[derive(Clone, Debug, GraphQLObject)]
pub struct PaymentDate {
    /// Date and time the invoice is due by, in the `timeZone`.
    pub invoice_due_date: DateTime,

    /// Day of month the payments recur on.
    pub payment_day: i32,

    /// Date and time of the payment, in the `timeZone`.
    pub payment_date: DateTime,

    /// Identifier of the time zone the dates are calculated in.
    pub time_zone: String,
}

impl PaymentDate {
    /// Creates a new [`PaymentDate`] out of the provided
    /// [`invoice::NextPaymentDate`] output.
    #[must_use]
    pub fn new(out: invoice::Output, time_zone: &TimeZone) -> Self {
        let invoice::Output {
            invoice_due_date,
            payment_day,
            payment_date,
        } = out;

        Self {
            invoice_due_date: invoice_due_date.coerce(),
            payment_day: u8::from(payment_day).into(),
            payment_date: payment_date.coerce(),
            time_zone: time_zone.to_string(),
        }
    }
}
