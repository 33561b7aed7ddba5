//! [`Query`] collection related to [`Invoice`]s.

use std::convert::Infallible;

use common::LocalDate;

#[cfg(doc)]
use crate::domain::Invoice;
use crate::{
    domain::invoice::{self, DueDateTime, PaymentDateTime, PaymentDay},
    Service,
};

use super::Query;

/// Calculates the next payment date of an [`Invoice`].
///
/// Both dates are interpreted in the configured [`TimeZone`]. A date whose
/// local year falls outside `0..=9999` is treated as missing.
///
/// [`TimeZone`]: common::TimeZone
#[derive(Clone, Copy, Debug)]
pub struct NextPaymentDate {
    /// [`LocalDate`] by which the [`Invoice`] must be paid.
    pub invoice_due_date: Option<LocalDate>,

    /// [`LocalDate`] whose day of month defines the payment cycle.
    pub payment_cycle_date: Option<LocalDate>,
}

/// Output of [`NextPaymentDate`] [`Query`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Output {
    /// [`DueDateTime`] of the [`Invoice`], in the configured offset.
    pub invoice_due_date: DueDateTime,

    /// [`PaymentDay`] of the payment cycle.
    pub payment_day: PaymentDay,

    /// Calculated [`PaymentDateTime`].
    pub payment_date: PaymentDateTime,
}

impl<Api> Query<NextPaymentDate> for Service<Api> {
    type Ok = Option<Output>;
    type Err = Infallible;

    async fn execute(
        &self,
        query: NextPaymentDate,
    ) -> Result<Self::Ok, Self::Err> {
        let zone = &self.config().time_zone;

        let due = query.invoice_due_date.and_then(|d| d.at(zone));
        let cycle = query.payment_cycle_date.and_then(|d| d.at(zone));

        let (Some(due), Some(cycle)) = (due, cycle) else {
            return Ok(None);
        };

        Ok(invoice::next_payment_date(Some(due), Some(cycle), zone).map(
            |payment_date| Output {
                invoice_due_date: due,
                payment_day: PaymentDay::of(&cycle),
                payment_date,
            },
        ))
    }
}
