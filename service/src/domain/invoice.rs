//! [`Invoice`] definitions.

use common::{unit, DateTimeOf, TimeZone};
use derive_more::{Display, Into};
use time::{macros::time, Time};

/// Invoice awaiting its payment.
///
/// Used only as a marker of the [`DateTimeOf`] kinds related to invoices.
#[derive(Clone, Copy, Debug)]
pub enum Invoice {}

/// [`DateTimeOf`] by which an [`Invoice`] must be paid.
pub type DueDateTime = DateTimeOf<(Invoice, unit::Due)>;

/// Reference [`DateTimeOf`] whose day of month defines the monthly payment
/// cycle of [`Invoice`]s.
pub type CycleDateTime = DateTimeOf<(Invoice, unit::Cycle)>;

/// [`DateTimeOf`] when an [`Invoice`] is paid.
pub type PaymentDateTime = DateTimeOf<(Invoice, unit::Payment)>;

/// Time of day payments are performed at.
pub const PAYMENT_TIME: Time = time!(6:00);

/// Day of month (`1..=31`) an [`Invoice`] payment recurs on.
#[derive(Clone, Copy, Debug, Display, Eq, Into, PartialEq)]
pub struct PaymentDay(u8);

impl PaymentDay {
    /// Creates a new [`PaymentDay`] if the provided `day` is in `1..=31`.
    #[must_use]
    pub fn new(day: u8) -> Option<Self> {
        (1..=31).contains(&day).then_some(Self(day))
    }

    /// Extracts the [`PaymentDay`] from the provided [`CycleDateTime`].
    #[must_use]
    pub fn of(cycle: &CycleDateTime) -> Self {
        Self(cycle.day())
    }
}

/// Calculates the next [`PaymentDateTime`] of an [`Invoice`] due at the
/// provided `invoice_due` date, paid monthly on the day of the provided
/// `payment_cycle` date.
///
/// Both dates are expected to be in the provided [`TimeZone`]. The payment is
/// placed into the calendar month of the `invoice_due` date at the
/// [`PAYMENT_TIME`] wall-clock time of that [`TimeZone`], and moved one month
/// forward if that happens strictly before the `invoice_due` instant. A
/// [`PaymentDay`] exceeding the length of the month rolls into the following
/// month.
///
/// [`None`] is returned if any of the dates is missing, or the result is out of
/// the supported range.
#[must_use]
pub fn next_payment_date(
    invoice_due: Option<DueDateTime>,
    payment_cycle: Option<CycleDateTime>,
    time_zone: &TimeZone,
) -> Option<PaymentDateTime> {
    let (due, cycle) = (invoice_due?, payment_cycle?);
    let day = PaymentDay::of(&cycle);

    let payment = PaymentDateTime::from_calendar_overflowing(
        due.year(),
        due.month(),
        day.into(),
        PAYMENT_TIME,
        time_zone,
    )?;

    if payment < due.coerce() {
        payment.add_months_overflowing(1, time_zone)
    } else {
        Some(payment)
    }
}

#[cfg(test)]
mod spec {
    use common::{DateTime, TimeZone};
    use time::{macros::time, Time, UtcOffset};

    use super::{CycleDateTime, DueDateTime, PaymentDateTime, PaymentDay};

    fn zone() -> TimeZone {
        TimeZone::fixed("UTC-05:00", UtcOffset::from_hms(-5, 0, 0).unwrap())
    }

    fn at(year: i32, month: u8, day: u8, time: Time) -> DateTime {
        DateTime::from_calendar_overflowing(year, month, day, time, &zone())
            .unwrap()
    }

    fn due(year: i32, month: u8, day: u8) -> Option<DueDateTime> {
        Some(at(year, month, day, Time::MIDNIGHT).coerce())
    }

    fn cycle(day: u8) -> Option<CycleDateTime> {
        Some(at(2023, 1, day, Time::MIDNIGHT).coerce())
    }

    fn payment(year: i32, month: u8, day: u8) -> PaymentDateTime {
        at(year, month, day, time!(6:00)).coerce()
    }

    fn next_payment_date(
        due: Option<DueDateTime>,
        cycle: Option<CycleDateTime>,
    ) -> Option<PaymentDateTime> {
        super::next_payment_date(due, cycle, &zone())
    }

    #[test]
    fn requires_both_dates() {
        assert_eq!(next_payment_date(None, cycle(15)), None);
        assert_eq!(next_payment_date(due(2023, 1, 10), None), None);
        assert_eq!(next_payment_date(None, None), None);
    }

    #[test]
    fn pays_in_same_month_when_cycle_day_is_later() {
        let res = next_payment_date(due(2023, 1, 10), cycle(15)).unwrap();

        assert_eq!(res, payment(2023, 1, 15));
        assert_eq!((res.month(), res.day()), (1, 15));
        assert_eq!(res.time(), time!(6:00));
        assert_eq!(res.offset(), UtcOffset::from_hms(-5, 0, 0).unwrap());
    }

    #[test]
    fn pays_in_next_month_when_cycle_day_is_earlier() {
        assert_eq!(
            next_payment_date(due(2023, 1, 20), cycle(15)),
            Some(payment(2023, 2, 15)),
        );
        assert_eq!(
            next_payment_date(due(2023, 12, 20), cycle(15)),
            Some(payment(2024, 1, 15)),
        );
    }

    #[test]
    fn compares_against_due_time_of_day() {
        let due_at = |t| Some(at(2023, 1, 15, t).coerce());

        assert_eq!(
            next_payment_date(due_at(Time::MIDNIGHT), cycle(15)),
            Some(payment(2023, 1, 15)),
        );
        assert_eq!(
            next_payment_date(due_at(time!(6:00)), cycle(15)),
            Some(payment(2023, 1, 15)),
        );
        assert_eq!(
            next_payment_date(due_at(time!(6:00:01)), cycle(15)),
            Some(payment(2023, 2, 15)),
        );
    }

    #[test]
    fn handles_month_end() {
        assert_eq!(
            next_payment_date(due(2023, 1, 30), cycle(31)),
            Some(payment(2023, 1, 31)),
        );

        let leap_cycle = Some(at(2024, 2, 29, Time::MIDNIGHT).coerce());
        assert_eq!(
            next_payment_date(due(2024, 2, 28), leap_cycle),
            Some(payment(2024, 2, 29)),
        );
    }

    #[test]
    fn overflows_short_months() {
        assert_eq!(
            next_payment_date(due(2023, 2, 20), cycle(31)),
            Some(payment(2023, 3, 3)),
        );
        assert_eq!(
            next_payment_date(due(2023, 4, 30), cycle(29)),
            Some(payment(2023, 5, 29)),
        );
    }

    #[test]
    fn gives_up_past_supported_range() {
        assert_eq!(next_payment_date(due(9999, 12, 20), cycle(15)), None);
    }

    #[test]
    fn pays_at_local_wall_clock_across_daylight_saving() {
        let ny = TimeZone::named("America/New_York").unwrap();
        let local = |y, m, d| {
            DateTime::from_calendar_overflowing(y, m, d, Time::MIDNIGHT, &ny)
                .unwrap()
        };

        let summer = super::next_payment_date(
            Some(local(2023, 7, 10).coerce()),
            Some(local(2023, 1, 15).coerce()),
            &ny,
        )
        .unwrap();
        assert_eq!(summer.to_rfc3339(), "2023-07-15T06:00:00-04:00");

        let moved = super::next_payment_date(
            Some(local(2023, 3, 10).coerce()),
            Some(local(2023, 1, 5).coerce()),
            &ny,
        )
        .unwrap();
        assert_eq!(moved.to_rfc3339(), "2023-04-05T06:00:00-04:00");
    }

    #[test]
    fn payment_day() {
        assert_eq!(PaymentDay::new(0), None);
        assert_eq!(PaymentDay::new(32), None);
        assert_eq!(PaymentDay::new(31).map(u8::from), Some(31));
        assert_eq!(u8::from(PaymentDay::of(&cycle(15).unwrap())), 15);
    }
}
