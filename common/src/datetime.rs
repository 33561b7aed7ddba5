//! Date and time utilities.

use std::{
    cmp::Ordering, env, fs, marker::PhantomData, ops::RangeInclusive,
    str::FromStr,
};

use derive_more::{Debug, Display, Error};
use time::{
    format_description::well_known::Rfc3339, macros::format_description,
    Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset,
};
use time_tz::{timezones, Offset as _, TimeZone as _, Tz};

/// Calendar years a [`DateTimeOf`] may fall into, in its own offset.
///
/// Matches the years representable in [RFC 3339].
///
/// [RFC 3339]: https://tools.ietf.org/html/rfc3339
const SUPPORTED_YEARS: RangeInclusive<i32> = 0..=9999;

/// Untyped date and time.
pub type DateTime = DateTimeOf;

/// Date and time at a fixed UTC offset.
///
/// Calendar components (year, month, day, time of day) are always reported in
/// the offset this [`DateTimeOf`] carries, while comparison is performed by
/// the represented instant. The year always lies in `0..=9999`.
#[derive(Debug)]
pub struct DateTimeOf<Of: ?Sized = ()> {
    /// Inner representation of the date and time.
    inner: OffsetDateTime,

    /// Type parameter describing the kind of date and time.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateTimeOf<Of> {
    /// A [`DateTime`] representing the Unix epoch.
    pub const UNIX_EPOCH: Self = Self {
        inner: OffsetDateTime::UNIX_EPOCH,
        _of: PhantomData,
    };

    /// Creates a new [`DateTime`] representing the current date and time in
    /// UTC.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn now() -> Self {
        let inner = OffsetDateTime::now_utc();
        Self {
            _of: PhantomData,
            inner: inner
                .replace_microsecond(inner.microsecond())
                .expect("infallible"),
        }
    }

    /// Wraps the provided `inner` value if its year is supported.
    fn from_inner(inner: OffsetDateTime) -> Option<Self> {
        SUPPORTED_YEARS.contains(&inner.year()).then_some(Self {
            inner,
            _of: PhantomData,
        })
    }

    /// Creates a new [`DateTime`] from the provided [`UNIX_EPOCH`] timestamp.
    ///
    /// [`None`] is returned if the timestamp is out of the supported range.
    ///
    /// [`UNIX_EPOCH`]: Self::UNIX_EPOCH
    #[must_use]
    pub fn from_unix_timestamp(timestamp: i64) -> Option<Self> {
        OffsetDateTime::from_unix_timestamp(timestamp)
            .ok()
            .and_then(Self::from_inner)
    }

    /// Returns the [`UNIX_EPOCH`] timestamp of this [`DateTime`] in whole
    /// seconds.
    ///
    /// [`UNIX_EPOCH`]: Self::UNIX_EPOCH
    #[must_use]
    pub fn unix_timestamp(&self) -> i64 {
        self.inner.unix_timestamp()
    }

    /// Creates a new [`DateTime`] from the provided [RFC 3339] string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid [RFC 3339] date and time.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn from_rfc3339(input: &str) -> Result<Self, ParseError> {
        use ParseError as E;

        let dt = OffsetDateTime::parse(input, &Rfc3339).map_err(E::Parse)?;
        let dt = dt
            .replace_microsecond(dt.microsecond())
            .map_err(E::ComponentRange)?;
        Self::from_inner(dt).ok_or(E::OutOfRange)
    }

    /// Creates a new [`DateTime`] from the provided calendar components, as
    /// a wall-clock time in the provided [`TimeZone`].
    ///
    /// A `day` exceeding the length of the `month` rolls over into the
    /// following month, so February 31 becomes March 3 (or March 2 in a leap
    /// year).
    ///
    /// [`None`] is returned if the `month` is not in `1..=12` range or the
    /// resulting date is out of the supported range.
    #[must_use]
    pub fn from_calendar_overflowing(
        year: i32,
        month: u8,
        day: u8,
        time: Time,
        zone: &TimeZone,
    ) -> Option<Self> {
        let date = time::Date::from_calendar_date(
            year,
            Month::try_from(month).ok()?,
            1,
        )
        .ok()?
        .checked_add(time::Duration::days(i64::from(day) - 1))?;

        Self::from_inner(zone.resolve(PrimitiveDateTime::new(date, time)))
    }

    /// Moves this [`DateTime`] the provided number of calendar `months`
    /// forward, preserving its day of month and wall-clock time in the
    /// provided [`TimeZone`].
    ///
    /// Follows the same day overflow rule as
    /// [`DateTimeOf::from_calendar_overflowing()`], so January 31 moved by one
    /// month becomes March 3 (or March 2 in a leap year).
    ///
    /// [`None`] is returned if the result is out of the supported range.
    #[must_use]
    pub fn add_months_overflowing(
        self,
        months: u32,
        zone: &TimeZone,
    ) -> Option<Self> {
        let index = i64::from(self.inner.year()) * 12
            + i64::from(u8::from(self.inner.month()) - 1)
            + i64::from(months);

        Self::from_calendar_overflowing(
            i32::try_from(index.div_euclid(12)).ok()?,
            u8::try_from(index.rem_euclid(12) + 1).ok()?,
            self.inner.day(),
            self.inner.time(),
            zone,
        )
    }

    /// Converts this [`DateTime`] into the offset the provided [`TimeZone`]
    /// has at the represented instant.
    ///
    /// [`None`] is returned if the local date in that offset is out of the
    /// supported range.
    #[must_use]
    pub fn in_zone(self, zone: &TimeZone) -> Option<Self> {
        let offset = zone.offset_of(&self.inner);
        let shift = i64::from(offset.whole_seconds())
            - i64::from(self.inner.offset().whole_seconds());

        PrimitiveDateTime::new(self.inner.date(), self.inner.time())
            .checked_add(time::Duration::seconds(shift))
            .map(|local| local.assume_offset(offset))
            .and_then(Self::from_inner)
    }

    /// Returns the calendar year of this [`DateTime`].
    #[must_use]
    pub fn year(&self) -> i32 {
        self.inner.year()
    }

    /// Returns the calendar month (`1..=12`) of this [`DateTime`].
    #[must_use]
    pub fn month(&self) -> u8 {
        self.inner.month().into()
    }

    /// Returns the day of month (`1..=31`) of this [`DateTime`].
    #[must_use]
    pub fn day(&self) -> u8 {
        self.inner.day()
    }

    /// Returns the time of day of this [`DateTime`].
    #[must_use]
    pub fn time(&self) -> Time {
        self.inner.time()
    }

    /// Returns the UTC offset of this [`DateTime`].
    #[must_use]
    pub fn offset(&self) -> UtcOffset {
        self.inner.offset()
    }

    /// Returns the [`DateTime`] as an [RFC 3339] string.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[expect(clippy::missing_panics_doc, reason = "year is always supported")]
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.inner.format(&Rfc3339).unwrap_or_else(|e| {
            panic!("cannot format `DateTime` as RFC 3339: {e}")
        })
    }

    /// Coerces one kind of [`DateTime`] into another.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateTimeOf<NewOf> {
        DateTimeOf {
            inner: self.inner,
            _of: PhantomData,
        }
    }
}

/// Error of parsing date and time related values from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ParseError {
    /// Failed to parse the string.
    #[display("{_0}")]
    Parse(time::error::Parse),

    /// Parsed [`DateTime`] has an out of range component.
    #[display("{_0}")]
    ComponentRange(time::error::ComponentRange),

    /// Parsed [`DateTime`] has a year outside of `0..=9999`.
    #[display("year is out of the supported range")]
    OutOfRange,

    /// [`TimeZone`] identifier is not known to the time zone database.
    #[display("unknown time zone")]
    UnknownTimeZone,
}

/// User-provided date, interpreted in some local [`TimeZone`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LocalDate {
    /// Plain calendar date, denoting its local midnight.
    Date(time::Date),

    /// Exact moment, to be converted into the local offset.
    Instant(DateTime),
}

impl LocalDate {
    /// Parses the provided `input` as either a plain `YYYY-MM-DD` date or an
    /// [RFC 3339] date and time.
    ///
    /// # Errors
    ///
    /// Returns an error if the `input` matches neither of the formats.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();
        if let Ok(dt) = DateTime::from_rfc3339(input) {
            return Ok(Self::Instant(dt));
        }
        time::Date::parse(input, format_description!("[year]-[month]-[day]"))
            .map(Self::Date)
            .map_err(ParseError::Parse)
    }

    /// Interprets this [`LocalDate`] in the provided [`TimeZone`].
    ///
    /// [`None`] is returned if the local date is out of the supported range.
    #[must_use]
    pub fn at<Of: ?Sized>(self, zone: &TimeZone) -> Option<DateTimeOf<Of>> {
        match self {
            Self::Date(date) => DateTimeOf::from_inner(
                zone.resolve(PrimitiveDateTime::new(date, Time::MIDNIGHT)),
            ),
            Self::Instant(dt) => dt.in_zone(zone).map(DateTimeOf::coerce),
        }
    }
}

impl FromStr for LocalDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<Of: ?Sized> Copy for DateTimeOf<Of> {}
impl<Of: ?Sized> Clone for DateTimeOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateTimeOf<Of> {}
impl<Of: ?Sized> PartialEq for DateTimeOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Ord for DateTimeOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateTimeOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> From<DateTimeOf<Of>> for OffsetDateTime {
    fn from(dt: DateTimeOf<Of>) -> Self {
        dt.inner
    }
}

/// Time zone the calendar computations are performed in.
///
/// Either follows the rules of the [IANA] time zone database, so wall-clock
/// times get the offset in effect at that date (daylight saving included), or
/// sticks to a single fixed UTC offset.
///
/// [IANA]: https://www.iana.org/time-zones
#[derive(Clone, Debug, Display)]
#[display("{name}")]
pub struct TimeZone {
    /// Identifier of this [`TimeZone`].
    name: String,

    /// Offset rules of this [`TimeZone`].
    rules: Rules,
}

/// Offset rules of a [`TimeZone`].
#[derive(Clone, Copy, Debug)]
enum Rules {
    /// Single offset all year round.
    Fixed(UtcOffset),

    /// Offsets of the [IANA] time zone database entry.
    ///
    /// [IANA]: https://www.iana.org/time-zones
    Database(#[debug(skip)] &'static Tz),
}

impl TimeZone {
    /// Creates a new [`TimeZone`] with the provided identifier and a fixed
    /// offset.
    #[must_use]
    pub fn fixed(name: impl Into<String>, offset: UtcOffset) -> Self {
        Self {
            name: name.into(),
            rules: Rules::Fixed(offset),
        }
    }

    /// Looks up the [`TimeZone`] with the provided [IANA] identifier.
    ///
    /// [`None`] is returned if the time zone database has no such entry.
    ///
    /// [IANA]: https://www.iana.org/time-zones
    #[must_use]
    pub fn named(name: &str) -> Option<Self> {
        let name = name.trim();
        timezones::get_by_name(name).map(|tz| Self {
            name: name.to_owned(),
            rules: Rules::Database(tz),
        })
    }

    /// Returns the UTC [`TimeZone`].
    #[must_use]
    pub fn utc() -> Self {
        Self::fixed("UTC", UtcOffset::UTC)
    }

    /// Resolves the [`TimeZone`] of the executing environment.
    ///
    /// The identifier is taken from the `TZ` environment variable or the
    /// `/etc/timezone` file. If neither names a known time zone, the current
    /// local offset is used as a fixed one.
    ///
    /// On Unix the local offset can only be determined while the process is
    /// single-threaded, so this should be called before any runtime is
    /// started. UTC is used when the offset is indeterminate.
    #[must_use]
    pub fn local() -> Self {
        if let Some(zone) = Self::local_name().and_then(|n| Self::named(&n)) {
            return zone;
        }
        let offset =
            UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
        Self::fixed(offset_name(offset), offset)
    }

    /// Returns the identifier of this [`TimeZone`].
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the UTC offset this [`TimeZone`] has at the provided moment.
    #[must_use]
    pub fn offset_at<Of: ?Sized>(&self, at: &DateTimeOf<Of>) -> UtcOffset {
        self.offset_of(&at.inner)
    }

    /// Returns the UTC offset this [`TimeZone`] has at the provided instant.
    fn offset_of(&self, instant: &OffsetDateTime) -> UtcOffset {
        match self.rules {
            Rules::Fixed(offset) => offset,
            Rules::Database(tz) => tz.get_offset_utc(instant).to_utc(),
        }
    }

    /// Places the provided wall-clock `local` time into this [`TimeZone`].
    ///
    /// A wall-clock time skipped by a forward transition keeps its reading
    /// and gets the offset in effect after the transition. An ambiguous one
    /// resolves to its earlier occurrence.
    fn resolve(&self, local: PrimitiveDateTime) -> OffsetDateTime {
        match self.rules {
            Rules::Fixed(offset) => local.assume_offset(offset),
            Rules::Database(_) => {
                let guess = self.offset_of(&local.assume_utc());
                let offset = self.offset_of(&local.assume_offset(guess));
                local.assume_offset(offset)
            }
        }
    }

    /// Looks up the identifier of the local [`TimeZone`].
    fn local_name() -> Option<String> {
        env::var("TZ")
            .ok()
            .map(|tz| tz.trim_start_matches(':').trim().to_owned())
            .filter(|tz| !tz.is_empty() && !tz.starts_with('/'))
            .or_else(|| {
                fs::read_to_string("/etc/timezone")
                    .ok()
                    .map(|tz| tz.trim().to_owned())
                    .filter(|tz| !tz.is_empty())
            })
    }
}

/// Parses a UTC offset in the `+HH:MM` notation.
///
/// # Errors
///
/// Returns an error if the `input` is not a valid UTC offset.
pub fn parse_utc_offset(input: &str) -> Result<UtcOffset, ParseError> {
    UtcOffset::parse(
        input.trim(),
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .map_err(ParseError::Parse)
}

/// Formats the provided `offset` as a [`TimeZone`] identifier.
#[must_use]
pub fn offset_name(offset: UtcOffset) -> String {
    if offset.is_utc() {
        return "UTC".to_owned();
    }
    format!(
        "UTC{}{:02}:{:02}",
        if offset.is_negative() { '-' } else { '+' },
        offset.whole_hours().unsigned_abs(),
        offset.minutes_past_hour().unsigned_abs(),
    )
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Date and time in a [RFC 3339] format with a microsecond precision.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[graphql_scalar(with = Self, parse_token(String))]
    type DateTime = crate::DateTime;

    impl DateTime {
        fn to_output<S: ScalarValue>(dt: &DateTime) -> Value<S> {
            Value::scalar(dt.to_rfc3339())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `DateTime` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_rfc3339(s).map_err(|e| {
                        format!("Cannot parse `DateTime` input scalar: {e}")
                    })
                })
        }
    }

    /// Date in a `YYYY-MM-DD` format, or date and time in a [RFC 3339] format,
    /// interpreted in the local time zone.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[graphql_scalar(with = Self, parse_token(String))]
    type LocalDate = crate::datetime::LocalDate;

    impl LocalDate {
        fn to_output<S: ScalarValue>(date: &LocalDate) -> Value<S> {
            Value::scalar(match date {
                LocalDate::Date(d) => d.to_string(),
                LocalDate::Instant(dt) => dt.to_rfc3339(),
            })
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `LocalDate` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::parse(s).map_err(|e| {
                        format!("Cannot parse `LocalDate` input scalar: {e}")
                    })
                })
        }
    }
}
