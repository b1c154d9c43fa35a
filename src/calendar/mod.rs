// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Epoch and calendar arithmetic.
//!
//! Conversions between integer epochs (seconds since 1970-01-01T00:00:00Z),
//! calendar boundaries (start of day, week, month, year) and the timestamp
//! formats used by access logs, cookies and mail/feed headers.
//!
//! # Timezones
//!
//! Every zone-aware operation takes a [`Zone`]. The calendar fields used to
//! compute a boundary are read in that zone, and the boundary is rebuilt in
//! the same zone, so a result is always consistent with how it is displayed.
//!
//! Local midnights that do not exist (a DST gap) resolve to the first valid
//! instant after the gap. Ambiguous local midnights resolve to the earlier
//! instant. Both follow what the host's local-time conversion reports.
//!
//! Local times are formatted through the host zone's IANA name (from `TZ` or
//! the system configuration) so that `%Z` prints an abbreviation such as
//! `CEST`. If the name is unknown, `%Z` falls back to the numeric offset.
//!
//! # Current time
//!
//! Operations that default to "now" live on [`Calendar`], which reads the
//! instant from a [`Clock`]. Use [`Calendar::system`] in applications and a
//! [`FixedClock`] in tests.

mod clock;
mod duration;

pub use clock::{Clock, FixedClock, SystemClock};
pub use duration::{Dayparts, seconds_to_dayparts, seconds_to_dayparts_string};

use std::fmt;
use std::sync::LazyLock;

use chrono::{
    DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta,
    TimeZone, Utc,
    format::{Item, StrftimeItems},
};
use chrono_tz::Tz;
use regex::Regex;

/// Layout of an access-log timestamp, e.g. `19/May/2014:17:30:56 -0500`.
const LOG_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

// chrono accepts short fields and signed years, so the layout is checked first.
static LOG_LAYOUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2}/[A-Za-z]{3}/[0-9]{4}:[0-9]{2}:[0-9]{2}:[0-9]{2} [+-][0-9]{4}$")
        .unwrap()
});

const COOKIE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

const RFC822_FORMAT: &str = "%a, %d %b %y %H:%M:%S %z";

const RFC3339_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Default pattern for [`Calendar::stamp`], `YYYY-MM-DD,HH:MM:SS.mmm ZZZ`.
pub const DEFAULT_STAMP_FORMAT: &str = "%Y-%m-%d,%H:%M:%S%.3f %Z";

/// Granularity used when stepping over a DST gap.
const GAP_STEP_MINUTES: i64 = 15;

/// Longest DST gap we are prepared to step over.
const GAP_LIMIT_MINUTES: i64 = 24 * 60;

const ZONEINFO_DIR: &str = "/usr/share/zoneinfo/";

static HOST_ZONE: LazyLock<Option<Tz>> = LazyLock::new(|| {
    let zone = std::env::var("TZ")
        .ok()
        .and_then(|name| zone_named(&name))
        .or_else(|| {
            iana_time_zone::get_timezone()
                .ok()
                .and_then(|name| zone_named(&name))
        });
    if zone.is_none() {
        tracing::debug!("Host timezone name unknown, local stamps use numeric offsets");
    }
    zone
});

#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("'{input}' is not a dd/Mon/yyyy:HH:MM:SS ±ZZZZ timestamp")]
    Parse {
        input: String,
        #[source]
        source: Option<chrono::ParseError>,
    },

    #[error("epoch {epoch} is outside the supported calendar range")]
    OutOfRange { epoch: i64 },

    #[error("invalid format pattern '{pattern}'")]
    InvalidPattern { pattern: String },
}

pub type Result<T> = std::result::Result<T, CalendarError>;

/// Timezone used to read and write calendar fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    /// Coordinated Universal Time.
    Gmt,
    /// The host's configured local timezone, including DST.
    #[default]
    Local,
}

impl Zone {
    /// Selects [`Zone::Gmt`] when `use_gmt` is set, otherwise [`Zone::Local`].
    pub fn from_gmt_flag(use_gmt: bool) -> Self {
        if use_gmt { Zone::Gmt } else { Zone::Local }
    }

    /// Wall-clock reading of `epoch` in this zone.
    fn to_naive(self, epoch: i64) -> Result<NaiveDateTime> {
        let instant = instant(epoch)?;
        Ok(match self {
            Zone::Gmt => instant.naive_utc(),
            Zone::Local => instant.with_timezone(&Local).naive_local(),
        })
    }

    /// Epoch of a wall-clock reading in this zone.
    fn to_epoch(self, naive: NaiveDateTime) -> Option<i64> {
        match self {
            Zone::Gmt => Some(naive.and_utc().timestamp()),
            Zone::Local => resolve_local(&Local, naive),
        }
    }

    fn format(self, instant: DateTime<Utc>, items: &[Item<'_>]) -> String {
        match self {
            Zone::Gmt => render(instant, items),
            Zone::Local => match host_named(&instant) {
                Some(named) => render(named, items),
                None => render(instant.with_timezone(&Local), items),
            },
        }
    }
}

fn render<Z: TimeZone>(dt: DateTime<Z>, items: &[Item<'_>]) -> String
where
    Z::Offset: fmt::Display,
{
    dt.format_with_items(items.iter()).to_string()
}

/// Parses a zone name as found in `TZ` or `/etc/localtime`, e.g.
/// `Europe/Berlin`, `:Europe/Berlin` or `/usr/share/zoneinfo/Europe/Berlin`.
fn zone_named(name: &str) -> Option<Tz> {
    let name = name.trim().trim_start_matches(':');
    let name = name.strip_prefix(ZONEINFO_DIR).unwrap_or(name);
    name.parse().ok()
}

/// `instant` in the named host zone, provided that zone agrees with the
/// host's local offset at that instant.
fn host_named(instant: &DateTime<Utc>) -> Option<DateTime<Tz>> {
    let tz = (*HOST_ZONE)?;
    let named = instant.with_timezone(&tz);
    let local = instant.with_timezone(&Local);
    (named.offset().fix() == local.offset().fix()).then_some(named)
}

/// Maps a local wall-clock time to an epoch in `tz`.
///
/// Ambiguous times take the earlier instant; times inside a gap move forward
/// to the first representable instant.
fn resolve_local<Z: TimeZone>(tz: &Z, naive: NaiveDateTime) -> Option<i64> {
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return Some(dt.timestamp());
    }

    (1..=GAP_LIMIT_MINUTES / GAP_STEP_MINUTES).find_map(|step| {
        let shifted = naive.checked_add_signed(TimeDelta::minutes(step * GAP_STEP_MINUTES))?;
        tz.from_local_datetime(&shifted)
            .earliest()
            .map(|dt| dt.timestamp())
    })
}

fn instant(epoch: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(epoch, 0).ok_or(CalendarError::OutOfRange { epoch })
}

fn compile_pattern(pattern: &str) -> Result<Vec<Item<'_>>> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(CalendarError::InvalidPattern {
            pattern: pattern.to_string(),
        });
    }
    Ok(items)
}

fn format_epoch(epoch: i64, zone: Zone, pattern: &str) -> Result<String> {
    let items = compile_pattern(pattern)?;
    Ok(zone.format(instant(epoch)?, &items))
}

/// Computes a day boundary: reads the date of `epoch` in `zone`, lets
/// `adjust` move it, then rebuilds midnight of the new date in `zone`.
fn boundary(
    epoch: i64,
    zone: Zone,
    adjust: impl FnOnce(NaiveDate) -> Option<NaiveDate>,
) -> Result<i64> {
    let date = zone.to_naive(epoch)?.date();
    adjust(date)
        .and_then(|day| zone.to_epoch(day.and_time(NaiveTime::MIN)))
        .ok_or(CalendarError::OutOfRange { epoch })
}

/// Parses an access-log timestamp such as `19/May/2014:17:30:56 -0500`.
///
/// The numeric offset in the text is honored, so the result is the UTC epoch
/// of that instant regardless of the host timezone.
///
/// # Errors
///
/// Returns [`CalendarError::Parse`] if the text does not follow the
/// `dd/Mon/yyyy:HH:MM:SS ±ZZZZ` layout.
///
/// # Examples
///
/// ```
/// use odds::calendar::log_timestamp_to_epoch;
///
/// assert_eq!(log_timestamp_to_epoch("19/May/2014:17:30:56 -0500").unwrap(), 1400538656);
/// assert!(log_timestamp_to_epoch("not-a-date").is_err());
/// ```
pub fn log_timestamp_to_epoch(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    if !LOG_LAYOUT.is_match(trimmed) {
        return Err(CalendarError::Parse {
            input: text.to_string(),
            source: None,
        });
    }

    DateTime::parse_from_str(trimmed, LOG_FORMAT)
        .map(|dt| dt.timestamp())
        .map_err(|source| CalendarError::Parse {
            input: text.to_string(),
            source: Some(source),
        })
}

/// Formats `epoch` as an HTTP cookie expiry, `Thu, 01 Jan 1970 00:00:00 GMT`.
///
/// Always expressed in UTC.
pub fn epoch_to_cookie_timestamp(epoch: i64) -> Result<String> {
    format_epoch(epoch, Zone::Gmt, COOKIE_FORMAT)
}

/// Formats `epoch` as `Dow, DD Mon YY HH:MM:SS ±ZZZZ`.
pub fn epoch_to_rfc822(epoch: i64, zone: Zone) -> Result<String> {
    format_epoch(epoch, zone, RFC822_FORMAT)
}

/// Formats `epoch` as `YYYY-MM-DDTHH:MM:SS±HH:MM`.
///
/// GMT mode renders the offset as `+00:00`.
pub fn epoch_to_rfc3339(epoch: i64, zone: Zone) -> Result<String> {
    format_epoch(epoch, zone, RFC3339_FORMAT)
}

/// Epoch of `00:00:00` on the day containing `epoch`.
pub fn first_second_of_day(epoch: i64, zone: Zone) -> Result<i64> {
    boundary(epoch, zone, Some)
}

/// Epoch of `00:00:00` on the first day of the month containing `epoch`.
pub fn first_second_of_month(epoch: i64, zone: Zone) -> Result<i64> {
    boundary(epoch, zone, |date| date.with_day(1))
}

/// Epoch of `00:00:00` on January 1 of the year containing `epoch`.
pub fn first_second_of_year(epoch: i64, zone: Zone) -> Result<i64> {
    boundary(epoch, zone, |date| date.with_ordinal(1))
}

/// Epoch of `00:00:00` on the Monday on or before the day containing `epoch`.
///
/// Weekdays are numbered Monday=1 to Sunday=7, so a Monday maps to the start
/// of the same day.
pub fn first_second_of_week_monday(epoch: i64, zone: Zone) -> Result<i64> {
    boundary(epoch, zone, |date| {
        let back = date.weekday().number_from_monday() - 1;
        date.checked_sub_days(Days::new(u64::from(back)))
    })
}

/// Epoch of `00:00:00` on the Sunday on or before the day containing `epoch`.
///
/// Weekdays are numbered Sunday=0 to Saturday=6, so a Sunday maps to the
/// start of the same day.
pub fn first_second_of_week_sunday(epoch: i64, zone: Zone) -> Result<i64> {
    boundary(epoch, zone, |date| {
        let back = date.weekday().num_days_from_sunday();
        date.checked_sub_days(Days::new(u64::from(back)))
    })
}

/// Calendar operations that default to the current instant.
#[derive(Debug, Clone, Default)]
pub struct Calendar<C = SystemClock> {
    clock: C,
}

impl Calendar<SystemClock> {
    /// A calendar reading the host wall clock.
    pub fn system() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> Calendar<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// The current epoch according to this calendar's clock.
    pub fn now(&self) -> i64 {
        self.clock.now().timestamp()
    }

    fn resolve(&self, epoch: Option<i64>) -> i64 {
        epoch.unwrap_or_else(|| self.now())
    }

    pub fn epoch_to_rfc822(&self, epoch: Option<i64>, zone: Zone) -> Result<String> {
        epoch_to_rfc822(self.resolve(epoch), zone)
    }

    pub fn epoch_to_rfc3339(&self, epoch: Option<i64>, zone: Zone) -> Result<String> {
        epoch_to_rfc3339(self.resolve(epoch), zone)
    }

    pub fn first_second_of_day(&self, epoch: Option<i64>, zone: Zone) -> Result<i64> {
        first_second_of_day(self.resolve(epoch), zone)
    }

    pub fn first_second_of_month(&self, epoch: Option<i64>, zone: Zone) -> Result<i64> {
        first_second_of_month(self.resolve(epoch), zone)
    }

    pub fn first_second_of_year(&self, epoch: Option<i64>, zone: Zone) -> Result<i64> {
        first_second_of_year(self.resolve(epoch), zone)
    }

    pub fn first_second_of_week_monday(&self, epoch: Option<i64>, zone: Zone) -> Result<i64> {
        first_second_of_week_monday(self.resolve(epoch), zone)
    }

    pub fn first_second_of_week_sunday(&self, epoch: Option<i64>, zone: Zone) -> Result<i64> {
        first_second_of_week_sunday(self.resolve(epoch), zone)
    }

    /// Formats the current instant with millisecond precision.
    ///
    /// `pattern` uses strftime syntax and defaults to
    /// [`DEFAULT_STAMP_FORMAT`]. `%Z` renders the zone abbreviation (`UTC`
    /// in GMT mode), or the numeric offset when the host zone has no known
    /// name.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidPattern`] if `pattern` contains an
    /// unknown specifier.
    pub fn stamp(&self, zone: Zone, pattern: Option<&str>) -> Result<String> {
        let pattern = pattern.unwrap_or(DEFAULT_STAMP_FORMAT);
        let items = compile_pattern(pattern)?;
        Ok(zone.format(self.clock.now(), &items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use chrono_tz::America::{Havana, Sao_Paulo};
    use chrono_tz::Europe::Berlin;

    // Wednesday 2024-03-13 15:26:40 UTC
    const WEDNESDAY: i64 = 1_710_343_600;

    #[test]
    fn parses_log_timestamp_with_offset() {
        assert_eq!(
            log_timestamp_to_epoch("19/May/2014:17:30:56 -0500").unwrap(),
            1_400_538_656
        );
        assert_eq!(
            log_timestamp_to_epoch("01/Jan/1970:00:00:00 +0000").unwrap(),
            0
        );
    }

    #[test]
    fn rejects_malformed_log_timestamp() {
        for text in [
            "not-a-date",
            "",
            "19/Foo/2014:17:30:56 -0500",
            "19/May/2014 17:30:56",
            "19/May/14:17:30:56 -0500",
            "1/May/2014:17:30:56 -0500",
            "19/May/2014:7:30:56 -0500",
            "19/May/2014:17:30:56 -05:00",
            "19/May/+2014:17:30:56 -0500",
        ] {
            assert!(matches!(
                log_timestamp_to_epoch(text),
                Err(CalendarError::Parse { .. })
            ));
        }
    }

    #[test]
    fn cookie_timestamp_at_epoch_zero() {
        assert_eq!(
            epoch_to_cookie_timestamp(0).unwrap(),
            "Thu, 01 Jan 1970 00:00:00 GMT"
        );
    }

    #[test]
    fn gmt_formats() {
        assert_eq!(
            epoch_to_rfc822(WEDNESDAY, Zone::Gmt).unwrap(),
            "Wed, 13 Mar 24 15:26:40 +0000"
        );
        assert_eq!(
            epoch_to_rfc3339(WEDNESDAY, Zone::Gmt).unwrap(),
            "2024-03-13T15:26:40+00:00"
        );
    }

    #[test]
    fn gmt_boundaries() {
        assert_eq!(first_second_of_day(WEDNESDAY, Zone::Gmt).unwrap(), 1_710_288_000);
        assert_eq!(first_second_of_month(WEDNESDAY, Zone::Gmt).unwrap(), 1_709_251_200);
        assert_eq!(first_second_of_year(WEDNESDAY, Zone::Gmt).unwrap(), 1_704_067_200);
        assert_eq!(
            first_second_of_week_monday(WEDNESDAY, Zone::Gmt).unwrap(),
            1_710_115_200
        );
        assert_eq!(
            first_second_of_week_sunday(WEDNESDAY, Zone::Gmt).unwrap(),
            1_710_028_800
        );
    }

    #[test]
    fn negative_epochs_round_down() {
        assert_eq!(first_second_of_day(-1, Zone::Gmt).unwrap(), -86_400);
        assert_eq!(first_second_of_year(-1, Zone::Gmt).unwrap(), -31_536_000);
    }

    fn midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    #[test]
    fn resolve_local_without_transition() {
        let tz = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(resolve_local(&tz, midnight(2024, 3, 13)), Some(1_710_284_400));
    }

    #[test]
    fn resolve_local_moves_past_midnight_gap() {
        // Sao Paulo skipped 00:00-01:00 on 2018-11-04; 01:00 -02:00 is 03:00Z.
        let naive = midnight(2018, 11, 4);
        assert!(Sao_Paulo.from_local_datetime(&naive).earliest().is_none());
        assert_eq!(resolve_local(&Sao_Paulo, naive), Some(1_541_300_400));
    }

    #[test]
    fn resolve_local_takes_earlier_of_ambiguous_midnight() {
        // Havana repeated 00:00-01:00 on 2019-11-03, first at -04:00 then -05:00.
        let naive = midnight(2019, 11, 3);
        let result = Havana.from_local_datetime(&naive);
        assert!(matches!(result, chrono::LocalResult::Ambiguous(..)));
        assert_eq!(resolve_local(&Havana, naive), Some(1_572_753_600));
    }

    #[test]
    fn resolve_local_takes_earlier_of_ambiguous_hour() {
        // Sao Paulo repeated 23:00-00:00 on 2019-02-16; 23:30 -02:00 is 01:30Z.
        let naive = NaiveDate::from_ymd_opt(2019, 2, 16)
            .unwrap()
            .and_hms_opt(23, 30, 0)
            .unwrap();
        assert_eq!(resolve_local(&Sao_Paulo, naive), Some(1_550_367_000));
    }

    #[test]
    fn zone_names_from_environment_forms() {
        assert_eq!(zone_named("Europe/Berlin"), Some(Berlin));
        assert_eq!(zone_named(":Europe/Berlin"), Some(Berlin));
        assert_eq!(zone_named("/usr/share/zoneinfo/Europe/Berlin"), Some(Berlin));
        assert_eq!(zone_named("CET-1CEST"), None);
    }

    #[test]
    fn named_zone_stamp_ends_with_abbreviation() {
        // 2024-07-01 12:00:00 UTC
        let instant = DateTime::from_timestamp(1_719_835_200, 0).unwrap();
        let items = compile_pattern(DEFAULT_STAMP_FORMAT).unwrap();
        assert_eq!(
            render(instant.with_timezone(&Berlin), &items),
            "2024-07-01,14:00:00.000 CEST"
        );
    }

    #[test]
    fn local_stamp_uses_host_zone_name_when_known() {
        let clock = FixedClock::at_epoch(WEDNESDAY).unwrap();
        let stamp = Calendar::with_clock(clock)
            .stamp(Zone::Local, Some("%Z"))
            .unwrap();
        let expected = match host_named(&clock.now()) {
            Some(named) => named.format("%Z").to_string(),
            None => clock.now().with_timezone(&Local).format("%Z").to_string(),
        };
        assert_eq!(stamp, expected);
    }

    #[test]
    fn out_of_range_epoch_is_reported() {
        assert!(matches!(
            first_second_of_day(i64::MAX, Zone::Gmt),
            Err(CalendarError::OutOfRange { epoch: i64::MAX })
        ));
    }

    #[test]
    fn stamp_uses_clock() {
        let clock = FixedClock(DateTime::from_timestamp(WEDNESDAY, 250_000_000).unwrap());
        let calendar = Calendar::with_clock(clock);
        assert_eq!(
            calendar.stamp(Zone::Gmt, None).unwrap(),
            "2024-03-13,15:26:40.250 UTC"
        );
        assert_eq!(calendar.stamp(Zone::Gmt, Some("%H:%M")).unwrap(), "15:26");
    }

    #[test]
    fn stamp_rejects_unknown_specifier() {
        let calendar = Calendar::system();
        assert!(matches!(
            calendar.stamp(Zone::Gmt, Some("%Y-%Q")),
            Err(CalendarError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn omitted_epoch_defaults_to_clock() {
        let calendar = Calendar::with_clock(FixedClock::at_epoch(WEDNESDAY).unwrap());
        assert_eq!(
            calendar.first_second_of_day(None, Zone::Gmt).unwrap(),
            first_second_of_day(WEDNESDAY, Zone::Gmt).unwrap()
        );
        assert_eq!(
            calendar.epoch_to_rfc3339(None, Zone::Gmt).unwrap(),
            "2024-03-13T15:26:40+00:00"
        );
    }
}
