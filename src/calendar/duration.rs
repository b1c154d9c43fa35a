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

//! Day/hour/minute/second decomposition of a duration.

use std::fmt;

const SECS_PER_DAY: u64 = 86_400;
const SECS_PER_HOUR: u64 = 3_600;
const SECS_PER_MINUTE: u64 = 60;

/// A duration split into whole days, hours, minutes and seconds.
///
/// The sign of the input is discarded, so callers that care about direction
/// must track it themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dayparts {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Dayparts {
    /// Total number of seconds represented.
    pub fn total_seconds(&self) -> u64 {
        self.days * SECS_PER_DAY
            + self.hours * SECS_PER_HOUR
            + self.minutes * SECS_PER_MINUTE
            + self.seconds
    }
}

impl From<i64> for Dayparts {
    fn from(seconds: i64) -> Self {
        let total = seconds.unsigned_abs();
        let in_day = total % SECS_PER_DAY;
        Self {
            days: total / SECS_PER_DAY,
            hours: in_day / SECS_PER_HOUR,
            minutes: (in_day % SECS_PER_HOUR) / SECS_PER_MINUTE,
            seconds: in_day % SECS_PER_MINUTE,
        }
    }
}

/// Renders only the non-zero units, e.g. `6d 3h 19m 5s` or `2h 5s`.
///
/// A zero duration renders as an empty string.
impl fmt::Display for Dayparts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            (self.days, 'd'),
            (self.hours, 'h'),
            (self.minutes, 'm'),
            (self.seconds, 's'),
        ];

        let mut first = true;
        for (value, unit) in parts.into_iter().filter(|(v, _)| *v > 0) {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}{}", value, unit)?;
            first = false;
        }
        Ok(())
    }
}

/// Splits `seconds` (sign ignored) into a [`Dayparts`].
pub fn seconds_to_dayparts(seconds: i64) -> Dayparts {
    Dayparts::from(seconds)
}

/// Formats `seconds` (sign ignored) as a compact `1d 2h 3m 4s` string.
///
/// # Examples
///
/// ```
/// use odds::calendar::seconds_to_dayparts_string;
///
/// assert_eq!(seconds_to_dayparts_string(530345), "6d 3h 19m 5s");
/// assert_eq!(seconds_to_dayparts_string(3605), "1h 5s");
/// assert_eq!(seconds_to_dayparts_string(0), "");
/// ```
pub fn seconds_to_dayparts_string(seconds: i64) -> String {
    Dayparts::from(seconds).to_string()
}
