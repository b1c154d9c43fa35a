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

const UNITS: [&str; 7] = ["B", "KB", "MB", "GB", "TB", "PB", "EB"];

/// Divisor used when scaling a byte count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteBase {
    /// Powers of 1024.
    #[default]
    Binary,
    /// Powers of 1000.
    Decimal,
}

impl ByteBase {
    fn divisor(self) -> f64 {
        match self {
            ByteBase::Binary => 1024.0,
            ByteBase::Decimal => 1000.0,
        }
    }
}

/// Formats a byte count into a human-readable string.
///
/// Counts below one unit of `base` are printed as a whole number of bytes.
/// Larger counts are scaled to the largest unit that keeps the value at or
/// above one, and printed with `precision` decimal places.
///
/// # Arguments
///
/// * `bytes` - The size to format.
/// * `base` - Whether a kilobyte is 1024 or 1000 bytes.
/// * `precision` - Number of decimal places for scaled values.
///
/// # Examples
///
/// ```
/// use odds::text::{ByteBase, format_bytes};
///
/// assert_eq!(format_bytes(512, ByteBase::Binary, 2), "512 B");
/// assert_eq!(format_bytes(1536, ByteBase::Binary, 2), "1.50 KB");
/// assert_eq!(format_bytes(1_500_000, ByteBase::Decimal, 1), "1.5 MB");
/// ```
pub fn format_bytes(bytes: u64, base: ByteBase, precision: usize) -> String {
    let divisor = base.divisor();
    let mut value = bytes as f64;
    let mut unit = 0;

    while value >= divisor && unit < UNITS.len() - 1 {
        value /= divisor;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.*} {}", precision, value, UNITS[unit])
    }
}
