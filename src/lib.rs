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

//! # Odds and ends.
//!
//! A collection of small, independent helpers shared by our services.
//!
//! * [`calendar`]: Epoch arithmetic, calendar boundaries (start of day, week,
//!   month, year) and timestamp formats (access log, cookie, RFC 822,
//!   RFC 3339).
//! * [`text`]: Byte-size formatting, IP/CIDR extraction, comment stripping
//!   and line padding.
//! * [`files`]: File metadata and chronological directory listings.
//! * [`db`]: A thin SQLite handle created from explicit configuration.
//! * [`logging`]: `tracing` setup and a severity-tagged text log.
//! * [`config`]: The on-disk configuration file.
//!
//! Apart from reading the wall clock and the host timezone, the calendar and
//! text helpers are pure and may be called from any thread.

pub mod calendar;
pub mod config;
pub mod db;
pub mod files;
pub mod logging;
pub mod text;
