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

//! Text helpers.
//!
//! # Sub-modules
//!
//! * [`format`]: Human-readable byte counts.
//! * [`net`]: IPv4/IPv6 address and CIDR extraction from free text.
//!
//! The line-oriented helpers (comment stripping, padding) live here directly.

mod format;
mod net;

pub use format::{ByteBase, format_bytes};
pub use net::{
    extract_ip_addresses, extract_ipv4, extract_ipv4_cidr, extract_ipv6, extract_ipv6_cidr,
};

/// Comment delimiter used by most of our line-based config files.
pub const DEFAULT_COMMENT: &str = "#";

/// Removes comments and blank lines from a list of lines.
///
/// Each line is trimmed. Lines starting with `delimiter` are dropped, lines
/// containing it are cut at its first occurrence, and whatever is left is
/// trimmed again. Lines that end up empty are dropped.
///
/// An empty `delimiter` only trims and drops blank lines.
///
/// # Examples
///
/// ```
/// use odds::text::{DEFAULT_COMMENT, strip_comments};
///
/// let lines = ["# header", "  alpha  ", "beta # trailing", "", "   "];
/// assert_eq!(strip_comments(&lines, DEFAULT_COMMENT), vec!["alpha", "beta"]);
/// ```
pub fn strip_comments<S: AsRef<str>>(lines: &[S], delimiter: &str) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| {
            let line = line.as_ref().trim();
            if delimiter.is_empty() {
                return (!line.is_empty()).then(|| line.to_string());
            }
            if line.starts_with(delimiter) {
                return None;
            }
            let kept = match line.find(delimiter) {
                Some(pos) => line[..pos].trim_end(),
                None => line,
            };
            (!kept.is_empty()).then(|| kept.to_string())
        })
        .collect()
}

/// Right-pads every line of `text` with spaces to `width` characters.
///
/// Line endings (`\n` or `\r\n`) are preserved and lines already at least
/// `width` characters long are left alone.
pub fn pad_lines(text: &str, width: usize) -> String {
    text.split_inclusive('\n')
        .map(|piece| {
            let body = piece.trim_end_matches(['\r', '\n']);
            let ending = &piece[body.len()..];
            format!("{:<width$}{}", body, ending)
        })
        .collect()
}

/// Right-pads every entry of `lines` with spaces to `width` characters.
pub fn pad_list<S: AsRef<str>>(lines: &[S], width: usize) -> Vec<String> {
    lines
        .iter()
        .map(|line| format!("{:<width$}", line.as_ref()))
        .collect()
}

/// Removes every trailing `/` from `path`.
pub fn strip_trailing_slash(path: &str) -> &str {
    path.trim_end_matches('/')
}
