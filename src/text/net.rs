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

//! IP address and CIDR extraction from free text.
//!
//! Candidates are located with regular expressions and then confirmed with
//! the standard library address parsers, so a reported address always
//! parses. A match glued to surrounding letters, digits or a further dotted
//! component (`1.2.3.4.5`, `std::fmt`) is not reported.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use regex::Regex;

const IPV4_MAX_PREFIX: u8 = 32;
const IPV6_MAX_PREFIX: u8 = 128;

// One decimal octet, 0 to 255, without leading zeros.
const OCTET: &str = r"(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])";

static IPV4: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?:{OCTET}\.){{3}}{OCTET}")).unwrap());

static IPV4_CIDR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?:{OCTET}\.){{3}}{OCTET}/([0-9]{{1,3}})")).unwrap()
});

// Runs of hex digits, colons and dots (for a trailing IPv4 part) with at
// least one colon.
static IPV6: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9A-Fa-f:.]*:[0-9A-Fa-f:.]*").unwrap());

static IPV6_CIDR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9A-Fa-f:.]*:[0-9A-Fa-f:.]*)/([0-9]{1,3})").unwrap());

/// Whether the span `start..end` of `text` stands on its own rather than
/// being part of a longer word or dotted number.
fn is_isolated(text: &str, start: usize, end: usize) -> bool {
    let joined_before = text[..start]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');

    let mut after = text[end..].chars();
    let joined_after = match after.next() {
        Some(c) if c.is_ascii_alphanumeric() || c == '_' => true,
        Some('.') => after.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    };

    !joined_before && !joined_after
}

fn valid_prefix(prefix: &str, max: u8) -> bool {
    prefix.parse::<u8>().is_ok_and(|p| p <= max)
}

/// Narrows an IPv6 candidate to the part that parses, dropping sentence
/// punctuation, a dangling single colon and a colon glued to the front
/// (`addr:fe80::1`). Returns the offset of the address within `candidate`.
///
/// A bare `::` is not reported; on its own it is far more often a path
/// separator than the unspecified address.
fn trim_ipv6(candidate: &str) -> Option<(usize, &str)> {
    let trimmed = candidate.trim_end_matches('.');
    let heads = [Some(trimmed), trimmed.strip_prefix(':')];

    heads.into_iter().flatten().find_map(|head| {
        let tails = [Some(head), head.strip_suffix(':').filter(|s| !s.ends_with(':'))];
        tails
            .into_iter()
            .flatten()
            .find(|s| *s != "::" && s.parse::<Ipv6Addr>().is_ok())
            .map(|address| (trimmed.len() - head.len(), address))
    })
}

fn ipv4_spans(text: &str) -> Vec<(usize, usize)> {
    IPV4.find_iter(text)
        .filter(|m| is_isolated(text, m.start(), m.end()))
        .map(|m| (m.start(), m.end()))
        .collect()
}

fn ipv6_spans(text: &str) -> Vec<(usize, usize)> {
    IPV6.find_iter(text)
        .filter_map(|m| {
            let (offset, address) = trim_ipv6(m.as_str())?;
            let start = m.start() + offset;
            let end = start + address.len();
            is_isolated(text, start, end).then_some((start, end))
        })
        .collect()
}

/// Returns every IPv4 address in `text`, in order of appearance.
///
/// # Examples
///
/// ```
/// use odds::text::extract_ipv4;
///
/// let found = extract_ipv4("from 10.0.0.1 to 192.168.1.254, not 300.1.1.1");
/// assert_eq!(found, vec!["10.0.0.1", "192.168.1.254"]);
/// ```
pub fn extract_ipv4(text: &str) -> Vec<String> {
    ipv4_spans(text)
        .into_iter()
        .map(|(start, end)| text[start..end].to_string())
        .collect()
}

/// Returns every IPv4 network in CIDR notation (`10.0.0.0/8`) in `text`.
pub fn extract_ipv4_cidr(text: &str) -> Vec<String> {
    IPV4_CIDR
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let prefix = caps.get(1)?;
            (valid_prefix(prefix.as_str(), IPV4_MAX_PREFIX)
                && is_isolated(text, whole.start(), whole.end()))
            .then(|| whole.as_str().to_string())
        })
        .collect()
}

/// Returns every IPv6 address in `text`, in order of appearance.
///
/// # Examples
///
/// ```
/// use odds::text::extract_ipv6;
///
/// let found = extract_ipv6("peer fe80::1 and 2001:db8:0:0:0:0:0:7.");
/// assert_eq!(found, vec!["fe80::1", "2001:db8:0:0:0:0:0:7"]);
/// ```
pub fn extract_ipv6(text: &str) -> Vec<String> {
    ipv6_spans(text)
        .into_iter()
        .map(|(start, end)| text[start..end].to_string())
        .collect()
}

/// Returns every IPv6 network in CIDR notation (`2001:db8::/32`) in `text`.
pub fn extract_ipv6_cidr(text: &str) -> Vec<String> {
    IPV6_CIDR
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let address = caps.get(1)?;
            let prefix = caps.get(2)?;
            (address.as_str().parse::<Ipv6Addr>().is_ok()
                && valid_prefix(prefix.as_str(), IPV6_MAX_PREFIX)
                && is_isolated(text, whole.start(), whole.end()))
            .then(|| whole.as_str().to_string())
        })
        .collect()
}

/// Returns every IPv4 then every IPv6 address in `text` as parsed values.
pub fn extract_ip_addresses(text: &str) -> Vec<IpAddr> {
    let v4 = ipv4_spans(text)
        .into_iter()
        .filter_map(|(start, end)| text[start..end].parse::<Ipv4Addr>().ok())
        .map(IpAddr::V4);
    let v6 = ipv6_spans(text)
        .into_iter()
        .filter_map(|(start, end)| text[start..end].parse::<Ipv6Addr>().ok())
        .map(IpAddr::V6);

    v4.chain(v6).collect()
}
