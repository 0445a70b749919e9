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

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Stands in for `:` in wiki file names, which most filesystems reject.
const COLON_PLACEHOLDER: char = '\u{a789}';

/// Formats a duration in seconds as `M:SS`, or `H:MM:SS` from one hour up.
///
/// Durations under a minute keep the `0:SS` form so every value in an info
/// file has the same shape.
///
/// # Examples
///
/// ```
/// assert_eq!(format_duration(45), "0:45");
/// assert_eq!(format_duration(125), "2:05");
/// assert_eq!(format_duration(3725), "1:02:05");
/// ```
pub(crate) fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let mins = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours == 0 {
        format!("{}:{:02}", mins, secs)
    } else {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    }
}

/// Formats a byte count with two decimals and a binary unit, e.g. `1.50GB`.
pub(crate) fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;

    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.2}{}", value, SIZE_UNITS[unit])
}

/// Formats a sample rate in hertz as kilohertz, e.g. `44.1KHz`.
pub(crate) fn format_sample_rate(hertz: u32) -> String {
    format!("{}KHz", f64::from(hertz) / 1000.0)
}

/// Turns a page title into the path segment used in wiki links.
pub(crate) fn wiki_escape(title: &str) -> String {
    urlencoding::encode(&title.replace(' ', "_")).into_owned()
}

/// Derives a filesystem-safe file stem from a wiki source identifier.
///
/// The identifier is URL-decoded and turned back into a page title, path
/// separators and colons are replaced, and everything outside printable
/// ASCII is written as a caret escape (`^u00e9`) that a shell step can undo.
pub(crate) fn wiki_file_stem(source: &str) -> String {
    let decoded = urlencoding::decode(&source.replace('+', " "))
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| source.to_string());

    let title: String = decoded
        .chars()
        .map(|c| match c {
            '_' => ' ',
            '/' => '_',
            ':' => COLON_PLACEHOLDER,
            other => other,
        })
        .collect();

    caret_escape(&title)
}

fn caret_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '\\' => out.push_str("^^"),
            '"' => out.push_str("^\""),
            '\n' => out.push_str("^n"),
            '\r' => out.push_str("^r"),
            '\t' => out.push_str("^t"),
            c if c.is_ascii_control() => {
                out.push_str(&format!("^x{:02x}", c as u32));
            }
            c if c.is_ascii() => out.push(c),
            c if (c as u32) <= 0xffff => {
                out.push_str(&format!("^u{:04x}", c as u32));
            }
            c => {
                out.push_str(&format!("^U{:08x}", c as u32));
            }
        }
    }

    out
}
