//! Banner post-processing.
//!
//! Rewrites HTTP-style `Date:` header lines from GMT into a fixed reference
//! UTC offset so banners read in local time. Every other line, and any date
//! line that does not parse, is left exactly as received.

use chrono::{FixedOffset, NaiveDateTime};

/// Header prefix recognized as a date line (matched case-insensitively).
pub const DATE_HEADER: &str = "Date:";

/// Wire format of the header value (RFC 7231 IMF-fixdate).
pub const WIRE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Marker appended to rewritten lines.
pub const CONVERTED_MARKER: &str = "converted from GMT";

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Normalize every recognized date header in `banner` to `offset`.
///
/// Line terminators (`\n` or `\r\n`) are preserved.
pub fn normalize(banner: &str, offset: FixedOffset) -> String {
    let mut out = String::with_capacity(banner.len() + 32);

    for piece in banner.split_inclusive('\n') {
        let (line, ending) = split_line_ending(piece);
        match convert_date_line(line, offset) {
            Some(converted) => out.push_str(&converted),
            None => out.push_str(line),
        }
        out.push_str(ending);
    }

    out
}

/// Convert a single `Date:` line, or `None` if it is not one or won't parse.
pub fn convert_date_line(line: &str, offset: FixedOffset) -> Option<String> {
    let prefix = line.get(..DATE_HEADER.len())?;
    if !prefix.eq_ignore_ascii_case(DATE_HEADER) {
        return None;
    }

    let value = line[DATE_HEADER.len()..].trim();
    let parsed = NaiveDateTime::parse_from_str(value, WIRE_FORMAT).ok()?;
    let local = parsed.and_utc().with_timezone(&offset);

    Some(format!(
        "{} {} UTC{} ({})",
        DATE_HEADER,
        local.format(DISPLAY_FORMAT),
        offset,
        CONVERTED_MARKER
    ))
}

fn split_line_ending(piece: &str) -> (&str, &str) {
    if let Some(line) = piece.strip_suffix("\r\n") {
        (line, "\r\n")
    } else if let Some(line) = piece.strip_suffix('\n') {
        (line, "\n")
    } else {
        (piece, "")
    }
}
