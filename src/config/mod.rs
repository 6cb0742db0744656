//! Configuration management for bannerscan.
//!
//! Provides XDG-compliant settings storage, the verbosity level and UTC
//! offset parsing for banner date conversion.

mod settings;
mod verbosity;

pub use settings::AppSettings;
pub use verbosity::Verbosity;

use crate::error::{ConfigError, ConfigResult};
use chrono::FixedOffset;

/// Parse a UTC offset such as `-03:00`, `+0530`, `-3`, `UTC-3` or `Z`.
pub fn parse_utc_offset(s: &str) -> ConfigResult<FixedOffset> {
    let invalid = || ConfigError::InvalidTimezone(s.to_string());

    let upper = s.trim().to_ascii_uppercase();
    if upper.is_empty() {
        return Err(invalid());
    }

    let rest = upper
        .strip_prefix("UTC")
        .or_else(|| upper.strip_prefix("GMT"))
        .unwrap_or(&upper);

    if rest.is_empty() || rest == "Z" {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, digits) = if let Some(d) = rest.strip_prefix('+') {
        (1, d)
    } else if let Some(d) = rest.strip_prefix('-') {
        (-1, d)
    } else {
        return Err(invalid());
    };

    let (hours, minutes) = match digits.split_once(':') {
        Some((h, m)) => (h, m),
        None if digits.len() == 4 && digits.is_ascii() => digits.split_at(2),
        None => (digits, "0"),
    };

    let is_field = |f: &str| (1..=2).contains(&f.len()) && f.bytes().all(|b| b.is_ascii_digit());
    if !is_field(hours) || !is_field(minutes) {
        return Err(invalid());
    }
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 14 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}
