//! Date format token translation and multi-format parsing.
//!
//! Contracts express date formats with human-readable tokens ("YYYY-MM-DD")
//! rather than strftime codes. This module translates between the two,
//! parses values against one or many accepted formats, converts Excel serial
//! date numbers, and renders parsed dates back to a target format.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

/// Human-readable token to strftime mapping, longest tokens first so the
/// scanner never matches a prefix of a longer token.
const TOKEN_TO_STRFTIME: &[(&str, &str)] = &[
    ("MMMM", "%B"), // Full month name (January)
    ("dddd", "%A"), // Full weekday (Monday)
    ("YYYY", "%Y"), // 4-digit year (2025)
    ("MMM", "%b"),  // Abbreviated month name (Jan)
    ("ddd", "%a"),  // Abbreviated weekday (Mon)
    ("YY", "%y"),   // 2-digit year (25)
    ("MM", "%m"),   // 2-digit month (01-12)
    ("DD", "%d"),   // 2-digit day (01-31)
    ("HH", "%H"),   // 24-hour (00-23)
    ("hh", "%I"),   // 12-hour (01-12)
    ("mm", "%M"),   // Minutes (00-59)
    ("ss", "%S"),   // Seconds (00-59)
    ("ZZ", "%z"),   // Timezone offset
    ("M", "%-m"),   // Month without leading zero
    ("D", "%-d"),   // Day without leading zero
    ("H", "%-H"),   // 24-hour without leading zero
    ("h", "%-I"),   // 12-hour without leading zero
    ("m", "%-M"),   // Minutes without leading zero
    ("s", "%-S"),   // Seconds without leading zero
    ("A", "%p"),    // AM/PM
    ("a", "%p"),    // am/pm
    ("Z", "%z"),    // Timezone offset
];

/// Common composite formats, consulted before token translation.
pub const COMMON_DATE_FORMATS: &[(&str, &str)] = &[
    ("YYYY-MM-DD", "%Y-%m-%d"),
    ("YYYY/MM/DD", "%Y/%m/%d"),
    ("YYYYMMDD", "%Y%m%d"),
    ("MM/DD/YYYY", "%m/%d/%Y"),
    ("DD/MM/YYYY", "%d/%m/%Y"),
    ("MM-DD-YYYY", "%m-%d-%Y"),
    ("DD-MM-YYYY", "%d-%m-%Y"),
    ("DD-MMM-YYYY", "%d-%b-%Y"),
    ("MMM DD, YYYY", "%b %d, %Y"),
    ("MMMM DD, YYYY", "%B %d, %Y"),
    ("YYYY-MM-DD HH:mm:ss", "%Y-%m-%d %H:%M:%S"),
    ("YYYY-MM-DDTHH:mm:ssZ", "%Y-%m-%dT%H:%M:%SZ"),
    ("MM/DD/YY", "%m/%d/%y"),
    ("DD/MM/YY", "%d/%m/%y"),
    ("MMDDYY", "%m%d%y"),
    ("DDMMYY", "%d%m%y"),
];

/// Default input formats for date coercion when a contract does not supply
/// `accepted_input_formats`.
pub const DEFAULT_COERCE_INPUT_FORMATS: &[&str] = &[
    "YYYY-MM-DD",
    "MM/DD/YYYY",
    "DD/MM/YYYY",
    "YYYY/MM/DD",
    "MM-DD-YYYY",
    "DD-MM-YYYY",
    "YYYYMMDD",
    "MM/DD/YY",
    "DD/MM/YY",
    "MMM DD, YYYY",
    "MMMM DD, YYYY",
    "DD-MMM-YYYY",
];

/// Largest Excel serial value considered a date (year 9999).
pub const EXCEL_SERIAL_MAX: f64 = 2_958_465.0;

/// Format label reported when a value parsed as an Excel serial number.
pub const EXCEL_SERIAL_FORMAT: &str = "EXCEL_SERIAL";

/// Converts a human-readable date format to a strftime format string.
///
/// Known composite formats are looked up directly; anything else goes
/// through a greedy longest-match token scan. Characters that are not part
/// of any token pass through as literals (`%` is escaped).
pub fn human_format_to_strftime(human_format: &str) -> String {
    for (human, strftime) in COMMON_DATE_FORMATS {
        if *human == human_format {
            return (*strftime).to_string();
        }
    }

    let mut result = String::with_capacity(human_format.len() + 8);
    let mut rest = human_format;
    'outer: while !rest.is_empty() {
        for (token, strftime) in TOKEN_TO_STRFTIME {
            if let Some(tail) = rest.strip_prefix(token) {
                result.push_str(strftime);
                rest = tail;
                continue 'outer;
            }
        }
        let ch = rest.chars().next().unwrap_or_default();
        if ch == '%' {
            result.push_str("%%");
        } else {
            result.push(ch);
        }
        rest = &rest[ch.len_utf8()..];
    }
    result
}

/// Parses a date string against a single human-readable format.
///
/// Datetime formats are tried first; date-only formats resolve to midnight.
pub fn parse_with_format(value: &str, human_format: &str) -> Option<NaiveDateTime> {
    let strftime = human_format_to_strftime(human_format);
    let trimmed = value.trim();

    if strftime.contains("%z") {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, &strftime) {
            return Some(dt.naive_utc());
        }
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, &strftime) {
        return Some(dt);
    }

    NaiveDate::parse_from_str(trimmed, &strftime)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Renders a datetime using a human-readable format.
///
/// Returns `None` when the format requests fields the value cannot supply
/// (e.g. a timezone offset on a naive datetime).
pub fn format_date(dt: &NaiveDateTime, human_format: &str) -> Option<String> {
    use std::fmt::Write;

    let strftime = human_format_to_strftime(human_format);
    let mut rendered = String::new();
    match write!(rendered, "{}", dt.format(&strftime)) {
        Ok(()) => Some(rendered),
        Err(_) => None,
    }
}

/// Converts an Excel serial date number to a datetime.
///
/// The 1900 system counts days from 1899-12-30 (the Lotus 1-2-3 leap-year
/// quirk); the 1904 system counts from 1904-01-01. Fractional days carry
/// time-of-day.
pub fn parse_excel_serial(value: f64, date_system: &str) -> Option<NaiveDateTime> {
    let base = if date_system == "1904" {
        NaiveDate::from_ymd_opt(1904, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    let seconds = (value * 86_400.0).round() as i64;
    base.and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::seconds(seconds))
}

/// Tries to parse a date using multiple accepted formats, in list order.
///
/// When `excel_serial_enabled` is set, a numeric value in `[1, 2958465]` is
/// first tried as an Excel serial date; the matched format is then reported
/// as [`EXCEL_SERIAL_FORMAT`]. Otherwise the first format that parses wins.
pub fn try_parse_date_robust(
    value: &str,
    accepted_formats: &[String],
    excel_serial_enabled: bool,
    date_system: &str,
) -> Option<(NaiveDateTime, String)> {
    let trimmed = value.trim();

    if excel_serial_enabled
        && let Ok(serial) = trimmed.parse::<f64>()
        && (1.0..=EXCEL_SERIAL_MAX).contains(&serial)
        && let Some(parsed) = parse_excel_serial(serial, date_system)
    {
        return Some((parsed, EXCEL_SERIAL_FORMAT.to_string()));
    }

    for fmt in accepted_formats {
        if let Some(parsed) = parse_with_format(trimmed, fmt) {
            return Some((parsed, fmt.clone()));
        }
    }

    None
}

/// Lenient date parsing for places that accept "anything date-like":
/// window bounds, type conformance on date columns, expression literals.
///
/// Tries RFC 3339, then ISO datetime variants, then the common-format table.
pub fn parse_flexible(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }

    for (_, strftime) in COMMON_DATE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, strftime) {
            return Some(dt);
        }
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, strftime) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Attempts to coerce a date value into the target format.
///
/// Parses with any accepted format (and optionally Excel serials), then
/// renders to `target_format`. Returns `None` when the value cannot be
/// parsed or the target format cannot be rendered.
pub fn coerce_date_to_format(
    value: &str,
    target_format: &str,
    accepted_input_formats: &[String],
    excel_serial_enabled: bool,
    date_system: &str,
) -> Option<String> {
    let (parsed, _) = try_parse_date_robust(
        value,
        accepted_input_formats,
        excel_serial_enabled,
        date_system,
    )?;
    format_date(&parsed, target_format)
}

/// Checks that a human-readable format string renders cleanly.
pub fn validate_date_format_string(human_format: &str) -> Result<(), String> {
    let test_date = NaiveDate::from_ymd_opt(2025, 1, 7)
        .and_then(|d| d.and_hms_opt(14, 32, 10))
        .ok_or_else(|| "internal: invalid probe date".to_string())?;
    format_date(&test_date, human_format)
        .map(|_| ())
        .ok_or_else(|| format!("Invalid format: {human_format}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_common_format_lookup() {
        assert_eq!(human_format_to_strftime("YYYY-MM-DD"), "%Y-%m-%d");
        assert_eq!(human_format_to_strftime("MM/DD/YYYY"), "%m/%d/%Y");
        assert_eq!(
            human_format_to_strftime("YYYY-MM-DD HH:mm:ss"),
            "%Y-%m-%d %H:%M:%S"
        );
    }

    #[test]
    fn test_token_scan_for_uncommon_format() {
        assert_eq!(human_format_to_strftime("DD.MM.YYYY"), "%d.%m.%Y");
        assert_eq!(human_format_to_strftime("MMM YYYY"), "%b %Y");
        assert_eq!(human_format_to_strftime("M/D/YYYY"), "%-m/%-d/%Y");
    }

    #[test]
    fn test_parse_with_format() {
        let parsed = parse_with_format("2024-01-15", "YYYY-MM-DD").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());

        let parsed = parse_with_format("01/15/2024", "MM/DD/YYYY").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());

        assert!(parse_with_format("15-Jan-2024", "YYYY-MM-DD").is_none());
    }

    #[test]
    fn test_parse_with_named_month_format() {
        let parsed = parse_with_format("15-Jan-2024", "DD-MMM-YYYY").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_robust_tries_formats_in_order() {
        let formats = vec!["YYYY-MM-DD".to_string(), "MM/DD/YYYY".to_string()];

        let (_, matched) = try_parse_date_robust("2024-01-15", &formats, false, "1900").unwrap();
        assert_eq!(matched, "YYYY-MM-DD");

        let (_, matched) = try_parse_date_robust("01/15/2024", &formats, false, "1900").unwrap();
        assert_eq!(matched, "MM/DD/YYYY");

        assert!(try_parse_date_robust("15-Jan-2024", &formats, false, "1900").is_none());
    }

    #[test]
    fn test_excel_serial_1900_system() {
        // 25569 is 1970-01-01 in the 1900 system
        let parsed = parse_excel_serial(25569.0, "1900").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());

        // Fractional days carry time-of-day
        let parsed = parse_excel_serial(25569.5, "1900").unwrap();
        assert_eq!(parsed.time().to_string(), "12:00:00");
    }

    #[test]
    fn test_excel_serial_1904_system() {
        let parsed = parse_excel_serial(1.0, "1904").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(1904, 1, 2).unwrap());
    }

    #[test]
    fn test_excel_serial_tried_before_formats() {
        let formats = vec!["YYYYMMDD".to_string()];
        let (_, matched) = try_parse_date_robust("25569", &formats, true, "1900").unwrap();
        assert_eq!(matched, EXCEL_SERIAL_FORMAT);

        // Out-of-range numbers fall through to the format list
        let (_, matched) = try_parse_date_robust("20240115", &formats, true, "1900").unwrap();
        assert_eq!(matched, "YYYYMMDD");
    }

    #[test]
    fn test_coerce_is_idempotent_for_target_format() {
        let formats: Vec<String> = DEFAULT_COERCE_INPUT_FORMATS
            .iter()
            .map(|s| s.to_string())
            .collect();
        let coerced =
            coerce_date_to_format("2024-01-15", "YYYY-MM-DD", &formats, false, "1900").unwrap();
        assert_eq!(coerced, "2024-01-15");
    }

    #[test]
    fn test_coerce_reformats() {
        let formats = vec!["MM/DD/YYYY".to_string()];
        let coerced =
            coerce_date_to_format("01/15/2024", "YYYY-MM-DD", &formats, false, "1900").unwrap();
        assert_eq!(coerced, "2024-01-15");
    }

    #[test]
    fn test_parse_flexible() {
        assert!(parse_flexible("2024-01-15").is_some());
        assert!(parse_flexible("2024-01-15T10:30:00").is_some());
        assert!(parse_flexible("01/15/2024").is_some());
        assert!(parse_flexible("not a date").is_none());
        assert!(parse_flexible("").is_none());
    }

    #[test]
    fn test_validate_date_format_string() {
        assert!(validate_date_format_string("YYYY-MM-DD").is_ok());
        assert!(validate_date_format_string("MMM DD, YYYY").is_ok());
    }
}
