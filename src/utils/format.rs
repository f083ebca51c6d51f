use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use crate::constants::EMAIL_PATTERN;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(EMAIL_PATTERN).expect("email pattern compiles");
    static ref TAG_RE: Regex = Regex::new(r"<[^>]*>").expect("tag pattern compiles");
}

pub const INVALID_DATE: &str = "Invalid date";
pub const INVALID_URL: &str = "Invalid URL";

/// Hostname of `url_string`, or `fallback` when the URL is empty or unparsable
pub fn safe_get_hostname(url_string: &str, fallback: &str) -> String {
    if url_string.trim().is_empty() {
        return fallback.to_string();
    }

    match url::Url::parse(url_string) {
        Ok(url) => url
            .host_str()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string()),
        Err(_) => fallback.to_string(),
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Removes HTML tags and surrounding whitespace
pub fn sanitize_text(text: &str) -> String {
    TAG_RE.replace_all(text, "").trim().to_string()
}

/// Parses the timestamp shapes the platform returns.
///
/// Accepts RFC 3339 (`2024-03-05T14:07:00.123+00:00`), zone-less ISO
/// timestamps (read as UTC) and plain dates (UTC midnight).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// German long format used by the insights table: `05.03.2024, 14:07`
pub fn format_date(value: &str, offset: FixedOffset) -> String {
    match parse_timestamp(value) {
        Some(dt) => dt.with_timezone(&offset).format("%d.%m.%Y, %H:%M").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// German short date used for cards and the "Joined" column: `5.3.2024`
pub fn format_day(value: &str, offset: FixedOffset) -> String {
    match parse_timestamp(value) {
        Some(dt) => dt.with_timezone(&offset).format("%-d.%-m.%Y").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// Counts timestamps strictly newer than `now - days`. Unparsable values never count.
pub fn recent_items_count<'a, I>(created_at: I, days: i64, now: DateTime<Utc>) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    let cutoff = now - chrono::Duration::days(days);

    created_at
        .into_iter()
        .filter_map(parse_timestamp)
        .filter(|created| *created > cutoff)
        .count()
}

pub fn is_valid_data_url(data_url: &str) -> bool {
    data_url.starts_with("data:image/")
}

pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let mut truncated: String = text.chars().take(max_length).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co"));
        assert!(!is_valid_email("invalid-email"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user name@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_format_date_german_locale() {
        assert_eq!(format_date("2024-03-05T14:07:00Z", utc()), "05.03.2024, 14:07");
        assert_eq!(
            format_date("2024-12-31T23:59:59.123456+00:00", utc()),
            "31.12.2024, 23:59"
        );
    }

    #[test]
    fn test_format_date_applies_offset() {
        let berlin_winter = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(
            format_date("2024-12-31T23:30:00Z", berlin_winter),
            "01.01.2025, 00:30"
        );
    }

    #[test]
    fn test_format_date_invalid() {
        assert_eq!(format_date("not a date", utc()), "Invalid date");
        assert_eq!(format_date("", utc()), "Invalid date");
    }

    #[test]
    fn test_format_day() {
        assert_eq!(format_day("2024-03-05T14:07:00Z", utc()), "5.3.2024");
        assert_eq!(format_day("2024-11-20", utc()), "20.11.2024");
    }

    #[test]
    fn test_zoneless_timestamp_is_utc() {
        let parsed = parse_timestamp("2024-03-05T14:07:00.5").unwrap();
        assert_eq!(parsed.format("%H:%M:%S").to_string(), "14:07:00");
    }

    #[test]
    fn test_safe_get_hostname() {
        assert_eq!(
            safe_get_hostname("https://docs.rs/actix-web/latest", INVALID_URL),
            "docs.rs"
        );
        assert_eq!(safe_get_hostname("not a url", INVALID_URL), "Invalid URL");
        assert_eq!(safe_get_hostname("", "-"), "-");
    }

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("  <b>Hello</b> <script>x</script>world "), "Hello xworld");
        assert_eq!(sanitize_text("plain"), "plain");
    }

    #[test]
    fn test_recent_items_count() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let items = [
            "2024-03-09T12:00:00Z",
            "2024-03-03T12:00:01Z",
            "2024-03-03T12:00:00Z",
            "2024-01-01T00:00:00Z",
            "garbage",
        ];

        assert_eq!(recent_items_count(items.iter().copied(), 7, now), 2);
        assert_eq!(recent_items_count(std::iter::empty(), 7, now), 0);
    }

    #[test]
    fn test_is_valid_data_url() {
        assert!(is_valid_data_url("data:image/png;base64,iVBORw0KGgo="));
        assert!(!is_valid_data_url("data:text/html,<h1>x</h1>"));
        assert!(!is_valid_data_url("https://example.com/a.png"));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdefghij", 4), "abcd...");
        assert_eq!(truncate_text("äöüß", 2), "äö...");
    }
}
