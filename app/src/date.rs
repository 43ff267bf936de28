//! Publication dates: parsing what authors write in frontmatter and
//! formatting it for readers.

use chrono::{DateTime, Datelike as _, NaiveDate, SecondsFormat, Utc};

/// Parses a publication date written either as `YYYY-MM-DD` (midnight UTC)
/// or as a full RFC 3339 timestamp.
#[must_use]
pub fn parse_published_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Normalizes a publication date to the stored form, RFC 3339 in UTC with
/// whole seconds. Stored values sort chronologically as plain strings.
#[must_use]
pub fn normalize_published_at(raw: &str) -> Option<String> {
    parse_published_at(raw).map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Coarse distance between `date` and `today`, compared field by field:
/// years first, then months, then days.
fn relative(date: NaiveDate, today: NaiveDate) -> String {
    let years = today.year() - date.year();
    let months = i64::from(today.month()) - i64::from(date.month());
    let days = i64::from(today.day()) - i64::from(date.day());

    if years > 0 {
        format!("{years}y ago")
    } else if months > 0 {
        format!("{months}mo ago")
    } else if days > 0 {
        format!("{days}d ago")
    } else {
        "Today".to_owned()
    }
}

/// Formats `date` as `April 9, 2024`, optionally followed by how long ago
/// that was relative to `today`, as in `April 9, 2024 (3d ago)`.
#[must_use]
pub fn format_date(date: NaiveDate, include_relative: bool, today: NaiveDate) -> String {
    let full = date.format("%B %-d, %Y").to_string();
    if include_relative {
        format!("{full} ({})", relative(date, today))
    } else {
        full
    }
}

/// [`format_date`] for a raw stored or frontmatter value, relative to the
/// current UTC day. Values that do not parse are shown as written.
#[must_use]
pub fn format_published(raw: &str, include_relative: bool) -> String {
    parse_published_at(raw).map_or_else(
        || raw.to_owned(),
        |ts| format_date(ts.date_naive(), include_relative, Utc::now().date_naive()),
    )
}
