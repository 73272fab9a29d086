//! Calendar-aware age computation for `dd-MM-yyyy` birth dates.

use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Textual date format used by the backend.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{2})-([0-9]{2})-([0-9]{4})$").expect("static date pattern"));

/// Parse a `dd-MM-yyyy` string into a real calendar date.
///
/// Rejects any other shape and any day/month combination that does not exist
/// (`31-02-2020`, `00-01-2020`, `13-13-2020`).
pub fn parse_birth_date(text: &str) -> Option<NaiveDate> {
    let caps = DATE_SHAPE.captures(text)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    // from_ymd_opt already refuses overflowed days; keep the round-trip explicit.
    (date.day() == day && date.month() == month && date.year() == year).then_some(date)
}

/// Age in whole years on `today`, or `None` for an invalid or future date.
pub fn age_on(text: &str, today: NaiveDate) -> Option<u32> {
    let birth = parse_birth_date(text)?;
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    u32::try_from(age).ok()
}

/// Age in whole years as of the local current date.
pub fn age_in_years(text: &str) -> Option<u32> {
    age_on(text, Local::now().date_naive())
}

/// Format a date the way the backend expects it.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
