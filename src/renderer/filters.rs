use crate::constants::DEFAULT_DATETIME_FORMAT;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use minijinja::{Error, ErrorKind, Value};

fn invalid(message: String) -> Error {
    Error::new(ErrorKind::InvalidOperation, message)
}

/// Parses the date and datetime shapes that show up in contexts: `now`,
/// ISO dates, ISO datetimes with or without fractional seconds, RFC 3339.
fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.naive_local()))
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn require_datetime(value: &str) -> Result<NaiveDateTime, Error> {
    parse_datetime(value).ok_or_else(|| invalid(format!("'{value}' is not a date")))
}

/// Formats a date or datetime with a strftime pattern.
///
/// `{{ now | datetime('%Y-%m') }}`. Any value whose text is an ISO date works.
pub fn datetime(value: Value, format: Option<&str>) -> Result<String, Error> {
    let format = format.unwrap_or(DEFAULT_DATETIME_FORMAT);
    let items: Vec<Item> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(invalid(format!("invalid datetime format '{format}'")));
    }
    let parsed = require_datetime(&value.to_string())?;
    Ok(parsed.format_with_items(items.iter()).to_string())
}

/// Last calendar day of the month the given date falls in, as `YYYY-MM-DD`.
pub fn last_day_of_month(value: Value) -> Result<String, Error> {
    let value = value.to_string();
    let date = require_datetime(&value)?.date();
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.format("%Y-%m-%d").to_string())
        .ok_or_else(|| invalid(format!("no month end for '{value}'")))
}

/// Two decimals, `.` as thousands separator and `,` as decimal separator.
///
/// Accepts numbers and numeric strings, since query output arrives as text.
pub fn german_float(value: Value) -> Result<String, Error> {
    let number = match value.as_str() {
        Some(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(format!("'{text}' is not a number")))?,
        None => f64::try_from(value.clone())
            .map_err(|_| invalid(format!("'{value}' is not a number")))?,
    };
    Ok(format_german(number))
}

fn format_german(number: f64) -> String {
    let formatted = format!("{:.2}", number.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if number < 0.0 { "-" } else { "" };
    format!("{sign}{grouped},{frac_part}")
}
