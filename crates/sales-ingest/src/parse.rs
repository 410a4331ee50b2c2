//! Typed parsing of raw cells into record fields.
//!
//! Each parser returns a static reason on failure; the schema step wraps it
//! into [`IngestError::MalformedRow`](crate::IngestError::MalformedRow) with
//! the row and column.

use chrono::{Days, NaiveDate, NaiveTime};

use crate::raw::RawCell;

/// Day zero of spreadsheet serial dates (accounts for the 1900 leap bug).
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);
/// 9999-12-31, the last date a spreadsheet can hold.
const MAX_SERIAL: f64 = 2_958_465.0;

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%Y%m%d"];
const TIME_FORMATS: [&str; 6] = [
    "%H:%M:%S%.f",
    "%H:%M:%S",
    "%H:%M",
    "%I:%M:%S %p",
    "%I:%M %p",
    "%H:%M:%S%.fZ",
];

pub type ParseResult<T> = std::result::Result<T, &'static str>;

/// Invoice date. The time of day, when present, is validated and dropped.
pub fn parse_date(cell: &RawCell) -> ParseResult<NaiveDate> {
    match cell {
        RawCell::Date(date) => Ok(*date),
        RawCell::Number(serial) => serial_to_date(*serial),
        RawCell::Text(text) => parse_date_text(text),
        RawCell::Empty => Err("missing date"),
        RawCell::Error(_) => Err("spreadsheet error value"),
    }
}

fn serial_to_date(serial: f64) -> ParseResult<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > MAX_SERIAL {
        return Err("date serial out of range");
    }
    let (y, m, d) = SERIAL_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|epoch| epoch.checked_add_days(Days::new(serial.floor() as u64)))
        .ok_or("date serial out of range")
}

fn parse_date_text(text: &str) -> ParseResult<NaiveDate> {
    let trimmed = text.trim();
    let (date_part, time_part) = match trimmed.find(|c: char| c == 'T' || c.is_whitespace()) {
        Some(split) => (&trimmed[..split], trimmed[split + 1..].trim()),
        None => (trimmed, ""),
    };
    if !time_part.is_empty()
        && !TIME_FORMATS
            .iter()
            .any(|format| NaiveTime::parse_from_str(time_part, format).is_ok())
    {
        return Err("unrecognized time of day");
    }
    if !has_four_digit_year(date_part) {
        return Err("year must have four digits");
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
        .ok_or("unrecognized date")
}

/// chrono's `%Y` reads one to four digits, so `1/5/23` would otherwise parse
/// as year 1.
fn has_four_digit_year(date_part: &str) -> bool {
    let groups: Vec<&str> = date_part.split(['-', '/']).collect();
    if !groups
        .iter()
        .all(|group| !group.is_empty() && group.chars().all(|ch| ch.is_ascii_digit()))
    {
        return false;
    }
    match groups.as_slice() {
        [compact] => compact.len() == 8,
        [_, _, _] => {
            groups.iter().filter(|group| group.len() == 4).count() == 1
                && groups.iter().all(|group| group.len() <= 2 || group.len() == 4)
        }
        _ => false,
    }
}

/// Dollar amount. Accepts `$`, thousands separators and accounting
/// parentheses for negatives.
pub fn parse_dollars(cell: &RawCell) -> ParseResult<f64> {
    let value = match cell {
        RawCell::Number(value) => *value,
        RawCell::Text(text) => parse_money_text(text)?,
        RawCell::Empty => return Err("missing amount"),
        RawCell::Date(_) => return Err("expected an amount, found a date"),
        RawCell::Error(_) => return Err("spreadsheet error value"),
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err("amount is not finite")
    }
}

fn parse_money_text(text: &str) -> ParseResult<f64> {
    let trimmed = text.trim();
    let (negative, body) = match trimmed
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
    {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };
    if negative && body.contains(['-', '+']) {
        return Err("signed amount inside accounting parentheses");
    }
    let cleaned: String = body
        .chars()
        .filter(|ch| !matches!(ch, '$' | ',' | ' '))
        .collect();
    if !cleaned
        .chars()
        .all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+' | 'e' | 'E'))
    {
        return Err("not a number");
    }
    let value: f64 = cleaned.parse().map_err(|_| "not a number")?;
    Ok(if negative { -value } else { value })
}

/// Case quantity. Blank cells count as zero; negative or fractional values
/// are rejected.
pub fn parse_quantity(cell: &RawCell) -> ParseResult<u64> {
    let value = match cell {
        RawCell::Empty => return Ok(0),
        RawCell::Number(value) => *value,
        RawCell::Text(text) => {
            let cleaned = text.trim().replace(',', "");
            if let Ok(value) = cleaned.parse::<u64>() {
                return Ok(value);
            }
            cleaned.parse::<f64>().map_err(|_| "not a quantity")?
        }
        RawCell::Date(_) => return Err("expected a quantity, found a date"),
        RawCell::Error(_) => return Err("spreadsheet error value"),
    };
    if !value.is_finite() || value.fract() != 0.0 {
        return Err("quantity must be a whole number");
    }
    if value < 0.0 {
        return Err("quantity must not be negative");
    }
    if value > u64::MAX as f64 {
        return Err("quantity out of range");
    }
    Ok(value as u64)
}

/// Optional text column. Whole numbers read from spreadsheets render
/// without a trailing `.0`.
pub fn parse_text(cell: &RawCell) -> ParseResult<Option<String>> {
    match cell {
        RawCell::Empty => Ok(None),
        RawCell::Text(text) => Ok(Some(text.clone())),
        RawCell::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            Ok(Some(format!("{}", *value as i64)))
        }
        RawCell::Number(value) => Ok(Some(value.to_string())),
        RawCell::Date(date) => Ok(Some(date.format("%Y-%m-%d").to_string())),
        RawCell::Error(_) => Err("spreadsheet error value"),
    }
}

/// Required text column.
pub fn parse_required_text(cell: &RawCell) -> ParseResult<String> {
    parse_text(cell)?.ok_or("missing value")
}
