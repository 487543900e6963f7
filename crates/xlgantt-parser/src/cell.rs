//! Tagged cell values and their coercion rules
//!
//! Spreadsheet cells arrive loosely typed. Every coercion here is total:
//! a value of the wrong shape degrades to the field's default instead of
//! failing the row.

use calamine::Data;
use chrono::{Days, Duration, NaiveDate, NaiveDateTime};
pub use xlgantt_core::date_to_serial;

/// A single cell as seen by the row mapper
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text coercion: missing values become `""`
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    /// Date coercion: native dates pass through, numbers are serial dates,
    /// `d/m/y` strings are parsed; anything else is no date
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            CellValue::Number(n) => serial_to_date(*n),
            CellValue::Text(s) => parse_slash_date(s),
            CellValue::Empty | CellValue::Bool(_) => None,
        }
    }

    /// Flag coercion: only a native `true` or the exact string `"True"`
    pub fn as_flag(&self) -> bool {
        match self {
            CellValue::Bool(b) => *b,
            CellValue::Text(s) => s == "True",
            _ => false,
        }
    }
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            // calamine applies the workbook's 1900/1904 epoch
            Data::DateTime(dt) => dt
                .as_datetime()
                .map(|dt| CellValue::Date(dt.date()))
                .unwrap_or_else(|| CellValue::Number(dt.as_f64())),
            Data::DateTimeIso(s) => parse_iso_date(s)
                .map(CellValue::Date)
                .unwrap_or_else(|| CellValue::Text(s.clone())),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
        }
    }
}

/// Whole numbers print without a fractional part
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

const SECONDS_PER_DAY: f64 = 86_400.0;
/// Serial 2958465 is 9999-12-31
const MAX_SERIAL: i64 = 2_958_465;

/// Convert a 1900-system spreadsheet serial number to a calendar date
///
/// Serial 1 is 1900-01-01 and serial 60 is the phantom 1900-02-29 inherited
/// from Lotus 1-2-3, which lands on 1900-03-01 here. The time of day is
/// rounded to the nearest second and may roll over into the next day.
/// Serials below one day carry no date.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }

    let mut days = serial.floor() as i64;
    let seconds = ((serial - serial.floor()) * SECONDS_PER_DAY).round();
    if seconds >= SECONDS_PER_DAY {
        days += 1;
    }

    if !(1..=MAX_SERIAL).contains(&days) {
        return None;
    }

    match days {
        1..=59 => NaiveDate::from_ymd_opt(1899, 12, 31)
            .and_then(|epoch| epoch.checked_add_signed(Duration::days(days))),
        60 => NaiveDate::from_ymd_opt(1900, 3, 1),
        _ => NaiveDate::from_ymd_opt(1899, 12, 30)
            .and_then(|epoch| epoch.checked_add_signed(Duration::days(days))),
    }
}

/// Parse `day/month/year`
///
/// Each part is read as a leading integer, so `"05/03/2025 10:30"` still
/// yields 2025-03-05. Years `0..=99` are in the 1900s. Day and month values
/// outside their range carry into the next unit the way a calendar
/// constructor does: `31/02/2025` is 2025-03-03, `05/13/2025` is 2026-01-05
/// and day `0` is the last day of the previous month.
pub fn parse_slash_date(s: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = s.split('/').collect();
    let [day, month, year] = parts.as_slice() else {
        return None;
    };

    let day = leading_int(day)?;
    let month = leading_int(month)?;
    let mut year = leading_int(year)?;
    if (0..100).contains(&year) {
        year += 1900;
    }

    let month0 = month.checked_sub(1)?;
    let year = i32::try_from(year.checked_add(month0.div_euclid(12))?).ok()?;
    let month = u32::try_from(month0.rem_euclid(12) + 1).ok()?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;

    let offset = day.checked_sub(1)?;
    if offset >= 0 {
        first.checked_add_days(Days::new(offset.unsigned_abs()))
    } else {
        first.checked_sub_days(Days::new(offset.unsigned_abs()))
    }
}

/// Optional sign followed by digits after leading whitespace; the rest is ignored
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}
