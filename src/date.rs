//! Date stamp expressions
//!
//! The stamp printed on dated pages is chosen with a short expression such as
//! `today`, `2024-11-20`, `11/20/2024` or `friday+1`, and always rendered as
//! `MM/DD/YYYY`.

use std::str::FromStr;

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};

use crate::error::{Error, Result};

/// Date expression types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateExpression {
    /// No stamp
    None,
    Today,
    Yesterday,
    /// Use an explicit date
    Explicit(NaiveDate),
    /// Next occurrence of a weekday (today counts), plus `offset` weeks
    DayOfWeek { day: Weekday, offset: u32 },
}

impl FromStr for DateExpression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_date_expression(s)
    }
}

/// Parse a date expression string into a DateExpression
///
/// Supported formats:
/// - `""` (empty) or `"none"` → None
/// - `"today"`, `"yesterday"`
/// - `"2024-11-20"` → Explicit date (ISO format)
/// - `"11/20/2024"` → Explicit date (US format, as the stamp is printed)
/// - `"Tuesday"` → Next Tuesday (or today if today is Tuesday)
/// - `"Tuesday+3"` → three weeks after that
pub fn parse_date_expression(expr: &str) -> Result<DateExpression> {
    let expr = expr.trim();

    if expr.is_empty() || expr.eq_ignore_ascii_case("none") {
        return Ok(DateExpression::None);
    }
    if expr.eq_ignore_ascii_case("today") {
        return Ok(DateExpression::Today);
    }
    if expr.eq_ignore_ascii_case("yesterday") {
        return Ok(DateExpression::Yesterday);
    }

    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(expr, format) {
            return Ok(DateExpression::Explicit(date));
        }
    }

    let (day_str, offset) = match expr.split_once('+') {
        Some((day, offset)) => {
            let offset = offset.trim().parse::<u32>()
                .map_err(|_| Error::InvalidDateExpression(format!("Invalid offset: {}", offset)))?;
            (day, offset)
        }
        None => (expr, 0),
    };

    let day = parse_weekday(day_str)
        .ok_or_else(|| Error::InvalidDateExpression(format!("Unable to parse date expression: {}", expr)))?;
    Ok(DateExpression::DayOfWeek { day, offset })
}

fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.trim().to_lowercase().as_str() {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

impl DateExpression {
    /// Resolve against a given "today"
    pub fn resolve_from(&self, today: NaiveDate) -> Option<NaiveDate> {
        match *self {
            DateExpression::None => None,
            DateExpression::Today => Some(today),
            DateExpression::Yesterday => today.pred_opt(),
            DateExpression::Explicit(date) => Some(date),
            DateExpression::DayOfWeek { day, offset } => {
                let ahead = (day.num_days_from_monday() + 7
                    - today.weekday().num_days_from_monday()) % 7;
                today.checked_add_signed(Duration::days(i64::from(ahead + offset * 7)))
            }
        }
    }

    /// Resolve against the local calendar date
    pub fn resolve(&self) -> Option<NaiveDate> {
        self.resolve_from(Local::now().date_naive())
    }
}

/// Format a date the way it is stamped on the page: `MM/DD/YYYY`
pub fn format_stamp(date: &NaiveDate) -> String {
    format!("{:02}/{:02}/{:04}", date.month(), date.day(), date.year())
}
