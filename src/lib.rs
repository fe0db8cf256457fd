//! Evaluates calendar recurrence rules in the spirit of iCalendar RRULEs.
//!
//! A [`Rule`] is a set of independent constraints (months, ISO week numbers,
//! days of the month, positional month/year days, weekdays within a period)
//! that a date has to satisfy all at once. Rules answer whether a single date
//! is an occurrence and enumerate the occurrences of a bounded range.
//!
//! ```
//! use chrono::NaiveDate;
//! use recurrence::{Frequency, Rule};
//!
//! let mut rule = Rule::default();
//! rule.set_frequency(Frequency::Monthly);
//! rule.add_month_day(-1).unwrap();
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
//! let dates = rule.get_occurrences(Some(start), Some(end)).unwrap();
//! assert_eq!(dates.len(), 3);
//! ```

pub mod constraint;
pub mod error;
pub mod occurrences;
pub mod positional;
pub mod rule;
pub mod set;

pub use chrono::Weekday;
pub use constraint::Dimension;
pub use error::{Error, Result};
pub use occurrences::Occurrences;
pub use positional::{Gregorian, PositionalDayResolver};
pub use rule::{EventId, Options, Rule};
pub use set::Set;

use std::convert::TryFrom;

/// Base period of repetition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl TryFrom<i64> for Frequency {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Frequency::Daily),
            1 => Ok(Frequency::Weekly),
            2 => Ok(Frequency::Monthly),
            3 => Ok(Frequency::Yearly),
            _ => Err(Error::InvalidArgument(format!(
                "invalid frequency value provided: {value}"
            ))),
        }
    }
}

impl From<Frequency> for i64 {
    fn from(freq: Frequency) -> i64 {
        match freq {
            Frequency::Daily => 0,
            Frequency::Weekly => 1,
            Frequency::Monthly => 2,
            Frequency::Yearly => 3,
        }
    }
}

/// Maps 0 (sunday) through 6 (saturday) to a weekday.
pub fn weekday_from_number(value: i64) -> Result<Weekday> {
    match value {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        _ => Err(Error::InvalidArgument(format!(
            "invalid week start day provided: {value}"
        ))),
    }
}
