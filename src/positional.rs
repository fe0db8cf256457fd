use crate::{Error, Result};
use chrono::NaiveDate;

/// Resolves "day N of the month/year" where negative values count from the end
/// (-1 being the last day).
///
/// `Ok(None)` means the position is valid but does not exist in that
/// particular month or year, like the 30th of February.
pub trait PositionalDayResolver {
    fn day_of_month(&self, n: i32, year: i32, month: u32) -> Result<Option<NaiveDate>>;

    fn day_of_year(&self, n: i32, year: i32) -> Result<Option<NaiveDate>>;
}

/// Proleptic gregorian calendar as provided by chrono
#[derive(Clone, Copy, Debug, Default)]
pub struct Gregorian;

impl PositionalDayResolver for Gregorian {
    fn day_of_month(&self, n: i32, year: i32, month: u32) -> Result<Option<NaiveDate>> {
        if n == 0 || n.abs() > 31 {
            return Err(Error::Range(format!(
                "month day must be between -31 and -1 or 1 and 31, got {n}"
            )));
        }

        let length = match days_in_month(year, month) {
            Some(length) => length,
            None => {
                return Err(Error::InvalidArgument(format!(
                    "{year}-{month} is not a calendar month"
                )))
            }
        };

        Ok(position(n, length).and_then(|day| NaiveDate::from_ymd_opt(year, month, day)))
    }

    fn day_of_year(&self, n: i32, year: i32) -> Result<Option<NaiveDate>> {
        if n == 0 || n.abs() > 366 {
            return Err(Error::Range(format!(
                "year day must be between -366 and -1 or 1 and 366, got {n}"
            )));
        }

        let length = if is_leap_year(year) { 366 } else { 365 };

        Ok(position(n, length).and_then(|ordinal| NaiveDate::from_yo_opt(year, ordinal)))
    }
}

/// 1-based position of `n` within a run of `length` days.
fn position(n: i32, length: u32) -> Option<u32> {
    let length = length as i32;
    let resolved = if n > 0 { n } else { length + 1 + n };

    if resolved < 1 || resolved > length {
        None
    } else {
        Some(resolved as u32)
    }
}

pub(crate) fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };

    Some((next - first).num_days() as u32)
}

pub(crate) fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn first_and_last_day_of_month() {
        assert_eq!(Gregorian.day_of_month(1, 2024, 2), Ok(Some(ymd(2024, 2, 1))));
        assert_eq!(Gregorian.day_of_month(-1, 2024, 2), Ok(Some(ymd(2024, 2, 29))));
        assert_eq!(Gregorian.day_of_month(-1, 2023, 2), Ok(Some(ymd(2023, 2, 28))));
        assert_eq!(Gregorian.day_of_month(-31, 2024, 1), Ok(Some(ymd(2024, 1, 1))));
    }

    #[test]
    fn missing_days_of_month() {
        assert_eq!(Gregorian.day_of_month(30, 2024, 2), Ok(None));
        assert_eq!(Gregorian.day_of_month(31, 2024, 4), Ok(None));
        assert_eq!(Gregorian.day_of_month(-31, 2024, 4), Ok(None));
    }

    #[test]
    fn rejects_month_positions() {
        assert!(matches!(Gregorian.day_of_month(0, 2024, 1), Err(Error::Range(_))));
        assert!(matches!(Gregorian.day_of_month(32, 2024, 1), Err(Error::Range(_))));
        assert!(matches!(Gregorian.day_of_month(-32, 2024, 1), Err(Error::Range(_))));
        assert!(matches!(
            Gregorian.day_of_month(1, 2024, 13),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn days_of_year() {
        assert_eq!(Gregorian.day_of_year(1, 2023), Ok(Some(ymd(2023, 1, 1))));
        assert_eq!(Gregorian.day_of_year(-1, 2023), Ok(Some(ymd(2023, 12, 31))));
        assert_eq!(Gregorian.day_of_year(60, 2024), Ok(Some(ymd(2024, 2, 29))));
        assert_eq!(Gregorian.day_of_year(60, 2023), Ok(Some(ymd(2023, 3, 1))));
        assert_eq!(Gregorian.day_of_year(366, 2024), Ok(Some(ymd(2024, 12, 31))));
        assert_eq!(Gregorian.day_of_year(-366, 2024), Ok(Some(ymd(2024, 1, 1))));
    }

    #[test]
    fn missing_days_of_year() {
        assert_eq!(Gregorian.day_of_year(366, 2023), Ok(None));
        assert_eq!(Gregorian.day_of_year(-366, 2023), Ok(None));
        assert!(matches!(Gregorian.day_of_year(0, 2023), Err(Error::Range(_))));
        assert!(matches!(Gregorian.day_of_year(367, 2024), Err(Error::Range(_))));
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(1900, 2), Some(28));
        assert_eq!(days_in_month(2000, 2), Some(29));
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(2024, 0), None);
    }
}
