use crate::{positional::Gregorian, rule::WeekdayKey, Frequency, PositionalDayResolver, Rule};
use chrono::{Datelike, NaiveDate, Weekday};

/// One independently configured filter of a [`Rule`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dimension {
    Until,
    Start,
    Interval,
    Months,
    WeekNumbers,
    Days,
    YearDays,
    MonthDays,
    Weekdays,
}

impl Rule {
    /// Whether the calendar date of `date` is an occurrence. Time of day, if
    /// any, is ignored.
    pub fn contains<D: Datelike>(&self, date: &D) -> bool {
        self.contains_with(&Gregorian, date)
    }

    pub fn contains_with<R, D>(&self, resolver: &R, date: &D) -> bool
    where
        R: PositionalDayResolver,
        D: Datelike,
    {
        match NaiveDate::from_ymd_opt(date.year(), date.month(), date.day()) {
            Some(date) => self.rejected_by(resolver, date).is_none(),
            None => false,
        }
    }

    /// The first dimension that `date` fails, if any.
    pub fn rejected_by<R: PositionalDayResolver>(
        &self,
        resolver: &R,
        date: NaiveDate,
    ) -> Option<Dimension> {
        let rejected = if !self.on_or_before_until(date) {
            Some(Dimension::Until)
        } else if !self.on_or_after_start(date) {
            Some(Dimension::Start)
        } else if !self.on_interval(date) {
            Some(Dimension::Interval)
        } else if !self.in_months(date) {
            Some(Dimension::Months)
        } else if !self.in_week_numbers(date) {
            Some(Dimension::WeekNumbers)
        } else if !self.in_days(date) {
            Some(Dimension::Days)
        } else if !self.on_year_days(resolver, date) {
            Some(Dimension::YearDays)
        } else if !self.on_month_days(resolver, date) {
            Some(Dimension::MonthDays)
        } else if !self.on_weekdays(date) {
            Some(Dimension::Weekdays)
        } else {
            None
        };

        if let Some(dimension) = rejected {
            tracing::trace!(%date, ?dimension, "date rejected");
        }

        rejected
    }

    fn on_or_before_until(&self, date: NaiveDate) -> bool {
        self.until.map_or(true, |until| date <= until)
    }

    fn on_or_after_start(&self, date: NaiveDate) -> bool {
        self.dtstart.map_or(true, |dtstart| date >= dtstart)
    }

    /// Only anchored rules can count periods.
    fn on_interval(&self, date: NaiveDate) -> bool {
        let (dtstart, frequency) = match (self.dtstart, self.frequency) {
            (Some(dtstart), Some(frequency)) if self.interval > 1 => (dtstart, frequency),
            _ => return true,
        };

        let elapsed = periods_between(frequency, self.week_start, dtstart, date);
        elapsed.rem_euclid(i64::from(self.interval)) == 0
    }

    fn in_months(&self, date: NaiveDate) -> bool {
        self.months.is_empty() || self.months.contains(&(date.month() as i32))
    }

    /// ISO-8601 weeks; negative numbers count back from the last week of the ISO year.
    fn in_week_numbers(&self, date: NaiveDate) -> bool {
        if self.week_numbers.is_empty() {
            return true;
        }

        let iso = date.iso_week();
        let week = iso.week() as i32;
        let last = weeks_in_iso_year(iso.year());

        self.week_numbers
            .iter()
            .any(|&n| n == week || (n < 0 && last + 1 + n == week))
    }

    fn in_days(&self, date: NaiveDate) -> bool {
        self.days.is_empty() || self.days.contains(&(date.day() as i32))
    }

    fn on_year_days<R: PositionalDayResolver>(&self, resolver: &R, date: NaiveDate) -> bool {
        self.year_days.is_empty()
            || self
                .year_days
                .iter()
                .any(|&n| resolver.day_of_year(n, date.year()) == Ok(Some(date)))
    }

    fn on_month_days<R: PositionalDayResolver>(&self, resolver: &R, date: NaiveDate) -> bool {
        self.month_days.is_empty()
            || self.month_days.iter().any(|&n| {
                resolver.day_of_month(n, date.year(), date.month()) == Ok(Some(date))
            })
    }

    /// The weekday has to be listed, and when day frequencies are given its
    /// ordinal within the period of the rule's frequency as well.
    fn on_weekdays(&self, date: NaiveDate) -> bool {
        if self.weekdays.is_empty() {
            return true;
        }

        if !self.weekdays.contains(&WeekdayKey::from(date.weekday())) {
            return false;
        }

        if self.day_frequency.is_empty() || self.day_frequency.contains(&0) {
            return true;
        }

        match ordinal_in_period(self.frequency, date) {
            Some(ordinal) => self.day_frequency.contains(&ordinal),
            None => true,
        }
    }
}

/// Which occurrence of its weekday `date` is within the period, 1-based.
fn ordinal_in_period(frequency: Option<Frequency>, date: NaiveDate) -> Option<i32> {
    match frequency? {
        Frequency::Daily => None,
        Frequency::Weekly => Some(1),
        Frequency::Monthly => Some(date.day0() as i32 / 7 + 1),
        Frequency::Yearly => Some(date.ordinal0() as i32 / 7 + 1),
    }
}

/// Whole periods between the period holding `from` and the one holding `to`.
pub(crate) fn periods_between(
    frequency: Frequency,
    week_start: Weekday,
    from: NaiveDate,
    to: NaiveDate,
) -> i64 {
    match frequency {
        Frequency::Daily => (to - from).num_days(),
        Frequency::Weekly => week_index(to, week_start) - week_index(from, week_start),
        Frequency::Monthly => {
            let months = |d: NaiveDate| i64::from(d.year()) * 12 + i64::from(d.month0());
            months(to) - months(from)
        }
        Frequency::Yearly => i64::from(to.year() - from.year()),
    }
}

/// Weeks starting on `week_start`, counted from the one holding 0001-01-01 (a monday).
fn week_index(date: NaiveDate, week_start: Weekday) -> i64 {
    const DAYS_IN_WEEK: i64 = 7;
    let days = i64::from(date.num_days_from_ce()) - 1;

    (days - i64::from(week_start.num_days_from_monday())).div_euclid(DAYS_IN_WEEK)
}

/// 52 or 53; december 28th always falls in the last ISO week.
fn weeks_in_iso_year(year: i32) -> i32 {
    NaiveDate::from_ymd_opt(year, 12, 28).map_or(52, |d| d.iso_week().week() as i32)
}
