use crate::{weekday_from_number, Error, Frequency, Result};
use chrono::{NaiveDate, Weekday};
use std::collections::BTreeSet;
use std::convert::TryFrom;
use uuid::Uuid;

/// Identifies the event a rule belongs to. The rule never owns the event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EventId(pub Uuid);

impl From<Uuid> for EventId {
    fn from(id: Uuid) -> Self {
        EventId(id)
    }
}

/// Recurrence configuration. Every constraint set starts empty, and an empty
/// set does not restrict matching.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub(crate) event: Option<EventId>,
    pub(crate) frequency: Option<Frequency>,
    pub(crate) interval: u32,
    pub(crate) week_start: Weekday,
    pub(crate) dtstart: Option<NaiveDate>,
    pub(crate) until: Option<NaiveDate>,
    pub(crate) days: BTreeSet<i32>,
    pub(crate) day_frequency: BTreeSet<i32>,
    pub(crate) weekdays: BTreeSet<WeekdayKey>,
    pub(crate) months: BTreeSet<i32>,
    pub(crate) month_days: BTreeSet<i32>,
    pub(crate) week_numbers: BTreeSet<i32>,
    pub(crate) year_days: BTreeSet<i32>,
}

#[derive(Default)]
pub struct Options {
    pub frequency: Option<Frequency>,
    pub interval: Option<u32>,
    pub week_start: Option<Weekday>,
    pub dtstart: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    pub event: Option<EventId>,
}

/// `chrono::Weekday` is not `Ord`, so weekdays are stored by their monday-based index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct WeekdayKey(u32);

impl From<Weekday> for WeekdayKey {
    fn from(weekday: Weekday) -> Self {
        WeekdayKey(weekday.num_days_from_monday())
    }
}

impl Default for Rule {
    fn default() -> Self {
        Rule::new(Options::default())
    }
}

impl Rule {
    pub fn new(options: Options) -> Self {
        Rule {
            event: options.event,
            frequency: options.frequency,
            interval: options.interval.unwrap_or(1).max(1),
            week_start: options.week_start.unwrap_or(Weekday::Mon),
            dtstart: options.dtstart,
            until: options.until,
            days: BTreeSet::new(),
            day_frequency: BTreeSet::new(),
            weekdays: BTreeSet::new(),
            months: BTreeSet::new(),
            month_days: BTreeSet::new(),
            week_numbers: BTreeSet::new(),
            year_days: BTreeSet::new(),
        }
    }

    pub fn event(&self) -> Option<EventId> {
        self.event
    }

    pub fn set_event(&mut self, event: EventId) {
        self.event = Some(event);
    }

    /// Days of the month (1-based) the rule recurs on.
    pub fn days(&self) -> &BTreeSet<i32> {
        &self.days
    }

    pub fn add_day(&mut self, day: i32) {
        self.days.insert(day);
    }

    pub fn remove_day(&mut self, day: i32) {
        self.days.remove(&day);
    }

    /// Which occurrence of each of [`Rule::weekdays`] within the period
    /// matches: 0 for every one, N for the Nth.
    pub fn day_frequency(&self) -> &BTreeSet<i32> {
        &self.day_frequency
    }

    pub fn add_day_frequency(&mut self, frequency: i32) -> Result<()> {
        if !(0..=6).contains(&frequency) {
            tracing::debug!(frequency, "rejected day frequency");
            return Err(Error::Range(format!(
                "day frequency cannot be less than 0 or greater than 6, got {frequency}"
            )));
        }

        self.day_frequency.insert(frequency);
        Ok(())
    }

    pub fn remove_day_frequency(&mut self, frequency: i32) {
        self.day_frequency.remove(&frequency);
    }

    pub fn weekdays(&self) -> Vec<Weekday> {
        self.weekdays
            .iter()
            .map(|key| weekday_from_monday(key.0))
            .collect()
    }

    pub fn add_weekday(&mut self, weekday: Weekday) {
        self.weekdays.insert(weekday.into());
    }

    pub fn remove_weekday(&mut self, weekday: Weekday) {
        self.weekdays.remove(&WeekdayKey::from(weekday));
    }

    pub fn months(&self) -> &BTreeSet<i32> {
        &self.months
    }

    pub fn add_month(&mut self, month: i32) {
        self.months.insert(month);
    }

    pub fn remove_month(&mut self, month: i32) {
        self.months.remove(&month);
    }

    /// Days within a month, negative values counting back from the last day.
    pub fn month_days(&self) -> &BTreeSet<i32> {
        &self.month_days
    }

    pub fn add_month_day(&mut self, day: i32) -> Result<()> {
        if day == 0 || !(-31..=31).contains(&day) {
            tracing::debug!(day, "rejected month day");
            return Err(Error::Range(format!(
                "month day must be between -31 and -1 or 1 and 31, got {day}"
            )));
        }

        self.month_days.insert(day);
        Ok(())
    }

    pub fn remove_month_day(&mut self, day: i32) {
        self.month_days.remove(&day);
    }

    /// ISO-8601 weeks of the year, negative values counting back from the last week.
    pub fn week_numbers(&self) -> &BTreeSet<i32> {
        &self.week_numbers
    }

    pub fn add_week_number(&mut self, week: i32) {
        self.week_numbers.insert(week);
    }

    pub fn remove_week_number(&mut self, week: i32) {
        self.week_numbers.remove(&week);
    }

    /// Days within a year, negative values counting back from the last day.
    pub fn year_days(&self) -> &BTreeSet<i32> {
        &self.year_days
    }

    pub fn add_year_day(&mut self, day: i32) {
        self.year_days.insert(day);
    }

    pub fn remove_year_day(&mut self, day: i32) {
        self.year_days.remove(&day);
    }

    pub fn frequency(&self) -> Option<Frequency> {
        self.frequency
    }

    pub fn set_frequency(&mut self, frequency: Frequency) {
        self.frequency = Some(frequency);
    }

    /// Sets the frequency from 0 (daily), 1 (weekly), 2 (monthly) or 3 (yearly).
    pub fn set_frequency_number(&mut self, frequency: i64) -> Result<()> {
        self.frequency = Some(Frequency::try_from(frequency)?);
        Ok(())
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Negative intervals are taken as positive and zero as one.
    pub fn set_interval(&mut self, interval: i64) {
        self.interval = u32::try_from(interval.unsigned_abs())
            .unwrap_or(u32::MAX)
            .max(1);
    }

    pub fn until(&self) -> Option<NaiveDate> {
        self.until
    }

    pub fn set_until(&mut self, until: NaiveDate) {
        self.until = Some(until);
    }

    pub fn clear_until(&mut self) {
        self.until = None;
    }

    /// First possible occurrence, and the anchor `interval` counts periods from.
    pub fn dtstart(&self) -> Option<NaiveDate> {
        self.dtstart
    }

    pub fn set_dtstart(&mut self, dtstart: NaiveDate) {
        self.dtstart = Some(dtstart);
    }

    pub fn clear_dtstart(&mut self) {
        self.dtstart = None;
    }

    pub fn week_start_day(&self) -> Weekday {
        self.week_start
    }

    pub fn set_week_start_day(&mut self, day: Weekday) {
        self.week_start = day;
    }

    /// Sets the week start from 0 (sunday) through 6 (saturday).
    pub fn set_week_start_number(&mut self, day: i64) -> Result<()> {
        self.week_start = weekday_from_number(day)?;
        Ok(())
    }
}

fn weekday_from_monday(index: u32) -> Weekday {
    match index {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}
