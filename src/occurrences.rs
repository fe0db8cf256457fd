use crate::{positional::Gregorian, Error, PositionalDayResolver, Result, Rule};
use chrono::NaiveDate;

/// Lazily walks `[cursor, end)` one day at a time, yielding the dates the
/// rule contains.
pub struct Occurrences<'a, R = Gregorian> {
    rule: &'a Rule,
    resolver: R,
    cursor: Option<NaiveDate>,
    end: NaiveDate,
}

impl<'a, R: PositionalDayResolver> Iterator for Occurrences<'a, R> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        while let Some(date) = self.cursor {
            if date >= self.end {
                self.cursor = None;
                break;
            }

            self.cursor = date.succ_opt();

            if self.rule.rejected_by(&self.resolver, date).is_none() {
                return Some(date);
            }
        }

        None
    }
}

impl Rule {
    /// Occurrences on or after `start` and strictly before `end`. The walk
    /// never leaves `[dtstart, until]`.
    pub fn occurrences(&self, start: NaiveDate, end: NaiveDate) -> Occurrences<'_> {
        self.occurrences_with(Gregorian, start, end)
    }

    pub fn occurrences_with<R: PositionalDayResolver>(
        &self,
        resolver: R,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Occurrences<'_, R> {
        let start = match self.dtstart {
            Some(dtstart) if dtstart > start => dtstart,
            _ => start,
        };

        let end = match self.until.and_then(|until| until.succ_opt()) {
            Some(after_until) if after_until < end => after_until,
            _ => end,
        };

        Occurrences {
            rule: self,
            resolver,
            cursor: Some(start),
            end,
        }
    }

    /// Collects the occurrences of `[start, end)`. Without `end` the rule's
    /// `until` is used, which is then itself excluded.
    pub fn get_occurrences(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<NaiveDate>> {
        let start = start.ok_or_else(|| {
            Error::InvalidArgument("cannot get occurrences without a start date".into())
        })?;

        let end = end.or(self.until).ok_or_else(|| {
            Error::InvalidArgument(
                "cannot get occurrences on an infinite recurrence without using an end constraint"
                    .into(),
            )
        })?;

        tracing::debug!(%start, %end, "enumerating occurrences");
        let dates: Vec<_> = self.occurrences(start, end).collect();
        tracing::debug!(%start, %end, count = dates.len(), "enumerated occurrences");

        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Frequency, Options};
    use chrono::Weekday;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test_log::test]
    fn end_is_excluded() {
        let rule = Rule::default();
        let dates = rule
            .get_occurrences(Some(ymd(2024, 1, 1)), Some(ymd(2024, 1, 8)))
            .unwrap();

        let expected: Vec<_> = (1..=7).map(|d| ymd(2024, 1, d)).collect();
        assert_eq!(dates, expected);
    }

    #[test_log::test]
    fn falls_back_to_until() {
        let mut rule = Rule::default();
        rule.set_until(ymd(2024, 1, 4));

        let dates = rule.get_occurrences(Some(ymd(2024, 1, 1)), None).unwrap();
        assert_eq!(dates, vec![ymd(2024, 1, 1), ymd(2024, 1, 2), ymd(2024, 1, 3)]);
    }

    #[test_log::test]
    fn until_cuts_a_later_end() {
        let mut rule = Rule::default();
        rule.set_until(ymd(2024, 1, 3));

        let dates = rule
            .get_occurrences(Some(ymd(2024, 1, 1)), Some(ymd(2024, 2, 1)))
            .unwrap();
        assert_eq!(dates, vec![ymd(2024, 1, 1), ymd(2024, 1, 2), ymd(2024, 1, 3)]);
    }

    #[test_log::test]
    fn walk_stops_at_until() {
        let mut rule = Rule::default();
        rule.set_until(ymd(2024, 1, 3));

        let dates = rule.occurrences(ymd(2024, 1, 1), NaiveDate::MAX);
        assert_eq!(dates.end, ymd(2024, 1, 4));
        assert_eq!(dates.count(), 3);

        // an until on the last representable date keeps the requested end
        rule.set_until(NaiveDate::MAX);
        assert_eq!(rule.occurrences(ymd(2024, 1, 1), ymd(2024, 2, 1)).end, ymd(2024, 2, 1));
    }

    #[test_log::test]
    fn walk_starts_at_dtstart() {
        let rule = Rule::new(Options {
            dtstart: Some(ymd(2024, 6, 1)),
            until: Some(ymd(2024, 6, 2)),
            ..Options::default()
        });

        let dates = rule.occurrences(NaiveDate::MIN, NaiveDate::MAX);
        assert_eq!(dates.cursor, Some(ymd(2024, 6, 1)));
        assert_eq!(dates.collect::<Vec<_>>(), vec![ymd(2024, 6, 1), ymd(2024, 6, 2)]);
    }

    #[test_log::test]
    fn unbounded_without_end() {
        let rule = Rule::default();
        assert!(matches!(
            rule.get_occurrences(Some(ymd(2024, 1, 1)), None),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test_log::test]
    fn start_is_required() {
        let rule = Rule::default();
        assert!(matches!(
            rule.get_occurrences(None, Some(ymd(2024, 1, 1))),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test_log::test]
    fn empty_or_reversed_range() {
        let rule = Rule::default();

        assert_eq!(
            rule.get_occurrences(Some(ymd(2024, 1, 1)), Some(ymd(2024, 1, 1))),
            Ok(vec![])
        );
        assert_eq!(
            rule.get_occurrences(Some(ymd(2024, 2, 1)), Some(ymd(2024, 1, 1))),
            Ok(vec![])
        );
    }

    #[test_log::test]
    fn last_day_of_leap_february() {
        let mut rule = Rule::default();
        rule.add_month_day(-1).unwrap();

        let dates = rule
            .get_occurrences(Some(ymd(2024, 2, 1)), Some(ymd(2024, 3, 1)))
            .unwrap();

        assert_eq!(dates, vec![ymd(2024, 2, 29)]);
    }

    #[test_log::test]
    fn second_monday_through_a_year() {
        let mut rule = Rule::new(Options {
            frequency: Some(Frequency::Monthly),
            ..Options::default()
        });
        rule.add_weekday(Weekday::Mon);
        rule.add_day_frequency(2).unwrap();

        let dates = rule
            .get_occurrences(Some(ymd(2024, 1, 1)), Some(ymd(2025, 1, 1)))
            .unwrap();

        assert_eq!(dates.len(), 12);
        assert_eq!(dates[0], ymd(2024, 1, 8));
        assert_eq!(dates[11], ymd(2024, 12, 9));
    }

    #[test_log::test]
    fn every_other_week() {
        let mut rule = Rule::new(Options {
            frequency: Some(Frequency::Weekly),
            interval: Some(2),
            dtstart: Some(ymd(2024, 1, 1)),
            ..Options::default()
        });
        rule.add_weekday(Weekday::Fri);

        let dates = rule
            .get_occurrences(Some(ymd(2023, 12, 1)), Some(ymd(2024, 2, 1)))
            .unwrap();

        // nothing before dtstart, then fridays of every second week
        assert_eq!(dates, vec![ymd(2024, 1, 5), ymd(2024, 1, 19)]);
    }

    #[test_log::test]
    fn lazily_stops_early() {
        let mut rule = Rule::default();
        rule.add_day(1);

        let first_two: Vec<_> = rule
            .occurrences(ymd(2024, 1, 1), NaiveDate::MAX)
            .take(2)
            .collect();

        assert_eq!(first_two, vec![ymd(2024, 1, 1), ymd(2024, 2, 1)]);
    }

    #[test_log::test]
    fn runs_to_the_last_representable_date() {
        let rule = Rule::default();
        let start = NaiveDate::MAX.pred_opt().unwrap();

        let dates: Vec<_> = rule.occurrences(start, NaiveDate::MAX).collect();
        assert_eq!(dates, vec![start]);
    }
}
