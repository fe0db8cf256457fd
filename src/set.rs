use crate::{Result, Rule};
use chrono::{Datelike, NaiveDate};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Union of several rules
#[derive(Default)]
pub struct Set {
    rules: Vec<Rule>,
}

impl Set {
    pub fn new() -> Self {
        Set::default()
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn contains<D: Datelike>(&self, date: &D) -> bool {
        self.rules.iter().any(|rule| rule.contains(date))
    }

    /// Occurrences of any rule within `[start, end)`, in order and without repeats.
    pub fn occurrences(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Iterator<Item = NaiveDate> + '_ {
        self.merge_recurrences(move |rule| rule.occurrences(start, end))
    }

    /// Like [`Rule::get_occurrences`]; every rule falls back to its own `until`.
    pub fn get_occurrences(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<NaiveDate>> {
        let per_rule = self
            .rules
            .iter()
            .map(|rule| rule.get_occurrences(start, end))
            .collect::<Result<Vec<_>>>()?;

        let mut dates: Vec<_> = per_rule.into_iter().flatten().collect();
        dates.sort_unstable();
        dates.dedup();

        tracing::debug!(rules = self.rules.len(), count = dates.len(), "merged occurrences");
        Ok(dates)
    }

    /// K-way merge keyed by each stream's next date and its index in `rules`.
    fn merge_recurrences<'a, F: Iterator<Item = NaiveDate> + 'a>(
        &'a self,
        dates: impl Fn(&'a Rule) -> F,
    ) -> impl Iterator<Item = NaiveDate> + 'a {
        let mut streams: Vec<F> = self.rules.iter().map(dates).collect();
        let mut pending: BinaryHeap<Reverse<(NaiveDate, usize)>> = streams
            .iter_mut()
            .enumerate()
            .filter_map(|(index, stream)| stream.next().map(|date| Reverse((date, index))))
            .collect();
        let mut last = None;

        std::iter::from_fn(move || {
            while let Some(Reverse((date, index))) = pending.pop() {
                if let Some(next) = streams[index].next() {
                    pending.push(Reverse((next, index)));
                }

                if last != Some(date) {
                    last = Some(date);
                    return Some(date);
                }
            }

            None
        })
    }
}
