use std::collections::BTreeMap;

use crate::foundation::core::Period;

/// Period-keyed tally. Every increment lands on the concrete year and the all-time bucket in
/// one call, so the all-time entry always equals the sum of the year entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PeriodCounter(BTreeMap<Period, u64>);

impl PeriodCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bump(&mut self, year: i32) {
        self.add(year, 1);
    }

    pub fn add(&mut self, year: i32, n: u64) {
        if n == 0 {
            return;
        }
        *self.0.entry(Period::Year(year)).or_insert(0) += n;
        *self.0.entry(Period::AllTime).or_insert(0) += n;
    }

    pub fn get(&self, period: Period) -> u64 {
        self.0.get(&period).copied().unwrap_or(0)
    }

    /// Concrete years that were ever incremented, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.keys().filter_map(|p| p.year())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Period, u64)> + '_ {
        self.0.iter().map(|(p, n)| (*p, *n))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stats/counter.rs"]
mod tests;
