//! Optional per-date sentiment collaborator.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Supplies a sentiment score for a trading date.
///
/// Scores are attached to the output as-is and never influence
/// classification.
pub trait SentimentSource {
    /// Score for `date`, if the source has one.
    fn score(&self, date: NaiveDate) -> Option<f64>;
}

impl SentimentSource for BTreeMap<NaiveDate, f64> {
    fn score(&self, date: NaiveDate) -> Option<f64> {
        self.get(&date).copied()
    }
}

impl SentimentSource for HashMap<NaiveDate, f64> {
    fn score(&self, date: NaiveDate) -> Option<f64> {
        self.get(&date).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_sources() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let mut map = BTreeMap::new();
        map.insert(day, 0.4);
        assert_eq!(map.score(day), Some(0.4));
        assert_eq!(map.score(day.succ_opt().unwrap()), None);

        let hashed: HashMap<NaiveDate, f64> = map.into_iter().collect();
        assert_eq!(hashed.score(day), Some(0.4));
    }
}
