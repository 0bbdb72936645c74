use std::collections::BTreeMap;

use chrono::NaiveDateTime;

pub type Point<K, V> = (K, V);
pub type Series<K, V> = Vec<Point<K, V>>;

/// Hour-keyed source of a single quantity.
pub trait HourlyLookup<V> {
    fn at(&self, time: NaiveDateTime) -> Option<V>;

    /// Present points between the timestamps, both ends included, ordered by time.
    fn between(&self, start: NaiveDateTime, end: NaiveDateTime) -> Series<NaiveDateTime, V>;
}

#[derive(Clone, Debug, Default)]
pub struct HourlySeries<V>(BTreeMap<NaiveDateTime, V>);

impl<V: Copy> HourlyLookup<V> for HourlySeries<V> {
    fn at(&self, time: NaiveDateTime) -> Option<V> {
        self.0.get(&time).copied()
    }

    fn between(&self, start: NaiveDateTime, end: NaiveDateTime) -> Series<NaiveDateTime, V> {
        if start > end {
            return Vec::new();
        }
        self.0.range(start..=end).map(|(time, value)| (*time, *value)).collect()
    }
}

impl<V> FromIterator<Point<NaiveDateTime, V>> for HourlySeries<V> {
    fn from_iter<T: IntoIterator<Item = Point<NaiveDateTime, V>>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<V> HourlySeries<V> {
    pub fn times(&self) -> impl Iterator<Item = NaiveDateTime> {
        self.0.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn time(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 10, 24).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    #[test]
    fn test_between_skips_missing_hours() {
        let series: HourlySeries<f64> =
            [(time(1), 1.0), (time(2), 2.0), (time(4), 4.0), (time(5), 5.0)].into_iter().collect();
        assert_eq!(series.between(time(2), time(4)), vec![(time(2), 2.0), (time(4), 4.0)]);
        assert_eq!(series.between(time(4), time(2)), vec![]);
        assert_eq!(series.at(time(3)), None);
        assert_eq!(series.at(time(5)), Some(5.0));
        assert_eq!(series.times().collect::<Vec<_>>(), vec![time(1), time(2), time(4), time(5)]);
    }
}
