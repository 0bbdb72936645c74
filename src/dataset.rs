//! Hourly prices, consumption and production stored as a TOML file.

use std::{fmt::Debug, fs, path::Path};

use chrono::NaiveDateTime;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    core::{record::HourRecord, series::HourlySeries},
    prelude::*,
    quantity::{energy::KilowattHours, rate::KilowattHourRate},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub time: NaiveDateTime,
    pub price: KilowattHourRate,
    pub consumption: KilowattHours,

    #[serde(default)]
    pub production: KilowattHours,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub samples: Vec<Sample>,
}

impl Dataset {
    #[instrument(skip_all, fields(path = ?path))]
    pub fn read_from<P: AsRef<Path> + Debug>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        let dataset = Self::from_toml(&text)
            .with_context(|| format!("failed to parse `{}`", path.display()))?;
        info!(n_samples = dataset.samples.len(), "loaded the dataset");
        Ok(dataset)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let mut dataset: Self = toml::from_str(text)?;
        dataset.samples.sort_by_key(|sample| sample.time);
        if let Some((sample, _)) =
            dataset.samples.iter().tuple_windows().find(|(lhs, rhs)| lhs.time == rhs.time)
        {
            bail!("duplicate sample at {}", sample.time);
        }
        Ok(dataset)
    }

    pub fn prices(&self) -> HourlySeries<KilowattHourRate> {
        self.samples.iter().map(|sample| (sample.time, sample.price)).collect()
    }

    pub fn consumption(&self) -> HourlySeries<KilowattHours> {
        self.samples.iter().map(|sample| (sample.time, sample.consumption)).collect()
    }

    pub fn production(&self) -> HourlySeries<KilowattHours> {
        self.samples.iter().map(|sample| (sample.time, sample.production)).collect()
    }
}

/// Settled hours of a single simulation run.
#[derive(Debug, Serialize, Deserialize)]
pub struct Report {
    pub records: Vec<HourRecord>,
}

impl Report {
    #[instrument(skip_all, fields(path = ?path, n_records = self.records.len()))]
    pub fn write_to<P: AsRef<Path> + Debug>(&self, path: P) -> Result {
        let path = path.as_ref();
        fs::write(path, toml::to_string(self)?)
            .with_context(|| format!("failed to write `{}`", path.display()))?;
        info!("saved the report");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{core::series::HourlyLookup, quantity::cost::Cost};

    fn time(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 10, 24).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_dataset() {
        let dataset = Dataset::from_toml(
            r#"
            [[samples]]
            time = "2023-10-24T13:00:00"
            price = -12.5
            consumption = 0.4
            production = 2.1

            [[samples]]
            time = "2023-10-24T12:00:00"
            price = 40.53
            consumption = 0.35
            "#,
        )
        .unwrap();

        assert_eq!(dataset.samples.len(), 2);
        assert_eq!(dataset.samples[0].time, time(12));
        assert_eq!(dataset.samples[0].production, KilowattHours::ZERO);

        let prices = dataset.prices();
        assert_eq!(prices.at(time(13)), Some(KilowattHourRate::from(-12.5)));
        assert_eq!(dataset.production().at(time(13)), Some(KilowattHours::from(2.1)));
        assert_eq!(dataset.consumption().at(time(12)), Some(KilowattHours::from(0.35)));
    }

    #[test]
    fn test_empty_dataset() {
        assert!(Dataset::from_toml("").unwrap().samples.is_empty());
    }

    #[test]
    fn test_duplicate_samples() {
        let result = Dataset::from_toml(
            r#"
            [[samples]]
            time = "2023-10-24T12:00:00"
            price = 1.0
            consumption = 0.1

            [[samples]]
            time = "2023-10-24T12:00:00"
            price = 2.0
            consumption = 0.2
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_field() {
        let result = Dataset::from_toml(
            r#"
            [[samples]]
            time = "2023-10-24T12:00:00"
            consumption = 0.1
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_report_round_trip() {
        let report = Report {
            records: vec![HourRecord {
                time: time(12),
                price: KilowattHourRate::from(40.53),
                consumption: KilowattHours::from(0.35),
                production: KilowattHours::from(1.2),
                storage_level: KilowattHours::from(2.85),
                cost: Cost::from(0.43),
                cumulative_cost: Cost::from(10.65),
            }],
        };
        let text = toml::to_string(&report).unwrap();
        assert!(text.contains("[[records]]"));
        let parsed: Report = toml::from_str(&text).unwrap();
        assert_eq!(parsed.records, report.records);
    }
}
