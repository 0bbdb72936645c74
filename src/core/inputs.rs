use chrono::NaiveDateTime;
use itertools::Itertools;

use crate::{
    core::series::HourlyLookup,
    prelude::*,
    quantity::{energy::KilowattHours, rate::KilowattHourRate},
};

/// Everything known about a single hour.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HourlySample {
    pub time: NaiveDateTime,
    pub price: KilowattHourRate,
    pub consumption: KilowattHours,
    pub production: KilowattHours,
}

impl HourlySample {
    /// Net energy of the hour: positive is surplus, negative is deficit.
    pub fn balance(&self) -> KilowattHours {
        (self.production - self.consumption).round_to_hundredths()
    }
}

/// The three external hourly lookups the simulation runs on.
#[derive(Copy, Clone)]
pub struct HourlyInputs<'a> {
    pub prices: &'a dyn HourlyLookup<KilowattHourRate>,
    pub consumption: &'a dyn HourlyLookup<KilowattHours>,
    pub production: &'a dyn HourlyLookup<KilowattHours>,
}

impl HourlyInputs<'_> {
    pub fn sample_at(&self, time: NaiveDateTime) -> Result<HourlySample> {
        Ok(HourlySample {
            time,
            price: self.prices.at(time).with_context(|| format!("no price at {time}"))?,
            consumption: self
                .consumption
                .at(time)
                .with_context(|| format!("no consumption at {time}"))?,
            production: self
                .production
                .at(time)
                .with_context(|| format!("no production at {time}"))?,
        })
    }

    /// Samples of the hours present in all the lookups, both ends included.
    pub fn samples_between(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<HourlySample> {
        let consumption = self.consumption.between(start, end);
        let production = self.production.between(start, end);
        self.prices
            .between(start, end)
            .into_iter()
            .filter_map(|(time, price)| {
                Some(HourlySample {
                    time,
                    price,
                    consumption: lookup(&consumption, time)?,
                    production: lookup(&production, time)?,
                })
            })
            .collect_vec()
    }
}

fn lookup<V: Copy>(series: &[(NaiveDateTime, V)], time: NaiveDateTime) -> Option<V> {
    series.binary_search_by_key(&time, |(time, _)| *time).ok().map(|index| series[index].1)
}
