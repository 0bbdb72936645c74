use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::Parser;
use itertools::Itertools;

use crate::{core::series::HourlySeries, prelude::*};

#[must_use]
#[derive(Parser)]
pub struct DatasetArgs {
    /// TOML file with the hourly `[[samples]]`.
    #[clap(long = "dataset", env = "DATASET_PATH")]
    pub path: PathBuf,

    /// First hour to settle, for example `2023-10-24T07:00:00`.
    #[clap(long = "since")]
    pub since: Option<NaiveDateTime>,

    /// Maximum number of hours to settle.
    #[clap(long = "hours")]
    pub n_hours: Option<usize>,
}

impl DatasetArgs {
    /// Hours to settle, picked from the priced hours of the dataset.
    pub fn hours<V>(&self, prices: &HourlySeries<V>) -> Result<Vec<NaiveDateTime>> {
        let hours = prices
            .times()
            .skip_while(|time| self.since.is_some_and(|since| *time < since))
            .take(self.n_hours.unwrap_or(usize::MAX))
            .collect_vec();
        ensure!(!hours.is_empty(), "nothing to settle in `{}`", self.path.display());
        info!(first = %hours[0], n_hours = hours.len(), "selected the hours");
        Ok(hours)
    }
}
