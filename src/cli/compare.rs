use clap::Parser;
use enumset::EnumSet;
use itertools::Itertools;

use crate::{
    cli::{dataset::DatasetArgs, daylight::DaylightArgs, noise::NoiseArgs, storage::StorageArgs},
    core::{
        inputs::HourlyInputs,
        system::{SystemContext, SystemKind, simulate},
    },
    dataset::Dataset,
    prelude::*,
    tables::build_summary_table,
};

#[derive(Parser)]
pub struct CompareArgs {
    #[clap(flatten)]
    pub dataset: DatasetArgs,

    #[clap(
        long = "systems",
        env = "SYSTEMS",
        value_delimiter = ',',
        num_args = 1..,
        default_value = "bare,solar,greedy,threshold,planned",
    )]
    pub systems: Vec<SystemKind>,

    #[clap(flatten)]
    pub storage: StorageArgs,

    #[clap(flatten)]
    pub daylight: DaylightArgs,

    #[clap(flatten)]
    pub noise: NoiseArgs,
}

impl CompareArgs {
    #[must_use]
    pub fn systems(&self) -> EnumSet<SystemKind> {
        self.systems.iter().copied().collect()
    }
}

#[instrument(skip_all)]
pub fn compare(args: &CompareArgs) -> Result {
    let dataset = Dataset::read_from(&args.dataset.path)?;
    let (prices, consumption, production) =
        (dataset.prices(), dataset.consumption(), dataset.production());
    let hours = args.dataset.hours(&prices)?;
    let daylight = args.daylight.daylight()?;
    let context = SystemContext {
        inputs: HourlyInputs { prices: &prices, consumption: &consumption, production: &production },
        daylight: &daylight,
        device: args.storage.device()?,
        noise: args.noise.noise()?,
    };

    let summaries = args
        .systems()
        .into_iter()
        .map(|kind| {
            let mut system = context.build(kind);
            simulate(kind, system.as_mut(), &hours).map(|(_, summary)| summary)
        })
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .sorted_by_key(|summary| summary.total_cost)
        .collect_vec();
    if let Some(best) = summaries.first() {
        info!(best = %best.kind, total_cost = %best.total_cost, "compared");
    }
    println!("{}", build_summary_table(&summaries));
    Ok(())
}
