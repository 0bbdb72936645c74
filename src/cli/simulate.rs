use std::path::PathBuf;

use clap::Parser;

use crate::{
    cli::{dataset::DatasetArgs, daylight::DaylightArgs, noise::NoiseArgs, storage::StorageArgs},
    core::{
        inputs::HourlyInputs,
        system::{SystemContext, SystemKind, simulate as run},
    },
    dataset::{Dataset, Report},
    prelude::*,
    tables::{build_records_table, build_summary_table},
};

#[derive(Parser)]
pub struct SimulateArgs {
    #[clap(flatten)]
    pub dataset: DatasetArgs,

    #[clap(long = "system", value_enum, env = "SYSTEM", default_value = "planned")]
    pub system: SystemKind,

    /// Write the settled hours into this TOML file.
    #[clap(long = "report")]
    pub report: Option<PathBuf>,

    #[clap(flatten)]
    pub storage: StorageArgs,

    #[clap(flatten)]
    pub daylight: DaylightArgs,

    #[clap(flatten)]
    pub noise: NoiseArgs,
}

#[instrument(skip_all, fields(system = %args.system))]
pub fn simulate(args: &SimulateArgs) -> Result {
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

    let mut system = context.build(args.system);
    let (records, summary) = run(args.system, system.as_mut(), &hours)?;
    println!("{}", build_records_table(&records));
    println!("{}", build_summary_table(&[summary]));

    if let Some(path) = &args.report {
        Report { records }.write_to(path)?;
    }
    Ok(())
}
