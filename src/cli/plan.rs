use clap::Parser;

use crate::{
    cli::storage::StorageBoundsArgs,
    core::{
        strategy::{Planner, Strategy},
        window::WindowKind,
    },
    prelude::*,
    quantity::{energy::KilowattHours, rate::KilowattHourRate},
    tables::build_plan_table,
};

#[derive(Parser)]
pub struct PlanArgs {
    #[clap(long = "window", value_enum)]
    pub window: WindowKind,

    /// Storage level at the window start.
    #[clap(long = "start-level")]
    pub start_level: KilowattHours,

    /// Comma-separated hourly prices.
    #[clap(long = "prices", value_delimiter = ',', num_args = 1.., allow_negative_numbers = true)]
    pub prices: Vec<KilowattHourRate>,

    /// Comma-separated hourly forecast balances: positive for surplus, negative for deficit.
    #[clap(long = "balances", value_delimiter = ',', num_args = 1.., allow_negative_numbers = true)]
    pub balances: Vec<KilowattHours>,

    #[clap(flatten)]
    pub bounds: StorageBoundsArgs,
}

#[instrument(skip_all, fields(window = %args.window))]
pub fn plan(args: &PlanArgs) -> Result {
    let bounds = args.bounds.bounds()?;
    ensure!(
        bounds.contains(args.start_level),
        "start level {} is outside of [{}, {}]",
        args.start_level,
        bounds.floor,
        bounds.capacity,
    );
    let plan = Strategy::new(args.window, bounds).get_plan(
        args.start_level,
        &args.prices,
        &args.balances,
    )?;
    let levels = bounds.forecast_levels(args.start_level, &plan);
    println!("{}", build_plan_table(args.window, &args.prices, &args.balances, &plan, &levels));
    info!(final_level = %levels.last().copied().unwrap_or(args.start_level), "planned");
    Ok(())
}
