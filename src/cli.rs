mod compare;
mod dataset;
mod daylight;
mod noise;
mod plan;
mod simulate;
mod storage;

use clap::{Parser, Subcommand};

pub use self::{compare::compare, plan::plan, simulate::simulate};
use crate::cli::{compare::CompareArgs, plan::PlanArgs, simulate::SimulateArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Plan a single window from the given prices and balances.
    #[clap(name = "plan")]
    Plan(Box<PlanArgs>),

    /// Settle the dataset hour by hour with one of the systems.
    #[clap(name = "simulate")]
    Simulate(Box<SimulateArgs>),

    /// Run several systems over the same hours and compare the totals.
    #[clap(name = "compare")]
    Compare(Box<CompareArgs>),
}
