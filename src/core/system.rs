mod greedy;
mod grid;
mod threshold;

use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;
use comfy_table::Color;

pub use self::{greedy::GreedySystem, grid::GridSystem, threshold::ThresholdSystem};
use crate::{
    core::{
        executor::PlanExecutor,
        inputs::HourlyInputs,
        noise::ForecastNoise,
        record::HourRecord,
        storage::StorageDevice,
        window::Daylight,
    },
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours},
};

/// Household setup settled hour by hour.
pub trait EnergySystem {
    fn step(&mut self, time: NaiveDateTime) -> Result<HourRecord>;

    fn storage_level(&self) -> KilowattHours;
}

#[derive(Debug, clap::ValueEnum, enumset::EnumSetType)]
pub enum SystemKind {
    /// Grid only, no solar panels and no storage.
    Bare,

    /// Solar panels without storage.
    Solar,

    /// Storage absorbs every surplus and covers every deficit right away.
    Greedy,

    /// Storage is used when the price beats the window average.
    Threshold,

    /// Storage follows the day and night plans.
    Planned,
}

impl SystemKind {
    pub const fn color(self) -> Color {
        match self {
            Self::Bare => Color::Reset,
            Self::Solar => Color::DarkYellow,
            Self::Greedy => Color::Cyan,
            Self::Threshold => Color::Blue,
            Self::Planned => Color::Green,
        }
    }
}

impl Display for SystemKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bare => write!(f, "Bare"),
            Self::Solar => write!(f, "Solar"),
            Self::Greedy => write!(f, "Greedy"),
            Self::Threshold => write!(f, "Threshold"),
            Self::Planned => write!(f, "Planned"),
        }
    }
}

/// Everything needed to assemble any of the systems.
#[derive(Clone)]
pub struct SystemContext<'a> {
    pub inputs: HourlyInputs<'a>,
    pub daylight: &'a dyn Daylight,
    pub device: StorageDevice,
    pub noise: Option<ForecastNoise>,
}

impl<'a> SystemContext<'a> {
    pub fn build(&self, kind: SystemKind) -> Box<dyn EnergySystem + 'a> {
        match kind {
            SystemKind::Bare => Box::new(GridSystem::new(self.inputs, false)),
            SystemKind::Solar => Box::new(GridSystem::new(self.inputs, true)),
            SystemKind::Greedy => Box::new(GreedySystem::new(self.inputs, self.device.clone())),
            SystemKind::Threshold => Box::new(ThresholdSystem::new(
                self.inputs,
                self.daylight,
                self.device.clone(),
            )),
            SystemKind::Planned => Box::new(
                PlanExecutor::builder()
                    .inputs(self.inputs)
                    .daylight(self.daylight)
                    .device(self.device.clone())
                    .maybe_noise(self.noise.clone())
                    .build(),
            ),
        }
    }
}

/// Totals of a simulation run.
#[derive(Copy, Clone, Debug)]
pub struct Summary {
    pub kind: SystemKind,
    pub n_hours: usize,
    pub total_cost: Cost,
    pub final_level: KilowattHours,
}

/// Settle the hours one after another.
#[instrument(skip_all, fields(system = %kind, n_hours = hours.len()))]
pub fn simulate(
    kind: SystemKind,
    system: &mut dyn EnergySystem,
    hours: &[NaiveDateTime],
) -> Result<(Vec<HourRecord>, Summary)> {
    let records = hours.iter().map(|time| system.step(*time)).collect::<Result<Vec<_>>>()?;
    let summary = Summary {
        kind,
        n_hours: records.len(),
        total_cost: records.last().map_or(Cost::ZERO, |record| record.cumulative_cost),
        final_level: system.storage_level(),
    };
    info!(total_cost = %summary.total_cost, final_level = %summary.final_level, "simulated");
    Ok((records, summary))
}
