use bon::Builder;
use chrono::{NaiveDateTime, TimeDelta};
use itertools::Itertools;

use crate::{
    core::{
        inputs::HourlyInputs,
        noise::ForecastNoise,
        plan::DispatchPlan,
        record::HourRecord,
        settlement::settle,
        storage::StorageDevice,
        strategy::{Planner, Strategy},
        system::EnergySystem,
        window::{Daylight, Window},
    },
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours},
};

/// Plans every window as it begins and settles the hours against the plan.
#[derive(Builder)]
pub struct PlanExecutor<'a> {
    device: StorageDevice,
    daylight: &'a dyn Daylight,
    inputs: HourlyInputs<'a>,

    /// Perturbs the balances the plans are built from.
    noise: Option<ForecastNoise>,

    #[builder(skip)]
    plan: Option<DispatchPlan>,

    #[builder(skip)]
    total_cost: Cost,

    #[builder(skip)]
    n_plans_built: usize,
}

impl PlanExecutor<'_> {
    #[cfg(test)]
    pub const fn plan(&self) -> Option<&DispatchPlan> {
        self.plan.as_ref()
    }

    #[cfg(test)]
    pub const fn n_plans_built(&self) -> usize {
        self.n_plans_built
    }

    #[instrument(skip_all, fields(time = %time))]
    fn build_plan(&mut self, time: NaiveDateTime) -> Result<DispatchPlan> {
        let window = Window::containing(time, self.daylight)?;
        let samples = self.inputs.samples_between(window.start, window.end);
        ensure!(!samples.is_empty(), "no samples to plan the window starting at {time}");

        let prices = samples.iter().map(|sample| sample.price).collect_vec();
        let balances = samples
            .iter()
            .map(|sample| match &mut self.noise {
                Some(noise) => noise.perturb(sample.balance()),
                None => sample.balance(),
            })
            .collect_vec();
        let strategy = Strategy::new(window.kind, self.device.bounds());
        let planned = strategy.get_plan(self.device.level(), &prices, &balances)?;
        let plan =
            DispatchPlan::new(strategy.kind(), samples.iter().map(|sample| sample.time).zip(planned));

        self.n_plans_built += 1;
        info!(
            kind = %plan.kind(),
            start = %window.start,
            end = %window.end,
            n_hours = plan.n_hours(),
            level = %self.device.level(),
            n_plans_built = self.n_plans_built,
            "built a plan",
        );
        Ok(plan)
    }
}

impl EnergySystem for PlanExecutor<'_> {
    fn step(&mut self, time: NaiveDateTime) -> Result<HourRecord> {
        let sample = self.inputs.sample_at(time)?;
        let plan = match self.plan.take() {
            Some(plan) if plan.contains(time) => plan,
            _ => self.build_plan(time)?,
        };
        let planned = plan.get(time).with_context(|| format!("the plan does not cover {time}"))?;

        let settlement = settle(&mut self.device, plan.kind(), sample.price, planned, sample.balance())
            .with_context(|| format!("failed to settle {time}"))?;
        self.total_cost += settlement.cost;
        debug!(
            %time,
            price = %settlement.price,
            planned = %settlement.planned,
            realized = %settlement.realized,
            grid_import = %settlement.flow.grid_import,
            cost = %settlement.cost,
            level = %settlement.level,
            "settled",
        );

        // Dropped right after its last hour, so that the next window gets a fresh plan.
        if plan.contains(time + TimeDelta::hours(1)) {
            self.plan = Some(plan);
        }

        Ok(HourRecord::new(sample, settlement.level, settlement.cost, self.total_cost))
    }

    fn storage_level(&self) -> KilowattHours {
        self.device.level()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        core::{
            series::HourlySeries,
            window::{FixedDaylight, WindowKind},
        },
        quantity::rate::KilowattHourRate,
    };

    struct Fixture {
        prices: HourlySeries<KilowattHourRate>,
        consumption: HourlySeries<KilowattHours>,
        production: HourlySeries<KilowattHours>,
    }

    impl Fixture {
        fn new(start: NaiveDateTime, prices: &[f64], balances: &[f64]) -> Self {
            let times = (0..).map(|hour| start + TimeDelta::hours(hour));
            Self {
                prices: times
                    .clone()
                    .zip(prices.iter().copied().map(KilowattHourRate::from))
                    .collect(),
                consumption: times
                    .clone()
                    .zip(balances.iter().map(|balance| KilowattHours::from((-balance).max(0.0))))
                    .collect(),
                production: times
                    .zip(balances.iter().map(|balance| KilowattHours::from(balance.max(0.0))))
                    .collect(),
            }
        }

        fn inputs(&self) -> HourlyInputs<'_> {
            HourlyInputs {
                prices: &self.prices,
                consumption: &self.consumption,
                production: &self.production,
            }
        }
    }

    fn time(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 10, day).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    fn device() -> StorageDevice {
        StorageDevice::builder()
            .capacity(KilowattHours::from(5.0))
            .floor(KilowattHours::from(0.5))
            .level(KilowattHours::from(2.0))
            .purchase_cost(Cost::from(1000.0))
            .rated_cycles(1000.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_builds_day_plan_for_the_window() {
        let fixture = Fixture::new(
            time(24, 7),
            &[127.69, -129.71, 40.53, 50.14, -150.79, 14.88],
            &[-0.08, -0.89, 0.45, 0.15, 0.18, 1.05],
        );
        let daylight = FixedDaylight::try_new(7, 12).unwrap();
        let mut executor = PlanExecutor::builder()
            .device(device())
            .daylight(&daylight)
            .inputs(fixture.inputs())
            .build();

        let record = executor.step(time(24, 7)).unwrap();
        assert_eq!(record.storage_level, KilowattHours::from(2.0));
        assert_eq!(record.cost, Cost::from(10.22));

        let plan = executor.plan().unwrap();
        assert_eq!(plan.kind(), WindowKind::Day);
        assert_eq!(plan.n_hours(), 6);
        assert_eq!(plan.get(time(24, 8)), Some(KilowattHours::from(3.0)));
        assert_eq!(plan.get(time(24, 10)), Some(KilowattHours::from(-0.18)));

        let record = executor.step(time(24, 8)).unwrap();
        assert_eq!(record.storage_level, KilowattHours::from(5.0));

        executor.step(time(24, 9)).unwrap();
        let record = executor.step(time(24, 10)).unwrap();
        assert_eq!(record.storage_level, KilowattHours::from(4.82));
        let record = executor.step(time(24, 11)).unwrap();
        assert_eq!(record.storage_level, KilowattHours::from(5.0));
    }

    /// One plan per window: rebuilt only once the next hour falls outside of it.
    #[test]
    fn test_plan_is_cached_within_window() {
        let start = time(24, 20);
        let n_hours = 17;
        let fixture = Fixture::new(start, &[100.0; 17], &[-0.1; 17]);
        let daylight = FixedDaylight::try_new(7, 19).unwrap();
        let mut executor = PlanExecutor::builder()
            .device(device())
            .daylight(&daylight)
            .inputs(fixture.inputs())
            .build();

        for hour in 0..n_hours {
            let time = start + TimeDelta::hours(hour);
            executor.step(time).unwrap();
            match time.format("%H").to_string().as_str() {
                "20" => {
                    assert_eq!(executor.n_plans_built(), 1);
                    assert!(executor.plan().is_some());
                }
                "06" => assert!(executor.plan().is_some()),
                "07" => {
                    assert_eq!(executor.n_plans_built(), 1);
                    assert!(executor.plan().is_none());
                }
                "08" => assert_eq!(executor.n_plans_built(), 2),
                _ => {}
            }
        }
        assert_eq!(executor.n_plans_built(), 2);
    }

    #[test]
    fn test_cumulative_cost() {
        let fixture = Fixture::new(
            time(24, 20),
            &[100.0, 120.0, 80.0, 90.0],
            &[-0.8, -0.9, -0.7, -0.6],
        );
        let daylight = FixedDaylight::try_new(7, 19).unwrap();
        let mut executor = PlanExecutor::builder()
            .device(device())
            .daylight(&daylight)
            .inputs(fixture.inputs())
            .build();

        let mut total = Cost::ZERO;
        for hour in 0..4 {
            let record = executor.step(time(24, 20) + TimeDelta::hours(hour)).unwrap();
            total += record.cost;
            assert_eq!(record.cumulative_cost, total);
            assert!(record.storage_level >= KilowattHours::from(0.5));
        }
        assert_eq!(executor.storage_level(), KilowattHours::from(0.5));
    }

    #[test]
    fn test_missing_sample() {
        let fixture = Fixture::new(time(24, 20), &[100.0], &[-0.1]);
        let daylight = FixedDaylight::try_new(7, 19).unwrap();
        let mut executor = PlanExecutor::builder()
            .device(device())
            .daylight(&daylight)
            .inputs(fixture.inputs())
            .build();
        assert!(executor.step(time(24, 21)).is_err());
    }

    #[test]
    fn test_seeded_noise_is_reproducible() {
        let fixture = Fixture::new(
            time(24, 7),
            &[127.69, 129.71, 40.53, 150.79, 14.88, 30.0],
            &[-1.2, -0.4, 3.45, 1.68, -0.05, 0.2],
        );
        let daylight = FixedDaylight::try_new(7, 12).unwrap();
        let run = || {
            let mut executor = PlanExecutor::builder()
                .device(device())
                .daylight(&daylight)
                .inputs(fixture.inputs())
                .noise(ForecastNoise::try_new(0.2, 42).unwrap())
                .build();
            (0..6)
                .map(|hour| executor.step(time(24, 7) + TimeDelta::hours(hour)).unwrap())
                .collect_vec()
        };
        assert_eq!(run(), run());
    }
}
