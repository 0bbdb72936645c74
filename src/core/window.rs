use std::fmt::{Display, Formatter};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use comfy_table::Color;

use crate::prelude::*;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum WindowKind {
    /// From sunrise till sunset.
    Day,

    /// From sunset till the next sunrise.
    Night,
}

impl Display for WindowKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Day => write!(f, "Day"),
            Self::Night => write!(f, "Night"),
        }
    }
}

impl WindowKind {
    pub const fn color(self) -> Color {
        match self {
            Self::Day => Color::DarkYellow,
            Self::Night => Color::Blue,
        }
    }
}

/// Sunrise and sunset hours of a single date.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SunHours {
    pub sunrise: u32,
    pub sunset: u32,
}

/// Source of sunrise and sunset hours.
pub trait Daylight {
    fn sun_hours(&self, date: NaiveDate) -> SunHours;
}

/// The same hours every day.
#[derive(Copy, Clone, Debug)]
pub struct FixedDaylight(pub SunHours);

impl FixedDaylight {
    pub fn try_new(sunrise: u32, sunset: u32) -> Result<Self> {
        ensure!(sunrise < sunset, "sunrise hour ({sunrise}) must be before sunset hour ({sunset})");
        ensure!(sunset < 24, "sunset hour ({sunset}) must be within a day");
        Ok(Self(SunHours { sunrise, sunset }))
    }
}

impl Daylight for FixedDaylight {
    fn sun_hours(&self, _date: NaiveDate) -> SunHours {
        self.0
    }
}

/// Contiguous span of hours governed by a single strategy.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Window {
    pub kind: WindowKind,

    /// Inclusive.
    pub start: NaiveDateTime,

    /// Inclusive.
    pub end: NaiveDateTime,
}

impl Window {
    /// Window from the given hour till the next day/night transition.
    pub fn containing(start: NaiveDateTime, daylight: &dyn Daylight) -> Result<Self> {
        let date = start.date();
        let SunHours { sunrise, sunset } = daylight.sun_hours(date);
        let (kind, end) = if start.hour() >= sunset {
            let next_date = date.succ_opt().context("the date is out of range")?;
            (WindowKind::Night, at_hour(next_date, daylight.sun_hours(next_date).sunrise)?)
        } else if start.hour() >= sunrise {
            (WindowKind::Day, at_hour(date, sunset)?)
        } else {
            (WindowKind::Night, at_hour(date, sunrise)?)
        };
        Ok(Self { kind, start, end })
    }

    pub fn contains(self, time: NaiveDateTime) -> bool {
        (self.start..=self.end).contains(&time)
    }
}

fn at_hour(date: NaiveDate, hour: u32) -> Result<NaiveDateTime> {
    let time = NaiveTime::from_hms_opt(hour, 0, 0).with_context(|| format!("invalid hour: {hour}"))?;
    Ok(date.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daylight() -> FixedDaylight {
        FixedDaylight::try_new(7, 19).unwrap()
    }

    fn time(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 10, day).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    #[test]
    fn test_day_window_ends_at_sunset() {
        let window = Window::containing(time(24, 7), &daylight()).unwrap();
        assert_eq!(window, Window { kind: WindowKind::Day, start: time(24, 7), end: time(24, 19) });

        let window = Window::containing(time(24, 18), &daylight()).unwrap();
        assert_eq!(window.kind, WindowKind::Day);
        assert_eq!(window.end, time(24, 19));
    }

    #[test]
    fn test_evening_window_ends_at_next_sunrise() {
        let window = Window::containing(time(24, 19), &daylight()).unwrap();
        assert_eq!(
            window,
            Window { kind: WindowKind::Night, start: time(24, 19), end: time(25, 7) },
        );
    }

    #[test]
    fn test_early_morning_window_ends_at_sunrise() {
        let window = Window::containing(time(24, 2), &daylight()).unwrap();
        assert_eq!(window, Window { kind: WindowKind::Night, start: time(24, 2), end: time(24, 7) });
    }

    #[test]
    fn test_window_crosses_month_end() {
        let window = Window::containing(time(31, 23), &daylight()).unwrap();
        assert_eq!(window.end, NaiveDate::from_ymd_opt(2023, 11, 1).unwrap().and_hms_opt(7, 0, 0).unwrap());
    }

    #[test]
    fn test_ends_are_inclusive() {
        let window = Window::containing(time(24, 17), &daylight()).unwrap();
        assert!(window.contains(time(24, 17)));
        assert!(window.contains(time(24, 19)));
        assert!(!window.contains(time(24, 20)));
    }

    #[test]
    fn test_invalid_daylight() {
        assert!(FixedDaylight::try_new(19, 7).is_err());
        assert!(FixedDaylight::try_new(7, 24).is_err());
    }
}
