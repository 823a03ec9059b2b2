//! Hazard exceedance probabilities.
//!
//! Each hazard counts the days whose metric crosses a fixed threshold and
//! reports that as a rounded percentage of all days. Hazards overlap freely.

use crate::{
    aggregate::safe_divisor,
    model::{DailyClimateRecord, HazardProbabilities},
    sanitize::{Bounds, clamp_number},
};

/// Mean temperature above this (°C) is extreme heat.
pub const EXTREME_HEAT_C: f64 = 32.0;
/// Mean temperature strictly below this (°C) is extreme cold.
pub const EXTREME_COLD_C: f64 = 0.0;
/// Daily precipitation above this (mm) is heavy rain.
pub const HEAVY_RAIN_MM: f64 = 25.0;
/// Compared against the raw wind field, no unit conversion.
pub const HIGH_WIND: f64 = 40.0;
/// Relative humidity above this (%) is uncomfortable.
pub const UNCOMFORTABLE_HUMIDITY_PCT: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hazard {
    ExtremeHeat,
    ExtremeCold,
    HeavyRain,
    HighWind,
    Uncomfortable,
}

impl Hazard {
    pub const fn all() -> &'static [Hazard] {
        &[
            Hazard::ExtremeHeat,
            Hazard::ExtremeCold,
            Hazard::HeavyRain,
            Hazard::HighWind,
            Hazard::Uncomfortable,
        ]
    }

    pub fn threshold(&self) -> f64 {
        match self {
            Hazard::ExtremeHeat => EXTREME_HEAT_C,
            Hazard::ExtremeCold => EXTREME_COLD_C,
            Hazard::HeavyRain => HEAVY_RAIN_MM,
            Hazard::HighWind => HIGH_WIND,
            Hazard::Uncomfortable => UNCOMFORTABLE_HUMIDITY_PCT,
        }
    }

    /// The day's metric for this hazard, clamped to its physical range.
    fn metric(&self, record: &DailyClimateRecord) -> f64 {
        match self {
            Hazard::ExtremeHeat | Hazard::ExtremeCold => {
                clamp_number(record.temperature.mean, 0.0, Bounds::TEMPERATURE_C)
            }
            Hazard::HeavyRain => {
                clamp_number(record.precipitation.amount, 0.0, Bounds::PRECIPITATION_MM)
            }
            Hazard::HighWind => {
                clamp_number(record.wind_speed.unwrap_or(0.0), 0.0, Bounds::WIND_SPEED)
            }
            Hazard::Uncomfortable => {
                clamp_number(record.humidity.unwrap_or(0.0), 0.0, Bounds::HUMIDITY_PCT)
            }
        }
    }

    /// Cold is "below"; every other hazard is "above".
    pub fn is_triggered(&self, record: &DailyClimateRecord) -> bool {
        let value = self.metric(record);
        match self {
            Hazard::ExtremeCold => value < self.threshold(),
            _ => value > self.threshold(),
        }
    }

    /// Rounded percentage of `records` triggering this hazard.
    pub fn probability(&self, records: &[DailyClimateRecord]) -> u8 {
        let hits = records.iter().filter(|r| self.is_triggered(r)).count();
        let pct = hits as f64 / safe_divisor(records.len()) * 100.0;
        pct.round().clamp(0.0, 100.0) as u8
    }
}

pub fn hazard_probabilities(records: &[DailyClimateRecord]) -> HazardProbabilities {
    HazardProbabilities {
        extreme_heat: Hazard::ExtremeHeat.probability(records),
        extreme_cold: Hazard::ExtremeCold.probability(records),
        heavy_rain: Hazard::HeavyRain.probability(records),
        high_wind: Hazard::HighWind.probability(records),
        uncomfortable: Hazard::Uncomfortable.probability(records),
    }
}
