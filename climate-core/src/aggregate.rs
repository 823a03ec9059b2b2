use crate::model::{DailyClimateRecord, SummaryStatistics};

/// Divisor for averages over `len` items; an empty set divides by one.
pub(crate) fn safe_divisor(len: usize) -> f64 {
    len.max(1) as f64
}

/// Summary statistics over `records`. Absent humidity counts as 0.
///
/// An empty slice yields all zeros.
pub fn summarize(records: &[DailyClimateRecord]) -> SummaryStatistics {
    let divisor = safe_divisor(records.len());

    let mean_sum: f64 = records.iter().map(|r| r.temperature.mean).sum();
    let humidity_sum: f64 = records.iter().map(|r| r.humidity.unwrap_or(0.0)).sum();
    let total_precipitation: f64 = records.iter().map(|r| r.precipitation.amount).sum();

    let max_temperature = records
        .iter()
        .map(|r| r.temperature.max)
        .reduce(f64::max)
        .unwrap_or(0.0);
    let min_temperature = records
        .iter()
        .map(|r| r.temperature.min)
        .reduce(f64::min)
        .unwrap_or(0.0);

    SummaryStatistics {
        avg_temperature: mean_sum / divisor,
        max_temperature,
        min_temperature,
        total_precipitation,
        avg_humidity: humidity_sum / divisor,
        data_points: records.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Precipitation, PrecipitationUnit, Temperature, TemperatureUnit};

    fn day(mean: f64, max: f64, min: f64, rain: f64, humidity: Option<f64>) -> DailyClimateRecord {
        DailyClimateRecord {
            location: "X".into(),
            date: "2024-01-01".into(),
            temperature: Temperature { mean, max, min, unit: TemperatureUnit::Celsius },
            precipitation: Precipitation { amount: rain, unit: PrecipitationUnit::Mm },
            humidity,
            wind_speed: None,
            pressure: None,
        }
    }

    #[test]
    fn empty_input_is_all_zero() {
        let s = summarize(&[]);
        assert_eq!(s, SummaryStatistics::default());
        assert!(!s.avg_temperature.is_nan());
        assert!(!s.avg_humidity.is_nan());
    }

    #[test]
    fn computes_linear_reductions() {
        let records = [
            day(10.0, 15.0, 5.0, 0.0, Some(60.0)),
            day(40.0, 45.0, 35.0, 30.0, Some(90.0)),
        ];

        let s = summarize(&records);
        assert_eq!(s.avg_temperature, 25.0);
        assert_eq!(s.max_temperature, 45.0);
        assert_eq!(s.min_temperature, 5.0);
        assert_eq!(s.total_precipitation, 30.0);
        assert_eq!(s.avg_humidity, 75.0);
        assert_eq!(s.data_points, 2);
    }

    #[test]
    fn absent_humidity_counts_as_zero() {
        let records = [day(0.0, 0.0, 0.0, 0.0, Some(80.0)), day(0.0, 0.0, 0.0, 0.0, None)];
        assert_eq!(summarize(&records).avg_humidity, 40.0);
    }

    #[test]
    fn extrema_handle_all_negative_temperatures() {
        let records = [day(-10.0, -4.0, -20.0, 0.0, None), day(-8.0, -2.0, -15.0, 0.0, None)];
        let s = summarize(&records);
        assert_eq!(s.max_temperature, -2.0);
        assert_eq!(s.min_temperature, -20.0);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let records = [day(1.5, 3.0, 0.1, 2.2, Some(33.3)), day(7.25, 9.0, 4.0, 0.4, None)];
        assert_eq!(summarize(&records), summarize(&records));
    }
}
