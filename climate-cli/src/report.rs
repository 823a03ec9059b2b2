use std::fmt::Write;

use climate_core::{
    ClimateAnalysisResult, DateRange,
    probability::{EXTREME_COLD_C, EXTREME_HEAT_C, HEAVY_RAIN_MM, HIGH_WIND, UNCOMFORTABLE_HUMIDITY_PCT},
};

/// m/s to km/h, display only.
const MPS_TO_KMH: f64 = 3.6;

/// Plain-text report of an analysis, ready to print.
pub fn render(result: &ClimateAnalysisResult, range: &DateRange) -> String {
    let mut out = String::new();
    let loc = &result.location;
    let s = &result.summary;
    let p = &result.probabilities;

    let place = match &loc.country {
        Some(country) => format!("{}, {}", loc.name, country),
        None => loc.name.clone(),
    };

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{place} ({:.4}, {:.4})", loc.latitude, loc.longitude);
    let _ = writeln!(out, "Period: {range} ({} days)", s.data_points);
    let _ = writeln!(out);

    let _ = writeln!(out, "Summary");
    let _ = writeln!(out, "  Average temperature:  {:>8.1} °C", s.avg_temperature);
    let _ = writeln!(out, "  Highest temperature:  {:>8.1} °C", s.max_temperature);
    let _ = writeln!(out, "  Lowest temperature:   {:>8.1} °C", s.min_temperature);
    let _ = writeln!(out, "  Total precipitation:  {:>8.1} mm", s.total_precipitation);
    let _ = writeln!(out, "  Average humidity:     {:>8.1} %", s.avg_humidity);
    let _ = writeln!(out);

    let _ = writeln!(out, "Hazard likelihood (share of days)");
    let _ = writeln!(out, "  Extreme heat (>{EXTREME_HEAT_C} °C):          {:>3}%", p.extreme_heat);
    let _ = writeln!(out, "  Extreme cold (<{EXTREME_COLD_C} °C):           {:>3}%", p.extreme_cold);
    let _ = writeln!(out, "  Heavy rain (>{HEAVY_RAIN_MM} mm):            {:>3}%", p.heavy_rain);
    let _ = writeln!(out, "  High wind (>{HIGH_WIND} m/s):            {:>3}%", p.high_wind);
    let _ = writeln!(
        out,
        "  Uncomfortable humidity (>{UNCOMFORTABLE_HUMIDITY_PCT}%): {:>3}%",
        p.uncomfortable
    );

    if let Some(first) = result.metrics.first() {
        let _ = writeln!(out);
        let _ = writeln!(out, "First day ({})", first.date);
        let _ = writeln!(
            out,
            "  Temperature: {:.1} °C (min {:.1}, max {:.1})",
            first.temperature.mean, first.temperature.min, first.temperature.max
        );
        let _ = writeln!(out, "  Precipitation: {:.1} mm", first.precipitation.amount);
        if let Some(h) = first.humidity {
            let _ = writeln!(out, "  Humidity: {h:.0}%");
        }
        if let Some(w) = first.wind_speed {
            let _ = writeln!(out, "  Wind: {:.1} km/h", w * MPS_TO_KMH);
        }
    }

    out
}
