//! Conversion of the point-data payload into per-day records.

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::AnalysisError,
    model::{
        DailyClimateRecord, Parameter, Precipitation, PrecipitationUnit,
        PowerResponse, RawParameterSeries, Temperature, TemperatureUnit,
    },
    sanitize::{Bounds, clamp_value},
};

/// Validates the parameter container at `properties.parameter`.
///
/// A missing or non-object container is fatal. Individual parameters that
/// are missing or not objects are skipped and later read as absent.
pub fn parse_parameters(response: &PowerResponse) -> Result<RawParameterSeries, AnalysisError> {
    let container = response
        .as_value()
        .get("properties")
        .ok_or_else(|| AnalysisError::MalformedResponse("missing `properties`".into()))?
        .get("parameter")
        .ok_or_else(|| AnalysisError::MalformedResponse("missing `properties.parameter`".into()))?
        .as_object()
        .ok_or_else(|| {
            AnalysisError::MalformedResponse("`properties.parameter` is not an object".into())
        })?;

    let mut raw = RawParameterSeries::new();
    for &parameter in Parameter::all() {
        match container.get(parameter.as_code()) {
            Some(Value::Object(series)) => raw.insert(parameter, series.clone()),
            Some(other) => {
                warn!(%parameter, kind = value_kind(other), "Ignoring non-object parameter series");
            }
            None => debug!(%parameter, "Parameter absent from response"),
        }
    }

    Ok(raw)
}

/// Builds one record per mean-temperature date-key, in source order.
pub fn to_daily_records(raw: &RawParameterSeries, location: &str) -> Vec<DailyClimateRecord> {
    let Some(dates) = raw.series(Parameter::MeanTemperature) else {
        warn!("No mean temperature series; producing an empty record set");
        return Vec::new();
    };

    dates.keys().map(|key| record_for(raw, key, location)).collect()
}

/// Validates `response` and converts it to daily records.
pub fn transform(
    response: &PowerResponse,
    location: &str,
) -> Result<Vec<DailyClimateRecord>, AnalysisError> {
    let raw = parse_parameters(response)?;
    let records = to_daily_records(&raw, location);
    debug!(count = records.len(), "Transformed daily records");
    Ok(records)
}

/// `YYYYMMDD` → `YYYY-MM-DD` by position. Short keys give short segments.
pub fn iso_date_from_key(key: &str) -> String {
    let slice = |from: usize, len: usize| key.chars().skip(from).take(len).collect::<String>();
    format!("{}-{}-{}", slice(0, 4), slice(4, 2), slice(6, 2))
}

fn record_for(raw: &RawParameterSeries, key: &str, location: &str) -> DailyClimateRecord {
    let required = |parameter: Parameter, bounds: Bounds| {
        raw.observation(parameter, key)
            .map_or(0.0, |v| clamp_value(v, 0.0, bounds))
    };
    let optional = |parameter: Parameter, bounds: Bounds| {
        raw.observation(parameter, key)
            .map(|v| clamp_value(v, 0.0, bounds))
    };

    DailyClimateRecord {
        location: location.to_string(),
        date: iso_date_from_key(key),
        temperature: Temperature {
            mean: required(Parameter::MeanTemperature, Bounds::TEMPERATURE_C),
            max: required(Parameter::MaxTemperature, Bounds::TEMPERATURE_C),
            min: required(Parameter::MinTemperature, Bounds::TEMPERATURE_C),
            unit: TemperatureUnit::Celsius,
        },
        precipitation: Precipitation {
            amount: required(Parameter::Precipitation, Bounds::PRECIPITATION_MM),
            unit: PrecipitationUnit::Mm,
        },
        humidity: optional(Parameter::RelativeHumidity, Bounds::HUMIDITY_PCT),
        wind_speed: optional(Parameter::WindSpeed, Bounds::WIND_SPEED),
        pressure: optional(Parameter::SurfacePressure, Bounds::PRESSURE_KPA),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(parameter: Value) -> PowerResponse {
        PowerResponse::new(json!({
            "type": "Feature",
            "properties": { "parameter": parameter },
        }))
    }

    #[test]
    fn one_record_per_mean_temperature_key() {
        let resp = response(json!({
            "T2M": { "20240101": 10.0, "20240102": 40.0, "20240103": 12.5 },
            "T2M_MAX": { "20240101": 15.0 },
        }));

        let records = transform(&resp, "Testville").unwrap();

        assert_eq!(records.len(), 3);
        let dates: Vec<_> = records.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, ["2024-01-01", "2024-01-02", "2024-01-03"]);
        assert!(records.iter().all(|r| r.location == "Testville"));
    }

    #[test]
    fn keeps_source_order_without_sorting() {
        let resp = response(json!({
            "T2M": { "20240105": 1.0, "20240101": 2.0, "20240103": 3.0 },
        }));

        let records = transform(&resp, "X").unwrap();
        let dates: Vec<_> = records.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, ["2024-01-05", "2024-01-01", "2024-01-03"]);
    }

    #[test]
    fn missing_required_values_fall_back_to_zero() {
        let resp = response(json!({
            "T2M": { "20240101": 10.0 },
            "T2M_MAX": {},
        }));

        let record = &transform(&resp, "X").unwrap()[0];
        assert_eq!(record.temperature.mean, 10.0);
        assert_eq!(record.temperature.max, 0.0);
        assert_eq!(record.temperature.min, 0.0);
        assert_eq!(record.precipitation.amount, 0.0);
    }

    #[test]
    fn optional_fields_stay_absent_not_zero() {
        let resp = response(json!({
            "T2M": { "20240101": 10.0, "20240102": 11.0 },
            "RH2M": { "20240101": 65.0, "20240102": null },
            "WS10M": { "20240102": 4.2 },
        }));

        let records = transform(&resp, "X").unwrap();
        assert_eq!(records[0].humidity, Some(65.0));
        assert_eq!(records[0].wind_speed, None);
        assert_eq!(records[0].pressure, None);
        assert_eq!(records[1].humidity, None);
        assert_eq!(records[1].wind_speed, Some(4.2));
    }

    #[test]
    fn values_are_clamped_to_physical_ranges() {
        let resp = response(json!({
            "T2M": { "20240101": -999.0 },
            "T2M_MAX": { "20240101": 72.0 },
            "T2M_MIN": { "20240101": "not a number" },
            "PRECTOTCORR": { "20240101": -4.0 },
            "RH2M": { "20240101": 140.0 },
            "WS10M": { "20240101": 300.0 },
            "PS": { "20240101": "101.3" },
        }));

        let r = &transform(&resp, "X").unwrap()[0];
        assert_eq!(r.temperature.mean, -100.0);
        assert_eq!(r.temperature.max, 60.0);
        assert_eq!(r.temperature.min, 0.0);
        assert_eq!(r.precipitation.amount, 0.0);
        assert_eq!(r.humidity, Some(100.0));
        assert_eq!(r.wind_speed, Some(150.0));
        assert_eq!(r.pressure, Some(101.3));
    }

    #[test]
    fn empty_mean_series_is_valid_and_empty() {
        let resp = response(json!({ "T2M": {} }));
        assert!(transform(&resp, "X").unwrap().is_empty());
    }

    #[test]
    fn absent_or_non_object_mean_series_is_empty() {
        assert!(transform(&response(json!({})), "X").unwrap().is_empty());
        assert!(transform(&response(json!({ "T2M": 5 })), "X").unwrap().is_empty());
    }

    #[test]
    fn missing_container_is_malformed() {
        let no_properties = PowerResponse::new(json!({ "messages": ["oops"] }));
        let no_parameter = PowerResponse::new(json!({ "properties": {} }));
        let wrong_type = response(json!(["T2M"]));

        for resp in [no_properties, no_parameter, wrong_type] {
            let err = transform(&resp, "X").unwrap_err();
            assert!(matches!(err, AnalysisError::MalformedResponse(_)), "{err}");
        }
    }

    #[test]
    fn date_keys_are_sliced_positionally() {
        assert_eq!(iso_date_from_key("20240229"), "2024-02-29");
        assert_eq!(iso_date_from_key("20241399"), "2024-13-99");
        assert_eq!(iso_date_from_key("2024"), "2024--");
        assert_eq!(iso_date_from_key("202401011"), "2024-01-01");
    }
}
