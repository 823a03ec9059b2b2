use std::{collections::HashMap, convert::TryFrom, fmt};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Daily parameters requested from the point-data service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    MeanTemperature,
    MaxTemperature,
    MinTemperature,
    Precipitation,
    RelativeHumidity,
    WindSpeed,
    SurfacePressure,
}

impl Parameter {
    pub fn as_code(&self) -> &'static str {
        match self {
            Parameter::MeanTemperature => "T2M",
            Parameter::MaxTemperature => "T2M_MAX",
            Parameter::MinTemperature => "T2M_MIN",
            Parameter::Precipitation => "PRECTOTCORR",
            Parameter::RelativeHumidity => "RH2M",
            Parameter::WindSpeed => "WS10M",
            Parameter::SurfacePressure => "PS",
        }
    }

    pub const fn all() -> &'static [Parameter] {
        &[
            Parameter::MeanTemperature,
            Parameter::MaxTemperature,
            Parameter::MinTemperature,
            Parameter::Precipitation,
            Parameter::RelativeHumidity,
            Parameter::WindSpeed,
            Parameter::SurfacePressure,
        ]
    }

    /// Comma-joined code list, as the `parameters` query value expects.
    pub fn query_list() -> String {
        Self::all().iter().map(Parameter::as_code).collect::<Vec<_>>().join(",")
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl TryFrom<&str> for Parameter {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Parameter::all()
            .iter()
            .copied()
            .find(|p| p.as_code().eq_ignore_ascii_case(value))
            .ok_or_else(|| anyhow::anyhow!("Unknown parameter code '{value}'."))
    }
}

/// Root document returned by the point-data service, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PowerResponse(pub Value);

impl PowerResponse {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Date-keyed observations for one parameter, in source order.
pub type ParameterSeries = Map<String, Value>;

/// Validated parameter container of a [`PowerResponse`].
///
/// Only parameters whose payload was an object are kept; everything else
/// reads as absent through [`RawParameterSeries::series`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawParameterSeries {
    series: HashMap<Parameter, ParameterSeries>,
}

impl RawParameterSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, parameter: Parameter, series: ParameterSeries) {
        self.series.insert(parameter, series);
    }

    pub fn series(&self, parameter: Parameter) -> Option<&ParameterSeries> {
        self.series.get(&parameter)
    }

    /// Observation for `parameter` on `date_key`. `null` counts as absent.
    pub fn observation(&self, parameter: Parameter, date_key: &str) -> Option<&Value> {
        self.series(parameter)
            .and_then(|s| s.get(date_key))
            .filter(|v| !v.is_null())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecipitationUnit {
    #[default]
    Mm,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    pub unit: TemperatureUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Precipitation {
    pub amount: f64,
    pub unit: PrecipitationUnit,
}

/// One day of normalized observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyClimateRecord {
    pub location: String,
    /// `YYYY-MM-DD`, sliced from the source date-key without calendar checks.
    pub date: String,
    pub temperature: Temperature,
    pub precipitation: Precipitation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStatistics {
    pub avg_temperature: f64,
    pub max_temperature: f64,
    pub min_temperature: f64,
    pub total_precipitation: f64,
    pub avg_humidity: f64,
    pub data_points: usize,
}

/// Percent of days (0..=100) crossing each hazard threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardProbabilities {
    pub extreme_heat: u8,
    pub extreme_cold: u8,
    pub heavy_rain: u8,
    pub high_wind: u8,
    pub uncomfortable: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateAnalysisResult {
    pub location: LocationInfo,
    pub metrics: Vec<DailyClimateRecord>,
    pub summary: SummaryStatistics,
    pub probabilities: HazardProbabilities,
}

/// Inclusive window of days requested from the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> anyhow::Result<Self> {
        if start > end {
            anyhow::bail!("Start date {start} is after end date {end}.");
        }
        Ok(Self { start, end })
    }

    /// `years` full years of history ending on the same day one year ago.
    pub fn trailing_years(today: NaiveDate, years: u32) -> anyhow::Result<Self> {
        if years == 0 {
            anyhow::bail!("History window must cover at least one year.");
        }

        let end = years_before(today, 1);
        let start = years_before(end, years - 1);
        Self::new(start, end)
    }

    /// `(start, end)` as `YYYYMMDD`, the data source's date format.
    pub fn to_compact(&self) -> (String, String) {
        (
            self.start.format("%Y%m%d").to_string(),
            self.end.format("%Y%m%d").to_string(),
        )
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

fn years_before(date: NaiveDate, years: u32) -> NaiveDate {
    let year = date.year() - years as i32;
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), 28))
        .unwrap_or(date)
}
