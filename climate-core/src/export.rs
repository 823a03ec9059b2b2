//! File export of a finished analysis as JSON or CSV.

use std::{fmt, str::FromStr};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    ClimateAnalysisResult, DailyClimateRecord, DateRange, HazardProbabilities, LocationInfo,
    SummaryStatistics,
};
use crate::probability::{
    EXTREME_COLD_C, EXTREME_HEAT_C, HEAVY_RAIN_MM, HIGH_WIND, UNCOMFORTABLE_HUMIDITY_PCT,
};

pub const DATA_SOURCE: &str = "NASA POWER API (https://power.larc.nasa.gov)";

const CSV_HEADERS: [&str; 11] = [
    "Date",
    "Location",
    "Latitude",
    "Longitude",
    "Mean Temperature (°C)",
    "Max Temperature (°C)",
    "Min Temperature (°C)",
    "Precipitation (mm)",
    "Humidity (%)",
    "Wind Speed (m/s)",
    "Pressure (kPa)",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(anyhow!("Unknown export format '{s}'. Supported formats: json, csv.")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub location: LocationInfo,
    pub date_range: DateRange,
    pub data_source: String,
    pub exported_at: String,
}

/// Everything written to an export file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub metadata: ExportMetadata,
    pub data: Vec<DailyClimateRecord>,
    pub summary: SummaryStatistics,
    pub probabilities: HazardProbabilities,
}

impl ExportDocument {
    pub fn new(result: &ClimateAnalysisResult, range: DateRange, exported_at: DateTime<Utc>) -> Self {
        Self {
            metadata: ExportMetadata {
                location: result.location.clone(),
                date_range: range,
                data_source: DATA_SOURCE.to_string(),
                exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            },
            data: result.metrics.clone(),
            summary: result.summary,
            probabilities: result.probabilities,
        }
    }

    pub fn render(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => self.to_json(),
            ExportFormat::Csv => self.to_csv(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize export to JSON")
    }

    /// `#` comment block with metadata and statistics, then one row per day.
    pub fn to_csv(&self) -> Result<String> {
        let mut out = String::new();
        for line in self.comment_lines() {
            out.push_str(&line);
            out.push('\n');
        }

        let location = &self.metadata.location;
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CSV_HEADERS).context("Failed to write CSV header")?;

        for day in &self.data {
            writer
                .write_record([
                    day.date.clone(),
                    location.name.clone(),
                    format!("{:.4}", location.latitude),
                    format!("{:.4}", location.longitude),
                    format!("{:.2}", day.temperature.mean),
                    format!("{:.2}", day.temperature.max),
                    format!("{:.2}", day.temperature.min),
                    format!("{:.2}", day.precipitation.amount),
                    format!("{:.2}", day.humidity.unwrap_or(0.0)),
                    format!("{:.2}", day.wind_speed.unwrap_or(0.0)),
                    format!("{:.2}", day.pressure.unwrap_or(0.0)),
                ])
                .with_context(|| format!("Failed to write CSV row for {}", day.date))?;
        }

        let rows = writer.into_inner().context("Failed to flush CSV rows")?;
        out.push_str(&String::from_utf8(rows).context("CSV output is not valid UTF-8")?);
        Ok(out)
    }

    fn comment_lines(&self) -> Vec<String> {
        let meta = &self.metadata;
        let s = &self.summary;
        let p = &self.probabilities;

        vec![
            "# Climate Data Export".to_string(),
            format!("# Data Source: {}", meta.data_source),
            format!("# Location: {}", meta.location.name),
            format!(
                "# Coordinates: {:.4}, {:.4}",
                meta.location.latitude, meta.location.longitude
            ),
            format!("# Date Range: {}", meta.date_range),
            format!("# Exported: {}", meta.exported_at),
            String::new(),
            "# Summary Statistics".to_string(),
            format!("# Average Temperature: {:.2}°C", s.avg_temperature),
            format!("# Max Temperature: {:.2}°C", s.max_temperature),
            format!("# Min Temperature: {:.2}°C", s.min_temperature),
            format!("# Total Precipitation: {:.2} mm", s.total_precipitation),
            format!("# Average Humidity: {:.2}%", s.avg_humidity),
            format!("# Data Points: {}", s.data_points),
            String::new(),
            "# Weather Probabilities (%)".to_string(),
            format!("# Extreme Heat (>{EXTREME_HEAT_C}°C): {}%", p.extreme_heat),
            format!("# Extreme Cold (<{EXTREME_COLD_C}°C): {}%", p.extreme_cold),
            format!("# Heavy Rain (>{HEAVY_RAIN_MM}mm): {}%", p.heavy_rain),
            format!("# High Wind (>{HIGH_WIND} m/s): {}%", p.high_wind),
            format!("# Uncomfortable Humidity (>{UNCOMFORTABLE_HUMIDITY_PCT}%): {}%", p.uncomfortable),
            String::new(),
        ]
    }
}

/// `climate-data-{name}-{millis}.{ext}`, with unsafe path characters replaced.
pub fn suggested_file_name(
    location: &LocationInfo,
    format: ExportFormat,
    exported_at: DateTime<Utc>,
) -> String {
    let name: String = location
        .name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .collect();

    format!(
        "climate-data-{}-{}.{}",
        name,
        exported_at.timestamp_millis(),
        format.extension()
    )
}
