use crate::{
    Config,
    model::{DateRange, LocationInfo, PowerResponse},
    provider::{nasa_power::NasaPowerSource, nominatim::NominatimGeocoder},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod nasa_power;
pub mod nominatim;

/// Remote source of daily point data for a coordinate and date window.
#[async_trait]
pub trait ClimateDataSource: Send + Sync + Debug {
    async fn fetch_daily(
        &self,
        latitude: f64,
        longitude: f64,
        range: &DateRange,
    ) -> anyhow::Result<PowerResponse>;
}

#[async_trait]
impl<T: ClimateDataSource + ?Sized> ClimateDataSource for Box<T> {
    async fn fetch_daily(
        &self,
        latitude: f64,
        longitude: f64,
        range: &DateRange,
    ) -> anyhow::Result<PowerResponse> {
        (**self).fetch_daily(latitude, longitude, range).await
    }
}

/// Resolves place names to coordinates and back.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn geocode(&self, name: &str) -> anyhow::Result<LocationInfo>;

    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> anyhow::Result<LocationInfo>;
}

/// Construct the point-data source from config.
pub fn data_source_from_config(config: &Config) -> anyhow::Result<Box<dyn ClimateDataSource>> {
    let source = NasaPowerSource::with_base_url(config.power_base_url(), &config.user_agent())?;
    Ok(Box::new(source))
}

/// Construct the geocoder from config.
pub fn geocoder_from_config(config: &Config) -> anyhow::Result<Box<dyn Geocoder>> {
    let geocoder =
        NominatimGeocoder::with_base_url(config.geocoder_base_url(), &config.user_agent())?;
    Ok(Box::new(geocoder))
}

/// Truncates an error body for inclusion in a message.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Endpoints};

    #[test]
    fn factories_work_with_default_config() {
        let cfg = Config::default();
        assert!(data_source_from_config(&cfg).is_ok());
        assert!(geocoder_from_config(&cfg).is_ok());
    }

    #[test]
    fn factories_respect_endpoint_overrides() {
        let cfg = Config {
            endpoints: Endpoints {
                power_base_url: Some("http://localhost:9999".into()),
                geocoder_base_url: Some("http://localhost:9998".into()),
            },
            ..Config::default()
        };

        let source = format!("{:?}", data_source_from_config(&cfg).unwrap());
        let geocoder = format!("{:?}", geocoder_from_config(&cfg).unwrap());
        assert!(source.contains("localhost:9999"));
        assert!(geocoder.contains("localhost:9998"));
    }

    #[test]
    fn truncate_body_limits_long_bodies() {
        let long = "é".repeat(250);
        let out = truncate_body(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
