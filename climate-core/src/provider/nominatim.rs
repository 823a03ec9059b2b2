use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    model::LocationInfo,
    provider::truncate_body,
    sanitize::{Bounds, DEFAULT_TEXT_MAX_LEN, clamp_number, sanitize_text},
};

use super::Geocoder;

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// OpenStreetMap Nominatim search and reverse lookup.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    base_url: String,
    http: Client,
}

impl NominatimGeocoder {
    pub fn new(user_agent: &str) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, user_agent)
    }

    pub fn with_base_url(base_url: &str, user_agent: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client for Nominatim")?;

        Ok(Self { base_url: base_url.trim_end_matches('/').to_string(), http })
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)], what: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send {what} request to Nominatim"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read Nominatim {what} response body"))?;
        debug!(%status, bytes = body.len(), "Received Nominatim response");

        if !status.is_success() {
            return Err(anyhow!(
                "{} failed with status {}: {}",
                capitalize(what),
                status,
                truncate_body(&body),
            ));
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct NmSearchHit {
    display_name: String,
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct NmAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NmReverse {
    address: NmAddress,
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, name: &str) -> Result<LocationInfo> {
        let query = [
            ("q", name.to_string()),
            ("format", "json".to_string()),
            ("limit", "1".to_string()),
        ];
        let body = self.get_json("/search", &query, "geocoding").await?;

        let hits: Vec<NmSearchHit> =
            serde_json::from_str(&body).context("Failed to parse Nominatim search JSON")?;
        let hit = hits
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Location not found: '{name}'"))?;

        Ok(location_from_hit(&hit))
    }

    #[instrument(skip(self))]
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<LocationInfo> {
        let latitude = clamp_number(latitude, 0.0, Bounds::LATITUDE);
        let longitude = clamp_number(longitude, 0.0, Bounds::LONGITUDE);
        let query = [
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("format", "json".to_string()),
        ];
        let body = self.get_json("/reverse", &query, "reverse geocoding").await?;

        let parsed: NmReverse =
            serde_json::from_str(&body).context("Failed to parse Nominatim reverse JSON")?;
        let address = parsed.address;

        let name = address
            .city
            .or(address.town)
            .or(address.village)
            .map(|n| sanitize_text(Some(&n), DEFAULT_TEXT_MAX_LEN))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());
        let country = address
            .country
            .map(|c| sanitize_text(Some(&c), DEFAULT_TEXT_MAX_LEN))
            .filter(|c| !c.is_empty());

        Ok(LocationInfo { name, latitude, longitude, country })
    }
}

/// Name is the first `display_name` segment, country the last.
fn location_from_hit(hit: &NmSearchHit) -> LocationInfo {
    let first = hit.display_name.split(',').next();
    let last = hit.display_name.rsplit(',').next();

    let latitude = clamp_number(hit.lat.trim().parse().unwrap_or(f64::NAN), 0.0, Bounds::LATITUDE);
    let longitude =
        clamp_number(hit.lon.trim().parse().unwrap_or(f64::NAN), 0.0, Bounds::LONGITUDE);

    let country = sanitize_text(last, DEFAULT_TEXT_MAX_LEN);

    LocationInfo {
        name: sanitize_text(first, DEFAULT_TEXT_MAX_LEN),
        latitude,
        longitude,
        country: (!country.is_empty()).then_some(country),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn geocoder(server: &Server) -> NominatimGeocoder {
        NominatimGeocoder::with_base_url(&server.url(), "climate-test/0.1").unwrap()
    }

    #[test]
    fn hit_is_split_into_name_and_country() {
        let hit = NmSearchHit {
            display_name: "Paris, Île-de-France, Metropolitan France, France".into(),
            lat: "48.8588897".into(),
            lon: "2.3200410".into(),
        };

        let loc = location_from_hit(&hit);
        assert_eq!(loc.name, "Paris");
        assert_eq!(loc.country.as_deref(), Some("France"));
        assert_eq!(loc.latitude, 48.8588897);
        assert_eq!(loc.longitude, 2.320041);
    }

    #[test]
    fn hit_with_bad_coordinates_is_clamped() {
        let hit = NmSearchHit { display_name: "Nowhere".into(), lat: "95".into(), lon: "abc".into() };

        let loc = location_from_hit(&hit);
        assert_eq!(loc.latitude, 90.0);
        assert_eq!(loc.longitude, 0.0);
        assert_eq!(loc.name, "Nowhere");
        assert_eq!(loc.country.as_deref(), Some("Nowhere"));
    }

    #[tokio::test]
    async fn geocode_returns_first_hit() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "Nairobi".into()),
                Matcher::UrlEncoded("format".into(), "json".into()),
                Matcher::UrlEncoded("limit".into(), "1".into()),
            ]))
            .match_header("user-agent", "climate-test/0.1")
            .with_status(200)
            .with_body(r#"[{"display_name":"Nairobi, Kenya","lat":"-1.2833","lon":"36.8167"}]"#)
            .create_async()
            .await;

        let loc = geocoder(&server).geocode("Nairobi").await.unwrap();

        mock.assert_async().await;
        assert_eq!(loc.name, "Nairobi");
        assert_eq!(loc.country.as_deref(), Some("Kenya"));
        assert_eq!(loc.latitude, -1.2833);
    }

    #[tokio::test]
    async fn geocode_reports_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let err = geocoder(&server).geocode("Atlantis").await.unwrap_err();
        assert!(err.to_string().contains("Location not found"));
    }

    #[tokio::test]
    async fn geocode_reports_http_failure() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let err = geocoder(&server).geocode("Lima").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Geocoding failed"));
        assert!(msg.contains("503"));
    }

    #[tokio::test]
    async fn reverse_geocode_prefers_city_then_town_then_village() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/reverse")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("lat".into(), "46.5".into()),
                Matcher::UrlEncoded("lon".into(), "7.25".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"address":{"village":"Kandersteg","country":"Schweiz/Suisse"}}"#)
            .create_async()
            .await;

        let loc = geocoder(&server).reverse_geocode(46.5, 7.25).await.unwrap();
        assert_eq!(loc.name, "Kandersteg");
        assert_eq!(loc.country.as_deref(), Some("SchweizSuisse"));
        assert_eq!((loc.latitude, loc.longitude), (46.5, 7.25));
    }

    #[tokio::test]
    async fn reverse_geocode_falls_back_to_unknown() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/reverse")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"address":{}}"#)
            .create_async()
            .await;

        let loc = geocoder(&server).reverse_geocode(0.0, -160.0).await.unwrap();
        assert_eq!(loc.name, "Unknown");
        assert_eq!(loc.country, None);
    }
}
