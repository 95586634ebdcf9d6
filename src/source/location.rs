use async_trait::async_trait;
use serde::Deserialize;

use super::error::{FetchError, ParseError};
use super::http::get_text;
use super::types::Degrees;
use crate::geo::Coordinates;

/// ip-api.com answers for the caller's public address when no IP is given.
pub const DEFAULT_GEOLOCATION_URL: &str = "http://ip-api.com/json";

/// Resolves where this machine currently is.
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn resolve(&self) -> Result<Coordinates, FetchError>;
}

/// A location given up front, bypassing any lookup.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationSource for FixedLocation {
    async fn resolve(&self) -> Result<Coordinates, FetchError> {
        Ok(self.0)
    }
}

// Covers the common free services:
//   ip-api.com  {"status":"success","lat":..,"lon":..} / {"status":"fail","message":".."}
//   ipapi.co    {"latitude":..,"longitude":..}         / {"error":true,"reason":".."}
//   ipinfo.io   {"loc":"lat,lon"}
#[derive(Debug, Deserialize)]
struct GeolocationResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: bool,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default, alias = "latitude")]
    lat: Option<Degrees>,
    #[serde(default, alias = "longitude")]
    lon: Option<Degrees>,
    #[serde(default)]
    loc: Option<String>,
}

/// Parse the body of an IP geolocation lookup.
pub fn parse_geolocation_response(body: &str) -> Result<Coordinates, FetchError> {
    let response: GeolocationResponse = serde_json::from_str(body)?;

    if response.status.as_deref().is_some_and(|s| s != "success") {
        let message = response.message.unwrap_or_else(|| "unknown error".into());
        return Err(FetchError::Rejected(message));
    }
    if response.error {
        let reason = response.reason.unwrap_or_else(|| "unknown error".into());
        return Err(FetchError::Rejected(reason));
    }

    match (response.lat, response.lon, response.loc) {
        (Some(lat), Some(lon), _) => Ok(Coordinates::new(
            lat.to_f64("latitude")?,
            lon.to_f64("longitude")?,
        )),
        (_, _, Some(loc)) => Ok(Coordinates::from_coordinates(&loc).ok_or(
            ParseError::InvalidNumber {
                field: "loc",
                value: loc,
            },
        )?),
        (None, _, None) => Err(ParseError::Missing("latitude").into()),
        (Some(_), None, None) => Err(ParseError::Missing("longitude").into()),
    }
}

/// Looks up the caller's position from its public IP address.
pub struct IpGeolocator {
    client: reqwest::Client,
    url: String,
}

impl IpGeolocator {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl LocationSource for IpGeolocator {
    async fn resolve(&self) -> Result<Coordinates, FetchError> {
        let body = get_text(&self.client, &self.url).await?;
        let location = parse_geolocation_response(&body)?;
        log::debug!("Resolved own location to {}", location);
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::build_client;
    use crate::source::testing::serve;
    use axum::{routing::get, Router};
    use std::time::Duration;

    #[test]
    fn parses_ip_api_body() {
        let body = r#"{"status":"success","country":"Germany","lat":52.52,"lon":13.405,"query":"203.0.113.7"}"#;
        assert_eq!(
            parse_geolocation_response(body).unwrap(),
            Coordinates::new(52.52, 13.405)
        );
    }

    #[test]
    fn parses_ipapi_co_body() {
        let body = r#"{"ip":"203.0.113.7","latitude":40.7128,"longitude":-74.006}"#;
        assert_eq!(
            parse_geolocation_response(body).unwrap(),
            Coordinates::new(40.7128, -74.006)
        );
    }

    #[test]
    fn parses_ipinfo_loc_string() {
        let body = r#"{"ip":"203.0.113.7","loc":"37.3860,-122.0838"}"#;
        assert_eq!(
            parse_geolocation_response(body).unwrap(),
            Coordinates::new(37.386, -122.0838)
        );
    }

    #[test]
    fn failure_status_is_rejected() {
        let body = r#"{"status":"fail","message":"private range","query":"10.0.0.1"}"#;
        assert!(matches!(
            parse_geolocation_response(body),
            Err(FetchError::Rejected(m)) if m == "private range"
        ));

        let body = r#"{"error":true,"reason":"RateLimited"}"#;
        assert!(matches!(
            parse_geolocation_response(body),
            Err(FetchError::Rejected(m)) if m == "RateLimited"
        ));
    }

    #[test]
    fn missing_coordinates_are_a_parse_error() {
        assert!(matches!(
            parse_geolocation_response(r#"{"status":"success"}"#),
            Err(FetchError::Parse(ParseError::Missing("latitude")))
        ));
        assert!(matches!(
            parse_geolocation_response(r#"{"lat":1.0}"#),
            Err(FetchError::Parse(ParseError::Missing("longitude")))
        ));
        assert!(matches!(
            parse_geolocation_response(r#"{"loc":"somewhere"}"#),
            Err(FetchError::Parse(ParseError::InvalidNumber { field: "loc", .. }))
        ));
    }

    #[tokio::test]
    async fn fixed_location_resolves_to_itself() {
        let here = Coordinates::new(1.5, 2.5);
        assert_eq!(FixedLocation(here).resolve().await.unwrap(), here);
    }

    #[tokio::test]
    async fn resolves_over_http() {
        let base = serve(Router::new().route(
            "/json",
            get(|| async { r#"{"status":"success","lat":-33.8688,"lon":151.2093}"# }),
        ))
        .await;
        let client = build_client(Duration::from_secs(5)).unwrap();
        let geolocator = IpGeolocator::new(client, format!("{base}/json"));

        assert_eq!(
            geolocator.resolve().await.unwrap(),
            Coordinates::new(-33.8688, 151.2093)
        );
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_error() {
        let client = build_client(Duration::from_secs(2)).unwrap();
        // Nothing listens on the discard port.
        let geolocator = IpGeolocator::new(client, "http://127.0.0.1:9/json");

        assert!(matches!(
            geolocator.resolve().await,
            Err(FetchError::Transport { .. })
        ));
    }
}
