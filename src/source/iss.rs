use async_trait::async_trait;
use serde::Deserialize;

use super::error::{FetchError, ParseError};
use super::http::get_text;
use super::types::{Degrees, IssFix};
use crate::geo::Coordinates;

pub const DEFAULT_ISS_URL: &str = "http://api.open-notify.org/iss-now.json";

/// Something that knows where the ISS is right now.
#[async_trait]
pub trait IssSource: Send + Sync {
    async fn fetch(&self) -> Result<IssFix, FetchError>;
}

#[derive(Debug, Deserialize)]
struct IssNowResponse {
    iss_position: IssPosition,
    /// Epoch seconds. Usually an integer, but any JSON number is accepted.
    timestamp: f64,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IssPosition {
    longitude: Degrees,
    latitude: Degrees,
}

/// Parse an `iss-now.json` body.
pub fn parse_iss_response(body: &str) -> Result<IssFix, FetchError> {
    let response: IssNowResponse = serde_json::from_str(body)?;

    if let Some(message) = response.message.as_deref() {
        if message != "success" {
            return Err(FetchError::Rejected(message.to_string()));
        }
    }

    let longitude = response.iss_position.longitude.to_f64("longitude")?;
    let latitude = response.iss_position.latitude.to_f64("latitude")?;
    let timestamp = epoch_seconds(response.timestamp)?;

    Ok(IssFix {
        position: Coordinates::new(latitude, longitude),
        timestamp,
    })
}

fn epoch_seconds(value: f64) -> Result<i64, ParseError> {
    // i64::MAX as f64 rounds up to 2^63, which no longer fits.
    if !value.is_finite() {
        return Err(ParseError::NonFinite {
            field: "timestamp",
            value,
        });
    }
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(ParseError::OutOfRange {
            field: "timestamp",
            value,
        });
    }
    Ok(value.floor() as i64)
}

/// Client for the open-notify `iss-now` endpoint.
pub struct OpenNotifyClient {
    client: reqwest::Client,
    url: String,
}

impl OpenNotifyClient {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl IssSource for OpenNotifyClient {
    async fn fetch(&self) -> Result<IssFix, FetchError> {
        let body = get_text(&self.client, &self.url).await?;
        let fix = parse_iss_response(&body)?;
        log::debug!("ISS at {} (t={})", fix.position, fix.timestamp);
        Ok(fix)
    }
}
