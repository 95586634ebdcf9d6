mod error;
mod http;
mod iss;
mod location;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use error::FetchError;
pub use http::build_client;
pub use iss::{IssSource, OpenNotifyClient, DEFAULT_ISS_URL};
pub use location::{FixedLocation, IpGeolocator, LocationSource, DEFAULT_GEOLOCATION_URL};
pub use types::IssFix;
