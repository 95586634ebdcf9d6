use super::Coordinates;

/// Earth radius used for the great-circle distance. Determines the output unit.
pub const EARTH_RADIUS_KM: f64 = 6373.0;

/// Great-circle distance between two points using the haversine formula.
/// Altitude is ignored; both points are treated as lying on the surface.
pub fn distance_km(a: &Coordinates, b: &Coordinates) -> f64 {
    let (lat1, lon1) = (a.lat_rad(), a.lon_rad());
    let (lat2, lon2) = (b.lat_rad(), b.lon_rad());

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h just past 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}
