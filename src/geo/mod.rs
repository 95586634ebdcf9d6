mod coordinates;
mod haversine;

pub use coordinates::Coordinates;
pub use haversine::distance_km;
