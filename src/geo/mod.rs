use crate::models::staff::GeoPoint;

const EARTH_RADIUS_KM: f64 = 6_371.0;

pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lng = (delta_lng / 2.0).sin();

    let haversine = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;
    let central_angle = 2.0 * haversine.sqrt().asin();

    EARTH_RADIUS_KM * central_angle
}

/// Venue-to-member distance. Staff profiles and events may lack coordinates;
/// in that case no distance is reported rather than a made-up one.
pub fn distance_km(a: Option<&GeoPoint>, b: Option<&GeoPoint>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(haversine_km(a, b)),
        _ => None,
    }
}
