//! Geospatial filtering of tabular results
//!
//! Great-circle distances use the haversine formula on a spherical Earth.

mod locfind;

pub use locfind::{LocFinder, WikidataGeoItem};

use crate::sparql::Record;
use serde::Serialize;
use tracing::debug;

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two points given in degrees
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // rounding can push `a` just above 1 near antipodal points
    2.0 * EARTH_RADIUS_KM * a.min(1.0).sqrt().asin()
}

/// Names of the coordinate columns of a result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoColumns {
    pub lat: String,
    pub lon: String,
}

impl Default for GeoColumns {
    fn default() -> Self {
        Self {
            lat: "lat".to_string(),
            lon: "long".to_string(),
        }
    }
}

/// A row within the search radius and its distance to the reference point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyRecord {
    #[serde(flatten)]
    pub record: Record,
    pub distance_km: f64,
}

/// Rows within `radius_km` of (`lat`, `lon`), nearest first.
///
/// Rows need `lat` and `long` columns; rows whose coordinates are missing or
/// not numeric are skipped. Equal distances keep their input order.
pub fn nearby(points: &[Record], lat: f64, lon: f64, radius_km: f64) -> Vec<NearbyRecord> {
    nearby_with(points, &GeoColumns::default(), lat, lon, radius_km)
}

/// [`nearby`] with custom coordinate column names
pub fn nearby_with(
    points: &[Record],
    columns: &GeoColumns,
    lat: f64,
    lon: f64,
    radius_km: f64,
) -> Vec<NearbyRecord> {
    let mut within: Vec<NearbyRecord> = points
        .iter()
        .filter_map(|record| {
            let coords = record
                .get_f64(&columns.lat)
                .zip(record.get_f64(&columns.lon));
            if coords.is_none() {
                debug!("skipping record without coordinates: {:?}", record);
            }
            let (point_lat, point_lon) = coords?;
            let distance_km = haversine_km(lat, lon, point_lat, point_lon);
            (distance_km <= radius_km).then(|| NearbyRecord {
                record: record.clone(),
                distance_km,
            })
        })
        .collect();
    within.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    within
}
