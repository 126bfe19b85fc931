//! Great-circle distance between restaurant and delivery coordinates.

use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine metric, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    fn to_point(self) -> Point<f64> {
        // geo points are (x = lon, y = lat)
        Point::new(self.lon, self.lat)
    }
}

/// Haversine distance in kilometres.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    Haversine.distance(from.to_point(), to.to_point()) / 1000.0
}

/// Axis-aligned box spanning a set of coordinates, `[south_west, north_east]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl BoundingBox {
    /// Returns `None` for an empty input.
    pub fn spanning<I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        coords.into_iter().fold(None, |acc, c| {
            Some(match acc {
                None => BoundingBox {
                    south_west: c,
                    north_east: c,
                },
                Some(b) => BoundingBox {
                    south_west: Coordinate::new(b.south_west.lat.min(c.lat), b.south_west.lon.min(c.lon)),
                    north_east: Coordinate::new(b.north_east.lat.max(c.lat), b.north_east.lon.max(c.lon)),
                },
            })
        })
    }
}
