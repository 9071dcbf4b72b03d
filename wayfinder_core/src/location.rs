use geo::{Distance, Euclidean, Haversine};

/// A waypoint position. Cartesian (x, y) or geographic (lat, lon),
/// depending on which constructor the caller used; the two distance
/// functions only make sense for the matching kind.
#[derive(Clone, Copy, Debug)]
pub struct Location {
    point: geo::Point,
}

impl Location {
    pub fn from_cartesian(x: f64, y: f64) -> Self {
        Self {
            point: geo::Point::new(x, y),
        }
    }

    pub fn from_lat_lon(lat: f64, lon: f64) -> Self {
        Self {
            point: geo::Point::new(lon, lat),
        }
    }

    pub fn x(&self) -> f64 {
        self.point.x()
    }

    pub fn y(&self) -> f64 {
        self.point.y()
    }

    pub fn euclidean_distance(&self, to: &Location) -> f64 {
        let euclidean = Euclidean;
        euclidean.distance(&self.point, &to.point)
    }

    pub fn haversine_distance(&self, to: &Location) -> f64 {
        let haversine = Haversine;
        haversine.distance(self.point, to.point)
    }
}

impl From<&Location> for geo::Point<f64> {
    fn from(location: &Location) -> Self {
        location.point
    }
}
