//! Geographic primitives shared by the loader, the orchestrator and the map view.
//!
//! Distances are in meters on a spherical earth. That is plenty for a map that
//! never leaves a five kilometer box around a university campus.

use std::f64::consts::PI;

/// Mean earth radius in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Meters covered by one degree of latitude
pub const METERS_PER_DEGREE: f64 = EARTH_RADIUS_METERS * PI / 180.0;

/// Reasons a latitude/longitude pair is rejected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateError {
    NotFinite,
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
}

impl std::fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinateError::NotFinite => write!(f, "coordinate is not a finite number"),
            CoordinateError::LatitudeOutOfRange(lat) => {
                write!(f, "latitude {} is outside [-90, 90]", lat)
            }
            CoordinateError::LongitudeOutOfRange(lon) => {
                write!(f, "longitude {} is outside [-180, 180]", lon)
            }
        }
    }
}

impl std::error::Error for CoordinateError {}

/// A latitude/longitude pair in degrees.
///
/// Built through [`Coordinate::new`] the pair is always finite and in range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinateError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// For compile-time constants whose range is known to be valid.
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude(), self.longitude())
    }
}

/// Degrees of latitude spanned by a north-south distance
pub fn meters_to_latitude_degrees(meters: f64) -> f64 {
    meters / METERS_PER_DEGREE
}

/// Degrees of longitude spanned by an east-west distance at the given latitude
pub fn meters_to_longitude_degrees(meters: f64, at_latitude: f64) -> f64 {
    let scale = at_latitude.to_radians().cos().max(f64::EPSILON);
    meters / (METERS_PER_DEGREE * scale)
}

/// Angular extent of a region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSpan {
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

/// A rectangular area on the map, described by its center and full span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateRegion {
    pub center: Coordinate,
    pub span: CoordinateSpan,
}

impl CoordinateRegion {
    /// Region centered on `center` covering the given distances edge to edge
    pub fn from_distance(
        center: Coordinate,
        latitudinal_meters: f64,
        longitudinal_meters: f64,
    ) -> Self {
        Self {
            center,
            span: CoordinateSpan {
                latitude_delta: meters_to_latitude_degrees(latitudinal_meters),
                longitude_delta: meters_to_longitude_degrees(
                    longitudinal_meters,
                    center.latitude(),
                ),
            },
        }
    }

    pub fn min_latitude(&self) -> f64 {
        (self.center.latitude() - self.span.latitude_delta / 2.0).max(-90.0)
    }

    pub fn max_latitude(&self) -> f64 {
        (self.center.latitude() + self.span.latitude_delta / 2.0).min(90.0)
    }

    pub fn min_longitude(&self) -> f64 {
        (self.center.longitude() - self.span.longitude_delta / 2.0).max(-180.0)
    }

    pub fn max_longitude(&self) -> f64 {
        (self.center.longitude() + self.span.longitude_delta / 2.0).min(180.0)
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        (self.min_latitude()..=self.max_latitude()).contains(&coordinate.latitude())
            && (self.min_longitude()..=self.max_longitude()).contains(&coordinate.longitude())
    }

    /// Nearest coordinate inside the region
    pub fn clamp(&self, coordinate: Coordinate) -> Coordinate {
        Coordinate {
            latitude: coordinate
                .latitude()
                .clamp(self.min_latitude(), self.max_latitude()),
            longitude: coordinate
                .longitude()
                .clamp(self.min_longitude(), self.max_longitude()),
        }
    }
}

/// Limits on how far the camera may sit from the map center, in meters.
///
/// `None` means unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraZoomRange {
    pub min_center_distance: Option<f64>,
    pub max_center_distance: Option<f64>,
}

impl CameraZoomRange {
    pub fn with_max(max_center_distance: f64) -> Self {
        Self {
            min_center_distance: None,
            max_center_distance: Some(max_center_distance),
        }
    }

    pub fn clamp(&self, distance: f64) -> f64 {
        let distance = match self.min_center_distance {
            Some(min) => distance.max(min),
            None => distance,
        };
        match self.max_center_distance {
            Some(max) => distance.min(max),
            None => distance,
        }
    }
}

/// Equirectangular projection into a local metric plane.
///
/// `x` grows east and `y` grows north, both in meters from `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalProjection {
    pub origin: Coordinate,
}

impl LocalProjection {
    pub fn new(origin: Coordinate) -> Self {
        Self { origin }
    }

    fn longitude_scale(&self) -> f64 {
        self.origin.latitude().to_radians().cos().max(f64::EPSILON)
    }

    pub fn project(&self, coordinate: Coordinate) -> (f64, f64) {
        let x = (coordinate.longitude() - self.origin.longitude())
            * METERS_PER_DEGREE
            * self.longitude_scale();
        let y = (coordinate.latitude() - self.origin.latitude()) * METERS_PER_DEGREE;
        (x, y)
    }

    /// Inverse of [`project`](Self::project). Fails for points off the globe.
    pub fn unproject(&self, x: f64, y: f64) -> Result<Coordinate, CoordinateError> {
        let latitude = self.origin.latitude() + y / METERS_PER_DEGREE;
        let longitude =
            self.origin.longitude() + x / (METERS_PER_DEGREE * self.longitude_scale());
        Coordinate::new(latitude, longitude)
    }
}
