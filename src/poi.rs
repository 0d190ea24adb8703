//! Points of interest shown as annotations on the map.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geo::{Coordinate, CoordinateError};
use crate::geojson::{Feature, Geometry};

/// Why a feature could not become a [`PointOfInterest`]
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureDecodeError {
    MissingGeometry,
    /// Carries the GeoJSON type name of the geometry that was found
    NotAPoint(&'static str),
    MalformedPosition,
    InvalidCoordinate(CoordinateError),
    MissingProperties,
    PropertiesNotAnObject,
}

impl std::fmt::Display for FeatureDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureDecodeError::MissingGeometry => write!(f, "feature has no geometry"),
            FeatureDecodeError::NotAPoint(kind) => {
                write!(f, "geometry is a {}, expected a Point", kind)
            }
            FeatureDecodeError::MalformedPosition => {
                write!(f, "point position needs a longitude and a latitude")
            }
            FeatureDecodeError::InvalidCoordinate(e) => write!(f, "invalid coordinate: {}", e),
            FeatureDecodeError::MissingProperties => write!(f, "feature has no properties"),
            FeatureDecodeError::PropertiesNotAnObject => {
                write!(f, "properties are not a key-value object")
            }
        }
    }
}

impl std::error::Error for FeatureDecodeError {}

impl From<CoordinateError> for FeatureDecodeError {
    fn from(err: CoordinateError) -> Self {
        FeatureDecodeError::InvalidCoordinate(err)
    }
}

/// Travel mode requested from the navigation app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionsMode {
    #[default]
    Driving,
    Walking,
    Transit,
}

impl DirectionsMode {
    /// Value of the `dirflg` query parameter understood by maps URLs
    pub fn url_flag(&self) -> &'static str {
        match self {
            DirectionsMode::Driving => "d",
            DirectionsMode::Walking => "w",
            DirectionsMode::Transit => "r",
        }
    }
}

/// Everything the navigation app needs to route to a point of interest
#[derive(Debug, Clone, PartialEq)]
pub struct MapItem {
    pub name: Option<String>,
    pub coordinate: Coordinate,
    pub street: String,
}

impl MapItem {
    pub fn directions_url(&self, mode: DirectionsMode) -> String {
        format!(
            "https://maps.apple.com/?daddr={},{}&dirflg={}",
            self.coordinate.latitude(),
            self.coordinate.longitude(),
            mode.url_flag()
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointOfInterest {
    title: Option<String>,
    subtitle: Option<String>,
    coordinate: Coordinate,
    location_name: Option<String>,
}

impl PointOfInterest {
    pub fn new(title: Option<String>, subtitle: Option<String>, coordinate: Coordinate) -> Self {
        Self {
            title,
            subtitle,
            coordinate,
            location_name: None,
        }
    }

    /// Build from a GeoJSON feature.
    ///
    /// Title and subtitle come from the `title` and `description` properties;
    /// values that are missing or not strings leave them empty.
    pub fn from_feature(feature: &Feature) -> Result<Self, FeatureDecodeError> {
        let coordinate = match &feature.geometry {
            None => return Err(FeatureDecodeError::MissingGeometry),
            Some(Geometry::Point { coordinates }) => point_coordinate(coordinates)?,
            Some(other) => return Err(FeatureDecodeError::NotAPoint(other.kind())),
        };

        let properties = match &feature.properties {
            None | Some(Value::Null) => return Err(FeatureDecodeError::MissingProperties),
            Some(Value::Object(map)) => map,
            Some(_) => return Err(FeatureDecodeError::PropertiesNotAnObject),
        };

        let text = |key: &str| properties.get(key).and_then(Value::as_str).map(String::from);

        Ok(Self::new(text("title"), text("description"), coordinate))
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn location_name(&self) -> Option<&str> {
        self.location_name.as_deref()
    }

    pub fn set_location_name(&mut self, name: impl Into<String>) {
        self.location_name = Some(name.into());
    }

    /// Handoff record for the navigation app, only once a location name is known
    pub fn map_item(&self) -> Option<MapItem> {
        let street = self.location_name.clone()?;
        Some(MapItem {
            name: self.title.clone(),
            coordinate: self.coordinate,
            street,
        })
    }
}

impl TryFrom<&Feature> for PointOfInterest {
    type Error = FeatureDecodeError;

    fn try_from(feature: &Feature) -> Result<Self, Self::Error> {
        Self::from_feature(feature)
    }
}

// GeoJSON positions are [longitude, latitude, altitude?]
fn point_coordinate(position: &[f64]) -> Result<Coordinate, FeatureDecodeError> {
    match position {
        [longitude, latitude, ..] => Ok(Coordinate::new(*latitude, *longitude)?),
        _ => Err(FeatureDecodeError::MalformedPosition),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn point(lat: f64, lon: f64) -> Value {
        json!({ "type": "Point", "coordinates": [lon, lat] })
    }

    fn point_feature(geometry: Value, properties: Value) -> Feature {
        serde_json::from_value(json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": properties,
        }))
        .unwrap()
    }

    #[test]
    fn test_new_has_no_location_name() {
        let poi = PointOfInterest::new(
            Some("Aceituna".to_string()),
            None,
            Coordinate::new(38.384126, -0.5118115).unwrap(),
        );
        assert_eq!(poi.title(), Some("Aceituna"));
        assert!(poi.subtitle().is_none());
        assert!(poi.location_name().is_none());
    }

    #[test]
    fn test_from_feature_reads_title_and_description() {
        let feature = point_feature(
            point(38.38, -0.51),
            json!({ "title": "Aceituna", "description": "desc" }),
        );
        let poi = PointOfInterest::from_feature(&feature).unwrap();
        assert_eq!(poi.title(), Some("Aceituna"));
        assert_eq!(poi.subtitle(), Some("desc"));
        assert_eq!(poi.coordinate(), Coordinate::new(38.38, -0.51).unwrap());
    }

    #[test]
    fn test_try_from_matches_from_feature() {
        let feature = point_feature(point(38.38, -0.51), json!({ "title": "Aceituna" }));
        assert_eq!(
            PointOfInterest::try_from(&feature),
            PointOfInterest::from_feature(&feature)
        );
    }

    #[test]
    fn test_from_feature_non_text_values_are_absent() {
        let feature = point_feature(
            point(38.38, -0.51),
            json!({ "title": 42, "description": null, "color": "black" }),
        );
        let poi = PointOfInterest::from_feature(&feature).unwrap();
        assert!(poi.title().is_none());
        assert!(poi.subtitle().is_none());
    }

    #[test]
    fn test_from_feature_nested_properties_are_fine() {
        let feature = point_feature(
            point(38.38, -0.51),
            json!({ "title": "Churro", "owner": { "name": "Library" } }),
        );
        let poi = PointOfInterest::from_feature(&feature).unwrap();
        assert_eq!(poi.title(), Some("Churro"));
    }

    #[test]
    fn test_from_feature_empty_properties_is_ok() {
        let feature = point_feature(point(1.0, 2.0), json!({}));
        let poi = PointOfInterest::from_feature(&feature).unwrap();
        assert!(poi.title().is_none());
        assert_eq!(poi.coordinate().latitude(), 1.0);
        assert_eq!(poi.coordinate().longitude(), 2.0);
    }

    #[test]
    fn test_from_feature_keeps_altitude_out() {
        let feature = point_feature(
            json!({ "type": "Point", "coordinates": [-0.51, 38.38, 120.0] }),
            json!({}),
        );
        let poi = PointOfInterest::from_feature(&feature).unwrap();
        assert_eq!(poi.coordinate(), Coordinate::new(38.38, -0.51).unwrap());
    }

    #[test]
    fn test_from_feature_rejects_non_point() {
        let feature = point_feature(
            json!({ "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] }),
            json!({ "title": "road" }),
        );
        assert_eq!(
            PointOfInterest::from_feature(&feature),
            Err(FeatureDecodeError::NotAPoint("LineString"))
        );

        let feature = point_feature(
            json!({ "type": "MultiPoint", "coordinates": [[0.0, 0.0]] }),
            json!({}),
        );
        assert!(PointOfInterest::from_feature(&feature).is_err());
    }

    #[test]
    fn test_from_feature_rejects_missing_geometry() {
        let feature = point_feature(Value::Null, json!({}));
        assert_eq!(
            PointOfInterest::from_feature(&feature),
            Err(FeatureDecodeError::MissingGeometry)
        );
    }

    #[test]
    fn test_from_feature_rejects_missing_or_bad_properties() {
        let feature = point_feature(point(1.0, 1.0), Value::Null);
        assert_eq!(
            PointOfInterest::from_feature(&feature),
            Err(FeatureDecodeError::MissingProperties)
        );

        let feature = point_feature(point(1.0, 1.0), json!("title"));
        assert_eq!(
            PointOfInterest::from_feature(&feature),
            Err(FeatureDecodeError::PropertiesNotAnObject)
        );

        let feature = point_feature(point(1.0, 1.0), json!(["title", "x"]));
        assert_eq!(
            PointOfInterest::from_feature(&feature),
            Err(FeatureDecodeError::PropertiesNotAnObject)
        );
    }

    #[test]
    fn test_from_feature_rejects_bad_positions() {
        let feature = point_feature(json!({ "type": "Point", "coordinates": [1.0] }), json!({}));
        assert_eq!(
            PointOfInterest::from_feature(&feature),
            Err(FeatureDecodeError::MalformedPosition)
        );

        let feature = point_feature(point(95.0, 0.0), json!({}));
        assert!(matches!(
            PointOfInterest::from_feature(&feature),
            Err(FeatureDecodeError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn test_map_item_requires_location_name() {
        let mut poi = PointOfInterest::new(
            Some("Aceituna".to_string()),
            Some("Skinny".to_string()),
            Coordinate::new(38.384126, -0.5118115).unwrap(),
        );
        assert!(poi.map_item().is_none());

        poi.set_location_name("Universidad de Alicante");
        let item = poi.map_item().unwrap();
        assert_eq!(item.name.as_deref(), Some("Aceituna"));
        assert_eq!(item.street, "Universidad de Alicante");
        assert_eq!(item.coordinate, poi.coordinate());
    }

    #[test]
    fn test_map_item_without_title() {
        let mut poi = PointOfInterest::new(None, None, Coordinate::new(0.0, 0.0).unwrap());
        poi.set_location_name("Somewhere");
        let item = poi.map_item().unwrap();
        assert!(item.name.is_none());
    }

    #[test]
    fn test_directions_url() {
        let item = MapItem {
            name: None,
            coordinate: Coordinate::new(38.5, -0.5).unwrap(),
            street: "Campus".to_string(),
        };
        assert_eq!(
            item.directions_url(DirectionsMode::Driving),
            "https://maps.apple.com/?daddr=38.5,-0.5&dirflg=d"
        );
        assert!(item.directions_url(DirectionsMode::Walking).ends_with("dirflg=w"));
    }

    #[test]
    fn test_directions_mode_serde() {
        let mode: DirectionsMode = serde_json::from_str("\"walking\"").unwrap();
        assert_eq!(mode, DirectionsMode::Walking);
        assert_eq!(serde_json::to_string(&DirectionsMode::Driving).unwrap(), "\"driving\"");
    }
}
