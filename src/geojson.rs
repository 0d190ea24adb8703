//! Minimal GeoJSON (RFC 7946) document model.
//!
//! Only what the point-of-interest loader needs: the document is decoded into
//! a flat list of top-level objects (the members of a `FeatureCollection`, or
//! the single object otherwise). Decoding is all-or-nothing.

use serde::Deserialize;
use serde_json::Value;

/// `[longitude, latitude]` with an optional trailing altitude
pub type Position = Vec<f64>;

/// Non-point geometries are decoded in full but only their type is ever looked at.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
#[allow(dead_code)]
pub enum Geometry {
    Point {
        coordinates: Position,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<Geometry>,
    },
}

impl Geometry {
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::MultiPoint { .. } => "MultiPoint",
            Geometry::LineString { .. } => "LineString",
            Geometry::MultiLineString { .. } => "MultiLineString",
            Geometry::Polygon { .. } => "Polygon",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
            Geometry::GeometryCollection { .. } => "GeometryCollection",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
enum FeatureTag {
    Feature,
}

/// A geometry paired with an optional, free-form property payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    _kind: FeatureTag,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Value>,
}

const GEOMETRY_TYPES: [&str; 7] = [
    "Point",
    "MultiPoint",
    "LineString",
    "MultiLineString",
    "Polygon",
    "MultiPolygon",
    "GeometryCollection",
];

/// Why a single GeoJSON object could not be decoded
#[derive(Debug)]
pub enum ObjectError {
    /// `type` is missing, not a string, or not a GeoJSON object type
    UnknownType(Option<String>),
    /// The type was recognized but the members do not fit it
    Invalid(serde_json::Error),
}

impl std::fmt::Display for ObjectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectError::UnknownType(Some(kind)) => write!(f, "unknown GeoJSON type \"{}\"", kind),
            ObjectError::UnknownType(None) => write!(f, "object has no \"type\""),
            ObjectError::Invalid(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ObjectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ObjectError::UnknownType(_) => None,
            ObjectError::Invalid(e) => Some(e),
        }
    }
}

/// Why a whole document was rejected
#[derive(Debug)]
pub enum DocumentError {
    /// Not JSON at all; carries line and column
    Syntax(serde_json::Error),
    MissingFeatures,
    /// The document is a single object and that object is bad
    Object(ObjectError),
    /// Member `index` of a collection's `features` is bad
    Member { index: usize, source: ObjectError },
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentError::Syntax(e) => write!(f, "{}", e),
            DocumentError::MissingFeatures => {
                write!(f, "FeatureCollection has no \"features\" array")
            }
            DocumentError::Object(e) => write!(f, "{}", e),
            DocumentError::Member { index, source } => write!(f, "feature #{}: {}", index, source),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocumentError::Syntax(e) => Some(e),
            DocumentError::MissingFeatures => None,
            DocumentError::Object(e) | DocumentError::Member { source: e, .. } => Some(e),
        }
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(err: serde_json::Error) -> Self {
        DocumentError::Syntax(err)
    }
}

impl From<ObjectError> for DocumentError {
    fn from(err: ObjectError) -> Self {
        DocumentError::Object(err)
    }
}

fn type_name(value: &Value) -> Option<&str> {
    value.get("type").and_then(Value::as_str)
}

/// Any top-level GeoJSON object other than a collection
#[derive(Debug, Clone, PartialEq)]
pub enum GeoJsonObject {
    Feature(Feature),
    Geometry(Geometry),
}

impl GeoJsonObject {
    /// Decode by looking at `type` first, so errors name the real problem
    pub fn from_value(value: Value) -> Result<Self, ObjectError> {
        match type_name(&value) {
            Some("Feature") => serde_json::from_value(value)
                .map(GeoJsonObject::Feature)
                .map_err(ObjectError::Invalid),
            Some(kind) if GEOMETRY_TYPES.contains(&kind) => serde_json::from_value(value)
                .map(GeoJsonObject::Geometry)
                .map_err(ObjectError::Invalid),
            other => Err(ObjectError::UnknownType(other.map(String::from))),
        }
    }

    pub fn into_feature(self) -> Option<Feature> {
        match self {
            GeoJsonObject::Feature(feature) => Some(feature),
            GeoJsonObject::Geometry(_) => None,
        }
    }
}

/// Decode a GeoJSON document into its top-level objects, in document order.
pub fn decode_document(bytes: &[u8]) -> Result<Vec<GeoJsonObject>, DocumentError> {
    let mut document: Value = serde_json::from_slice(bytes)?;

    if type_name(&document) != Some("FeatureCollection") {
        return Ok(vec![GeoJsonObject::from_value(document)?]);
    }

    let Some(Value::Array(features)) = document.get_mut("features").map(Value::take) else {
        return Err(DocumentError::MissingFeatures);
    };
    features
        .into_iter()
        .enumerate()
        .map(|(index, member)| {
            GeoJsonObject::from_value(member)
                .map_err(|source| DocumentError::Member { index, source })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature_at(objects: &[GeoJsonObject], index: usize) -> Option<&Feature> {
        match &objects[index] {
            GeoJsonObject::Feature(feature) => Some(feature),
            GeoJsonObject::Geometry(_) => None,
        }
    }

    #[test]
    fn test_decode_feature_collection() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [-0.51, 38.38] },
                    "properties": { "title": "Aceituna" }
                },
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[-0.51, 38.38], [-0.52, 38.39]]
                    },
                    "properties": null
                }
            ]
        }"#;

        let objects = decode_document(json.as_bytes()).unwrap();
        assert_eq!(objects.len(), 2);

        let first = feature_at(&objects, 0).unwrap();
        assert_eq!(
            first.geometry,
            Some(Geometry::Point {
                coordinates: vec![-0.51, 38.38]
            })
        );
        assert_eq!(first.properties, Some(json!({ "title": "Aceituna" })));

        let second = feature_at(&objects, 1).unwrap();
        assert_eq!(second.geometry.as_ref().map(Geometry::kind), Some("LineString"));
        assert!(second.properties.is_none());
    }

    #[test]
    fn test_decode_single_feature() {
        let json = r#"{
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [1.0, 2.0] }
        }"#;
        let objects = decode_document(json.as_bytes()).unwrap();
        assert_eq!(objects.len(), 1);
        assert!(feature_at(&objects, 0).is_some());
    }

    #[test]
    fn test_decode_bare_geometry_is_not_a_feature() {
        let json = r#"{ "type": "Point", "coordinates": [1.0, 2.0] }"#;
        let objects = decode_document(json.as_bytes()).unwrap();
        assert_eq!(objects.len(), 1);
        assert!(feature_at(&objects, 0).is_none());
    }

    #[test]
    fn test_decode_null_geometry() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{ "type": "Feature", "geometry": null, "properties": {} }]
        }"#;
        let objects = decode_document(json.as_bytes()).unwrap();
        let feature = feature_at(&objects, 0).unwrap();
        assert!(feature.geometry.is_none());
        assert_eq!(feature.properties, Some(json!({})));
    }

    #[test]
    fn test_decode_rejects_malformed_document() {
        assert!(matches!(
            decode_document(b"not json"),
            Err(DocumentError::Syntax(_))
        ));
        assert!(matches!(
            decode_document(br#"{ "type": "FeatureCollection" }"#),
            Err(DocumentError::MissingFeatures)
        ));
        assert!(matches!(
            decode_document(br#"{ "type": "Banana" }"#),
            Err(DocumentError::Object(ObjectError::UnknownType(Some(ref kind)))) if kind == "Banana"
        ));
        // One bad member fails the whole document
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [1.0, 2.0] } },
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": "oops" } }
            ]
        }"#;
        assert!(matches!(
            decode_document(json.as_bytes()),
            Err(DocumentError::Member { index: 1, .. })
        ));
    }

    #[test]
    fn test_decode_error_names_the_bad_member() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": null },
                { "type": "Feature", "geometry": null },
                { "type": "Feture", "geometry": null }
            ]
        }"#;
        let err = decode_document(json.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "feature #2: unknown GeoJSON type \"Feture\"");

        let json = r#"{
            "type": "FeatureCollection",
            "features": [{ "type": "Feature", "geometry": { "type": "Point", "coordinates": "oops" } }]
        }"#;
        let message = decode_document(json.as_bytes()).unwrap_err().to_string();
        assert!(message.starts_with("feature #0: invalid type"), "{}", message);
        assert!(!message.contains("did not match any variant"), "{}", message);
    }

    #[test]
    fn test_syntax_error_keeps_position() {
        let err = decode_document(b"{\n  \"type\": \"Feature\",\n  oops\n}").unwrap_err();
        assert!(err.to_string().contains("line 3"), "{}", err);
    }
}
