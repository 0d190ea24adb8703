//! Reverse geocoding of tapped coordinates.
//!
//! The lookup result is display-only: it is turned into a [`GeocodeOutcome`]
//! and logged, never attached to map state.

use serde::Deserialize;
use tracing::{info, warn};

use crate::geo::Coordinate;

/// Public Nominatim reverse endpoint
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/reverse";

const USER_AGENT: &str = concat!("maproutes/", env!("CARGO_PKG_VERSION"));

/// Human-readable description of a place
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placemark {
    pub name: Option<String>,
    pub locality: Option<String>,
    pub country: Option<String>,
}

impl Placemark {
    /// `"name, locality, country"` when all three parts are known
    pub fn formatted_address(&self) -> Option<String> {
        match (&self.name, &self.locality, &self.country) {
            (Some(name), Some(locality), Some(country)) => {
                Some(format!("{}, {}, {}", name, locality, country))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodeError {
    /// The server answered with a non-success status
    Status(u16),
    Transport(String),
    Parse(String),
}

impl std::fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeocodeError::Status(code) => write!(f, "geocoder returned HTTP {}", code),
            GeocodeError::Transport(msg) => write!(f, "geocoder unreachable: {}", msg),
            GeocodeError::Parse(msg) => write!(f, "unreadable geocoder response: {}", msg),
        }
    }
}

impl std::error::Error for GeocodeError {}

impl From<ureq::Error> for GeocodeError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => GeocodeError::Status(code),
            ureq::Error::Transport(transport) => GeocodeError::Transport(transport.to_string()),
        }
    }
}

/// Resolves coordinates to places. Implementations may block; callers run
/// them off the main thread.
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` means the service answered but knows nothing about the spot
    fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Option<Placemark>, GeocodeError>;
}

/// Final, loggable result of a reverse-geocoding request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodeOutcome {
    Failed(String),
    NoResult,
    Address(String),
    NoAddress,
}

impl GeocodeOutcome {
    pub fn from_result(result: Result<Option<Placemark>, GeocodeError>) -> Self {
        match result {
            Err(e) => GeocodeOutcome::Failed(e.to_string()),
            Ok(None) => GeocodeOutcome::NoResult,
            Ok(Some(placemark)) => match placemark.formatted_address() {
                Some(address) => GeocodeOutcome::Address(address),
                None => GeocodeOutcome::NoAddress,
            },
        }
    }

    pub fn log(&self, coordinate: Coordinate) {
        match self {
            GeocodeOutcome::Failed(_) => warn!("Reverse geocoding {} failed: {}", coordinate, self),
            _ => info!("Reverse geocoding {}: {}", coordinate, self),
        }
    }
}

impl std::fmt::Display for GeocodeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeocodeOutcome::Failed(description) => write!(f, "{}", description),
            GeocodeOutcome::NoResult => write!(f, "no result"),
            GeocodeOutcome::Address(address) => write!(f, "{}", address),
            GeocodeOutcome::NoAddress => write!(f, "no address found"),
        }
    }
}

/// Subset of a Nominatim `jsonv2` reverse response.
///
/// Example JSON:
/// ```json
/// {
///   "name": "Universidad de Alicante",
///   "display_name": "Universidad de Alicante, San Vicente del Raspeig, Spain",
///   "address": { "town": "San Vicente del Raspeig", "country": "España" }
/// }
/// ```
/// Unknown places come back as `{ "error": "Unable to geocode" }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<NominatimAddress>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub municipality: Option<String>,
    pub country: Option<String>,
}

impl NominatimResponse {
    pub fn into_placemark(self) -> Option<Placemark> {
        if self.error.is_some() {
            return None;
        }
        let address = self.address.unwrap_or_default();
        let locality = address
            .city
            .or(address.town)
            .or(address.village)
            .or(address.municipality);
        Some(Placemark {
            name: self.name.filter(|name| !name.is_empty()),
            locality,
            country: address.country,
        })
    }
}

/// Reverse geocoding through a Nominatim-compatible HTTP service
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    endpoint: String,
}

impl NominatimGeocoder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self::new(DEFAULT_GEOCODER_URL)
    }
}

impl Geocoder for NominatimGeocoder {
    fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Option<Placemark>, GeocodeError> {
        let response = ureq::get(&self.endpoint)
            .set("User-Agent", USER_AGENT)
            .query("format", "jsonv2")
            .query("lat", &coordinate.latitude().to_string())
            .query("lon", &coordinate.longitude().to_string())
            .call()?;

        let body: NominatimResponse = response
            .into_json()
            .map_err(|e| GeocodeError::Parse(e.to_string()))?;
        Ok(body.into_placemark())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placemark(name: Option<&str>, locality: Option<&str>, country: Option<&str>) -> Placemark {
        Placemark {
            name: name.map(String::from),
            locality: locality.map(String::from),
            country: country.map(String::from),
        }
    }

    #[test]
    fn test_outcome_full_address() {
        let outcome = GeocodeOutcome::from_result(Ok(Some(placemark(Some("A"), Some("B"), Some("C")))));
        assert_eq!(outcome, GeocodeOutcome::Address("A, B, C".to_string()));
        assert_eq!(outcome.to_string(), "A, B, C");
    }

    #[test]
    fn test_outcome_partial_address() {
        let outcome = GeocodeOutcome::from_result(Ok(Some(placemark(Some("A"), None, None))));
        assert_eq!(outcome, GeocodeOutcome::NoAddress);
        assert_eq!(outcome.to_string(), "no address found");

        let outcome = GeocodeOutcome::from_result(Ok(Some(placemark(Some("A"), Some("B"), None))));
        assert_eq!(outcome, GeocodeOutcome::NoAddress);
    }

    #[test]
    fn test_outcome_no_result() {
        let outcome = GeocodeOutcome::from_result(Ok(None));
        assert_eq!(outcome.to_string(), "no result");
    }

    #[test]
    fn test_outcome_error_keeps_description() {
        let outcome = GeocodeOutcome::from_result(Err(GeocodeError::Status(503)));
        assert_eq!(outcome, GeocodeOutcome::Failed("geocoder returned HTTP 503".to_string()));
    }

    #[test]
    fn test_nominatim_response_parsing() {
        let json = r#"{
            "place_id": 1234,
            "name": "Universidad de Alicante",
            "display_name": "Universidad de Alicante, San Vicente del Raspeig, España",
            "address": {
                "amenity": "Universidad de Alicante",
                "town": "San Vicente del Raspeig",
                "country": "España",
                "country_code": "es"
            }
        }"#;

        let response: NominatimResponse = serde_json::from_str(json).unwrap();
        let placemark = response.into_placemark().unwrap();
        assert_eq!(
            placemark.formatted_address().as_deref(),
            Some("Universidad de Alicante, San Vicente del Raspeig, España")
        );
    }

    #[test]
    fn test_nominatim_city_preferred_over_town() {
        let json = r#"{ "name": "X", "address": { "city": "Alicante", "town": "Other", "country": "ES" } }"#;
        let response: NominatimResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.into_placemark().unwrap().locality.as_deref(),
            Some("Alicante")
        );
    }

    #[test]
    fn test_nominatim_error_is_no_result() {
        let json = r#"{ "error": "Unable to geocode" }"#;
        let response: NominatimResponse = serde_json::from_str(json).unwrap();
        assert!(response.into_placemark().is_none());
    }

    #[test]
    fn test_nominatim_empty_name_is_missing() {
        let json = r#"{ "name": "", "address": { "village": "V", "country": "C" } }"#;
        let response: NominatimResponse = serde_json::from_str(json).unwrap();
        let placemark = response.into_placemark().unwrap();
        assert!(placemark.name.is_none());
        assert_eq!(
            GeocodeOutcome::from_result(Ok(Some(placemark))),
            GeocodeOutcome::NoAddress
        );
    }
}
