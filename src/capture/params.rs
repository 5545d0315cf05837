//! Query parameter validation for `/capture`.

use thiserror::Error;

/// Raw query string of a capture request. Every field is optional here so
/// that a missing coordinate surfaces as a [`CaptureError`].
#[derive(Debug, Clone, Default)]
pub struct CaptureQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub accuracy: Option<String>,
    pub timestamp: Option<String>,
}

/// Validated capture parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureParams {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub timestamp: Option<String>,
}

/// Why a capture request was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CaptureError {
    #[error("Missing latitude or longitude")]
    MissingCoordinates,

    #[error("Invalid {field}: '{value}' is not a number")]
    InvalidCoordinate { field: &'static str, value: String },

    #[error("{field} {value} is out of range")]
    OutOfRange { field: &'static str, value: f64 },
}

impl CaptureError {
    /// Short label used for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            CaptureError::MissingCoordinates => "missing",
            CaptureError::InvalidCoordinate { .. } => "invalid",
            CaptureError::OutOfRange { .. } => "out_of_range",
        }
    }
}

impl CaptureQuery {
    /// Build from decoded query pairs. A repeated key keeps its first value;
    /// unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "lat" => &mut query.lat,
                "lon" => &mut query.lon,
                "accuracy" => &mut query.accuracy,
                "timestamp" => &mut query.timestamp,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }

    /// Check the query and convert it to typed parameters.
    pub fn validate(&self) -> Result<CaptureParams, CaptureError> {
        let (lat, lon) = match (non_empty(&self.lat), non_empty(&self.lon)) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => return Err(CaptureError::MissingCoordinates),
        };

        let latitude = parse_coordinate("latitude", lat)?;
        let longitude = parse_coordinate("longitude", lon)?;

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CaptureError::OutOfRange {
                field: "latitude",
                value: latitude,
            });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CaptureError::OutOfRange {
                field: "longitude",
                value: longitude,
            });
        }

        // Accuracy is advisory; anything unusable is recorded as null.
        let accuracy = non_empty(&self.accuracy)
            .and_then(|a| a.parse::<f64>().ok())
            .filter(|a| a.is_finite());

        Ok(CaptureParams {
            latitude,
            longitude,
            accuracy,
            timestamp: non_empty(&self.timestamp).map(str::to_string),
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_coordinate(field: &'static str, raw: &str) -> Result<f64, CaptureError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CaptureError::InvalidCoordinate {
            field,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(lat: Option<&str>, lon: Option<&str>) -> CaptureQuery {
        CaptureQuery {
            lat: lat.map(Into::into),
            lon: lon.map(Into::into),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_query() {
        let q = CaptureQuery {
            lat: Some("51.5074".into()),
            lon: Some("-0.1278".into()),
            accuracy: Some("12.5".into()),
            timestamp: Some("2024-05-01T10:00:00.000Z".into()),
        };
        let params = q.validate().unwrap();
        assert_eq!(params.latitude, 51.5074);
        assert_eq!(params.longitude, -0.1278);
        assert_eq!(params.accuracy, Some(12.5));
        assert_eq!(params.timestamp.as_deref(), Some("2024-05-01T10:00:00.000Z"));
    }

    #[test]
    fn test_missing_or_empty_coordinates() {
        assert_eq!(query(None, Some("1")).validate(), Err(CaptureError::MissingCoordinates));
        assert_eq!(query(Some("1"), None).validate(), Err(CaptureError::MissingCoordinates));
        assert_eq!(query(Some(""), Some("1")).validate(), Err(CaptureError::MissingCoordinates));
        assert_eq!(query(Some("1"), Some("  ")).validate(), Err(CaptureError::MissingCoordinates));
    }

    #[test]
    fn test_zero_is_a_coordinate() {
        let params = query(Some("0"), Some("0")).validate().unwrap();
        assert_eq!((params.latitude, params.longitude), (0.0, 0.0));
    }

    #[test]
    fn test_non_numeric_coordinates() {
        let err = query(Some("north"), Some("1")).validate().unwrap_err();
        assert_eq!(
            err,
            CaptureError::InvalidCoordinate {
                field: "latitude",
                value: "north".into()
            }
        );
        assert!(query(Some("1"), Some("NaN")).validate().is_err());
        assert!(query(Some("inf"), Some("1")).validate().is_err());
    }

    #[test]
    fn test_out_of_range() {
        let err = query(Some("90.1"), Some("0")).validate().unwrap_err();
        assert_eq!(err.reason(), "out_of_range");
        assert!(query(Some("0"), Some("-180.5")).validate().is_err());
        assert!(query(Some("-90"), Some("180")).validate().is_ok());
    }

    #[test]
    fn test_from_pairs_keeps_first_value() {
        let q = CaptureQuery::from_pairs([
            ("lat", "1.5"),
            ("lat", "2.5"),
            ("lon", "3"),
            ("zoom", "12"),
        ]);
        assert_eq!(q.lat.as_deref(), Some("1.5"));
        assert_eq!(q.lon.as_deref(), Some("3"));
        assert_eq!(q.accuracy, None);
        assert_eq!(q.validate().unwrap().latitude, 1.5);
    }

    #[test]
    fn test_bad_accuracy_becomes_none() {
        let mut q = query(Some(" 10.0 "), Some("20.0"));
        q.accuracy = Some("about ten".into());
        q.timestamp = Some("".into());
        let params = q.validate().unwrap();
        assert_eq!(params.latitude, 10.0);
        assert_eq!(params.accuracy, None);
        assert_eq!(params.timestamp, None);
    }
}
