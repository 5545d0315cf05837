//! The location record persisted in the per-day logs.

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::capture::params::CaptureParams;

/// Metadata about the client that submitted a capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub user_agent: Option<String>,
    pub ip: String,
}

/// One captured coordinate submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    /// Capture time in milliseconds since the Unix epoch.
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    /// Client-supplied timestamp, or the capture time.
    pub timestamp: String,
    #[serde(serialize_with = "serialize_millis")]
    pub captured_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub ip: String,
}

impl LocationRecord {
    pub fn new(params: CaptureParams, client: ClientInfo, now: DateTime<Utc>) -> Self {
        let captured_at = now.trunc_subsecs(3);
        let timestamp = params
            .timestamp
            .unwrap_or_else(|| format_millis(&captured_at));

        Self {
            id: captured_at.timestamp_millis(),
            latitude: params.latitude,
            longitude: params.longitude,
            accuracy: params.accuracy,
            timestamp,
            captured_at,
            user_agent: client.user_agent,
            ip: client.ip,
        }
    }

    /// The UTC calendar date whose log file holds this record.
    pub fn log_date(&self) -> NaiveDate {
        self.captured_at.date_naive()
    }

    pub fn maps_url(&self) -> String {
        format!(
            "https://www.google.com/maps?q={},{}",
            self.latitude, self.longitude
        )
    }
}

/// RFC 3339 with millisecond precision and a `Z` suffix.
pub fn format_millis(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_millis<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_millis(at))
}
