//! Endpoint handlers.

use std::io::ErrorKind;
use std::net::SocketAddr;

use axum::{
    extract::{rejection::QueryRejection, ConnectInfo, Query, State},
    http::HeaderMap,
    response::Html,
    Extension, Json,
};
use chrono::{NaiveDate, Utc};

use crate::capture::{CaptureQuery, LocationRecord};
use crate::http::request::client_info;
use crate::http::response::{ApiError, CaptureEnvelope, HealthStatus, ListEnvelope};
use crate::http::server::AppState;
use crate::observability::metrics;

/// Decoded query pairs in request order. Repeated keys are kept so that
/// each handler can pick the first occurrence.
type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

/// Optional day selector for `/logs`.
#[derive(Debug, Default)]
pub struct LogsQuery {
    pub date: Option<String>,
}

impl LogsQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self {
            date: pairs
                .into_iter()
                .find(|(key, _)| key == "date")
                .map(|(_, value)| value),
        }
    }
}

/// `GET /`: the capture page.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let path = &state.config.http.index_path;
    match tokio::fs::read_to_string(path).await {
        Ok(page) => Ok(Html(page)),
        Err(e) => {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(path = %path, error = %e, "Failed to read index page");
            }
            Err(ApiError::NotFound)
        }
    }
}

/// `GET /capture`: validate, record and persist one location.
pub async fn capture(
    State(state): State<AppState>,
    peer: Option<Extension<ConnectInfo<SocketAddr>>>,
    headers: HeaderMap,
    query: QueryPairs,
) -> Result<Json<CaptureEnvelope>, ApiError> {
    let Query(pairs) = query?;
    let params = CaptureQuery::from_pairs(pairs).validate().map_err(|e| {
        tracing::warn!(error = %e, "Rejected capture");
        metrics::record_capture_rejected(e.reason());
        e
    })?;

    let peer = peer.map(|Extension(ConnectInfo(addr))| addr);
    let client = client_info(&headers, peer, state.config.http.trust_forwarded_for);
    let record = LocationRecord::new(params, client, Utc::now());

    tracing::info!(
        latitude = record.latitude,
        longitude = record.longitude,
        accuracy_m = ?record.accuracy,
        timestamp = %record.timestamp,
        user_agent = record.user_agent.as_deref().unwrap_or("unknown"),
        ip = %record.ip,
        maps = %record.maps_url(),
        "New location captured"
    );

    let record = state.store.append(record).await.map_err(|e| {
        metrics::record_storage_error("append");
        ApiError::storage("Failed to save location data", e)
    })?;
    metrics::record_capture();

    Ok(Json(CaptureEnvelope::new(record)))
}

/// `GET /logs`: today's records, or those of `?date=YYYY-MM-DD`.
pub async fn logs(
    State(state): State<AppState>,
    query: QueryPairs,
) -> Result<Json<ListEnvelope<LocationRecord>>, ApiError> {
    let Query(pairs) = query?;
    let query = LogsQuery::from_pairs(pairs);
    let records = match query.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => state.store.read_day(parse_date(raw)?).await,
        None => state.store.read_today().await,
    };

    let records = records.map_err(|e| {
        metrics::record_storage_error("read_day");
        ApiError::storage("Failed to read logs", e)
    })?;

    Ok(Json(ListEnvelope::new(records)))
}

/// `GET /logs/all`: every record of every day.
pub async fn all_logs(
    State(state): State<AppState>,
) -> Result<Json<ListEnvelope<LocationRecord>>, ApiError> {
    let records = state.store.read_all().await.map_err(|e| {
        metrics::record_storage_error("read_all");
        ApiError::storage("Failed to read all logs", e)
    })?;

    Ok(Json(ListEnvelope::new(records)))
}

/// `GET /logs/days`: dates that have a log file.
pub async fn days(State(state): State<AppState>) -> Result<Json<ListEnvelope<NaiveDate>>, ApiError> {
    let days = state.store.list_days().await.map_err(|e| {
        metrics::record_storage_error("list_days");
        ApiError::storage("Failed to read all logs", e)
    })?;

    Ok(Json(ListEnvelope::new(days)))
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| ApiError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(matches!(parse_date("2023-02-29"), Err(ApiError::InvalidDate(_))));
        assert!(matches!(parse_date("today"), Err(ApiError::InvalidDate(_))));
    }

    #[test]
    fn test_logs_query_takes_first_date() {
        let pairs = vec![
            ("date".to_string(), "2024-05-01".to_string()),
            ("date".to_string(), "2024-05-02".to_string()),
        ];
        assert_eq!(LogsQuery::from_pairs(pairs).date.as_deref(), Some("2024-05-01"));
        assert_eq!(LogsQuery::from_pairs(Vec::new()).date, None);
    }
}
