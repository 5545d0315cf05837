use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A captured location as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub timestamp: String,
    pub captured_at: String,
    #[serde(default)]
    pub user_agent: Option<String>,
    pub ip: String,
}

/// Parameters of a `/capture` call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CaptureRequest {
    pub lat: f64,
    pub lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptureResponse {
    pub success: bool,
    pub message: String,
    pub data: LocationRecord,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

const NO_QUERY: &[(&str, &str)] = &[];

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SdkError {
    /// HTTP status of an API error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SdkError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub struct LocationClient {
    client: Client,
    base_url: String,
}

impl LocationClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Submit one location.
    pub async fn capture(&self, req: &CaptureRequest) -> Result<CaptureResponse, SdkError> {
        self.get("/capture", req).await
    }

    /// Today's records.
    pub async fn logs(&self) -> Result<ListResponse<LocationRecord>, SdkError> {
        self.get("/logs", NO_QUERY).await
    }

    /// Records of one day, `date` formatted `YYYY-MM-DD`.
    pub async fn logs_for(&self, date: &str) -> Result<ListResponse<LocationRecord>, SdkError> {
        self.get("/logs", &[("date", date)]).await
    }

    /// Records of every day.
    pub async fn all_logs(&self) -> Result<ListResponse<LocationRecord>, SdkError> {
        self.get("/logs/all", NO_QUERY).await
    }

    /// Days that have records.
    pub async fn days(&self) -> Result<ListResponse<String>, SdkError> {
        self.get("/logs/days", NO_QUERY).await
    }

    pub async fn health(&self) -> Result<HealthResponse, SdkError> {
        self.get("/health", NO_QUERY).await
    }

    async fn get<Q, T>(&self, path: &str, query: &Q) -> Result<T, SdkError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(SdkError::Api { status, message });
        }

        Ok(serde_json::from_str(&text)?)
    }
}
