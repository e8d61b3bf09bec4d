//! HTTP client for the analysis API.

use nagrik_core::api::{
    AnalyzeRequest, AnalyzeResponse, BatchRequest, BatchResponse, ClassifyResponse,
    HealthResponse, StatsResponse,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Client for a running `nagrik serve` instance.
pub struct AnalysisClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnalysisClient {
    /// `base_url` like `http://localhost:5000`. A trailing slash is dropped.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.get("/health").await
    }

    /// Classify one complaint text.
    pub async fn analyze(&self, text: &str) -> Result<AnalyzeResponse, ClientError> {
        let req = AnalyzeRequest {
            complaint: text.to_string(),
        };
        let resp: AnalyzeResponse = self.post("/analyze", &req).await?;
        info!(
            department = %resp.analysis.department,
            priority = %resp.analysis.priority,
            "remote analysis complete"
        );
        Ok(resp)
    }

    pub async fn batch_analyze(&self, texts: &[String]) -> Result<BatchResponse, ClientError> {
        let req = BatchRequest {
            complaints: texts.to_vec(),
        };
        self.post("/batch-analyze", &req).await
    }

    /// Re-classify a stored complaint by id.
    pub async fn classify_complaint(&self, id: &str) -> Result<ClassifyResponse, ClientError> {
        self.post(&format!("/classify-complaint/{id}"), &serde_json::json!({}))
            .await
    }

    pub async fn stats(&self) -> Result<StatsResponse, ClientError> {
        self.get("/stats").await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "GET");
        let resp = self.client.get(&url).send().await?;
        Self::decode(resp).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "POST");
        let resp = self.client.post(&url).json(body).send().await?;
        Self::decode(resp).await
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
