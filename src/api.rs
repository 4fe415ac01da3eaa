//! REST plumbing for the lending backend
//!
//! Every endpoint answers with the same envelope, `{ code, message, result?,
//! error? }`. [`Transport`] is the seam between the typed [`ApiClient`] and the
//! wire; [`HttpTransport`] is the reqwest implementation.
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::loan::{CreditRating, FinancialInfo, LoanPlan, LoanRequest};
use crate::record::{AssetRecord, DocumentRef};
use crate::utils;

pub const LOAN_REQUEST_PATH: &str = "/loan-applications/loan-request";
pub const NOTIFICATIONS_PATH: &str = "/employee-notifications/my-notifications";
pub const UPLOAD_PATH: &str = "/documents/upload";
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Relative to the configured base url, starting with `/`
    pub path: String,
    pub body: Option<Value>,
    pub request_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub envelope: ApiEnvelope,
    pub request_id: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status) && self.envelope.error.is_none()
    }

    /// Best human-readable reason for a failed call: the `error` field when
    /// it carries text, otherwise the envelope message.
    pub fn failure_message(&self) -> String {
        let from_error = match &self.envelope.error {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Object(map)) => map
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        };

        match from_error {
            Some(message) if !message.is_empty() => message,
            _ if !self.envelope.message.is_empty() => self.envelope.message.clone(),
            _ => format!("HTTP {}", self.status),
        }
    }

    /// Deserialize `result`, failing with [`Self::failure_message`] when the
    /// call did not succeed.
    pub fn decode_result<R: DeserializeOwned>(self) -> anyhow::Result<R> {
        if !self.is_success() {
            anyhow::bail!(self.failure_message());
        }
        let result = self.envelope.result.unwrap_or(Value::Null);
        serde_json::from_value(result).context("Unexpected result shape in API response")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentCategory {
    OwnershipCertificate,
    LegalDocument,
    Photo,
    Other,
}

/// A file handed over by the platform file picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub file_name: String,
    pub category: DocumentCategory,
    pub uri: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> anyhow::Result<ApiResponse>;
}

pub struct HttpTransport {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> anyhow::Result<ApiResponse> {
        let url = self.url(&request.path);
        debug!(
            request_id = %request.request_id,
            method = ?request.method,
            %url,
            "Sending API request"
        );

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        }
        .header(REQUEST_ID_HEADER, &request.request_id);

        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?;
        let status = response.status().as_u16();
        let envelope: ApiEnvelope = response.json().await.with_context(|| {
            format!("Response from {url} was not a JSON envelope (HTTP {status})")
        })?;

        debug!(
            request_id = %request.request_id,
            status,
            code = envelope.code,
            "API response received"
        );

        Ok(ApiResponse {
            status,
            envelope,
            request_id: request.request_id,
        })
    }
}

/// Typed endpoints over a [`Transport`].
pub struct ApiClient<T> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn call(
        &self,
        method: Method,
        path: String,
        body: Option<Value>,
    ) -> anyhow::Result<ApiResponse> {
        let request_id = utils::new_request_id()?;
        if let Some(body) = &body {
            debug!(%request_id, %path, %body, "API request body");
        }

        self.transport
            .send(ApiRequest {
                method,
                path,
                body,
                request_id,
            })
            .await
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: String,
        body: &B,
    ) -> anyhow::Result<ApiResponse> {
        let body = serde_json::to_value(body).context("Failed to serialize request body")?;
        self.call(Method::Post, path, Some(body)).await
    }

    pub async fn create_loan_request(&self, request: &LoanRequest) -> anyhow::Result<ApiResponse> {
        self.post(LOAN_REQUEST_PATH.to_string(), request).await
    }

    pub async fn create_loan_plan(&self, plan: &LoanPlan) -> anyhow::Result<ApiResponse> {
        self.post(application_path(&plan.application_id, "loan-plan"), plan)
            .await
    }

    pub async fn create_financial_info(
        &self,
        info: &FinancialInfo,
    ) -> anyhow::Result<ApiResponse> {
        self.post(application_path(&info.application_id, "financial-info"), info)
            .await
    }

    pub async fn submit_asset_collateral(
        &self,
        application_id: &str,
        record: &AssetRecord,
    ) -> anyhow::Result<ApiResponse> {
        self.post(application_path(application_id, "asset-collateral"), record)
            .await
    }

    pub async fn credit_rating(&self, application_id: &str) -> anyhow::Result<CreditRating> {
        self.call(Method::Get, application_path(application_id, "credit-rating"), None)
            .await?
            .decode_result()
    }

    pub async fn my_notifications(&self) -> anyhow::Result<Vec<Notification>> {
        let notifications: Option<Vec<Notification>> = self
            .call(Method::Get, NOTIFICATIONS_PATH.to_string(), None)
            .await?
            .decode_result()?;
        Ok(notifications.unwrap_or_default())
    }

    pub async fn upload_document(&self, upload: &UploadRequest) -> anyhow::Result<DocumentRef> {
        self.post(UPLOAD_PATH.to_string(), upload)
            .await?
            .decode_result()
    }
}

fn application_path(application_id: &str, step: &str) -> String {
    format!("/loan-applications/{application_id}/{step}")
}
