//! In-memory transport standing in for the lending backend
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use loan_origination::api::{ApiEnvelope, ApiRequest, ApiResponse, Transport};
use loan_origination::descriptor::descriptors_for;
use loan_origination::{AssetForm, AssetType, FieldKind, FormatConfig, Locale};
use serde_json::Value;
use tokio::sync::Notify;

/// A form with every required field of `asset_type` filled in
pub fn filled_form(asset_type: AssetType, application_id: &str) -> anyhow::Result<AssetForm> {
    let config = FormatConfig::new(Locale::Vi);
    let mut form = AssetForm::new(asset_type, application_id)?;

    for descriptor in descriptors_for(asset_type).into_iter().filter(|d| d.required) {
        let path = descriptor.path()?;
        match descriptor.kind {
            FieldKind::Plain => form.edit(&path, "Sample", &config)?,
            FieldKind::Numeric => form.edit(&path, "2", &config)?,
            FieldKind::Currency => form.edit(&path, "500,000,000", &config)?,
            FieldKind::Date => form.pick_date(
                &path,
                NaiveDate::from_ymd_opt(2024, 3, 5).context("bad date")?,
            )?,
        }
    }

    Ok(form)
}

/// Replays queued responses in order and records every request it sees.
/// When a gate is set, each call waits for one permit before answering.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<anyhow::Result<(u16, Value)>>>,
    requests: Mutex<Vec<ApiRequest>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn respond(self, status: u16, envelope: Value) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok((status, envelope)));
        self
    }

    pub fn fail(self, error: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(anyhow::anyhow!(error.to_string())));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> anyhow::Result<ApiResponse> {
        let request_id = request.request_id.clone();
        self.requests.lock().unwrap().push(request);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow::anyhow!("no scripted response left")));
        let (status, envelope) = next?;
        let envelope: ApiEnvelope = serde_json::from_value(envelope)?;

        Ok(ApiResponse {
            status,
            envelope,
            request_id,
        })
    }
}
