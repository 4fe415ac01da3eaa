//! Service layer for wizard submissions
//!
//! Each wizard step posts one body and waits for one answer. While a request
//! is in flight the pipeline refuses further submits; the outcome moves it to
//! a terminal state from which the caller may submit again.
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiResponse, Transport};
use crate::descriptor::APPLICATION_ID;
use crate::error::{SubmissionError, ValidationError};
use crate::form::{self, AssetForm, LoanRequestForm};
use crate::loan::{FinancialInfo, LoanPlan, LoanRequest};
use crate::record::AssetRecord;

/// Server messages that mean an earlier step has not been approved yet.
/// These follow the backend's current wording and are not a stable contract.
pub const DEPENDENCY_MARKERS: &[&str] = &["Dependency step not completed"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    LoanRequest,
    LoanPlan,
    FinancialInfo,
    CreditRating,
    AssetCollateral,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::LoanRequest,
        WizardStep::LoanPlan,
        WizardStep::FinancialInfo,
        WizardStep::CreditRating,
        WizardStep::AssetCollateral,
    ];

    pub fn next(self) -> Option<Self> {
        match self {
            WizardStep::LoanRequest => Some(WizardStep::LoanPlan),
            WizardStep::LoanPlan => Some(WizardStep::FinancialInfo),
            WizardStep::FinancialInfo => Some(WizardStep::CreditRating),
            WizardStep::CreditRating => Some(WizardStep::AssetCollateral),
            WizardStep::AssetCollateral => None,
        }
    }

    /// Step name as the backend reports it in dependency errors
    pub fn slug(self) -> &'static str {
        match self {
            WizardStep::LoanRequest => "create-loan-request",
            WizardStep::LoanPlan => "create-loan-plan",
            WizardStep::FinancialInfo => "create-financial-info",
            WizardStep::CreditRating => "credit-rating",
            WizardStep::AssetCollateral => "asset-collateral",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        let slug = slug.trim();
        Self::ALL.into_iter().find(|step| {
            step.slug() == slug || step.slug().trim_start_matches("create-") == slug
        })
    }
}

/// Map a server failure message onto the error taxonomy.
///
/// `"Dependency step not completed (create-loan-request:inprogress)"` becomes
/// `DependencyNotReady` with the step and status parsed out of the suffix.
pub fn classify(message: &str) -> SubmissionError {
    let Some(rest) = DEPENDENCY_MARKERS
        .iter()
        .find_map(|marker| message.find(marker).map(|at| &message[at + marker.len()..]))
    else {
        return SubmissionError::Generic(message.to_string());
    };

    let detail = rest
        .split_once('(')
        .and_then(|(_, tail)| tail.split_once(')'))
        .map(|(inner, _)| inner);
    let (step, status) = match detail.map(|d| d.split_once(':')) {
        Some(Some((slug, status))) => {
            (WizardStep::from_slug(slug), Some(status.trim().to_string()))
        }
        Some(None) => (detail.and_then(WizardStep::from_slug), None),
        None => (None, None),
    };

    SubmissionError::DependencyNotReady {
        step,
        status,
        message: message.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// Identifier returned by the backend, or the request id when it sent none
    pub id: String,
    pub step: WizardStep,
    pub next_step: Option<WizardStep>,
}

impl Confirmation {
    fn from_response(step: WizardStep, response: &ApiResponse) -> Self {
        let id = match &response.envelope.result {
            Some(Value::String(id)) => Some(id.clone()),
            Some(Value::Object(map)) => map.get("id").and_then(|id| match id {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }),
            _ => None,
        };

        Self {
            id: id.unwrap_or_else(|| response.request_id.clone()),
            step,
            next_step: step.next(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting(WizardStep),
    Succeeded(Confirmation),
    Failed(SubmissionError),
}

pub struct SubmissionPipeline<T> {
    client: ApiClient<T>,
    state: Mutex<SubmitState>,
}

impl<T: Transport> SubmissionPipeline<T> {
    pub fn new(client: ApiClient<T>) -> Self {
        Self {
            client,
            state: Mutex::new(SubmitState::Idle),
        }
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    pub fn state(&self) -> SubmitState {
        self.lock_state().clone()
    }

    /// Drives the submit button's disabled state
    pub fn is_submitting(&self) -> bool {
        matches!(*self.lock_state(), SubmitState::Submitting(_))
    }

    /// Send the collateral record for `application_id`. Records missing a
    /// required field are rejected before anything is sent.
    pub async fn submit(
        &self,
        application_id: &str,
        record: &AssetRecord,
    ) -> Result<Confirmation, SubmissionError> {
        require_application_id(application_id)?;
        let record = record
            .with_application_id(application_id)
            .map_err(|e| SubmissionError::Generic(e.to_string()))?;
        reject_invalid(form::check_record(&record))?;

        self.run(
            WizardStep::AssetCollateral,
            self.client.submit_asset_collateral(application_id, &record),
        )
        .await
    }

    /// Validate the form, leaving errors on its fields, then submit its record.
    pub async fn submit_form(&self, form: &mut AssetForm) -> Result<Confirmation, SubmissionError> {
        form.validate().map_err(SubmissionError::Invalid)?;
        let application_id = form.record().application_id().to_string();
        self.submit(&application_id, form.record()).await
    }

    pub async fn submit_loan_request(
        &self,
        request: &LoanRequest,
    ) -> Result<Confirmation, SubmissionError> {
        reject_invalid(form::check_loan_request(request))?;
        self.run(
            WizardStep::LoanRequest,
            self.client.create_loan_request(request),
        )
        .await
    }

    pub async fn submit_request_form(
        &self,
        form: &mut LoanRequestForm,
    ) -> Result<Confirmation, SubmissionError> {
        form.validate().map_err(SubmissionError::Invalid)?;
        self.submit_loan_request(form.request()).await
    }

    pub async fn submit_loan_plan(&self, plan: &LoanPlan) -> Result<Confirmation, SubmissionError> {
        require_application_id(&plan.application_id)?;
        self.run(WizardStep::LoanPlan, self.client.create_loan_plan(plan))
            .await
    }

    pub async fn submit_financial_info(
        &self,
        info: &FinancialInfo,
    ) -> Result<Confirmation, SubmissionError> {
        require_application_id(&info.application_id)?;
        self.run(
            WizardStep::FinancialInfo,
            self.client.create_financial_info(info),
        )
        .await
    }

    async fn run<F>(&self, step: WizardStep, request: F) -> Result<Confirmation, SubmissionError>
    where
        F: Future<Output = anyhow::Result<ApiResponse>>,
    {
        let in_flight = self.begin(step)?;

        let outcome = match request.await {
            Ok(response) if response.is_success() => {
                Ok(Confirmation::from_response(step, &response))
            }
            Ok(response) => Err(classify(&response.failure_message())),
            Err(e) => Err(SubmissionError::Generic(format!("{e:#}"))),
        };

        match &outcome {
            Ok(confirmation) => {
                info!(step = step.slug(), id = %confirmation.id, "Submission accepted");
                in_flight.finish(SubmitState::Succeeded(confirmation.clone()));
            }
            Err(e) => {
                warn!(step = step.slug(), error = %e, "Submission failed");
                in_flight.finish(SubmitState::Failed(e.clone()));
            }
        }

        outcome
    }

    fn begin(&self, step: WizardStep) -> Result<InFlight<'_>, SubmissionError> {
        let mut state = self.lock_state();
        if let SubmitState::Submitting(in_flight) = *state {
            warn!(
                step = step.slug(),
                in_flight = in_flight.slug(),
                "Submit ignored, a request is already in flight"
            );
            return Err(SubmissionError::AlreadySubmitting);
        }
        *state = SubmitState::Submitting(step);
        Ok(InFlight {
            state: &self.state,
            step,
            finished: false,
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, SubmitState> {
        lock(&self.state)
    }
}

/// Holds the `Submitting` state for one request. Dropping it before
/// [`InFlight::finish`] (the caller gave up on the future) marks the attempt
/// failed so the next submit is accepted.
struct InFlight<'a> {
    state: &'a Mutex<SubmitState>,
    step: WizardStep,
    finished: bool,
}

impl InFlight<'_> {
    fn finish(mut self, outcome: SubmitState) {
        *lock(self.state) = outcome;
        self.finished = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        warn!(step = self.step.slug(), "Submission abandoned before a response arrived");
        *lock(self.state) = SubmitState::Failed(SubmissionError::Generic(format!(
            "{} cancelled before a response arrived",
            self.step.slug()
        )));
    }
}

fn lock(state: &Mutex<SubmitState>) -> MutexGuard<'_, SubmitState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn reject_invalid(errors: Vec<ValidationError>) -> Result<(), SubmissionError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(SubmissionError::Invalid(errors))
    }
}

fn require_application_id(application_id: &str) -> Result<(), SubmissionError> {
    if application_id.trim().is_empty() {
        return Err(SubmissionError::Invalid(vec![ValidationError::Required {
            field: APPLICATION_ID.to_string(),
        }]));
    }
    Ok(())
}
