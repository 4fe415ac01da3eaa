//! Request bodies for the wizard steps before asset collateral
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::AssetType;

/// The loan-request multi-select offers the same kinds as the asset forms.
pub type CollateralType = AssetType;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequest {
    pub application_id: String,
    pub amount: u64,
    pub purpose: String,
    pub term_months: u32,
    pub collateral_types: Vec<CollateralType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepaymentMethod {
    #[default]
    EqualPrincipal,
    Annuity,
    Bullet,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanPlan {
    pub application_id: String,
    pub monthly_income: u64,
    pub monthly_expense: u64,
    pub repayment_source: String,
    pub repayment_method: RepaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialInfo {
    pub application_id: String,
    pub employer: String,
    pub position: String,
    pub monthly_income: u64,
    pub other_income: u64,
    pub existing_debt: u64,
}

/// Result of the credit rating lookup. Read-only; never submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditRating {
    pub customer_id: String,
    pub score: u32,
    pub grade: String,
    pub rated_at: DateTime<Utc>,
}
