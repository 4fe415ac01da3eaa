//! Display language and the formatting settings derived from it
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::submission::WizardStep;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Vi,
    En,
}

/// Keys for the user-facing strings this crate produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Required,
    NotPositive,
    EmptySelection,
    InvalidForm,
    AlreadySubmitting,
    DependencyNotReady,
    GenericFailure,
}

/// Formatting inputs handed to the renderer on every call.
/// Rebuild it whenever the user switches language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatConfig {
    pub locale: Locale,
}

impl FormatConfig {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }
}

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::Vi => "vi",
            Locale::En => "en",
        }
    }

    /// Thousands separator used for currency amounts
    pub fn group_separator(self) -> char {
        match self {
            Locale::Vi => ',',
            Locale::En => '.',
        }
    }

    pub fn decimal_separator(self) -> char {
        match self {
            Locale::Vi => '.',
            Locale::En => ',',
        }
    }

    pub fn text(self, message: Message) -> &'static str {
        match (self, message) {
            (Locale::Vi, Message::Required) => "Trường này là bắt buộc",
            (Locale::En, Message::Required) => "This field is required",
            (Locale::Vi, Message::NotPositive) => "Giá trị phải lớn hơn 0",
            (Locale::En, Message::NotPositive) => "Value must be greater than zero",
            (Locale::Vi, Message::EmptySelection) => "Vui lòng chọn ít nhất một loại tài sản",
            (Locale::En, Message::EmptySelection) => "Select at least one collateral type",
            (Locale::Vi, Message::InvalidForm) => "Vui lòng kiểm tra lại các trường bị lỗi",
            (Locale::En, Message::InvalidForm) => "Please correct the highlighted fields",
            (Locale::Vi, Message::AlreadySubmitting) => "Hồ sơ đang được gửi, vui lòng chờ",
            (Locale::En, Message::AlreadySubmitting) => "Your submission is still being sent",
            (Locale::Vi, Message::DependencyNotReady) => {
                "Bước trước chưa được duyệt xong. Vui lòng thử lại sau"
            }
            (Locale::En, Message::DependencyNotReady) => {
                "A previous step has not been approved yet. Please try again later"
            }
            (Locale::Vi, Message::GenericFailure) => "Gửi hồ sơ thất bại. Vui lòng thử lại",
            (Locale::En, Message::GenericFailure) => "Submission failed. Please try again",
        }
    }

    pub fn step_name(self, step: WizardStep) -> &'static str {
        match (self, step) {
            (Locale::Vi, WizardStep::LoanRequest) => "Đề nghị vay vốn",
            (Locale::En, WizardStep::LoanRequest) => "Loan request",
            (Locale::Vi, WizardStep::LoanPlan) => "Phương án vay vốn",
            (Locale::En, WizardStep::LoanPlan) => "Loan plan",
            (Locale::Vi, WizardStep::FinancialInfo) => "Thông tin tài chính",
            (Locale::En, WizardStep::FinancialInfo) => "Financial information",
            (Locale::Vi, WizardStep::CreditRating) => "Xếp hạng tín dụng",
            (Locale::En, WizardStep::CreditRating) => "Credit rating",
            (Locale::Vi, WizardStep::AssetCollateral) => "Tài sản bảo đảm",
            (Locale::En, WizardStep::AssetCollateral) => "Asset collateral",
        }
    }
}

impl FromStr for Locale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vi" | "vi-vn" => Ok(Locale::Vi),
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            _ => Err(ConfigError::InvalidValue {
                key: "locale",
                value: s.to_string(),
            }),
        }
    }
}
