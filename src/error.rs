use crate::locale::{Locale, Message};
use crate::submission::WizardStep;

/// Raised when a field path does not resolve against a record's shape.
/// Field tables are static, so any of these is a programming error.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Field path '{0}' must have between one and three non-empty segments")]
    Malformed(String),
    #[error("Unknown section '{section}' in path '{path}'")]
    UnknownSection { path: String, section: String },
    #[error("Unknown field '{field}' in path '{path}'")]
    UnknownField { path: String, field: String },
    #[error("Field '{path}' holds {expected} values, got {got}")]
    KindMismatch {
        path: String,
        expected: &'static str,
        got: &'static str,
    },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },
    #[error("{field} must be greater than zero")]
    NotPositive { field: String },
    #[error("{field} needs at least one selection")]
    EmptySelection { field: String },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("A submission is already in flight")]
    AlreadySubmitting,
    #[error("Submission blocked by {} invalid field(s)", .0.len())]
    Invalid(Vec<ValidationError>),
    #[error("Dependency step not completed: {message}")]
    DependencyNotReady {
        step: Option<WizardStep>,
        status: Option<String>,
        message: String,
    },
    #[error("Submission failed: {0}")]
    Generic(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}

impl ValidationError {
    pub fn field(&self) -> &str {
        match self {
            Self::Required { field }
            | Self::NotPositive { field }
            | Self::EmptySelection { field } => field,
        }
    }

    /// Inline text shown next to the offending field.
    pub fn user_message(&self, locale: Locale) -> &'static str {
        let message = match self {
            Self::Required { .. } => Message::Required,
            Self::NotPositive { .. } => Message::NotPositive,
            Self::EmptySelection { .. } => Message::EmptySelection,
        };
        locale.text(message)
    }
}

impl SubmissionError {
    /// Alert text for the failure, in the user's language.
    pub fn user_message(&self, locale: Locale) -> String {
        match self {
            Self::AlreadySubmitting => locale.text(Message::AlreadySubmitting).to_string(),
            Self::Invalid(_) => locale.text(Message::InvalidForm).to_string(),
            Self::DependencyNotReady { step, .. } => match step {
                Some(step) => format!(
                    "{} ({})",
                    locale.text(Message::DependencyNotReady),
                    locale.step_name(*step)
                ),
                None => locale.text(Message::DependencyNotReady).to_string(),
            },
            Self::Generic(_) => locale.text(Message::GenericFailure).to_string(),
        }
    }

    pub fn is_dependency_not_ready(&self) -> bool {
        matches!(self, Self::DependencyNotReady { .. })
    }
}
