pub mod api;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod form;
pub mod loan;
pub mod locale;
pub mod path;
pub mod record;
pub mod render;
pub mod submission;
pub mod utils;

pub use api::{ApiClient, HttpTransport, Transport};
pub use config::ClientConfig;
pub use descriptor::{FieldDescriptor, FieldKind};
pub use error::{ConfigError, PathError, SubmissionError, ValidationError};
pub use form::{AssetForm, LoanRequestForm};
pub use locale::{FormatConfig, Locale};
pub use path::FieldPath;
pub use record::{AssetRecord, AssetType, DocumentRef, FieldValue};
pub use submission::{Confirmation, SubmissionPipeline, SubmitState, WizardStep};
