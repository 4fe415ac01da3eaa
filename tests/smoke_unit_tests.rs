//! Smoke Screen Unit tests for the loan origination components
//!
//! These tests span the public API and exercise each piece in isolation from
//! the submission scenarios. They mostly walk the happy path.
//!
#![allow(unused_imports)]

use chrono::NaiveDate;
use loan_origination::{
    AssetForm, AssetRecord, AssetType, ClientConfig, FieldPath, FieldValue, FormatConfig, Locale,
    PathError, SubmissionError, ValidationError, WizardStep,
    descriptor::{FieldKind, descriptors_for, kind_descriptors},
    render::{self, Widget},
    submission::classify,
    utils::new_request_id,
};

// UTILS MODULE TESTS
#[cfg(test)]
mod utils_tests {
    use super::*;

    /// Request ids carry the `req_` prefix and never repeat
    #[test]
    fn generates_unique_request_ids() {
        let id1 = new_request_id().unwrap();
        let id2 = new_request_id().unwrap();

        assert!(id1.starts_with("req_1"));
        assert!(id1.len() > 10);
        assert_ne!(id1, id2);
    }
}

// DESCRIPTOR MODULE TESTS
#[cfg(test)]
mod descriptor_tests {
    use super::*;

    /// Every asset type shares the common fields and adds its own
    #[test]
    fn tables_start_with_common_fields() {
        for asset_type in AssetType::ALL {
            let descriptors = descriptors_for(asset_type);
            assert_eq!(descriptors[0].key, "title");
            assert!(descriptors.len() > kind_descriptors(asset_type).len());
        }
    }

    /// Proposed value is rendered as a currency input everywhere
    #[test]
    fn proposed_value_is_currency() {
        let descriptors = descriptors_for(AssetType::Land);
        let proposed = descriptors
            .iter()
            .find(|d| d.key == "proposedValue")
            .unwrap();

        assert_eq!(proposed.kind, FieldKind::Currency);
        assert!(proposed.required);
    }
}

// RECORD MODULE TESTS
#[cfg(test)]
mod record_tests {
    use super::*;

    /// Each asset type only carries its own kind section
    #[test]
    fn exactly_one_kind_section() {
        for asset_type in AssetType::ALL {
            let record = AssetRecord::new(asset_type);
            let present: Vec<_> = AssetType::ALL
                .iter()
                .filter(|t| record.section(t.section_key()).is_some())
                .collect();
            assert_eq!(present, [&asset_type]);
        }
    }

    /// Three-segment paths reach into the kind's metadata section
    #[test]
    fn updates_nested_metadata() {
        let path: FieldPath = "apartment.metadata.floor".parse().unwrap();
        let record = AssetRecord::new(AssetType::Apartment)
            .update(&path, FieldValue::Number(7.0))
            .unwrap();

        assert_eq!(record.get(&path).unwrap(), &FieldValue::Number(7.0));
    }

    /// Typos in a path are reported, not ignored
    #[test]
    fn unknown_path_is_an_error() {
        let path: FieldPath = "ownerInfo.fulName".parse().unwrap();
        let err = AssetRecord::new(AssetType::Land)
            .update(&path, FieldValue::Text("x".into()))
            .unwrap_err();

        assert_eq!(
            err,
            PathError::UnknownField {
                path: "ownerInfo.fulName".into(),
                field: "fulName".into()
            }
        );
    }
}

// RENDER MODULE TESTS
#[cfg(test)]
mod render_tests {
    use super::*;

    /// Fixed currency and date examples round trip
    #[test]
    fn currency_and_date_examples() {
        assert_eq!(
            render::parse_currency(&render::format_currency(1_234_567, Locale::Vi), Locale::Vi),
            1_234_567
        );
        assert_eq!(
            render::parse_currency(&render::format_currency(1_234_567, Locale::En), Locale::En),
            1_234_567
        );

        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let stored = render::serialize_date(date);
        assert_eq!(stored, "2024-03-05T00:00:00Z");
        assert_eq!(render::format_date(&stored).unwrap(), "05/03/2024");
    }

    /// Switching language changes the next render without touching the value
    #[test]
    fn language_switch_rerenders_currency() {
        let mut form = AssetForm::new(AssetType::Machinery, "app-1").unwrap();
        let path: FieldPath = "machinery.metadata.purchasePrice".parse().unwrap();
        form.edit(&path, "1,500,000", &FormatConfig::new(Locale::Vi))
            .unwrap();

        for (locale, expected) in [(Locale::Vi, "1,500,000"), (Locale::En, "1.500.000")] {
            let fields = form.fields(&FormatConfig::new(locale)).unwrap();
            let field = fields.iter().find(|f| *f.path == path).unwrap();
            assert_eq!(field.display.text, expected);
            assert_eq!(field.display.widget, Widget::CurrencyInput);
        }
    }
}

// SUBMISSION MODULE TESTS
#[cfg(test)]
mod submission_tests {
    use super::*;

    /// The backend's dependency message maps to the dependency category
    #[test]
    fn classifies_dependency_message() {
        let err = classify("Dependency step not completed (create-loan-request:inprogress)");
        assert!(err.is_dependency_not_ready());
        assert!(!matches!(err, SubmissionError::Generic(_)));
    }

    /// Localized messages exist for both languages
    #[test]
    fn user_messages_are_localized() {
        let err = SubmissionError::Generic("boom".into());
        assert_ne!(err.user_message(Locale::Vi), err.user_message(Locale::En));

        let invalid = ValidationError::Required {
            field: "title".into(),
        };
        assert_eq!(invalid.user_message(Locale::En), "This field is required");
    }

    #[test]
    fn wizard_ends_at_collateral() {
        assert_eq!(WizardStep::CreditRating.next(), Some(WizardStep::AssetCollateral));
        assert_eq!(WizardStep::AssetCollateral.next(), None);
    }
}

// CONFIG MODULE TESTS
#[cfg(test)]
mod config_tests {
    use super::*;

    /// Config defaults to the Vietnamese locale with no credentials
    #[test]
    fn default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.locale, Locale::Vi);
        assert!(config.auth_token.is_none());
        assert_eq!(config.with_locale(Locale::En).format_config().locale, Locale::En);
    }
}
