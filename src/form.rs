//! Form sessions: one generic driver for every collateral asset type, plus
//! the loan-request form with its collateral multi-select
use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use tracing::debug;

use crate::descriptor::{APPLICATION_ID, FieldDescriptor, FieldKind, descriptors_for};
use crate::error::{PathError, ValidationError};
use crate::loan::{CollateralType, LoanRequest};
use crate::locale::FormatConfig;
use crate::path::FieldPath;
use crate::record::{AssetRecord, AssetType, DocumentRef, FieldValue};
use crate::render::{self, DisplayValue};

/// Inline validation errors keyed by field path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: BTreeMap<String, ValidationError>,
}

impl FormErrors {
    pub fn insert(&mut self, error: ValidationError) {
        self.errors.insert(error.field().to_string(), error);
    }

    pub fn clear(&mut self, field: &str) {
        self.errors.remove(field);
    }

    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.errors.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn to_vec(&self) -> Vec<ValidationError> {
        self.errors.values().cloned().collect()
    }

    fn replace_all(&mut self, errors: &[ValidationError]) {
        self.errors.clear();
        for error in errors {
            self.insert(error.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedField<'a> {
    pub descriptor: &'static FieldDescriptor,
    pub path: &'a FieldPath,
    pub display: DisplayValue,
    pub error: Option<&'a ValidationError>,
}

/// Editing session for one collateral asset.
pub struct AssetForm {
    fields: Vec<(&'static FieldDescriptor, FieldPath)>,
    record: AssetRecord,
    errors: FormErrors,
}

impl AssetForm {
    pub fn new(asset_type: AssetType, application_id: &str) -> Result<Self, PathError> {
        let fields = descriptors_for(asset_type)
            .into_iter()
            .map(|descriptor| Ok((descriptor, descriptor.path()?)))
            .collect::<Result<Vec<_>, PathError>>()?;
        let record = AssetRecord::new(asset_type).with_application_id(application_id)?;

        Ok(Self {
            fields,
            record,
            errors: FormErrors::default(),
        })
    }

    pub fn asset_type(&self) -> AssetType {
        self.record.asset_type()
    }

    pub fn record(&self) -> &AssetRecord {
        &self.record
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn descriptor(&self, path: &FieldPath) -> Result<&'static FieldDescriptor, PathError> {
        self.fields
            .iter()
            .find(|(_, p)| p == path)
            .map(|(descriptor, _)| *descriptor)
            .ok_or_else(|| PathError::UnknownField {
                path: path.to_string(),
                field: path.leaf().to_string(),
            })
    }

    /// Every field in render order with its current display text.
    pub fn fields(&self, config: &FormatConfig) -> Result<Vec<RenderedField<'_>>, PathError> {
        self.fields
            .iter()
            .map(|(descriptor, path)| {
                let value = self.record.get(path)?;
                Ok(RenderedField {
                    descriptor: *descriptor,
                    path,
                    display: render::render(descriptor, value, config),
                    error: self.errors.get(descriptor.key),
                })
            })
            .collect()
    }

    /// Apply text typed into the field at `path`.
    pub fn edit(
        &mut self,
        path: &FieldPath,
        text: &str,
        config: &FormatConfig,
    ) -> Result<(), PathError> {
        let descriptor = self.descriptor(path)?;
        let value = render::parse_input(descriptor, text, config);
        self.apply(path, value)
    }

    /// Apply a date returned by the platform date picker.
    pub fn pick_date(&mut self, path: &FieldPath, date: NaiveDate) -> Result<(), PathError> {
        let descriptor = self.descriptor(path)?;
        if descriptor.kind != FieldKind::Date {
            return Err(PathError::KindMismatch {
                path: path.to_string(),
                expected: "date",
                got: "non-date field",
            });
        }
        self.apply(path, render::date_selected(date))
    }

    fn apply(&mut self, path: &FieldPath, value: FieldValue) -> Result<(), PathError> {
        debug!(%path, ?value, "Field edited");
        self.record = self.record.update(path, value)?;
        self.errors.clear(&path.to_string());
        Ok(())
    }

    pub fn attach_document(&mut self, document: DocumentRef) {
        self.record = self.record.with_document(document);
    }

    pub fn detach_document(&mut self, id: &str) {
        self.record = self.record.without_document(id);
    }

    /// Check required fields. Errors replace the previous set and stay
    /// attached to their fields until the field is edited.
    pub fn validate(&mut self) -> Result<(), Vec<ValidationError>> {
        let found = check_record(&self.record);
        self.errors.replace_all(&found);
        if found.is_empty() { Ok(()) } else { Err(found) }
    }

    pub fn into_record(self) -> AssetRecord {
        self.record
    }
}

/// Required-field check for a collateral record, in descriptor order.
pub fn check_record(record: &AssetRecord) -> Vec<ValidationError> {
    let mut found = Vec::new();

    if record.application_id().trim().is_empty() {
        found.push(ValidationError::Required {
            field: APPLICATION_ID.to_string(),
        });
    }

    for descriptor in descriptors_for(record.asset_type()).into_iter().filter(|d| d.required) {
        let blank = match descriptor.path() {
            Ok(path) => record.get(&path).ok().is_none_or(FieldValue::is_blank),
            Err(_) => true,
        };
        if !blank {
            continue;
        }
        let field = descriptor.key.to_string();
        found.push(match descriptor.kind {
            FieldKind::Numeric | FieldKind::Currency => ValidationError::NotPositive { field },
            FieldKind::Plain | FieldKind::Date => ValidationError::Required { field },
        });
    }

    found
}

/// Field check for the loan-request body.
pub fn check_loan_request(request: &LoanRequest) -> Vec<ValidationError> {
    let mut found = Vec::new();

    if request.amount == 0 {
        found.push(ValidationError::NotPositive {
            field: FIELD_AMOUNT.to_string(),
        });
    }
    if request.purpose.trim().is_empty() {
        found.push(ValidationError::Required {
            field: FIELD_PURPOSE.to_string(),
        });
    }
    if request.term_months == 0 {
        found.push(ValidationError::NotPositive {
            field: FIELD_TERM_MONTHS.to_string(),
        });
    }
    if request.collateral_types.is_empty() {
        found.push(ValidationError::EmptySelection {
            field: FIELD_COLLATERAL_TYPES.to_string(),
        });
    }

    found
}

pub const FIELD_AMOUNT: &str = "amount";
pub const FIELD_PURPOSE: &str = "purpose";
pub const FIELD_TERM_MONTHS: &str = "termMonths";
pub const FIELD_COLLATERAL_TYPES: &str = "collateralTypes";

/// First wizard step: requested amount, purpose, term and collateral kinds.
pub struct LoanRequestForm {
    request: LoanRequest,
    errors: FormErrors,
}

impl LoanRequestForm {
    pub fn new(application_id: &str) -> Self {
        Self {
            request: LoanRequest {
                application_id: application_id.to_string(),
                ..Default::default()
            },
            errors: FormErrors::default(),
        }
    }

    pub fn request(&self) -> &LoanRequest {
        &self.request
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn set_amount(&mut self, text: &str, config: &FormatConfig) {
        self.request.amount = render::parse_currency(text, config.locale);
        if self.request.amount > 0 {
            self.errors.clear(FIELD_AMOUNT);
        }
    }

    pub fn amount_text(&self, config: &FormatConfig) -> String {
        render::format_currency(self.request.amount, config.locale)
    }

    pub fn set_purpose(&mut self, text: &str) {
        self.request.purpose = text.to_string();
        if !text.trim().is_empty() {
            self.errors.clear(FIELD_PURPOSE);
        }
    }

    pub fn set_term_months(&mut self, text: &str) {
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        self.request.term_months = digits.parse().unwrap_or(0);
        if self.request.term_months > 0 {
            self.errors.clear(FIELD_TERM_MONTHS);
        }
    }

    /// Replace the multi-select. Repeated tags keep their first position.
    /// Clearing every tag leaves the list empty but keeps any existing error;
    /// the error goes away only once something is selected again.
    pub fn set_collateral_types(&mut self, mut types: Vec<CollateralType>) {
        let mut seen = BTreeSet::new();
        types.retain(|t| seen.insert(*t));
        if !types.is_empty() {
            self.errors.clear(FIELD_COLLATERAL_TYPES);
        }
        self.request.collateral_types = types;
    }

    pub fn validate(&mut self) -> Result<(), Vec<ValidationError>> {
        let found = check_loan_request(&self.request);
        self.errors.replace_all(&found);
        if found.is_empty() { Ok(()) } else { Err(found) }
    }

    pub fn into_request(self) -> LoanRequest {
        self.request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;

    fn path(s: &str) -> FieldPath {
        s.parse().unwrap()
    }

    #[test]
    fn edit_parses_through_the_descriptor() {
        let config = FormatConfig::new(Locale::Vi);
        let mut form = AssetForm::new(AssetType::Apartment, "app-1").unwrap();

        form.edit(&path("proposedValue"), "2,500,000,000", &config).unwrap();
        form.edit(&path("apartment.metadata.floor"), "12", &config).unwrap();

        assert_eq!(
            form.record().get(&path("proposedValue")).unwrap(),
            &FieldValue::Amount(2_500_000_000)
        );
        assert_eq!(
            form.record().get(&path("apartment.metadata.floor")).unwrap(),
            &FieldValue::Number(12.0)
        );
    }

    #[test]
    fn fields_render_in_table_order() {
        let config = FormatConfig::new(Locale::En);
        let mut form = AssetForm::new(AssetType::Vehicle, "app-1").unwrap();
        form.edit(&path("proposedValue"), "500000000", &config).unwrap();

        let fields = form.fields(&config).unwrap();
        assert_eq!(fields[0].descriptor.key, "title");
        let value = fields
            .iter()
            .find(|f| f.descriptor.key == "proposedValue")
            .unwrap();
        assert_eq!(value.display.text, "500.000.000");
        assert_eq!(fields.len(), descriptors_for(AssetType::Vehicle).len());
    }

    #[test]
    fn fields_outside_the_table_are_rejected() {
        let config = FormatConfig::default();
        let mut form = AssetForm::new(AssetType::Land, "app-1").unwrap();

        // application.id is in the record but has no descriptor
        assert!(form.edit(&path(APPLICATION_ID), "other", &config).is_err());
        assert!(form.edit(&path("vehicle.brand"), "Honda", &config).is_err());
    }

    #[test]
    fn pick_date_only_targets_date_fields() {
        let mut form = AssetForm::new(AssetType::Land, "app-1").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

        form.pick_date(&path("land.metadata.issuedDate"), date).unwrap();
        assert_eq!(
            form.record().get(&path("land.metadata.issuedDate")).unwrap(),
            &FieldValue::Date("2024-03-05T00:00:00Z".into())
        );
        assert!(form.pick_date(&path("land.address"), date).is_err());
    }

    #[test]
    fn validation_flags_required_fields_until_edited() {
        let config = FormatConfig::default();
        let mut form = AssetForm::new(AssetType::Machinery, "app-1").unwrap();

        let errors = form.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(ValidationError::field).collect();
        assert_eq!(
            fields,
            ["title", "ownershipType", "proposedValue", "machinery.name", "machinery.quantity"]
        );
        assert!(matches!(
            form.errors().get("proposedValue"),
            Some(ValidationError::NotPositive { .. })
        ));

        form.edit(&path("title"), "Excavator", &config).unwrap();
        assert!(form.errors().get("title").is_none());
        assert_eq!(form.errors().len(), 4);
    }

    #[test]
    fn blank_application_id_fails_validation() {
        let mut form = AssetForm::new(AssetType::Other, "").unwrap();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors[0].field(), APPLICATION_ID);
    }

    #[test]
    fn clearing_collateral_types_keeps_the_error_until_reselected() {
        let mut form = LoanRequestForm::new("app-1");
        form.set_collateral_types(vec![AssetType::Land]);
        form.set_collateral_types(vec![]);
        assert!(form.request().collateral_types.is_empty());

        assert!(form.validate().is_err());
        assert!(form.errors().get(FIELD_COLLATERAL_TYPES).is_some());

        // still empty, error stays
        form.set_collateral_types(vec![]);
        assert!(form.errors().get(FIELD_COLLATERAL_TYPES).is_some());

        form.set_collateral_types(vec![AssetType::Vehicle]);
        assert!(form.errors().get(FIELD_COLLATERAL_TYPES).is_none());
        assert_eq!(form.request().collateral_types, [AssetType::Vehicle]);
    }

    #[test]
    fn repeated_collateral_types_keep_first_position() {
        let mut form = LoanRequestForm::new("app-1");
        form.set_collateral_types(vec![
            AssetType::Land,
            AssetType::Vehicle,
            AssetType::Land,
            AssetType::Vehicle,
        ]);
        assert_eq!(
            form.request().collateral_types,
            [AssetType::Land, AssetType::Vehicle]
        );
    }

    #[test]
    fn record_check_matches_form_validation() {
        let mut form = AssetForm::new(AssetType::Vehicle, "app-1").unwrap();
        let from_form = form.validate().unwrap_err();
        assert_eq!(check_record(form.record()), from_form);
        assert!(
            from_form
                .iter()
                .any(|e| e.field() == "vehicle.licensePlateNumber")
        );
    }

    #[test]
    fn loan_request_form_validates_all_fields() {
        let config = FormatConfig::new(Locale::Vi);
        let mut form = LoanRequestForm::new("app-1");
        assert_eq!(form.validate().unwrap_err().len(), 4);

        form.set_amount("300,000,000", &config);
        form.set_purpose("Buy a truck");
        form.set_term_months("36 months");
        form.set_collateral_types(vec![AssetType::Vehicle]);

        assert!(form.validate().is_ok());
        assert!(form.errors().is_empty());
        assert_eq!(form.amount_text(&config), "300,000,000");
        assert_eq!(form.into_request().term_months, 36);
    }
}
