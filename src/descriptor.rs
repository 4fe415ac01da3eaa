//! Static field tables for every collateral asset type
//!
//! A descriptor's `key` is the dotted path of the leaf it edits. The record
//! shape of an asset type is derived from its table, so a field exists in the
//! record exactly when a descriptor names it.
use crate::error::PathError;
use crate::path::FieldPath;
use crate::record::AssetType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Plain,
    Numeric,
    Currency,
    Date,
}

#[derive(Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldDescriptor {
    const fn new(
        key: &'static str,
        label: &'static str,
        placeholder: &'static str,
        kind: FieldKind,
    ) -> Self {
        Self {
            key,
            label,
            placeholder,
            kind,
            required: false,
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn path(&self) -> Result<FieldPath, PathError> {
        self.key.parse()
    }
}

use FieldKind::{Currency, Date, Numeric, Plain};

/// Path of the loan application foreign key. Set by the form, never rendered.
pub const APPLICATION_ID: &str = "application.id";

static COMMON: &[FieldDescriptor] = &[
    FieldDescriptor::new("title", "Asset name", "Enter asset name", Plain).required(),
    FieldDescriptor::new("ownershipType", "Ownership type", "Select ownership type", Plain)
        .required(),
    FieldDescriptor::new("proposedValue", "Proposed value", "Enter proposed value", Currency)
        .required(),
    FieldDescriptor::new("ownerInfo.fullName", "Owner name", "Enter owner name", Plain),
    FieldDescriptor::new("ownerInfo.idNumber", "Owner ID number", "Enter ID number", Plain),
    FieldDescriptor::new("ownerInfo.phone", "Owner phone", "Enter phone number", Plain),
    FieldDescriptor::new("ownerInfo.address", "Owner address", "Enter address", Plain),
    FieldDescriptor::new("ownerInfo.dateOfBirth", "Owner date of birth", "dd/mm/yyyy", Date),
    FieldDescriptor::new("transferInfo.transferor", "Transferor", "Enter transferor", Plain),
    FieldDescriptor::new(
        "transferInfo.contractNumber",
        "Transfer contract number",
        "Enter contract number",
        Plain,
    ),
    FieldDescriptor::new("transferInfo.transferDate", "Transfer date", "dd/mm/yyyy", Date),
];

static APARTMENT: &[FieldDescriptor] = &[
    FieldDescriptor::new("apartment.projectName", "Project name", "Enter project name", Plain),
    FieldDescriptor::new("apartment.address", "Address", "Enter address", Plain).required(),
    FieldDescriptor::new("apartment.area", "Area (m²)", "Enter area", Numeric).required(),
    FieldDescriptor::new(
        "apartment.certificateNumber",
        "Certificate number",
        "Enter certificate number",
        Plain,
    ),
    FieldDescriptor::new("apartment.metadata.floor", "Floor", "Enter floor", Numeric),
    FieldDescriptor::new("apartment.metadata.block", "Block", "Enter block", Plain),
    FieldDescriptor::new("apartment.metadata.handoverDate", "Handover date", "dd/mm/yyyy", Date),
];

static LAND: &[FieldDescriptor] = &[
    FieldDescriptor::new("land.parcelNumber", "Parcel number", "Enter parcel number", Plain)
        .required(),
    FieldDescriptor::new("land.mapSheetNumber", "Map sheet number", "Enter map sheet", Plain),
    FieldDescriptor::new("land.address", "Address", "Enter address", Plain),
    FieldDescriptor::new("land.area", "Area (m²)", "Enter area", Numeric).required(),
    FieldDescriptor::new("land.landUsePurpose", "Land use purpose", "Enter purpose", Plain),
    FieldDescriptor::new("land.metadata.usageTerm", "Usage term", "Enter usage term", Plain),
    FieldDescriptor::new("land.metadata.issuedDate", "Certificate issued", "dd/mm/yyyy", Date),
];

static VEHICLE: &[FieldDescriptor] = &[
    FieldDescriptor::new(
        "vehicle.licensePlateNumber",
        "License plate",
        "Enter license plate",
        Plain,
    )
    .required(),
    FieldDescriptor::new("vehicle.brand", "Brand", "Enter brand", Plain),
    FieldDescriptor::new("vehicle.model", "Model", "Enter model", Plain),
    FieldDescriptor::new("vehicle.chassisNumber", "Chassis number", "Enter chassis number", Plain),
    FieldDescriptor::new("vehicle.engineNumber", "Engine number", "Enter engine number", Plain),
    FieldDescriptor::new(
        "vehicle.metadata.manufactureYear",
        "Year of manufacture",
        "Enter year",
        Numeric,
    ),
    FieldDescriptor::new(
        "vehicle.metadata.registrationDate",
        "Registration date",
        "dd/mm/yyyy",
        Date,
    ),
    FieldDescriptor::new("vehicle.metadata.color", "Color", "Enter color", Plain),
];

static MACHINERY: &[FieldDescriptor] = &[
    FieldDescriptor::new("machinery.name", "Machine name", "Enter machine name", Plain)
        .required(),
    FieldDescriptor::new("machinery.manufacturer", "Manufacturer", "Enter manufacturer", Plain),
    FieldDescriptor::new("machinery.serialNumber", "Serial number", "Enter serial number", Plain),
    FieldDescriptor::new("machinery.quantity", "Quantity", "Enter quantity", Numeric).required(),
    FieldDescriptor::new(
        "machinery.metadata.manufactureYear",
        "Year of manufacture",
        "Enter year",
        Numeric,
    ),
    FieldDescriptor::new("machinery.metadata.purchaseDate", "Purchase date", "dd/mm/yyyy", Date),
    FieldDescriptor::new(
        "machinery.metadata.purchasePrice",
        "Purchase price",
        "Enter purchase price",
        Currency,
    ),
];

static MARKET_STALL: &[FieldDescriptor] = &[
    FieldDescriptor::new("marketStall.marketName", "Market name", "Enter market name", Plain)
        .required(),
    FieldDescriptor::new("marketStall.stallNumber", "Stall number", "Enter stall number", Plain)
        .required(),
    FieldDescriptor::new("marketStall.area", "Area (m²)", "Enter area", Numeric),
    FieldDescriptor::new("marketStall.metadata.leaseTerm", "Lease term", "Enter lease term", Plain),
    FieldDescriptor::new(
        "marketStall.metadata.leaseStartDate",
        "Lease start date",
        "dd/mm/yyyy",
        Date,
    ),
    FieldDescriptor::new(
        "marketStall.metadata.monthlyRent",
        "Monthly rent",
        "Enter monthly rent",
        Currency,
    ),
];

static LAND_AND_IMPROVEMENT: &[FieldDescriptor] = &[
    FieldDescriptor::new(
        "landAndImprovement.parcelNumber",
        "Parcel number",
        "Enter parcel number",
        Plain,
    )
    .required(),
    FieldDescriptor::new("landAndImprovement.address", "Address", "Enter address", Plain),
    FieldDescriptor::new("landAndImprovement.landArea", "Land area (m²)", "Enter area", Numeric)
        .required(),
    FieldDescriptor::new(
        "landAndImprovement.floorArea",
        "Floor area (m²)",
        "Enter floor area",
        Numeric,
    ),
    FieldDescriptor::new(
        "landAndImprovement.metadata.constructionYear",
        "Year built",
        "Enter year",
        Numeric,
    ),
    FieldDescriptor::new(
        "landAndImprovement.metadata.structure",
        "Structure",
        "Enter structure",
        Plain,
    ),
    FieldDescriptor::new(
        "landAndImprovement.metadata.completionDate",
        "Completion date",
        "dd/mm/yyyy",
        Date,
    ),
];

static OTHER: &[FieldDescriptor] = &[
    FieldDescriptor::new("other.name", "Asset name", "Enter asset name", Plain).required(),
    FieldDescriptor::new("other.description", "Description", "Enter description", Plain),
    FieldDescriptor::new("other.quantity", "Quantity", "Enter quantity", Numeric),
    FieldDescriptor::new("other.metadata.note", "Note", "Enter note", Plain),
    FieldDescriptor::new("other.metadata.acquiredDate", "Acquired date", "dd/mm/yyyy", Date),
];

/// Kind-specific table only, without the shared fields.
pub fn kind_descriptors(asset_type: AssetType) -> &'static [FieldDescriptor] {
    match asset_type {
        AssetType::Apartment => APARTMENT,
        AssetType::Land => LAND,
        AssetType::Vehicle => VEHICLE,
        AssetType::Machinery => MACHINERY,
        AssetType::MarketStall => MARKET_STALL,
        AssetType::LandAndImprovement => LAND_AND_IMPROVEMENT,
        AssetType::Other => OTHER,
    }
}

/// Every descriptor of an asset type in render order.
pub fn descriptors_for(asset_type: AssetType) -> Vec<&'static FieldDescriptor> {
    COMMON
        .iter()
        .chain(kind_descriptors(asset_type).iter())
        .collect()
}
