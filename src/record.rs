//! Collateral asset records and the path-addressed update engine
use std::collections::BTreeMap;
use std::mem::discriminant;
use std::sync::Arc;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::descriptor::{APPLICATION_ID, FieldKind, descriptors_for};
use crate::error::PathError;
use crate::path::FieldPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Apartment,
    Land,
    Vehicle,
    Machinery,
    MarketStall,
    LandAndImprovement,
    Other,
}

impl AssetType {
    pub const ALL: [AssetType; 7] = [
        AssetType::Apartment,
        AssetType::Land,
        AssetType::Vehicle,
        AssetType::Machinery,
        AssetType::MarketStall,
        AssetType::LandAndImprovement,
        AssetType::Other,
    ];

    /// Name of the record section that holds this kind's fields
    pub fn section_key(self) -> &'static str {
        match self {
            AssetType::Apartment => "apartment",
            AssetType::Land => "land",
            AssetType::Vehicle => "vehicle",
            AssetType::Machinery => "machinery",
            AssetType::MarketStall => "marketStall",
            AssetType::LandAndImprovement => "landAndImprovement",
            AssetType::Other => "other",
        }
    }
}

/// A single leaf. Text and dates default to `""`, numbers to zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Amount(u64),
    /// `YYYY-MM-DDT00:00:00Z`, or empty when unset
    Date(String),
}

impl FieldValue {
    pub fn default_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Plain => FieldValue::Text(String::new()),
            FieldKind::Numeric => FieldValue::Number(0.0),
            FieldKind::Currency => FieldValue::Amount(0),
            FieldKind::Date => FieldValue::Date(String::new()),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Number(_) => "number",
            FieldValue::Amount(_) => "amount",
            FieldValue::Date(_) => "date",
        }
    }

    /// True for the default of each variant
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) | FieldValue::Date(s) => s.trim().is_empty(),
            FieldValue::Number(n) => *n == 0.0,
            FieldValue::Amount(a) => *a == 0,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) | FieldValue::Date(s) => Some(s),
            _ => None,
        }
    }
}

/// Opaque reference to an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    pub id: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub category: String,
}

/// Fixed-shape group of leaves and nested sections.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    leaves: BTreeMap<&'static str, FieldValue>,
    children: BTreeMap<&'static str, Arc<Section>>,
}

impl Section {
    pub fn leaf(&self, key: &str) -> Option<&FieldValue> {
        self.leaves.get(key)
    }

    pub fn child(&self, key: &str) -> Option<&Arc<Section>> {
        self.children.get(key)
    }

    // only used while building a fresh shape, when every Arc is unique
    fn insert_default(&mut self, segments: &[&'static str], value: FieldValue) {
        match segments {
            [] => {}
            [field] => {
                self.leaves.insert(*field, value);
            }
            [head, rest @ ..] => {
                let child = self.children.entry(*head).or_default();
                Arc::make_mut(child).insert_default(rest, value);
            }
        }
    }

    fn get(&self, segments: &[&str], path: &FieldPath) -> Result<&FieldValue, PathError> {
        match segments {
            [] => Err(PathError::Malformed(path.to_string())),
            [field] => self
                .leaves
                .get(*field)
                .ok_or_else(|| unknown_field(path, field)),
            [head, rest @ ..] => self
                .children
                .get(*head)
                .ok_or_else(|| unknown_section(path, head))?
                .get(rest, path),
        }
    }

    /// Copy of `self` with one leaf replaced. Only sections on the path are
    /// rebuilt; every other child keeps its `Arc`.
    fn updated(
        &self,
        segments: &[&str],
        value: FieldValue,
        path: &FieldPath,
    ) -> Result<Section, PathError> {
        match segments {
            [] => Err(PathError::Malformed(path.to_string())),
            [field] => {
                let current = self
                    .leaves
                    .get(*field)
                    .ok_or_else(|| unknown_field(path, field))?;
                if discriminant(current) != discriminant(&value) {
                    return Err(PathError::KindMismatch {
                        path: path.to_string(),
                        expected: current.kind_name(),
                        got: value.kind_name(),
                    });
                }

                let mut next = self.clone();
                if let Some(slot) = next.leaves.get_mut(*field) {
                    *slot = value;
                }
                Ok(next)
            }
            [head, rest @ ..] => {
                let mut next = self.clone();
                let slot = next
                    .children
                    .get_mut(*head)
                    .ok_or_else(|| unknown_section(path, head))?;
                let child = slot.updated(rest, value, path)?;
                *slot = Arc::new(child);
                Ok(next)
            }
        }
    }

    fn collect_paths(&self, prefix: &mut Vec<&'static str>, out: &mut Vec<FieldPath>) {
        for key in self.leaves.keys() {
            prefix.push(*key);
            if let Ok(path) = FieldPath::from_segments(prefix.as_slice()) {
                out.push(path);
            }
            prefix.pop();
        }
        for (key, child) in &self.children {
            prefix.push(*key);
            child.collect_paths(prefix, out);
            prefix.pop();
        }
    }

    fn serialize_entries<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        for (key, value) in &self.leaves {
            map.serialize_entry(key, value)?;
        }
        for (key, child) in &self.children {
            map.serialize_entry(key, child.as_ref())?;
        }
        Ok(())
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        self.serialize_entries(&mut map)?;
        map.end()
    }
}

fn unknown_field(path: &FieldPath, field: &str) -> PathError {
    PathError::UnknownField {
        path: path.to_string(),
        field: field.to_string(),
    }
}

fn unknown_section(path: &FieldPath, section: &str) -> PathError {
    PathError::UnknownSection {
        path: path.to_string(),
        section: section.to_string(),
    }
}

/// Submission payload for one collateral asset.
///
/// The shape is fixed by the asset type's descriptor table: only the section
/// named by `asset_type` exists, and every leaf starts at its default.
/// Records are immutable; [`AssetRecord::update`] returns a new record that
/// shares every untouched section with the old one.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRecord {
    asset_type: AssetType,
    root: Arc<Section>,
    documents: Arc<Vec<DocumentRef>>,
}

impl AssetRecord {
    pub fn new(asset_type: AssetType) -> Self {
        let mut root = Section::default();
        root.insert_default(&["application", "id"], FieldValue::Text(String::new()));

        for descriptor in descriptors_for(asset_type) {
            let segments: Vec<&'static str> = descriptor.key.split('.').collect();
            root.insert_default(&segments, FieldValue::default_for(descriptor.kind));
        }

        Self {
            asset_type,
            root: Arc::new(root),
            documents: Arc::new(Vec::new()),
        }
    }

    pub fn asset_type(&self) -> AssetType {
        self.asset_type
    }

    pub fn root(&self) -> &Arc<Section> {
        &self.root
    }

    pub fn section(&self, key: &str) -> Option<&Arc<Section>> {
        self.root.child(key)
    }

    pub fn documents(&self) -> &[DocumentRef] {
        &self.documents
    }

    pub fn application_id(&self) -> &str {
        self.root
            .child("application")
            .and_then(|s| s.leaf("id"))
            .and_then(FieldValue::as_str)
            .unwrap_or_default()
    }

    pub fn get(&self, path: &FieldPath) -> Result<&FieldValue, PathError> {
        self.root.get(&path.segments(), path)
    }

    /// Replace the leaf at `path`. Fails on any path the record's shape does
    /// not contain, or on a value of the wrong kind.
    pub fn update(&self, path: &FieldPath, value: FieldValue) -> Result<Self, PathError> {
        let root = self.root.updated(&path.segments(), value, path)?;
        Ok(Self {
            asset_type: self.asset_type,
            root: Arc::new(root),
            documents: Arc::clone(&self.documents),
        })
    }

    pub fn with_application_id(&self, id: &str) -> Result<Self, PathError> {
        self.update(&APPLICATION_ID.parse()?, FieldValue::Text(id.to_string()))
    }

    pub fn with_document(&self, document: DocumentRef) -> Self {
        let mut documents = self.documents.as_ref().clone();
        documents.push(document);
        Self {
            documents: Arc::new(documents),
            ..self.clone()
        }
    }

    pub fn without_document(&self, id: &str) -> Self {
        let documents = self
            .documents
            .iter()
            .filter(|d| d.id != id)
            .cloned()
            .collect();
        Self {
            documents: Arc::new(documents),
            ..self.clone()
        }
    }

    /// Every leaf path of this record's shape.
    pub fn paths(&self) -> Vec<FieldPath> {
        let mut out = Vec::new();
        self.root.collect_paths(&mut Vec::new(), &mut out);
        out
    }
}

impl Serialize for AssetRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("assetType", &self.asset_type)?;
        self.root.serialize_entries(&mut map)?;
        map.serialize_entry("documents", self.documents.as_ref())?;
        map.end()
    }
}
