//! Addresses of leaf values inside an asset record
use std::fmt;
use std::str::FromStr;

use crate::error::PathError;

/// One to three segments: `title`, `ownerInfo.fullName` or
/// `apartment.metadata.floor`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldPath {
    TopLevel(String),
    Section(String, String),
    SubField(String, String, String),
}

impl FieldPath {
    pub fn from_segments(segments: &[&str]) -> Result<Self, PathError> {
        if segments.iter().any(|s| s.is_empty()) {
            return Err(PathError::Malformed(segments.join(".")));
        }

        match segments {
            [key] => Ok(Self::TopLevel(key.to_string())),
            [section, key] => Ok(Self::Section(section.to_string(), key.to_string())),
            [section, subsection, key] => Ok(Self::SubField(
                section.to_string(),
                subsection.to_string(),
                key.to_string(),
            )),
            _ => Err(PathError::Malformed(segments.join("."))),
        }
    }

    pub fn segments(&self) -> Vec<&str> {
        match self {
            Self::TopLevel(key) => vec![key.as_str()],
            Self::Section(section, key) => vec![section.as_str(), key.as_str()],
            Self::SubField(section, subsection, key) => {
                vec![section.as_str(), subsection.as_str(), key.as_str()]
            }
        }
    }

    /// Name of the addressed leaf
    pub fn leaf(&self) -> &str {
        match self {
            Self::TopLevel(key) | Self::Section(_, key) | Self::SubField(_, _, key) => key,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Self::TopLevel(_) => 1,
            Self::Section(..) => 2,
            Self::SubField(..) => 3,
        }
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.split('.').collect();
        Self::from_segments(&segments)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments().join("."))
    }
}
