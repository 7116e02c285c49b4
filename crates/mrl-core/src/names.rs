//! # Name Newtypes
//!
//! Crop and active-substance names as they arrive from callers and from the
//! record store. Each name keeps its display form (as written by the caller
//! or the store) and a comparison key: trimmed and lowercased. Equality,
//! ordering and hashing use the key only, so `" Mango "` and `"mango"` are
//! the same crop.
//!
//! ## Validation
//!
//! - Surrounding whitespace is trimmed.
//! - Empty names are rejected.
//! - Names longer than [`MAX_NAME_LEN`] characters are rejected.
//! - Control characters are rejected.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Maximum accepted length of a crop or substance name, in characters.
pub const MAX_NAME_LEN: usize = 128;

fn validate_name(raw: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(match field {
            "crop" => ValidationError::EmptyCrop,
            _ => ValidationError::EmptySubstance,
        });
    }
    let len = trimmed.chars().count();
    if len > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong {
            field,
            len,
            max: MAX_NAME_LEN,
        });
    }
    if trimmed.chars().any(char::is_control) {
        return Err(ValidationError::ControlCharacters {
            field,
            value: trimmed.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

macro_rules! name_newtype {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            display: String,
            key: String,
        }

        impl $name {
            /// Validate and normalize a raw name.
            pub fn parse(raw: &str) -> Result<Self, ValidationError> {
                let display = validate_name(raw, $field)?;
                let key = display.to_lowercase();
                Ok(Self { display, key })
            }

            /// The name as written (trimmed).
            pub fn as_str(&self) -> &str {
                &self.display
            }

            /// The normalized comparison key (trimmed, lowercase).
            pub fn key(&self) -> &str {
                &self.key
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.key == other.key
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.key.hash(state);
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.key.cmp(&other.key)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.display)
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.display)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::parse(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

name_newtype!(
    /// A crop name (e.g. "mango", "Tomato").
    CropName,
    "crop"
);

name_newtype!(
    /// An active-substance name (e.g. "Azoxystrobin", "Alpha-cypermethrin").
    SubstanceName,
    "substance"
);

/// Identity of a regulatory record: one (crop, substance) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    pub crop: CropName,
    pub substance: SubstanceName,
}

impl RecordKey {
    pub fn new(crop: CropName, substance: SubstanceName) -> Self {
        Self { crop, substance }
    }

    /// Validate both names and build the key.
    pub fn parse(crop: &str, substance: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            crop: CropName::parse(crop)?,
            substance: SubstanceName::parse(substance)?,
        })
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} on {}", self.substance, self.crop)
    }
}
