//! # Required Tag Policy
//!
//! [`RequiredTags`] is the ordered list of tag keys every resource is
//! expected to carry. Order is preserved because it is the order reports
//! list the keys in; lookups are by exact key.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Ordered, non-empty, duplicate-free list of required tag keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RequiredTags(Vec<String>);

impl RequiredTags {
    /// The cost-governance tag set used when no policy is configured.
    pub const DEFAULT_KEYS: [&'static str; 6] = [
        "Department",
        "Project",
        "Environment",
        "Owner",
        "CostCenter",
        "CreatedBy",
    ];

    /// Build a required-tag list, trimming each key.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::NoRequiredTags`] if no keys are given.
    /// - [`ValidationError::EmptyTagKey`] if any key is blank.
    /// - [`ValidationError::DuplicateTag`] if a key repeats.
    pub fn new<I, S>(keys: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for key in keys {
            let key = key.into().trim().to_string();
            if key.is_empty() {
                return Err(ValidationError::EmptyTagKey);
            }
            if out.contains(&key) {
                return Err(ValidationError::DuplicateTag(key));
            }
            out.push(key);
        }
        if out.is_empty() {
            return Err(ValidationError::NoRequiredTags);
        }
        Ok(Self(out))
    }

    /// Keys in configured order.
    pub fn keys(&self) -> &[String] {
        &self.0
    }

    /// Iterate keys in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of required keys. Always at least one.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `key` is one of the required keys.
    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|k| k == key)
    }
}

impl Default for RequiredTags {
    fn default() -> Self {
        Self(Self::DEFAULT_KEYS.iter().map(|k| k.to_string()).collect())
    }
}

impl<'de> Deserialize<'de> for RequiredTags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Vec::<String>::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}
