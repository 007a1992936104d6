//! Account information projection
//!
//! A uniform, backend-agnostic view of the attributes shown on the account
//! overview page. Every backend reshapes its own records into this form;
//! the fields carry a severity classification alongside the raw value.

use crate::models::FeatureSet;
use serde::Serialize;

/// Severity classification of an information field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Plain informational field without special weight
    #[default]
    Neutral,
    /// Everything in order (e.g. an active account status)
    Good,
    /// Highlighted, freshly derived data (e.g. the current IP)
    Info,
    /// Needs the user's attention
    Warning,
    /// The division's backend does not offer this field
    Unsupported,
}

/// A single displayable account attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoField {
    /// Raw value; `None` when the backend has no data for the field
    pub value: Option<String>,

    /// Presentation severity, independent of the raw value
    pub status: Status,
}

impl InfoField {
    /// A neutral field with a value
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            status: Status::Neutral,
        }
    }

    /// A field with a value and an explicit status
    pub fn with_status(value: impl Into<String>, status: Status) -> Self {
        Self {
            value: Some(value.into()),
            status,
        }
    }

    /// A field the backend returned no data for
    pub fn absent() -> Self {
        Self {
            value: None,
            status: Status::Neutral,
        }
    }

    /// A field whose feature is not offered by this division
    pub fn unsupported() -> Self {
        Self {
            value: None,
            status: Status::Unsupported,
        }
    }
}

/// The account overview, field by field
///
/// Serializes as a mapping of field name to [`InfoField`], in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountInfo {
    /// Backend-assigned numeric account id
    pub id: InfoField,
    /// Login name
    pub uid: InfoField,
    /// Account status as reported by the backend
    pub status: InfoField,
    /// Registered room address
    pub address: InfoField,
    /// Mail forwarding address
    pub mail: InfoField,
    /// Current IP address(es)
    pub ip: InfoField,
    /// Registered MAC address(es)
    pub mac: InfoField,
    /// Hostname(s)
    pub hostname: InfoField,
    /// Host alias(es)
    pub hostalias: InfoField,
    /// Personal hosting database
    pub userdb: InfoField,
}

impl AccountInfo {
    /// Overwrite capability-backed fields the division cannot serve
    ///
    /// Fields named by [`FeatureSet::unsupported_display_fields`] are
    /// replaced with the unsupported marker regardless of backend data.
    pub fn mark_unsupported(&mut self, features: FeatureSet) {
        for field in features.unsupported_display_fields() {
            match field {
                "userdb" => self.userdb = InfoField::unsupported(),
                _ => {}
            }
        }
    }
}
