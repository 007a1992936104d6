//! Optional account-mutation capabilities
//!
//! Each division's backend supports a subset of the mutating account
//! operations. The subset is declared per backend type by subtracting the
//! unsupported features from the full universe.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An optional account-mutation capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Changing or deleting the mail forwarding address
    MailChange,
    /// Re-registering the MAC address of the user's device
    MacChange,
    /// Changing the account password
    PasswordChange,
    /// Managing the personal hosting database
    HostingDb,
}

impl Feature {
    /// The full feature universe
    pub const ALL: [Feature; 4] = [
        Feature::MailChange,
        Feature::MacChange,
        Feature::PasswordChange,
        Feature::HostingDb,
    ];

    const fn bit(self) -> u8 {
        match self {
            Feature::MailChange => 1 << 0,
            Feature::MacChange => 1 << 1,
            Feature::PasswordChange => 1 << 2,
            Feature::HostingDb => 1 << 3,
        }
    }

    /// Stable identifier used in API payloads and logs
    pub fn as_str(self) -> &'static str {
        match self {
            Feature::MailChange => "mail_change",
            Feature::MacChange => "mac_change",
            Feature::PasswordChange => "password_change",
            Feature::HostingDb => "hosting_db",
        }
    }

    /// Account-information field shadowed by this feature.
    ///
    /// Fields backed purely by a capability (and not by backend record data)
    /// are rendered as unsupported when the capability is absent.
    pub fn display_field(self) -> Option<&'static str> {
        match self {
            Feature::HostingDb => Some("userdb"),
            _ => None,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of features a backend supports
///
/// Constructed by subtracting unsupported features from [`FeatureSet::full`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSet {
    mask: u8,
}

impl FeatureSet {
    /// The empty set: no mutating operation is available
    pub const fn empty() -> Self {
        Self { mask: 0 }
    }

    /// The full feature universe
    pub const fn full() -> Self {
        Self {
            mask: Feature::MailChange.bit()
                | Feature::MacChange.bit()
                | Feature::PasswordChange.bit()
                | Feature::HostingDb.bit(),
        }
    }

    /// Remove a feature from the set
    pub const fn without(self, feature: Feature) -> Self {
        Self {
            mask: self.mask & !feature.bit(),
        }
    }

    /// Whether the set contains `feature`
    pub fn contains(self, feature: Feature) -> bool {
        self.mask & feature.bit() != 0
    }

    /// All supported features, in universe order
    pub fn supported(self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|f| self.contains(*f))
            .collect()
    }

    /// All unsupported features, in universe order
    pub fn unsupported(self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|f| !self.contains(*f))
            .collect()
    }

    /// Account-information fields to render as unsupported
    ///
    /// Only unsupported features with a display field contribute here.
    pub fn unsupported_display_fields(self) -> Vec<&'static str> {
        self.unsupported()
            .into_iter()
            .filter_map(Feature::display_field)
            .collect()
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_contains_everything() {
        let set = FeatureSet::full();
        for feature in Feature::ALL {
            assert!(set.contains(feature));
        }
        assert!(set.unsupported().is_empty());
    }

    #[test]
    fn test_subtraction() {
        let set = FeatureSet::full()
            .without(Feature::HostingDb)
            .without(Feature::MacChange);

        assert!(set.contains(Feature::MailChange));
        assert!(set.contains(Feature::PasswordChange));
        assert!(!set.contains(Feature::MacChange));
        assert!(!set.contains(Feature::HostingDb));
        assert_eq!(
            set.unsupported(),
            vec![Feature::MacChange, Feature::HostingDb]
        );
    }

    #[test]
    fn test_empty_set() {
        let set = FeatureSet::empty();
        assert!(set.supported().is_empty());
        assert_eq!(set.unsupported().len(), Feature::ALL.len());
    }

    #[test]
    fn test_display_fields() {
        // Only the hosting database is a pure capability field; the others are
        // shown from backend record data even when immutable.
        let set = FeatureSet::empty();
        assert_eq!(set.unsupported_display_fields(), vec!["userdb"]);

        let set = FeatureSet::full();
        assert!(set.unsupported_display_fields().is_empty());
    }

    #[test]
    fn test_without_is_idempotent() {
        let once = FeatureSet::full().without(Feature::MailChange);
        let twice = once.without(Feature::MailChange);
        assert_eq!(once, twice);
    }
}
