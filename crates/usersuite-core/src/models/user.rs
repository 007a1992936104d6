//! Portal user model
//!
//! A user is reconstructed from backend truth on every request and lives
//! only for the duration of that request cycle; nothing here is persisted.

use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;

/// A resident account as resolved by a division's identity backend
#[derive(Debug, Clone, Serialize)]
pub struct PortalUser {
    /// Backend login name
    pub uid: String,

    /// Backend-assigned numeric account id
    pub id: i64,

    /// Display name
    pub name: String,

    /// Mail forwarding address, if any
    pub mail: Option<String>,

    /// Last known IP address, if any
    pub ip: Option<Ipv4Addr>,

    /// Name of the owning division
    pub division: String,
}

impl PartialEq for PortalUser {
    /// Identity comparison: two users are the same account iff their
    /// division and login name match, whatever the remaining attributes.
    fn eq(&self, other: &Self) -> bool {
        self.division == other.division && self.uid == other.uid
    }
}

impl Eq for PortalUser {}

impl fmt::Display for PortalUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/{})", self.name, self.division, self.uid)
    }
}

/// Result of a passive reverse lookup by IP address
///
/// Used for unauthenticated traffic attribution; an address without a
/// backend account is a neutral outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpLookup {
    /// The address belongs to a known account
    Known(PortalUser),
    /// No account is registered for the address
    Anonymous,
}

impl IpLookup {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, IpLookup::Anonymous)
    }

    /// The resolved user, if the address was attributable
    pub fn user(&self) -> Option<&PortalUser> {
        match self {
            IpLookup::Known(user) => Some(user),
            IpLookup::Anonymous => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(division: &str, uid: &str, name: &str) -> PortalUser {
        PortalUser {
            uid: uid.to_string(),
            id: 42,
            name: name.to_string(),
            mail: None,
            ip: None,
            division: division.to_string(),
        }
    }

    #[test]
    fn test_equality_is_by_division_and_uid() {
        let a = user("south", "mmuster", "Mareike Musterfrau");
        let mut b = user("south", "mmuster", "Renamed Since");
        b.id = 7;
        b.mail = Some("m@example.org".to_string());

        assert_eq!(a, b);
        assert_ne!(a, user("south", "other", "Mareike Musterfrau"));
        assert_ne!(a, user("north", "mmuster", "Mareike Musterfrau"));
    }

    #[test]
    fn test_ip_lookup_accessors() {
        let known = IpLookup::Known(user("south", "mmuster", "M"));
        assert!(!known.is_anonymous());
        assert_eq!(known.user().unwrap().uid, "mmuster");

        let anonymous = IpLookup::Anonymous;
        assert!(anonymous.is_anonymous());
        assert!(anonymous.user().is_none());
    }
}
