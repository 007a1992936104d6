//! The per-division user backend contract
//!
//! Every division binds one implementation of [`UserBackend`]. Page-level
//! callers never see the backend kind; they program against this trait and
//! the division's [`FeatureSet`](crate::models::FeatureSet).

use crate::error::AppError;
use crate::models::{AccountInfo, Feature, FeatureSet, IpLookup, PortalUser, TrafficRecord};
use crate::AppResult;
use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Capability contract of a division's identity backend
///
/// Lookup and authentication failures are the two recoverable outcomes and
/// must stay distinguishable; transport-level or malformed-reply failures
/// surface as [`AppError::Backend`] and are fatal for the single call.
///
/// Mutating operations default to a fast [`AppError::NotSupported`] failure
/// so that a backend only implements what its division actually offers.
#[async_trait]
pub trait UserBackend: Send + Sync {
    /// One-time startup hook, run during application bootstrap in catalog
    /// order. A failure here is fatal to startup.
    async fn init(&self) -> AppResult<()> {
        Ok(())
    }

    /// The static feature set of this backend type
    fn features(&self) -> FeatureSet;

    /// Resolve an account by login name
    ///
    /// Fails with [`AppError::UserNotFound`] when the backend has no such
    /// account.
    async fn get(&self, uid: &str) -> AppResult<PortalUser>;

    /// Verify credentials, then behave as [`UserBackend::get`]
    ///
    /// Fails with [`AppError::UserNotFound`] for an unknown account and with
    /// [`AppError::PasswordInvalid`] for a credential mismatch.
    async fn authenticate(&self, uid: &str, password: &str) -> AppResult<PortalUser>;

    /// Best-effort reverse lookup by IP address
    ///
    /// An address without an account yields [`IpLookup::Anonymous`], never
    /// an error; this path attributes passive, unauthenticated traffic.
    async fn from_ip(&self, address: Ipv4Addr) -> AppResult<IpLookup>;

    /// The uniform account-information projection for display
    async fn info(&self, user: &PortalUser) -> AppResult<AccountInfo>;

    /// The trailing-7-day traffic history plus current credit
    async fn traffic(&self, user: &PortalUser) -> AppResult<TrafficRecord>;

    /// The current credit in MiB
    async fn current_credit(&self, user: &PortalUser) -> AppResult<f64>;

    /// Change the mail forwarding address; `None` clears it
    async fn change_mail(&self, user: &PortalUser, mail: Option<&str>) -> AppResult<()> {
        let _ = (user, mail);
        Err(AppError::NotSupported(Feature::MailChange))
    }

    /// Re-register the MAC address of the user's device
    async fn change_mac(&self, user: &PortalUser, mac: &str) -> AppResult<()> {
        let _ = (user, mac);
        Err(AppError::NotSupported(Feature::MacChange))
    }

    /// Change the account password after verifying the old one
    async fn change_password(&self, user: &PortalUser, old: &str, new: &str) -> AppResult<()> {
        let _ = (user, old, new);
        Err(AppError::NotSupported(Feature::PasswordChange))
    }

    /// Provision the personal hosting database
    async fn create_hosting_db(&self, user: &PortalUser, password: &str) -> AppResult<()> {
        let _ = (user, password);
        Err(AppError::NotSupported(Feature::HostingDb))
    }

    /// Change the hosting database password
    async fn change_hosting_password(&self, user: &PortalUser, password: &str) -> AppResult<()> {
        let _ = (user, password);
        Err(AppError::NotSupported(Feature::HostingDb))
    }

    /// Drop the personal hosting database
    async fn drop_hosting_db(&self, user: &PortalUser) -> AppResult<()> {
        let _ = user;
        Err(AppError::NotSupported(Feature::HostingDb))
    }

    /// Whether the user currently owns a hosting database
    async fn has_hosting_db(&self, user: &PortalUser) -> AppResult<bool> {
        let _ = user;
        Err(AppError::NotSupported(Feature::HostingDb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeatureSet;

    /// Minimal backend relying entirely on the trait defaults
    struct Bare;

    #[async_trait]
    impl UserBackend for Bare {
        fn features(&self) -> FeatureSet {
            FeatureSet::empty()
        }

        async fn get(&self, uid: &str) -> AppResult<PortalUser> {
            Err(AppError::UserNotFound(uid.to_string()))
        }

        async fn authenticate(&self, uid: &str, _password: &str) -> AppResult<PortalUser> {
            Err(AppError::UserNotFound(uid.to_string()))
        }

        async fn from_ip(&self, _address: Ipv4Addr) -> AppResult<IpLookup> {
            Ok(IpLookup::Anonymous)
        }

        async fn info(&self, _user: &PortalUser) -> AppResult<AccountInfo> {
            Err(AppError::Internal("unused".to_string()))
        }

        async fn traffic(&self, _user: &PortalUser) -> AppResult<TrafficRecord> {
            Err(AppError::Internal("unused".to_string()))
        }

        async fn current_credit(&self, _user: &PortalUser) -> AppResult<f64> {
            Ok(0.0)
        }
    }

    fn someone() -> PortalUser {
        PortalUser {
            uid: "someone".to_string(),
            id: 1,
            name: "Someone".to_string(),
            mail: None,
            ip: None,
            division: "south".to_string(),
        }
    }

    #[tokio::test]
    async fn test_default_mutators_fail_fast() {
        let backend = Bare;
        let user = someone();

        assert!(matches!(
            backend.change_mail(&user, Some("a@b.c")).await,
            Err(AppError::NotSupported(Feature::MailChange))
        ));
        assert!(matches!(
            backend.change_mac(&user, "aa:bb:cc:dd:ee:ff").await,
            Err(AppError::NotSupported(Feature::MacChange))
        ));
        assert!(matches!(
            backend.change_password(&user, "old", "new").await,
            Err(AppError::NotSupported(Feature::PasswordChange))
        ));
        assert!(matches!(
            backend.create_hosting_db(&user, "secret").await,
            Err(AppError::NotSupported(Feature::HostingDb))
        ));
        assert!(matches!(
            backend.has_hosting_db(&user).await,
            Err(AppError::NotSupported(Feature::HostingDb))
        ));
    }

    #[tokio::test]
    async fn test_default_init_succeeds() {
        assert!(Bare.init().await.is_ok());
    }
}
