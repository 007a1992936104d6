//! Session claims
//!
//! The token carries identity only — login name, division, and the
//! backend-assigned account id. The user itself is never serialized into
//! the session; it is re-fetched from backend truth on every request.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use usersuite_core::models::PortalUser;

/// JWT claims of a portal session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (login name)
    pub sub: String,

    /// Name of the division the user logged into
    pub division: String,

    /// Backend-assigned numeric account id
    pub account: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a freshly authenticated user
    ///
    /// The expiration is left unset and filled in by the token service.
    pub fn for_user(user: &PortalUser) -> Self {
        Self {
            sub: user.uid.clone(),
            division: user.division.clone(),
            account: user.id,
            iat: Utc::now().timestamp(),
            exp: 0,
        }
    }

    /// Create claims with an explicit expiration duration
    pub fn with_expiration(user: &PortalUser, expires_in_secs: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user.uid.clone(),
            division: user.division.clone(),
            account: user.id,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(expires_in_secs)).timestamp(),
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        self.exp <= Utc::now().timestamp()
    }
}
