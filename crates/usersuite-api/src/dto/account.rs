//! Account management DTOs

use serde::{Deserialize, Serialize};
use usersuite_core::validators::validate_mac;
use validator::{Validate, ValidationError};

/// Change (or set) the mail forwarding address
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangeMailRequest {
    /// The new forwarding address
    #[validate(email(message = "Invalid email format"))]
    pub mail: String,
}

/// Re-register a device MAC address
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangeMacRequest {
    /// Colon-separated MAC address
    #[validate(custom(function = "mac_format"))]
    pub mac: String,
}

fn mac_format(mac: &str) -> Result<(), ValidationError> {
    validate_mac(mac).map_err(|_| ValidationError::new("mac_format"))
}

/// Change the account password
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Current password
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    /// New password
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}

/// Provision the hosting database or rotate its password
///
/// The access mask is derived from the user's current address by the
/// backend; clients only supply the password.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HostingRequest {
    /// Database password
    #[validate(length(min = 6, message = "Database password must be at least 6 characters"))]
    pub password: String,
}

/// Hosting database status
#[derive(Debug, Clone, Serialize)]
pub struct HostingStatusResponse {
    /// Whether a database is provisioned
    pub exists: bool,
}

/// Current credit in MiB
#[derive(Debug, Clone, Serialize)]
pub struct CreditResponse {
    pub credit: f64,
}

/// Generic acknowledgement
#[derive(Debug, Clone, Serialize)]
pub struct AckResponse {
    pub message: String,
}

impl AckResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
