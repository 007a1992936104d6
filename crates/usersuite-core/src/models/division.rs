//! Divisions, dormitories, and the startup catalog
//!
//! A division groups the dormitories that share one identity backend; a
//! dormitory is a selectable residence bound to exactly one division plus
//! the networks physically located there. The catalog is built once at
//! startup from configuration and never mutated afterwards, so concurrent
//! reads need no synchronization.

use crate::error::AppError;
use crate::models::SubnetCollection;
use crate::traits::UserBackend;
use crate::AppResult;
use std::fmt;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{debug, info};

/// A tenant sharing one identity backend
///
/// Immutable after construction; equality is by `name` only.
pub struct Division {
    /// Unique key
    pub name: String,

    /// Localized label shown on the login page
    pub display_name: String,

    /// Mail domain for generated forwarding addresses
    pub mail_server: String,

    /// Address of the division's support team
    pub support_mail: Option<String>,

    /// Excluded from production selection when set
    pub debug_only: bool,

    backend: Arc<dyn UserBackend>,
}

impl Division {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        mail_server: impl Into<String>,
        support_mail: Option<String>,
        debug_only: bool,
        backend: Arc<dyn UserBackend>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            mail_server: mail_server.into(),
            support_mail,
            debug_only,
            backend,
        }
    }

    /// The identity backend bound to this division
    pub fn backend(&self) -> &dyn UserBackend {
        self.backend.as_ref()
    }
}

impl PartialEq for Division {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Division {}

impl fmt::Debug for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Division")
            .field("name", &self.name)
            .field("display_name", &self.display_name)
            .field("mail_server", &self.mail_server)
            .field("debug_only", &self.debug_only)
            .finish_non_exhaustive()
    }
}

/// A residence selectable on the login page
#[derive(Debug, Clone)]
pub struct Dormitory {
    pub name: String,
    pub display_name: String,
    pub division: Arc<Division>,
    pub subnets: SubnetCollection,
}

impl PartialEq for Dormitory {
    /// Two dormitories are equal only if both name and division match.
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.division == other.division
    }
}

impl Eq for Dormitory {}

/// The process-wide division/dormitory registry
///
/// Populated once at startup; lookups validate user-submitted selections
/// against the configured catalog.
pub struct Catalog {
    divisions: Vec<Arc<Division>>,
    dormitories: Vec<Dormitory>,
}

impl Catalog {
    /// Assemble the catalog, rejecting duplicate names
    pub fn new(divisions: Vec<Arc<Division>>, dormitories: Vec<Dormitory>) -> AppResult<Self> {
        for (i, division) in divisions.iter().enumerate() {
            if divisions[..i].iter().any(|d| d.name == division.name) {
                return Err(AppError::Config(format!(
                    "duplicate division name '{}'",
                    division.name
                )));
            }
        }
        for (i, dormitory) in dormitories.iter().enumerate() {
            if dormitories[..i].iter().any(|d| d.name == dormitory.name) {
                return Err(AppError::Config(format!(
                    "duplicate dormitory name '{}'",
                    dormitory.name
                )));
            }
        }

        Ok(Self {
            divisions,
            dormitories,
        })
    }

    /// Run every backend's startup hook, in catalog order
    ///
    /// Called exactly once during bootstrap; the first failing hook aborts
    /// startup since it wires backend connectivity for its division.
    pub async fn init(&self) -> AppResult<()> {
        for division in &self.divisions {
            debug!(division = %division.name, "Initializing division backend");
            division.backend().init().await?;
            info!(division = %division.name, "Division backend ready");
        }
        Ok(())
    }

    /// Look up a division by name
    pub fn division(&self, name: &str) -> Option<&Arc<Division>> {
        self.divisions.iter().find(|d| d.name == name)
    }

    /// Look up a dormitory by name
    pub fn dormitory(&self, name: &str) -> Option<&Dormitory> {
        self.dormitories.iter().find(|d| d.name == name)
    }

    /// The first dormitory whose subnets contain `address`
    pub fn dormitory_for_ip(&self, address: Ipv4Addr) -> Option<&Dormitory> {
        self.dormitories.iter().find(|d| d.subnets.contains(address))
    }

    /// Dormitories selectable on the login page
    ///
    /// Dormitories of `debug_only` divisions are excluded unless
    /// `include_debug` is set.
    pub fn selectable(&self, include_debug: bool) -> impl Iterator<Item = &Dormitory> {
        self.dormitories
            .iter()
            .filter(move |d| include_debug || !d.division.debug_only)
    }

    /// All divisions, in catalog order
    pub fn divisions(&self) -> &[Arc<Division>] {
        &self.divisions
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("divisions", &self.divisions.len())
            .field("dormitories", &self.dormitories.len())
            .finish()
    }
}
