//! Catalog construction
//!
//! Builds the process-wide division/dormitory registry from configuration,
//! binding each division to its concrete backend adapter. Runs once at
//! startup; the resulting catalog is immutable.

use crate::rest::RestBackend;
use crate::sample::SampleBackend;
use std::sync::Arc;
use tracing::info;
use usersuite_core::config::{AppConfig, BackendConfig};
use usersuite_core::models::{Catalog, Division, Dormitory, SubnetCollection};
use usersuite_core::traits::UserBackend;
use usersuite_core::AppResult;

/// Build the catalog declared in `config`
pub fn build_catalog(config: &AppConfig) -> AppResult<Catalog> {
    let mut divisions = Vec::with_capacity(config.divisions.len());
    let mut dormitories = Vec::new();

    for div in &config.divisions {
        let backend: Arc<dyn UserBackend> = match &div.backend {
            BackendConfig::Rest {
                endpoint,
                token,
                accept_invalid_certs,
            } => Arc::new(RestBackend::new(
                &div.name,
                &div.mail_server,
                endpoint,
                token,
                *accept_invalid_certs,
            )?),
            BackendConfig::Sample { accounts } => Arc::new(SampleBackend::from_config(
                &div.name,
                &div.mail_server,
                accounts,
            )?),
        };

        let division = Arc::new(Division::new(
            div.name.clone(),
            div.display_name.clone(),
            div.mail_server.clone(),
            div.support_mail.clone(),
            div.debug_only,
            backend,
        ));

        for dorm in &div.dormitories {
            dormitories.push(Dormitory {
                name: dorm.name.clone(),
                display_name: dorm.display_name.clone(),
                division: division.clone(),
                subnets: SubnetCollection::parse(&dorm.subnets)?,
            });
        }

        divisions.push(division);
    }

    info!(
        divisions = divisions.len(),
        dormitories = dormitories.len(),
        "Catalog assembled"
    );

    Catalog::new(divisions, dormitories)
}
