//! REST identity backend adapter
//!
//! Translates the common user contract into calls against a per-division
//! REST API with token authentication. Accounts live entirely in the remote
//! service; this adapter only reshapes its records.
//!
//! Wire contract: `GET find?login=<uid>` / `GET find?ip=<addr>` answer an
//! account record or JSON null, `POST auth` answers a truthy/falsy value or
//! the `"NoAccount"` sentinel, `GET <id>/traffic` and `GET <id>/credit`
//! deliver raw byte counters.

pub mod client;
pub mod records;

use crate::rest::client::{ApiReply, RestClient};
use crate::rest::records::{
    build_info, parse_traffic_entries, AccountRecord, CreditRecord, HostTrafficRecord,
};
use async_trait::async_trait;
use chrono::Local;
use serde_json::Value;
use std::net::Ipv4Addr;
use tracing::{debug, instrument};
use usersuite_core::models::traffic::aggregate;
use usersuite_core::models::{
    AccountInfo, Feature, FeatureSet, IpLookup, PortalUser, TrafficRecord, MIB,
};
use usersuite_core::traits::UserBackend;
use usersuite_core::{AppError, AppResult};

/// The NoAccount sentinel of the auth endpoint
const NO_ACCOUNT: &str = "NoAccount";

/// Backend adapter for divisions served by the REST identity API
///
/// The API offers lookup, authentication and traffic data but no mutating
/// operations, so every feature of the universe is subtracted.
pub struct RestBackend {
    division: String,
    mail_server: String,
    client: RestClient,
}

impl RestBackend {
    const FEATURES: FeatureSet = FeatureSet::full()
        .without(Feature::MailChange)
        .without(Feature::MacChange)
        .without(Feature::PasswordChange)
        .without(Feature::HostingDb);

    /// Create an adapter from explicit per-division configuration
    pub fn new(
        division: &str,
        mail_server: &str,
        endpoint: &str,
        token: &str,
        accept_invalid_certs: bool,
    ) -> AppResult<Self> {
        Ok(Self {
            division: division.to_string(),
            mail_server: mail_server.to_string(),
            client: RestClient::new(endpoint, token, accept_invalid_certs)?,
        })
    }

    /// Build a user from a `find` record
    ///
    /// Backend fields may be null; the login falls back to the queried uid
    /// and the forwarding address is derived from the division mail server.
    fn user_from_record(
        &self,
        record: &AccountRecord,
        fallback_uid: &str,
        ip: Option<Ipv4Addr>,
    ) -> PortalUser {
        let uid = record
            .login
            .clone()
            .unwrap_or_else(|| fallback_uid.to_string());
        let name = record.name.clone().unwrap_or_else(|| uid.clone());
        let mail = Some(format!("{}@{}", uid, self.mail_server));

        PortalUser {
            uid,
            id: record.id,
            name,
            mail,
            ip,
            division: self.division.clone(),
        }
    }

    /// Run a `find` query and parse the optional account record
    async fn find(&self, query: &[(&str, &str)]) -> AppResult<Option<AccountRecord>> {
        let reply = self.client.get("find", query).await?;

        match reply.into_record()? {
            Value::Null => Ok(None),
            value => {
                let record = serde_json::from_value(value)
                    .map_err(|e| AppError::Backend(format!("malformed account record: {}", e)))?;
                Ok(Some(record))
            }
        }
    }
}

#[async_trait]
impl UserBackend for RestBackend {
    async fn init(&self) -> AppResult<()> {
        debug!(division = %self.division, "REST backend configured");
        Ok(())
    }

    fn features(&self) -> FeatureSet {
        Self::FEATURES
    }

    #[instrument(skip(self), fields(division = %self.division))]
    async fn get(&self, uid: &str) -> AppResult<PortalUser> {
        let record = self
            .find(&[("login", uid)])
            .await?
            .ok_or_else(|| AppError::UserNotFound(uid.to_string()))?;

        Ok(self.user_from_record(&record, uid, None))
    }

    #[instrument(skip(self, password), fields(division = %self.division))]
    async fn authenticate(&self, uid: &str, password: &str) -> AppResult<PortalUser> {
        let reply = self
            .client
            .post_form("auth", &[("login", uid), ("pass", password)])
            .await?;

        if reply.as_sentinel() == Some(NO_ACCOUNT) {
            return Err(AppError::UserNotFound(uid.to_string()));
        }

        if reply.is_truthy() {
            self.get(uid).await
        } else {
            Err(AppError::PasswordInvalid)
        }
    }

    #[instrument(skip(self), fields(division = %self.division))]
    async fn from_ip(&self, address: Ipv4Addr) -> AppResult<IpLookup> {
        let addr = address.to_string();
        match self.find(&[("ip", addr.as_str())]).await? {
            Some(record) => {
                let uid = record.login.clone().unwrap_or_default();
                let user = PortalUser {
                    name: record.name.clone().unwrap_or_else(|| uid.clone()),
                    uid,
                    id: record.id,
                    mail: None,
                    ip: Some(address),
                    division: self.division.clone(),
                };
                Ok(IpLookup::Known(user))
            }
            None => Ok(IpLookup::Anonymous),
        }
    }

    #[instrument(skip(self, user), fields(division = %self.division, uid = %user.uid))]
    async fn info(&self, user: &PortalUser) -> AppResult<AccountInfo> {
        let value = self
            .client
            .get(&user.id.to_string(), &[])
            .await?
            .into_record()?;
        let record: AccountRecord = serde_json::from_value(value)
            .map_err(|e| AppError::Backend(format!("malformed account record: {}", e)))?;

        Ok(build_info(&record))
    }

    #[instrument(skip(self, user), fields(division = %self.division, uid = %user.uid))]
    async fn traffic(&self, user: &PortalUser) -> AppResult<TrafficRecord> {
        let today = Local::now().date_naive();
        let value = self
            .client
            .get(&format!("{}/traffic", user.id), &[])
            .await?
            .into_record()?;

        if value.is_null() {
            return Ok(TrafficRecord::zero(today));
        }

        let hosts: Vec<HostTrafficRecord> = serde_json::from_value(value)
            .map_err(|e| AppError::Backend(format!("malformed traffic log: {}", e)))?;

        // The portal charts the first registered host's log.
        match hosts.into_iter().next() {
            Some(host) => {
                let entries = parse_traffic_entries(host.traffic)?;
                Ok(aggregate(&entries, today))
            }
            None => Ok(TrafficRecord::zero(today)),
        }
    }

    #[instrument(skip(self, user), fields(division = %self.division, uid = %user.uid))]
    async fn current_credit(&self, user: &PortalUser) -> AppResult<f64> {
        let value = self
            .client
            .get(&format!("{}/credit", user.id), &[])
            .await?
            .into_record()?;

        if value.is_null() {
            return Ok(0.0);
        }

        let records: Vec<CreditRecord> = serde_json::from_value(value)
            .map_err(|e| AppError::Backend(format!("malformed credit record: {}", e)))?;

        Ok(records
            .first()
            .map(|r| r.credit as f64 / MIB)
            .unwrap_or(0.0))
    }
}
