//! Record types of the REST identity API and their reshaping
//!
//! Reshaping backend records into the display projection is pure data
//! transformation; no backend calls happen here.

use chrono::NaiveDate;
use serde::Deserialize;
use usersuite_core::models::{AccountInfo, InfoField, RawTrafficEntry, Status};
use usersuite_core::{AppError, AppResult};

/// An account record as returned by `find` and by the detail endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct AccountRecord {
    pub id: i64,

    #[serde(default)]
    pub login: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub mail: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub hosts: Vec<HostRecord>,
}

/// One registered host of an account
#[derive(Debug, Clone, Deserialize)]
pub struct HostRecord {
    #[serde(default)]
    pub ip: Option<String>,

    #[serde(default)]
    pub mac: Option<String>,

    #[serde(default)]
    pub hostname: Option<String>,

    #[serde(default)]
    pub alias: Option<String>,
}

/// Per-host traffic log wrapper of the traffic endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct HostTrafficRecord {
    #[serde(default)]
    pub traffic: Vec<TrafficEntryRecord>,
}

/// One raw day of the traffic log
#[derive(Debug, Clone, Deserialize)]
pub struct TrafficEntryRecord {
    pub date: String,

    #[serde(rename = "in")]
    pub input: u64,

    pub out: u64,

    pub credit: u64,
}

/// Credit as returned by the credit endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct CreditRecord {
    pub credit: u64,
}

/// Join one host attribute across all hosts, skipping null entries
fn join_present<'a, F>(hosts: &'a [HostRecord], pick: F) -> InfoField
where
    F: Fn(&'a HostRecord) -> Option<&'a String>,
{
    let values: Vec<&str> = hosts
        .iter()
        .filter_map(|host| pick(host).map(String::as_str))
        .collect();

    if values.is_empty() {
        InfoField::absent()
    } else {
        InfoField::new(values.join(", "))
    }
}

fn optional(value: &Option<String>) -> InfoField {
    match value {
        Some(v) => InfoField::new(v.clone()),
        None => InfoField::absent(),
    }
}

/// Reshape a full account record into the display projection
pub fn build_info(record: &AccountRecord) -> AccountInfo {
    let mut ip = join_present(&record.hosts, |h| h.ip.as_ref());
    ip.status = Status::Info;

    AccountInfo {
        id: InfoField::new(record.id.to_string()),
        uid: optional(&record.login),
        status: match &record.status {
            Some(s) => InfoField::with_status(s.clone(), Status::Good),
            None => InfoField::absent(),
        },
        address: optional(&record.address),
        mail: optional(&record.mail),
        ip,
        mac: join_present(&record.hosts, |h| h.mac.as_ref()),
        hostname: join_present(&record.hosts, |h| h.hostname.as_ref()),
        hostalias: join_present(&record.hosts, |h| h.alias.as_ref()),
        // Capability-backed; the caller marks it per division feature set.
        userdb: InfoField::absent(),
    }
}

/// Parse raw traffic log entries, validating their dates
pub fn parse_traffic_entries(raw: Vec<TrafficEntryRecord>) -> AppResult<Vec<RawTrafficEntry>> {
    raw.into_iter()
        .map(|entry| {
            let date = NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d").map_err(|e| {
                AppError::Backend(format!("malformed traffic date '{}': {}", entry.date, e))
            })?;
            Ok(RawTrafficEntry {
                date,
                input: entry.input,
                output: entry.out,
                credit: entry.credit,
            })
        })
        .collect()
}
