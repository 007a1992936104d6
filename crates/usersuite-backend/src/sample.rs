//! In-memory demo backend
//!
//! Serves debug-only divisions with seeded accounts so the portal can run
//! without external directory services. Unlike the REST adapter it supports
//! the full feature set, which also makes it the reference implementation
//! for the contract test suite.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDate};
use parking_lot::RwLock;
use rand_core::OsRng;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use tracing::{debug, info, instrument};
use usersuite_core::config::SampleAccountConfig;
use usersuite_core::models::traffic::aggregate;
use usersuite_core::models::{
    AccountInfo, FeatureSet, InfoField, IpLookup, PortalUser, RawTrafficEntry, Status,
    TrafficRecord, MIB,
};
use usersuite_core::traits::UserBackend;
use usersuite_core::validators::validate_ip_mask;
use usersuite_core::{AppError, AppResult};

/// Hosting database state of a seeded account
#[derive(Debug, Clone)]
struct HostingDbRecord {
    name: String,
    access_mask: String,
    password_hash: String,
}

/// One seeded account
#[derive(Debug, Clone)]
struct SampleAccount {
    uid: String,
    id: i64,
    name: String,
    mail: Option<String>,
    ip: Option<Ipv4Addr>,
    mac: Option<String>,
    address: Option<String>,
    password_hash: String,
    hosting_db: Option<HostingDbRecord>,
}

/// Demo backend holding its accounts in memory
pub struct SampleBackend {
    division: String,
    mail_server: String,
    accounts: RwLock<HashMap<String, SampleAccount>>,
    argon2: Argon2<'static>,
}

impl SampleBackend {
    /// Build the backend from configuration, hashing the seed passwords
    pub fn from_config(
        division: &str,
        mail_server: &str,
        seeds: &[SampleAccountConfig],
    ) -> AppResult<Self> {
        let argon2 = Argon2::default();
        let mut accounts = HashMap::new();

        for seed in seeds {
            let ip = match &seed.ip {
                Some(raw) => Some(raw.parse().map_err(|_| {
                    AppError::Config(format!("invalid ip '{}' for account '{}'", raw, seed.uid))
                })?),
                None => None,
            };

            let account = SampleAccount {
                uid: seed.uid.clone(),
                id: seed.id,
                name: seed.name.clone(),
                mail: seed
                    .mail
                    .clone()
                    .or_else(|| Some(format!("{}@{}", seed.uid, mail_server))),
                ip,
                mac: seed.mac.clone(),
                address: seed.address.clone(),
                password_hash: hash_password(&argon2, &seed.password)?,
                hosting_db: None,
            };

            if accounts.insert(account.uid.clone(), account).is_some() {
                return Err(AppError::Config(format!(
                    "duplicate sample account '{}'",
                    seed.uid
                )));
            }
        }

        Ok(Self {
            division: division.to_string(),
            mail_server: mail_server.to_string(),
            accounts: RwLock::new(accounts),
            argon2,
        })
    }

    fn user_of(&self, account: &SampleAccount) -> PortalUser {
        PortalUser {
            uid: account.uid.clone(),
            id: account.id,
            name: account.name.clone(),
            mail: account.mail.clone(),
            ip: account.ip,
            division: self.division.clone(),
        }
    }

    /// Run `apply` on the stored account of `user`
    fn with_account<T>(
        &self,
        user: &PortalUser,
        apply: impl FnOnce(&mut SampleAccount) -> AppResult<T>,
    ) -> AppResult<T> {
        let mut accounts = self.accounts.write();
        let account = accounts
            .get_mut(&user.uid)
            .ok_or_else(|| AppError::UserNotFound(user.uid.clone()))?;
        apply(account)
    }

    /// Deterministic demo traffic for the trailing week
    fn demo_entries(uid: &str, today: NaiveDate) -> Vec<RawTrafficEntry> {
        let seed: u64 = uid.bytes().map(u64::from).sum();
        (-6..=0)
            .map(|offset| {
                let date = today + Duration::days(offset);
                let wobble = seed.wrapping_mul(31).wrapping_add(offset.unsigned_abs() * 97);
                RawTrafficEntry {
                    date,
                    input: (50 + wobble % 300) * MIB as u64,
                    output: (10 + wobble % 80) * MIB as u64,
                    credit: (2048 + wobble % 1024) * MIB as u64,
                }
            })
            .collect()
    }
}

fn hash_password(argon2: &Argon2<'_>, password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::PasswordHash(format!("password hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

fn verify_password(argon2: &Argon2<'_>, password: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::PasswordHash(format!("invalid password hash: {}", e)))?;

    match argon2.verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::PasswordHash(format!(
            "password verification failed: {}",
            e
        ))),
    }
}

/// Access mask for hosting grants: the user's /24, last octet wildcarded
pub fn derive_access_mask(ip: Ipv4Addr) -> String {
    let [a, b, c, _] = ip.octets();
    format!("{}.{}.{}.%", a, b, c)
}

#[async_trait]
impl UserBackend for SampleBackend {
    async fn init(&self) -> AppResult<()> {
        info!(
            division = %self.division,
            accounts = self.accounts.read().len(),
            "Demo backend seeded"
        );
        Ok(())
    }

    fn features(&self) -> FeatureSet {
        FeatureSet::full()
    }

    #[instrument(skip(self), fields(division = %self.division))]
    async fn get(&self, uid: &str) -> AppResult<PortalUser> {
        let accounts = self.accounts.read();
        let account = accounts
            .get(uid)
            .ok_or_else(|| AppError::UserNotFound(uid.to_string()))?;
        Ok(self.user_of(account))
    }

    #[instrument(skip(self, password), fields(division = %self.division))]
    async fn authenticate(&self, uid: &str, password: &str) -> AppResult<PortalUser> {
        let hash = {
            let accounts = self.accounts.read();
            let account = accounts
                .get(uid)
                .ok_or_else(|| AppError::UserNotFound(uid.to_string()))?;
            account.password_hash.clone()
        };

        if verify_password(&self.argon2, password, &hash)? {
            self.get(uid).await
        } else {
            debug!(uid = %uid, "Password mismatch");
            Err(AppError::PasswordInvalid)
        }
    }

    #[instrument(skip(self), fields(division = %self.division))]
    async fn from_ip(&self, address: Ipv4Addr) -> AppResult<IpLookup> {
        let accounts = self.accounts.read();
        match accounts.values().find(|a| a.ip == Some(address)) {
            Some(account) => Ok(IpLookup::Known(self.user_of(account))),
            None => Ok(IpLookup::Anonymous),
        }
    }

    async fn info(&self, user: &PortalUser) -> AppResult<AccountInfo> {
        let accounts = self.accounts.read();
        let account = accounts
            .get(&user.uid)
            .ok_or_else(|| AppError::UserNotFound(user.uid.clone()))?;

        let optional = |value: &Option<String>| match value {
            Some(v) => InfoField::new(v.clone()),
            None => InfoField::absent(),
        };

        Ok(AccountInfo {
            id: InfoField::new(account.id.to_string()),
            uid: InfoField::new(account.uid.clone()),
            status: InfoField::with_status("OK", Status::Good),
            address: optional(&account.address),
            mail: optional(&account.mail),
            ip: match account.ip {
                Some(ip) => InfoField::with_status(ip.to_string(), Status::Info),
                None => InfoField::absent(),
            },
            mac: optional(&account.mac),
            hostname: InfoField::new(format!("{}.{}", account.uid, self.mail_server)),
            hostalias: InfoField::absent(),
            userdb: match &account.hosting_db {
                Some(db) => InfoField::new(db.name.clone()),
                None => InfoField::absent(),
            },
        })
    }

    async fn traffic(&self, user: &PortalUser) -> AppResult<TrafficRecord> {
        let today = Local::now().date_naive();
        // Ensure the account still exists before fabricating data.
        self.get(&user.uid).await?;
        let entries = Self::demo_entries(&user.uid, today);
        Ok(aggregate(&entries, today))
    }

    async fn current_credit(&self, user: &PortalUser) -> AppResult<f64> {
        let today = Local::now().date_naive();
        self.get(&user.uid).await?;
        let entries = Self::demo_entries(&user.uid, today);
        Ok(entries.last().map(|e| e.credit as f64 / MIB).unwrap_or(0.0))
    }

    async fn change_mail(&self, user: &PortalUser, mail: Option<&str>) -> AppResult<()> {
        self.with_account(user, |account| {
            account.mail = mail.map(String::from);
            Ok(())
        })
    }

    async fn change_mac(&self, user: &PortalUser, mac: &str) -> AppResult<()> {
        self.with_account(user, |account| {
            account.mac = Some(mac.to_string());
            Ok(())
        })
    }

    async fn change_password(&self, user: &PortalUser, old: &str, new: &str) -> AppResult<()> {
        let hash = {
            let accounts = self.accounts.read();
            accounts
                .get(&user.uid)
                .ok_or_else(|| AppError::UserNotFound(user.uid.clone()))?
                .password_hash
                .clone()
        };

        if !verify_password(&self.argon2, old, &hash)? {
            return Err(AppError::PasswordInvalid);
        }

        let new_hash = hash_password(&self.argon2, new)?;
        self.with_account(user, |account| {
            account.password_hash = new_hash;
            Ok(())
        })
    }

    async fn create_hosting_db(&self, user: &PortalUser, password: &str) -> AppResult<()> {
        let access_mask = {
            let accounts = self.accounts.read();
            let account = accounts
                .get(&user.uid)
                .ok_or_else(|| AppError::UserNotFound(user.uid.clone()))?;

            if account.hosting_db.is_some() {
                return Err(AppError::Validation(
                    "hosting database already exists".to_string(),
                ));
            }
            let ip = account.ip.ok_or_else(|| {
                AppError::Validation("no known address to derive an access mask".to_string())
            })?;
            derive_access_mask(ip)
        };
        validate_ip_mask(&access_mask)?;

        let password_hash = hash_password(&self.argon2, password)?;
        self.with_account(user, |account| {
            account.hosting_db = Some(HostingDbRecord {
                name: format!("{}_db", account.uid),
                access_mask,
                password_hash,
            });
            Ok(())
        })
    }

    async fn change_hosting_password(&self, user: &PortalUser, password: &str) -> AppResult<()> {
        let password_hash = hash_password(&self.argon2, password)?;
        self.with_account(user, |account| match account.hosting_db.as_mut() {
            Some(db) => {
                db.password_hash = password_hash;
                Ok(())
            }
            None => Err(AppError::Validation(
                "no hosting database provisioned".to_string(),
            )),
        })
    }

    async fn drop_hosting_db(&self, user: &PortalUser) -> AppResult<()> {
        self.with_account(user, |account| {
            if account.hosting_db.take().is_none() {
                return Err(AppError::Validation(
                    "no hosting database provisioned".to_string(),
                ));
            }
            Ok(())
        })
    }

    async fn has_hosting_db(&self, user: &PortalUser) -> AppResult<bool> {
        let accounts = self.accounts.read();
        let account = accounts
            .get(&user.uid)
            .ok_or_else(|| AppError::UserNotFound(user.uid.clone()))?;
        Ok(account.hosting_db.is_some())
    }
}
