//! Domain models for Usersuite
//!
//! This module contains all the core domain models used throughout the
//! application.

pub mod division;
pub mod features;
pub mod info;
pub mod subnet;
pub mod traffic;
pub mod user;

pub use division::{Catalog, Division, Dormitory};
pub use features::{Feature, FeatureSet};
pub use info::{AccountInfo, InfoField, Status};
pub use subnet::SubnetCollection;
pub use traffic::{RawTrafficEntry, TrafficDay, TrafficRecord, MIB, WEEKDAYS};
pub use user::{IpLookup, PortalUser};
