//! Subnet collections
//!
//! Groups the IPv4 networks physically assigned to a dormitory and answers
//! address-membership queries.

use crate::error::AppError;
use ipnetwork::Ipv4Network;
use std::net::Ipv4Addr;

/// An ordered collection of IPv4 networks
///
/// Membership is the union of the member networks. The collection is
/// immutable after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubnetCollection {
    subnets: Vec<Ipv4Network>,
}

impl SubnetCollection {
    /// Create a collection from already-validated networks
    pub fn new(subnets: Vec<Ipv4Network>) -> Self {
        Self { subnets }
    }

    /// Parse a collection from CIDR strings
    ///
    /// Fails with a validation error naming the first entry that is not a
    /// valid IPv4 network range.
    pub fn parse<I, S>(specs: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut subnets = Vec::new();
        for spec in specs {
            let spec = spec.as_ref();
            let subnet: Ipv4Network = spec
                .parse()
                .map_err(|e| AppError::Validation(format!("invalid subnet '{}': {}", spec, e)))?;
            subnets.push(subnet);
        }
        Ok(Self { subnets })
    }

    /// Whether `address` lies inside at least one member network
    ///
    /// The first matching network short-circuits; order does not affect the
    /// result. Always false for the empty collection.
    pub fn contains(&self, address: Ipv4Addr) -> bool {
        self.subnets.iter().any(|subnet| subnet.contains(address))
    }

    /// The member networks, in declaration order
    pub fn subnets(&self) -> &[Ipv4Network] {
        &self.subnets
    }

    pub fn is_empty(&self) -> bool {
        self.subnets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.subnets.len()
    }
}
