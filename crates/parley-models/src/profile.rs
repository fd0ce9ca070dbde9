use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Bid, Domain, Value};
use crate::error::DomainError;

/// A party's private valuation of bids.
pub trait UtilitySpace {
    fn domain(&self) -> &Domain;

    /// Utility of a bid in `[0, 1]`.
    fn utility(&self, bid: &Bid) -> f64;

    /// The outcome this party falls back to when no deal is reached.
    fn reservation_bid(&self) -> Option<&Bid>;
}

/// Weighted sum of per-issue value utilities.
///
/// Issues or values without an entry contribute nothing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinearAdditiveProfile {
    pub name: String,
    pub domain: Domain,
    /// Weight per issue name. Expected to sum to 1.
    pub issue_weights: BTreeMap<String, f64>,
    /// Utility in `[0, 1]` per issue name and value.
    pub value_utilities: BTreeMap<String, BTreeMap<Value, f64>>,
    #[serde(default)]
    pub reservation_bid: Option<Bid>,
}

impl LinearAdditiveProfile {
    /// Validates the domain, the weights and the reservation bid.
    pub fn validate(&self) -> Result<(), DomainError> {
        self.domain.validate()?;

        if let Some(missing) = self
            .domain
            .issue_names()
            .find(|name| !self.issue_weights.contains_key(*name))
        {
            return Err(DomainError::MissingWeight(missing.to_string()));
        }

        if let Some(reservation) = &self.reservation_bid {
            self.domain.validate_bid(reservation)?;
        }

        Ok(())
    }
}

impl UtilitySpace for LinearAdditiveProfile {
    fn domain(&self) -> &Domain {
        &self.domain
    }

    fn utility(&self, bid: &Bid) -> f64 {
        let total: f64 = self
            .issue_weights
            .iter()
            .filter_map(|(issue, weight)| {
                let value = bid.value(issue)?;
                let utility = self.value_utilities.get(issue)?.get(value)?;
                Some(weight * utility)
            })
            .sum();
        total.clamp(0.0, 1.0)
    }

    fn reservation_bid(&self) -> Option<&Bid> {
        self.reservation_bid.as_ref()
    }
}
