use std::fmt;

use parley_models::{AllBids, Arithmetic, Bid, SearchConfig, UtilitySpace};
use rand::Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

/// Which stage of the search produced a counter-offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTier {
    /// Concession mirrors the opponent's within the tolerance band.
    Tolerance,
    /// Only the maximum concession limit held.
    Relaxed,
    /// Nothing qualified; an unconditional random bid.
    Random,
}

impl fmt::Display for SearchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchTier::Tolerance => "tolerance",
            SearchTier::Relaxed => "relaxed",
            SearchTier::Random => "random",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CounterOffer {
    pub bid: Bid,
    /// Own utility of `bid`; becomes the new last-sent utility.
    pub utility: f64,
    pub tier: SearchTier,
}

/// Tit-for-tat counter-offer search over randomly sampled bids.
#[derive(Debug, Clone)]
pub struct BidSearch {
    config: SearchConfig,
}

impl BidSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Find a counter-offer whose concession tracks the opponent's.
    ///
    /// `target_estimate` is the opponent-model estimate of the offer just
    /// received and `last_received` the estimate from the previous turn.
    /// Always returns a bid from the profile's domain.
    pub fn find_counter_offer<U, R>(
        &self,
        profile: &U,
        rng: &mut R,
        target_estimate: f64,
        last_received: f64,
        last_sent: f64,
    ) -> CounterOffer
    where
        U: UtilitySpace + ?Sized,
        R: Rng + ?Sized,
    {
        let bids = AllBids::new(profile.domain());
        let delta_received = last_received - target_estimate;

        let tolerance = self.first_match(profile, &bids, rng, last_sent, |delta_sent| {
            self.within_tolerance(delta_sent, delta_received)
        });
        if let Some((bid, utility)) = tolerance {
            return self.found(bid, utility, SearchTier::Tolerance, delta_received);
        }

        let relaxed = self.first_match(profile, &bids, rng, last_sent, |delta_sent| {
            delta_sent < self.config.max_concession
        });
        if let Some((bid, utility)) = relaxed {
            return self.found(bid, utility, SearchTier::Relaxed, delta_received);
        }

        let bid = bids.sample(rng);
        let utility = profile.utility(&bid);
        self.found(bid, utility, SearchTier::Random, delta_received)
    }

    fn first_match<U, R, F>(
        &self,
        profile: &U,
        bids: &AllBids<'_>,
        rng: &mut R,
        last_sent: f64,
        mut accept: F,
    ) -> Option<(Bid, f64)>
    where
        U: UtilitySpace + ?Sized,
        R: Rng + ?Sized,
        F: FnMut(f64) -> bool,
    {
        (0..self.config.max_samples).find_map(|_| {
            let bid = bids.sample(rng);
            let utility = profile.utility(&bid);
            accept(last_sent - utility).then_some((bid, utility))
        })
    }

    fn found(
        &self,
        bid: Bid,
        utility: f64,
        tier: SearchTier,
        delta_received: f64,
    ) -> CounterOffer {
        debug!(%tier, utility, delta_received, bid = %bid, "Counter-offer found");
        CounterOffer { bid, utility, tier }
    }

    /// Both tolerance conditions of the first search tier.
    pub fn within_tolerance(&self, delta_sent: f64, delta_received: f64) -> bool {
        match self.config.arithmetic {
            Arithmetic::Float => {
                let mirrored = delta_sent - delta_received * self.config.damping;
                self.config.lower_tolerance < mirrored
                    && mirrored < self.config.upper_tolerance
                    && delta_sent < self.config.max_concession
            }
            Arithmetic::Decimal => self
                .within_tolerance_decimal(delta_sent, delta_received)
                .unwrap_or(false),
        }
    }

    fn within_tolerance_decimal(&self, delta_sent: f64, delta_received: f64) -> Option<bool> {
        let delta_sent = Decimal::from_f64(delta_sent)?;
        let delta_received = Decimal::from_f64(delta_received)?;
        let damping = Decimal::from_f64(self.config.damping)?;
        let lower = Decimal::from_f64(self.config.lower_tolerance)?;
        let upper = Decimal::from_f64(self.config.upper_tolerance)?;
        let max_concession = Decimal::from_f64(self.config.max_concession)?;

        let mirrored = delta_sent - delta_received * damping;
        Some(lower < mirrored && mirrored < upper && delta_sent < max_concession)
    }
}

impl Default for BidSearch {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}
