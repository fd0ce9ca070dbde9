use parley_models::{AcceptanceConfig, Bid, UtilitySpace};

/// Time-dependent acceptance of the opponent's offer.
///
/// The acceptance threshold follows `1 - (k + (1 - k) * progress^(1/beta))`.
/// A small `beta` keeps it flat until progress gets close to 1.
#[derive(Debug, Clone)]
pub struct AcceptancePolicy {
    config: AcceptanceConfig,
}

impl AcceptancePolicy {
    pub fn new(config: AcceptanceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AcceptanceConfig {
        &self.config
    }

    /// Minimum own utility accepted at `progress`.
    pub fn threshold(&self, progress: f64) -> f64 {
        let AcceptanceConfig { k, beta, .. } = self.config;
        1.0 - (k + (1.0 - k) * progress.powf(1.0 / beta))
    }

    /// Utility of the reservation bid, or the configured floor without one.
    pub fn reservation<U: UtilitySpace + ?Sized>(&self, profile: &U) -> f64 {
        profile
            .reservation_bid()
            .map_or(self.config.default_reservation, |bid| profile.utility(bid))
    }

    pub fn should_accept<U: UtilitySpace + ?Sized>(
        &self,
        profile: &U,
        bid: Option<&Bid>,
        progress: f64,
    ) -> bool {
        let Some(bid) = bid else {
            return false;
        };

        let utility = profile.utility(bid);
        if utility >= self.config.accept_above {
            return true;
        }

        if utility >= self.threshold(progress) {
            return true;
        }

        utility > self.reservation(profile) && progress >= self.config.deadline_progress
    }
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        Self::new(AcceptanceConfig::default())
    }
}
