use serde::{Deserialize, Serialize};

/// Top-level configuration of the `parley` binary.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParleyConfig {
    pub strategy: StrategyConfig,
    pub storage: StorageConfig,
}

/// Post-session learning data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Write learning data to the session's storage directory on finish.
    pub learning_data: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            learning_data: true,
        }
    }
}

/// Strategy parameters. Every field has a default so partial TOML works.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StrategyConfig {
    /// Seed for bid sampling. Unset means seeded from OS entropy.
    pub seed: Option<u64>,
    pub acceptance: AcceptanceConfig,
    pub search: SearchConfig,
    pub opponent: OpponentConfig,
}

/// Constants of the time-dependent acceptance curve.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AcceptanceConfig {
    /// Offers at or above this own utility are always accepted.
    pub accept_above: f64,
    /// Initial concession of the curve.
    pub k: f64,
    /// Curve exponent. Below 1 keeps the threshold high until late (Boulware).
    pub beta: f64,
    /// Progress from which anything above the reservation utility is accepted.
    pub deadline_progress: f64,
    /// Reservation utility used when the profile has no reservation bid.
    pub default_reservation: f64,
}

impl Default for AcceptanceConfig {
    fn default() -> Self {
        Self {
            accept_above: 0.99,
            k: 0.18,
            beta: 0.005,
            deadline_progress: 0.99,
            default_reservation: 0.7,
        }
    }
}

/// How the bid search compares utility deltas.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Arithmetic {
    #[default]
    Float,
    Decimal,
}

/// Tolerance band and sampling limits of the counter-offer search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Samples drawn per search tier.
    pub max_samples: u32,
    pub lower_tolerance: f64,
    pub upper_tolerance: f64,
    /// Share of the opponent's concession mirrored into our own.
    pub damping: f64,
    /// Largest utility drop allowed relative to the last sent bid.
    pub max_concession: f64,
    pub arithmetic: Arithmetic,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_samples: 5000,
            lower_tolerance: -0.2,
            upper_tolerance: 0.05,
            damping: 0.3,
            max_concession: 0.1,
            arithmetic: Arithmetic::Float,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OpponentConfig {
    /// Estimate used before any opponent offer has been seen.
    pub initial_estimate: f64,
}

impl Default for OpponentConfig {
    fn default() -> Self {
        Self {
            initial_estimate: 0.95,
        }
    }
}
