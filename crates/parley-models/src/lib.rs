pub mod bid_space;
pub mod config;
pub mod domain;
pub mod error;
pub mod profile;
pub mod protocol;

pub use bid_space::AllBids;
pub use config::{
    AcceptanceConfig, Arithmetic, OpponentConfig, ParleyConfig, SearchConfig, StorageConfig,
    StrategyConfig,
};
pub use domain::{Bid, Domain, Issue, Value};
pub use error::DomainError;
pub use profile::{LinearAdditiveProfile, UtilitySpace};
pub use protocol::{Action, Deadline, Inform, Parameters, PartyId, Settings};
