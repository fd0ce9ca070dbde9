pub mod acceptance;
pub mod bid_search;
pub mod error;
pub mod opponent_model;
pub mod party;
pub mod progress;
pub mod storage;

pub mod test_support;

pub use acceptance::AcceptancePolicy;
pub use bid_search::{BidSearch, CounterOffer, SearchTier};
pub use error::{SessionError, StorageError};
pub use opponent_model::OpponentModel;
pub use party::{
    Capabilities, NegotiationParty, PartyContext, PartyState, ProfileLoader, Session,
};
pub use progress::{Clock, ManualClock, MonotonicClock, Progress};
pub use storage::{LearningStore, NoopLearningStore};
