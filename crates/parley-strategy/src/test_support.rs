//! Fixtures shared by unit and integration tests.
//!
//! Domains are small enough to enumerate, profiles have utilities that are
//! easy to reason about, and the collaborators record what the party did.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use parley_models::{
    Action, Bid, Deadline, Domain, Inform, Issue, LinearAdditiveProfile, Parameters, PartyId,
    Settings, StrategyConfig, Value,
};

use crate::error::{SessionError, StorageError};
use crate::party::{NegotiationParty, PartyContext, ProfileLoader};
use crate::progress::ManualClock;
use crate::storage::LearningStore;

/// Storage directory used by [`settings`].
pub const TEST_STORAGE_DIR: &str = "/tmp/parley-test";

/// Issue `A` in {a1, a2}, issue `B` in {b1, b2}.
pub fn two_by_two_domain() -> Domain {
    Domain::new(
        "two_by_two",
        vec![Issue::new("A", ["a1", "a2"]), Issue::new("B", ["b1", "b2"])],
    )
}

/// Three issues with three values each.
pub fn three_issue_domain() -> Domain {
    Domain::new(
        "laptop",
        vec![
            Issue::new("brand", ["dell", "lenovo", "hp"]),
            Issue::new("memory", ["32gb", "16gb", "8gb"]),
            Issue::new("screen", ["15in", "14in", "13in"]),
        ],
    )
}

pub fn single_issue_domain() -> Domain {
    Domain::new("price_only", vec![Issue::new("price", ["low", "mid", "high"])])
}

fn equal_weights(domain: &Domain) -> BTreeMap<String, f64> {
    let weight = 1.0 / domain.issues.len() as f64;
    domain
        .issue_names()
        .map(|name| (name.to_string(), weight))
        .collect()
}

/// Equal issue weights; each issue's first value is worth 1.0 and the last 0.0,
/// linearly in between.
pub fn graded_profile(domain: Domain) -> LinearAdditiveProfile {
    let value_utilities: BTreeMap<String, BTreeMap<Value, f64>> = domain
        .issues
        .iter()
        .map(|issue| {
            let steps = issue.values.len().saturating_sub(1).max(1) as f64;
            let utilities: BTreeMap<Value, f64> = issue
                .values
                .iter()
                .enumerate()
                .map(|(i, value)| (value.clone(), 1.0 - i as f64 / steps))
                .collect();
            (issue.name.clone(), utilities)
        })
        .collect();

    LinearAdditiveProfile {
        name: "graded".to_string(),
        issue_weights: equal_weights(&domain),
        value_utilities,
        domain,
        reservation_bid: None,
    }
}

/// Every bid is worth exactly `utility`.
pub fn fixed_utility_profile(domain: Domain, utility: f64) -> LinearAdditiveProfile {
    let value_utilities: BTreeMap<String, BTreeMap<Value, f64>> = domain
        .issues
        .iter()
        .map(|issue| {
            let utilities: BTreeMap<Value, f64> = issue
                .values
                .iter()
                .map(|value| (value.clone(), utility))
                .collect();
            (issue.name.clone(), utilities)
        })
        .collect();

    LinearAdditiveProfile {
        name: "fixed".to_string(),
        issue_weights: equal_weights(&domain),
        value_utilities,
        domain,
        reservation_bid: None,
    }
}

/// Hands out the same profile for any reference.
pub struct StaticProfileLoader {
    profile: LinearAdditiveProfile,
}

impl StaticProfileLoader {
    pub fn new(profile: LinearAdditiveProfile) -> Self {
        Self { profile }
    }
}

impl ProfileLoader for StaticProfileLoader {
    fn load(&self, _reference: &str) -> Result<LinearAdditiveProfile, SessionError> {
        Ok(self.profile.clone())
    }
}

/// Remembers every storage directory it was asked to save to.
#[derive(Debug, Clone, Default)]
pub struct RecordingStore {
    saved: Arc<Mutex<Vec<String>>>,
}

impl RecordingStore {
    pub fn saved(&self) -> Vec<String> {
        self.saved.lock().map(|saved| saved.clone()).unwrap_or_default()
    }
}

impl LearningStore for RecordingStore {
    fn save(&self, storage_dir: &str) -> Result<(), StorageError> {
        if let Ok(mut saved) = self.saved.lock() {
            saved.push(storage_dir.to_string());
        }
        Ok(())
    }
}

/// A party wired to test collaborators.
pub struct TestParty {
    pub party: NegotiationParty,
    pub store: RecordingStore,
    pub clock: Arc<ManualClock>,
}

pub fn party_with(profile: LinearAdditiveProfile, config: StrategyConfig) -> TestParty {
    let store = RecordingStore::default();
    let clock = Arc::new(ManualClock::default());
    let party = NegotiationParty::new(PartyContext {
        profiles: Box::new(StaticProfileLoader::new(profile)),
        store: Box::new(store.clone()),
        clock: clock.clone(),
        config,
    });
    TestParty {
        party,
        store,
        clock,
    }
}

/// Settings with a 60 second deadline and [`TEST_STORAGE_DIR`] as storage.
pub fn settings(me: &str) -> Inform {
    Inform::Settings(Settings {
        me: PartyId::new(me),
        profile: "profiles/test.json".to_string(),
        deadline: Deadline::Time {
            duration_ms: 60_000,
        },
        parameters: Parameters {
            storage_dir: Some(TEST_STORAGE_DIR.to_string()),
        },
    })
}

pub fn bid(pairs: &[(&str, &str)]) -> Bid {
    pairs.iter().copied().collect()
}

pub fn offer_from(actor: &str, pairs: &[(&str, &str)]) -> Inform {
    Inform::ActionDone {
        action: Action::Offer {
            actor: PartyId::new(actor),
            bid: bid(pairs),
        },
    }
}

pub fn accept_from(actor: &str, pairs: &[(&str, &str)]) -> Inform {
    Inform::ActionDone {
        action: Action::Accept {
            actor: PartyId::new(actor),
            bid: bid(pairs),
        },
    }
}
