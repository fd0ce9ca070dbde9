use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Bid;

/// Identity of a negotiating party, e.g. `"droid_1"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PartyId(String);

impl PartyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The party name without its trailing `_<position>` suffix.
    pub fn name(&self) -> &str {
        self.0
            .rsplit_once('_')
            .map_or(self.0.as_str(), |(name, _)| name)
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Something a party did during the negotiation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Offer { actor: PartyId, bid: Bid },
    Accept { actor: PartyId, bid: Bid },
}

impl Action {
    pub fn actor(&self) -> &PartyId {
        match self {
            Action::Offer { actor, .. } | Action::Accept { actor, .. } => actor,
        }
    }

    pub fn bid(&self) -> &Bid {
        match self {
            Action::Offer { bid, .. } | Action::Accept { bid, .. } => bid,
        }
    }
}

/// When the negotiation ends.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Deadline {
    /// Wall-time limit measured from session start.
    Time { duration_ms: u64 },
    /// Fixed number of own turns.
    Rounds { rounds: u32 },
}

/// Free-form session parameters handed over by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Parameters {
    /// Directory the party may write learning data to after the session.
    #[serde(default)]
    pub storage_dir: Option<String>,
}

/// Session bootstrap, always the first event a party receives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub me: PartyId,
    /// Reference to this party's preference profile (a path or URI).
    pub profile: String,
    pub deadline: Deadline,
    #[serde(default)]
    pub parameters: Parameters,
}

/// Inbound protocol events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inform {
    Settings(Settings),
    /// An action performed by any party, this one included.
    ActionDone { action: Action },
    YourTurn,
    Finished {
        #[serde(default)]
        agreement: Option<Bid>,
    },
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn party_name_strips_position() {
        assert_eq!(PartyId::new("boulware_agent_2").name(), "boulware_agent");
        assert_eq!(PartyId::new("solo").name(), "solo");
    }

    #[test]
    fn parse_settings_inform() {
        let line = r#"{"type":"settings","me":"droid_1","profile":"profiles/droid.json","deadline":{"type":"time","duration_ms":60000},"parameters":{"storage_dir":"/tmp/droid"}}"#;
        let inform: Inform = serde_json::from_str(line).unwrap();
        match inform {
            Inform::Settings(settings) => {
                assert_eq!(settings.me.as_str(), "droid_1");
                assert_eq!(settings.deadline, Deadline::Time { duration_ms: 60000 });
                assert_eq!(settings.parameters.storage_dir.as_deref(), Some("/tmp/droid"));
            }
            other => panic!("expected settings, got {other:?}"),
        }
    }

    #[test]
    fn parse_action_done() {
        let line = r#"{"type":"action_done","action":{"type":"offer","actor":"other_2","bid":{"a":"x"}}}"#;
        let inform: Inform = serde_json::from_str(line).unwrap();
        let Inform::ActionDone { action } = inform else {
            panic!("expected action_done");
        };
        assert_eq!(action.actor().name(), "other");
        assert_eq!(action.bid().value("a").unwrap().as_str(), "x");
    }

    #[test]
    fn parse_turn_and_finish() {
        let turn: Inform = serde_json::from_str(r#"{"type":"your_turn"}"#).unwrap();
        assert_eq!(turn, Inform::YourTurn);

        let finished: Inform = serde_json::from_str(r#"{"type":"finished"}"#).unwrap();
        assert_eq!(finished, Inform::Finished { agreement: None });
    }

    #[test]
    fn unknown_inform_kind_tolerated() {
        let inform: Inform = serde_json::from_str(r#"{"type":"voting"}"#).unwrap();
        assert_eq!(inform, Inform::Unknown);
    }

    #[test]
    fn accept_action_serialization() {
        let action = Action::Accept {
            actor: PartyId::new("droid_1"),
            bid: [("a", "x")].into_iter().collect(),
        };
        assert_eq!(
            serde_json::to_string(&action).unwrap(),
            r#"{"type":"accept","actor":"droid_1","bid":{"a":"x"}}"#
        );
    }
}
