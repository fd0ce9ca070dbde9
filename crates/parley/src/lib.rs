//! Parley - bilateral negotiation strategy agent
//!
//! A party for alternating-offers negotiations. It models the opponent's
//! preferences from the offers it receives, answers with tit-for-tat
//! counter-offers and accepts along a time-dependent concession curve.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use parley::models::{Inform, ParleyConfig};
//!
//! let mut party = parley::build_party(&ParleyConfig::default(), None);
//! // Every event must follow a `settings` event.
//! assert!(party.notify(Inform::YourTurn).is_err());
//! ```

pub mod io;

pub use parley_models as models;
pub use parley_strategy as strategy;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use parley_models::{Inform, ParleyConfig};
use parley_strategy::{
    LearningStore, MonotonicClock, NegotiationParty, NoopLearningStore, PartyContext,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::io::{FileLearningStore, FileProfileLoader};

/// Build a party wired to file-backed collaborators and a monotonic clock.
pub fn build_party(config: &ParleyConfig, profile_dir: Option<PathBuf>) -> NegotiationParty {
    let store: Box<dyn LearningStore> = if config.storage.learning_data {
        Box::new(FileLearningStore)
    } else {
        Box::new(NoopLearningStore)
    };

    NegotiationParty::new(PartyContext {
        profiles: Box::new(FileProfileLoader::new(profile_dir)),
        store,
        clock: Arc::new(MonotonicClock::new()),
        config: config.strategy.clone(),
    })
}

/// Feed JSON-lines events to `party` and write each action as one JSON line.
///
/// Stops after the `finished` event or at end of input. Returns the number
/// of actions written.
pub async fn drive<R, W>(
    party: &mut NegotiationParty,
    input: R,
    output: &mut W,
) -> anyhow::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut line_no = 0usize;
    let mut actions = 0usize;

    while let Some(line) = lines.next_line().await.context("Failed to read event")? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        let inform: Inform = serde_json::from_str(&line)
            .with_context(|| format!("Failed to parse event on line {line_no}"))?;
        let finished = matches!(inform, Inform::Finished { .. });
        debug!(line = line_no, finished, "Event received");

        if let Some(action) = party
            .notify(inform)
            .with_context(|| format!("Event on line {line_no} rejected"))?
        {
            writeln!(output, "{}", serde_json::to_string(&action)?)?;
            output.flush()?;
            actions += 1;
        }

        if finished {
            break;
        }
    }

    info!(actions, events = line_no, "Event stream done");
    Ok(actions)
}
