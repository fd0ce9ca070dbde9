use std::sync::Arc;

use parley_models::{Action, Bid, Inform, LinearAdditiveProfile, PartyId, Settings, StrategyConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::acceptance::AcceptancePolicy;
use crate::bid_search::BidSearch;
use crate::error::SessionError;
use crate::opponent_model::OpponentModel;
use crate::progress::{Clock, Progress};
use crate::storage::LearningStore;

pub const DESCRIPTION: &str = "Frequency opponent model with a tit-for-tat counter-offer search";

/// Resolves the profile reference carried by `Settings`.
pub trait ProfileLoader: Send + Sync {
    fn load(&self, reference: &str) -> Result<LinearAdditiveProfile, SessionError>;
}

/// Collaborators a party needs from its host.
pub struct PartyContext {
    pub profiles: Box<dyn ProfileLoader>,
    pub store: Box<dyn LearningStore>,
    pub clock: Arc<dyn Clock>,
    pub config: StrategyConfig,
}

/// Protocols and profile kinds this party supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub protocols: Vec<String>,
    pub profiles: Vec<String>,
}

/// State owned by one running negotiation.
#[derive(Debug)]
pub struct Session {
    me: PartyId,
    opponent: Option<String>,
    profile: LinearAdditiveProfile,
    progress: Progress,
    storage_dir: Option<String>,
    model: OpponentModel,
    last_received_bid: Option<Bid>,
    utility_last_received_bid: f64,
    utility_last_sent_bid: f64,
    rng: StdRng,
}

impl Session {
    fn start(settings: Settings, ctx: &PartyContext) -> Result<Self, SessionError> {
        let profile = ctx.profiles.load(&settings.profile)?;
        profile.validate()?;

        let issues = profile.domain.issue_names().map(str::to_string).collect();
        let rng = ctx
            .config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        Ok(Self {
            me: settings.me,
            opponent: None,
            progress: Progress::start(settings.deadline, ctx.clock.as_ref()),
            storage_dir: settings.parameters.storage_dir,
            model: OpponentModel::new(issues, ctx.config.opponent.initial_estimate),
            profile,
            last_received_bid: None,
            utility_last_received_bid: 1.0,
            utility_last_sent_bid: 1.0,
            rng,
        })
    }

    fn action_done(&mut self, action: Action) {
        if action.actor() == &self.me {
            return;
        }

        // Rejected offers leave the session untouched, opponent name included.
        match action {
            Action::Offer { actor, bid } => {
                if let Err(e) = self.profile.domain.validate_bid(&bid) {
                    warn!(opponent = %actor, error = %e, "Ignoring invalid offer");
                    return;
                }
                if let Err(e) = self.model.observe(&bid) {
                    warn!(opponent = %actor, error = %e, "Opponent model rejected offer");
                    return;
                }
                debug!(opponent = %actor, bid = %bid, "Received offer");
                self.opponent = Some(actor.name().to_string());
                self.last_received_bid = Some(bid);
            }
            Action::Accept { actor, bid } => {
                debug!(opponent = %actor, bid = %bid, "Opponent accepted");
                self.opponent = Some(actor.name().to_string());
            }
        }
    }

    fn my_turn(
        &mut self,
        acceptance: &AcceptancePolicy,
        search: &BidSearch,
        clock: &dyn Clock,
    ) -> Action {
        let progress = self.progress.get(clock.now_ms());
        let estimate = self.estimate();

        // Search before deciding so the last-sent utility tracks every turn.
        let counter = search.find_counter_offer(
            &self.profile,
            &mut self.rng,
            estimate,
            self.utility_last_received_bid,
            self.utility_last_sent_bid,
        );
        self.utility_last_sent_bid = counter.utility;

        let accept =
            acceptance.should_accept(&self.profile, self.last_received_bid.as_ref(), progress);

        let action = match (&self.last_received_bid, accept) {
            (Some(bid), true) => Action::Accept {
                actor: self.me.clone(),
                bid: bid.clone(),
            },
            _ => Action::Offer {
                actor: self.me.clone(),
                bid: counter.bid,
            },
        };

        debug!(
            progress,
            estimate,
            accept,
            tier = %counter.tier,
            sent_utility = counter.utility,
            "Turn decided"
        );

        self.utility_last_received_bid = estimate;
        self.progress.advance();
        action
    }

    /// Opponent-model estimate of the last received offer.
    pub fn estimate(&self) -> f64 {
        match &self.last_received_bid {
            Some(bid) => self.model.utility(bid),
            None => self.model.initial_estimate(),
        }
    }

    pub fn me(&self) -> &PartyId {
        &self.me
    }

    /// Base name of the opponent, once it has acted.
    pub fn opponent(&self) -> Option<&str> {
        self.opponent.as_deref()
    }

    pub fn profile(&self) -> &LinearAdditiveProfile {
        &self.profile
    }

    pub fn model(&self) -> &OpponentModel {
        &self.model
    }

    pub fn last_received_bid(&self) -> Option<&Bid> {
        self.last_received_bid.as_ref()
    }

    pub fn utility_last_received_bid(&self) -> f64 {
        self.utility_last_received_bid
    }

    pub fn utility_last_sent_bid(&self) -> f64 {
        self.utility_last_sent_bid
    }

    pub fn storage_dir(&self) -> Option<&str> {
        self.storage_dir.as_deref()
    }
}

/// Lifecycle of a party.
#[derive(Debug)]
pub enum PartyState {
    AwaitingSettings,
    Active(Box<Session>),
    Finished,
}

/// A negotiation party driven by protocol events, one at a time.
pub struct NegotiationParty {
    ctx: PartyContext,
    acceptance: AcceptancePolicy,
    search: BidSearch,
    state: PartyState,
}

impl NegotiationParty {
    pub fn new(ctx: PartyContext) -> Self {
        let acceptance = AcceptancePolicy::new(ctx.config.acceptance.clone());
        let search = BidSearch::new(ctx.config.search.clone());
        info!("Party initialized");
        Self {
            ctx,
            acceptance,
            search,
            state: PartyState::AwaitingSettings,
        }
    }

    /// Handle one inbound event. Returns the action to send, if any.
    ///
    /// Exactly one action is produced for every `YourTurn`.
    pub fn notify(&mut self, inform: Inform) -> Result<Option<Action>, SessionError> {
        match inform {
            Inform::Settings(settings) => {
                match self.state {
                    PartyState::AwaitingSettings => {}
                    PartyState::Active(_) => return Err(SessionError::AlreadyStarted),
                    PartyState::Finished => return Err(SessionError::Finished),
                }
                let session = Session::start(settings, &self.ctx)?;
                info!(
                    me = %session.me,
                    domain = %session.profile.domain.name,
                    profile = %session.profile.name,
                    "Session started"
                );
                self.state = PartyState::Active(Box::new(session));
                Ok(None)
            }
            Inform::ActionDone { action } => {
                self.active("action_done")?.action_done(action);
                Ok(None)
            }
            Inform::YourTurn => {
                let session = match &mut self.state {
                    PartyState::Active(session) => session,
                    PartyState::AwaitingSettings => {
                        return Err(SessionError::NotStarted("your_turn"))
                    }
                    PartyState::Finished => return Err(SessionError::Finished),
                };
                let action =
                    session.my_turn(&self.acceptance, &self.search, self.ctx.clock.as_ref());
                Ok(Some(action))
            }
            Inform::Finished { agreement } => {
                let previous = std::mem::replace(&mut self.state, PartyState::Finished);
                match previous {
                    PartyState::Active(session) => {
                        info!(
                            agreement = agreement.is_some(),
                            opponent = session.opponent().unwrap_or("unknown"),
                            "Party is terminating"
                        );
                        self.save_data(&session);
                        Ok(None)
                    }
                    PartyState::AwaitingSettings => {
                        info!("Party is terminating before settings");
                        Ok(None)
                    }
                    PartyState::Finished => Err(SessionError::Finished),
                }
            }
            Inform::Unknown => {
                warn!("Ignoring unknown info");
                Ok(None)
            }
        }
    }

    fn active(&mut self, event: &'static str) -> Result<&mut Session, SessionError> {
        match &mut self.state {
            PartyState::Active(session) => Ok(session),
            PartyState::AwaitingSettings => Err(SessionError::NotStarted(event)),
            PartyState::Finished => Err(SessionError::Finished),
        }
    }

    fn save_data(&self, session: &Session) {
        let Some(dir) = session.storage_dir() else {
            debug!("No storage directory, skipping learning data");
            return;
        };
        if let Err(e) = self.ctx.store.save(dir) {
            warn!(storage_dir = %dir, error = %e, "Failed to save learning data");
        }
    }

    pub fn state(&self) -> &PartyState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            PartyState::Active(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, PartyState::Finished)
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            protocols: vec!["SAOP".to_string()],
            profiles: vec!["geniusweb.profile.utilityspace.LinearAdditive".to_string()],
        }
    }

    pub fn description(&self) -> &'static str {
        DESCRIPTION
    }
}
