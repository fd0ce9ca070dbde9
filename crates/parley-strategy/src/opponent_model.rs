//! Frequency-based model of what the opponent wants.
//!
//! Issue importance is inferred from how often the opponent changes an
//! issue's value between consecutive offers: issues it keeps stable are the
//! ones it cares about. Value desirability is the relative frequency with
//! which each value shows up in its offers.

use std::collections::HashMap;

use parley_models::{Bid, DomainError, Value};

/// Per-issue estimate.
#[derive(Debug, Clone)]
struct IssueEstimate {
    weight: f64,
    /// Doubles every time the issue's value changes between offers.
    volatility: f64,
    frequencies: HashMap<Value, f64>,
}

impl IssueEstimate {
    fn value_share(&self, value: &Value) -> f64 {
        let total: f64 = self.frequencies.values().sum();
        if total <= 0.0 {
            return 0.0;
        }
        self.frequencies.get(value).copied().unwrap_or(0.0) / total
    }
}

/// Estimates opponent issue weights and value preferences from its offers.
///
/// Offers must be observed in arrival order. Every update is relative to the
/// immediately preceding offer only.
#[derive(Debug, Clone)]
pub struct OpponentModel {
    issues: Vec<String>,
    estimates: Vec<IssueEstimate>,
    history: Vec<Vec<Value>>,
    initial_estimate: f64,
}

impl OpponentModel {
    /// `issues` fixes the issue order for the session.
    pub fn new(issues: Vec<String>, initial_estimate: f64) -> Self {
        Self {
            issues,
            estimates: Vec::new(),
            history: Vec::new(),
            initial_estimate,
        }
    }

    /// Update the model with the opponent's latest offer.
    pub fn observe(&mut self, bid: &Bid) -> Result<(), DomainError> {
        let values = self
            .issues
            .iter()
            .map(|issue| {
                bid.value(issue)
                    .cloned()
                    .ok_or_else(|| DomainError::MissingIssue(issue.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        match self.history.last() {
            None => self.initialize(&values),
            Some(previous) => {
                let changed: Vec<bool> = previous
                    .iter()
                    .zip(&values)
                    .map(|(before, now)| before != now)
                    .collect();
                self.update(&values, &changed);
            }
        }

        self.history.push(values);
        Ok(())
    }

    fn initialize(&mut self, values: &[Value]) {
        let weight = 1.0 / values.len() as f64;
        self.estimates = values
            .iter()
            .map(|value| IssueEstimate {
                weight,
                volatility: 1.0,
                frequencies: HashMap::from([(value.clone(), 1.0)]),
            })
            .collect();
    }

    /// Every changed issue is doubled before any weight is recomputed, so all
    /// weights share one volatility total.
    fn update(&mut self, values: &[Value], changed: &[bool]) {
        for (estimate, &changed) in self.estimates.iter_mut().zip(changed) {
            if changed {
                estimate.volatility *= 2.0;
            }
        }

        let n = self.estimates.len();
        let total_volatility: f64 = self.estimates.iter().map(|e| e.volatility).sum();

        for (estimate, value) in self.estimates.iter_mut().zip(values) {
            estimate.weight = if n == 1 {
                1.0
            } else {
                (total_volatility - estimate.volatility) / (total_volatility * (n - 1) as f64)
            };
            *estimate.frequencies.entry(value.clone()).or_insert(0.0) += 1.0;
        }
    }

    /// How desirable `bid` looks to the opponent, in `[0, 1]`.
    ///
    /// Values never seen in an opponent offer contribute nothing. Before the
    /// first observation the configured optimistic estimate is returned.
    pub fn utility(&self, bid: &Bid) -> f64 {
        if self.history.is_empty() {
            return self.initial_estimate;
        }

        self.issues
            .iter()
            .zip(&self.estimates)
            .map(|(issue, estimate)| {
                bid.value(issue)
                    .map_or(0.0, |value| estimate.weight * estimate.value_share(value))
            })
            .sum()
    }

    pub fn initial_estimate(&self) -> f64 {
        self.initial_estimate
    }

    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    /// Current issue weights in issue order. Empty before the first offer.
    pub fn weights(&self) -> Vec<f64> {
        self.estimates.iter().map(|e| e.weight).collect()
    }

    pub fn volatility(&self) -> Vec<f64> {
        self.estimates.iter().map(|e| e.volatility).collect()
    }

    /// Observed count of `value` for `issue`; 0 when never seen.
    pub fn frequency(&self, issue: &str, value: &Value) -> f64 {
        self.issues
            .iter()
            .position(|name| name == issue)
            .and_then(|index| self.estimates.get(index))
            .and_then(|estimate| estimate.frequencies.get(value).copied())
            .unwrap_or(0.0)
    }

    /// Value tuples of every observed offer, oldest first.
    pub fn history(&self) -> &[Vec<Value>] {
        &self.history
    }

    pub fn observations(&self) -> usize {
        self.history.len()
    }
}
