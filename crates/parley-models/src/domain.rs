use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A discrete value one issue can take (e.g. `"red"`, `"3 days"`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Value(String);

impl Value {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One negotiable dimension of the domain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    pub name: String,
    pub values: Vec<Value>,
}

impl Issue {
    pub fn new(name: impl Into<String>, values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// The issues of a negotiation, in a fixed order that holds for a whole session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Domain {
    pub name: String,
    pub issues: Vec<Issue>,
}

impl Domain {
    pub fn new(name: impl Into<String>, issues: Vec<Issue>) -> Self {
        Self {
            name: name.into(),
            issues,
        }
    }

    pub fn issue_names(&self) -> impl Iterator<Item = &str> {
        self.issues.iter().map(|issue| issue.name.as_str())
    }

    pub fn issue(&self, name: &str) -> Option<&Issue> {
        self.issues.iter().find(|issue| issue.name == name)
    }

    /// Reject domains that would make the strategy degenerate.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.issues.is_empty() {
            return Err(DomainError::NoIssues(self.name.clone()));
        }

        let mut seen = HashSet::new();
        for issue in &self.issues {
            if !seen.insert(issue.name.as_str()) {
                return Err(DomainError::DuplicateIssue(issue.name.clone()));
            }
            if issue.values.is_empty() {
                return Err(DomainError::NoValues(issue.name.clone()));
            }
        }

        Ok(())
    }

    /// Check that a bid assigns exactly one known value to every issue.
    pub fn validate_bid(&self, bid: &Bid) -> Result<(), DomainError> {
        for issue in &self.issues {
            let value = bid
                .value(&issue.name)
                .ok_or_else(|| DomainError::MissingIssue(issue.name.clone()))?;
            if !issue.values.contains(value) {
                return Err(DomainError::UnknownValue {
                    issue: issue.name.clone(),
                    value: value.to_string(),
                });
            }
        }

        if let Some(unknown) = bid.issues().find(|name| self.issue(name).is_none()) {
            return Err(DomainError::UnknownIssue(unknown.to_string()));
        }

        Ok(())
    }
}

/// A full assignment of values to issues.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Bid {
    values: BTreeMap<String, Value>,
}

impl Bid {
    pub fn new(values: BTreeMap<String, Value>) -> Self {
        Self { values }
    }

    pub fn value(&self, issue: &str) -> Option<&Value> {
        self.values.get(issue)
    }

    pub fn issues(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Bid {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(issue, value)| (issue.into(), value.into()))
                .collect(),
        }
    }
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (issue, value)) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{issue}={value}")?;
        }
        f.write_str("}")
    }
}
