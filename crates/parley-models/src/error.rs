use thiserror::Error;

/// A domain, profile or bid that cannot be negotiated over.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Domain {0} declares no issues")]
    NoIssues(String),

    #[error("Issue {0} has no possible values")]
    NoValues(String),

    #[error("Issue {0} is declared more than once")]
    DuplicateIssue(String),

    #[error("Bid is missing a value for issue {0}")]
    MissingIssue(String),

    #[error("Bid names unknown issue {0}")]
    UnknownIssue(String),

    #[error("Value {value} is not a possible value of issue {issue}")]
    UnknownValue { issue: String, value: String },

    #[error("Profile has no weight for issue {0}")]
    MissingWeight(String),
}
