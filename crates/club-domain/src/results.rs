use thiserror::Error as ThisError;

/// Storage lookup errors
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum QueryError {
    #[error("Not found")]
    NotFound,
    #[error("Ambiguous results ({0:?}) for query")]
    Ambiguous(usize),
}

impl QueryError {
    /// Check if an error from the storage layer is a `NotFound`.
    pub fn is_not_found(err: &anyhow::Error) -> bool {
        matches!(err.downcast_ref::<QueryError>(), Some(QueryError::NotFound))
    }
}

/// A stored value could not be mapped to a domain type.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        ParseError {
            kind,
            value: value.to_string(),
        }
    }
}
