use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Label '{label}' is {len} bytes long (maximum is 63)")]
    LabelTooLong { label: String, len: usize },

    #[error("Malformed DNS message: {0}")]
    MalformedMessage(String),

    #[error("Unable to resolve: {0}")]
    Unresolvable(String),

    #[error("Transport timeout waiting for {server}")]
    TransportTimeout { server: String },

    #[error("Transport error talking to {server}: {reason}")]
    Transport { server: String, reason: String },

    #[error("Answer for {domain} contains no {expected} record")]
    UnexpectedRecordType { domain: String, expected: String },

    #[error("Unsupported query type {0}: only A lookups resolve to an address")]
    UnsupportedQueryType(String),

    #[error("Resolution exceeded the hop limit of {limit} queries")]
    HopLimitExceeded { limit: usize },

    #[error("Response does not match the query: {0}")]
    ResponseMismatch(String),

    #[error("Server {server} answered with {rcode}")]
    ServerFailure { server: String, rcode: &'static str },
}

impl DomainError {
    /// Failures that concern only the server that was asked; a sibling candidate may still
    /// answer the same question.
    pub fn is_server_specific(&self) -> bool {
        matches!(
            self,
            DomainError::TransportTimeout { .. }
                | DomainError::Transport { .. }
                | DomainError::ResponseMismatch(_)
                | DomainError::ServerFailure { .. }
                | DomainError::MalformedMessage(_)
        )
    }
}
