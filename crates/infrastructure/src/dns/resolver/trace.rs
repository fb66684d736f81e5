use super::referral::{Nameserver, StepOutcome};
use rootwalk_domain::DomainError;
use std::fmt;
use std::net::Ipv4Addr;

/// One query sent during a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionStep {
    /// Nesting level: 0 for the requested name, +1 per nameserver lookup it triggered.
    pub depth: usize,
    pub domain: String,
    pub server: Nameserver,
    /// How the response was classified, or why this server could not be used.
    pub outcome: Result<StepOutcome, DomainError>,
}

impl fmt::Display for ResolutionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:indent$}{} @ {}: ",
            "",
            self.domain,
            self.server,
            indent = self.depth * 2
        )?;
        match &self.outcome {
            Ok(outcome) => write!(f, "{}", outcome),
            Err(e) => write!(f, "failed: {}", e),
        }
    }
}

/// Outcome of a traced resolution, kept together with every step that led to it.
#[derive(Debug)]
pub struct Resolution {
    pub result: Result<Ipv4Addr, DomainError>,
    pub steps: Vec<ResolutionStep>,
    pub queries_sent: usize,
}

impl Resolution {
    pub fn address(&self) -> Option<Ipv4Addr> {
        self.result.as_ref().ok().copied()
    }

    pub fn queries_sent(&self) -> usize {
        self.queries_sent
    }
}
