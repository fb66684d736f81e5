//! Classification of one nameserver response into the next resolution state.

use crate::dns::wire::{trim_root, Message, ResourceRecord};
use rootwalk_domain::{RecordType, RootServer};
use std::fmt;
use std::net::Ipv4Addr;

const RCODE_NXDOMAIN: u8 = 3;

/// A nameserver the resolver can send a query to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nameserver {
    pub name: String,
    pub addr: Ipv4Addr,
}

impl Nameserver {
    pub fn new(name: impl Into<String>, addr: Ipv4Addr) -> Self {
        Self {
            name: name.into(),
            addr,
        }
    }
}

impl From<RootServer> for Nameserver {
    fn from(root: RootServer) -> Self {
        Self::new(root.name, root.addr)
    }
}

impl fmt::Display for Nameserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.addr)
    }
}

/// What a single response means for the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// An A record answered the question.
    Answered(Ipv4Addr),
    /// Referral with glue: query these servers next.
    Delegated(Vec<Nameserver>),
    /// Referral naming nameservers without their addresses; each name has to be resolved
    /// before the walk can continue.
    ReferralWithoutGlue(Vec<String>),
    /// Answer section present, but none of its records is an A record.
    UnexpectedRecordType(u16),
    /// Nothing to follow: no answer, no referral, or NXDOMAIN.
    Unresolvable(String),
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Answered(addr) => write!(f, "answer {}", addr),
            StepOutcome::Delegated(servers) => {
                let names: Vec<String> = servers.iter().map(ToString::to_string).collect();
                write!(f, "delegated to {}", names.join(", "))
            }
            StepOutcome::ReferralWithoutGlue(names) => {
                write!(f, "referred to {} (no glue)", names.join(", "))
            }
            StepOutcome::UnexpectedRecordType(rtype) => {
                write!(f, "answer holds {} instead of A", RecordType::describe(*rtype))
            }
            StepOutcome::Unresolvable(reason) => write!(f, "unresolvable: {}", reason),
        }
    }
}

/// Inspects the sections of `message` in priority order: answer, glue, bare referral.
pub fn classify(message: &Message) -> StepOutcome {
    if message.header.rcode() == RCODE_NXDOMAIN {
        return StepOutcome::Unresolvable("name does not exist (NXDOMAIN)".to_string());
    }

    if let Some(addr) = message.answer_address() {
        return StepOutcome::Answered(addr);
    }

    let targets = referral_targets(message);

    let glue = glue_for(&targets, &message.additionals);
    if !glue.is_empty() {
        return StepOutcome::Delegated(glue);
    }

    if !targets.is_empty() {
        return StepOutcome::ReferralWithoutGlue(targets);
    }

    if let Some(record) = message.answers.first() {
        return StepOutcome::UnexpectedRecordType(record.rtype);
    }

    StepOutcome::Unresolvable("response carries no answer and no referral".to_string())
}

/// NS targets from the authority section, deduplicated case-insensitively, in wire order.
fn referral_targets(message: &Message) -> Vec<String> {
    let mut targets: Vec<String> = Vec::new();
    for target in message
        .authorities
        .iter()
        .filter(|record| record.rtype == RecordType::NS.to_u16())
        .filter_map(ResourceRecord::nameserver)
        .map(trim_root)
        .filter(|name| !name.is_empty())
    {
        if !targets.iter().any(|t| t.eq_ignore_ascii_case(target)) {
            targets.push(target.to_string());
        }
    }
    targets
}

/// Pairs NS targets with the additional-section A records owned by them. When no owner
/// matches, every additional A record is taken at face value.
fn glue_for(targets: &[String], additionals: &[ResourceRecord]) -> Vec<Nameserver> {
    let addresses: Vec<(&ResourceRecord, Ipv4Addr)> = additionals
        .iter()
        .filter(|record| record.rtype == RecordType::A.to_u16())
        .filter_map(|record| record.ipv4().map(|addr| (record, addr)))
        .collect();

    let mut matched = Vec::new();
    for target in targets {
        for (record, addr) in &addresses {
            if record.owned_by(target) {
                matched.push(Nameserver::new(target.clone(), *addr));
            }
        }
    }

    if !matched.is_empty() {
        return matched;
    }

    addresses
        .into_iter()
        .map(|(record, addr)| Nameserver::new(trim_root(&record.name), addr))
        .collect()
}
