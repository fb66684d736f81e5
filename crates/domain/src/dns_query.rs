use super::RecordType;
use std::fmt;
use std::sync::Arc;

/// A single question the resolver has to answer: a domain name and the wanted type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    pub domain: Arc<str>,
    pub record_type: RecordType,
}

impl DnsQuery {
    pub fn new(domain: impl Into<Arc<str>>, record_type: RecordType) -> Self {
        Self {
            domain: domain.into(),
            record_type,
        }
    }

    /// Shorthand for the only question the resolver terminates on: an IPv4 address.
    pub fn a(domain: impl Into<Arc<str>>) -> Self {
        Self::new(domain, RecordType::A)
    }

    /// Domain without its trailing root dot. An escaped final dot (`a\.`) belongs to the
    /// last label and stays.
    pub fn normalized_domain(&self) -> &str {
        let domain = &self.domain[..];
        match domain.strip_suffix('.') {
            Some(stripped) if trailing_backslashes(stripped) % 2 == 0 => stripped,
            _ => domain,
        }
    }
}

fn trailing_backslashes(s: &str) -> usize {
    s.bytes().rev().take_while(|b| *b == b'\\').count()
}

impl fmt::Display for DnsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.domain, self.record_type)
    }
}
