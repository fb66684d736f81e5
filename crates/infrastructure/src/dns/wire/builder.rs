//! DNS Message Builder
//!
//! Constructs the iterative queries the resolver sends: one question, class IN, and the
//! Recursion Desired bit cleared so every server answers from its own zone data.

use super::header::Header;
use super::record::Question;
use rootwalk_domain::{DomainError, RecordType};

pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a query with a fresh random transaction id.
    pub fn build_query(domain: &str, record_type: &RecordType) -> Result<Vec<u8>, DomainError> {
        Self::build_query_with_id(domain, record_type).map(|(_, bytes)| bytes)
    }

    /// Build a query and return the transaction id alongside the bytes, for matching the
    /// response.
    pub fn build_query_with_id(
        domain: &str,
        record_type: &RecordType,
    ) -> Result<(u16, Vec<u8>), DomainError> {
        let id = fastrand::u16(..);
        let bytes = Self::encode_query(id, 0, domain, record_type)?;
        Ok((id, bytes))
    }

    /// Header followed by the single question; `flags` is written verbatim.
    pub fn encode_query(
        id: u16,
        flags: u16,
        domain: &str,
        record_type: &RecordType,
    ) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        Header::query(id, flags).encode(&mut buf);
        Question::new(domain, *record_type).encode(&mut buf)?;
        Ok(buf)
    }
}
