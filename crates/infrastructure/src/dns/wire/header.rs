use super::reader::WireReader;
use rootwalk_domain::DomainError;

pub const HEADER_LEN: usize = 12;

/// The fixed 12-byte message header: id, flags and the four section counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub id: u16,
    pub flags: u16,
    pub question_count: u16,
    pub answer_count: u16,
    pub authority_count: u16,
    pub additional_count: u16,
}

impl Header {
    pub const FLAG_QR: u16 = 0x8000;
    pub const FLAG_AA: u16 = 0x0400;
    pub const FLAG_TC: u16 = 0x0200;
    pub const FLAG_RD: u16 = 0x0100;
    pub const FLAG_RA: u16 = 0x0080;
    const RCODE_MASK: u16 = 0x000F;

    /// Header for a query carrying exactly one question.
    pub fn query(id: u16, flags: u16) -> Self {
        Self {
            id,
            flags,
            question_count: 1,
            ..Self::default()
        }
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.id.to_be_bytes());
        buf.extend_from_slice(&self.flags.to_be_bytes());
        buf.extend_from_slice(&self.question_count.to_be_bytes());
        buf.extend_from_slice(&self.answer_count.to_be_bytes());
        buf.extend_from_slice(&self.authority_count.to_be_bytes());
        buf.extend_from_slice(&self.additional_count.to_be_bytes());
    }

    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self, DomainError> {
        if reader.remaining() < HEADER_LEN {
            return Err(DomainError::MalformedMessage(format!(
                "header needs {} bytes, got {}",
                HEADER_LEN,
                reader.remaining()
            )));
        }

        Ok(Self {
            id: reader.read_u16()?,
            flags: reader.read_u16()?,
            question_count: reader.read_u16()?,
            answer_count: reader.read_u16()?,
            authority_count: reader.read_u16()?,
            additional_count: reader.read_u16()?,
        })
    }

    pub fn is_response(&self) -> bool {
        self.flags & Self::FLAG_QR != 0
    }

    pub fn is_authoritative(&self) -> bool {
        self.flags & Self::FLAG_AA != 0
    }

    pub fn truncated(&self) -> bool {
        self.flags & Self::FLAG_TC != 0
    }

    pub fn recursion_desired(&self) -> bool {
        self.flags & Self::FLAG_RD != 0
    }

    pub fn rcode(&self) -> u8 {
        (self.flags & Self::RCODE_MASK) as u8
    }

    pub fn rcode_name(&self) -> &'static str {
        match self.rcode() {
            0 => "NOERROR",
            1 => "FORMERR",
            2 => "SERVFAIL",
            3 => "NXDOMAIN",
            4 => "NOTIMP",
            5 => "REFUSED",
            _ => "UNKNOWN",
        }
    }
}
