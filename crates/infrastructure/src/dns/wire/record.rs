use super::name::{decode_name, encode_name, trim_root};
use super::reader::WireReader;
use rootwalk_domain::{DomainError, RecordType, CLASS_IN};
use std::fmt;
use std::net::Ipv4Addr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: String,
    pub qtype: u16,
    pub qclass: u16,
}

impl Question {
    pub fn new(name: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            name: name.into(),
            qtype: record_type.to_u16(),
            qclass: CLASS_IN,
        }
    }

    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_u16(self.qtype)
    }

    pub fn encode(&self, buf: &mut Vec<u8>) -> Result<(), DomainError> {
        encode_name(buf, &self.name)?;
        buf.extend_from_slice(&self.qtype.to_be_bytes());
        buf.extend_from_slice(&self.qclass.to_be_bytes());
        Ok(())
    }

    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self, DomainError> {
        let name = decode_name(reader)?;
        let qtype = reader.read_u16()?;
        let qclass = reader.read_u16()?;
        Ok(Self {
            name,
            qtype,
            qclass,
        })
    }

    /// Whether this (echoed) question asks the same thing as `other`. Names compare
    /// case-insensitively and without the root dot.
    pub fn matches(&self, other: &Question) -> bool {
        self.qtype == other.qtype
            && self.qclass == other.qclass
            && trim_root(&self.name).eq_ignore_ascii_case(trim_root(&other.name))
    }
}

/// Record payload, interpreted according to the record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
    /// Type A: four octets.
    Address(Ipv4Addr),
    /// Type NS: the delegated nameserver's name.
    NameServer(String),
    /// Every other type, kept verbatim.
    Opaque(Vec<u8>),
}

impl RData {
    fn decode(rtype: u16, reader: &mut WireReader<'_>, len: usize) -> Result<Self, DomainError> {
        if reader.remaining() < len {
            return Err(DomainError::MalformedMessage(format!(
                "record data truncated: declared {} bytes, {} left",
                len,
                reader.remaining()
            )));
        }

        match RecordType::from_u16(rtype) {
            Some(RecordType::A) => {
                if len != 4 {
                    return Err(DomainError::MalformedMessage(format!(
                        "A record data must be 4 bytes, got {}",
                        len
                    )));
                }
                let b = reader.read_bytes(4)?;
                Ok(RData::Address(Ipv4Addr::new(b[0], b[1], b[2], b[3])))
            }
            Some(RecordType::NS) => {
                let start = reader.position();
                let name = decode_name(reader)?;
                let consumed = reader.position() - start;
                if consumed != len {
                    return Err(DomainError::MalformedMessage(format!(
                        "NS record data declared {} bytes but its name used {}",
                        len, consumed
                    )));
                }
                Ok(RData::NameServer(name))
            }
            _ => Ok(RData::Opaque(reader.read_bytes(len)?.to_vec())),
        }
    }

    fn encode(&self, buf: &mut Vec<u8>) -> Result<(), DomainError> {
        match self {
            RData::Address(addr) => buf.extend_from_slice(&addr.octets()),
            RData::NameServer(name) => encode_name(buf, name)?,
            RData::Opaque(bytes) => buf.extend_from_slice(bytes),
        }
        Ok(())
    }
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RData::Address(addr) => write!(f, "{}", addr),
            RData::NameServer(name) => write!(f, "{}", name),
            RData::Opaque(bytes) => write!(f, "\\# {}", bytes.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: String,
    pub rtype: u16,
    pub class: u16,
    pub ttl: u32,
    pub data: RData,
}

impl ResourceRecord {
    pub fn a(name: impl Into<String>, ttl: u32, addr: Ipv4Addr) -> Self {
        Self {
            name: name.into(),
            rtype: RecordType::A.to_u16(),
            class: CLASS_IN,
            ttl,
            data: RData::Address(addr),
        }
    }

    pub fn ns(name: impl Into<String>, ttl: u32, nameserver: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rtype: RecordType::NS.to_u16(),
            class: CLASS_IN,
            ttl,
            data: RData::NameServer(nameserver.into()),
        }
    }

    pub fn opaque(name: impl Into<String>, rtype: u16, ttl: u32, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            rtype,
            class: CLASS_IN,
            ttl,
            data: RData::Opaque(data),
        }
    }

    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_u16(self.rtype)
    }

    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        match self.data {
            RData::Address(addr) => Some(addr),
            _ => None,
        }
    }

    pub fn nameserver(&self) -> Option<&str> {
        match &self.data {
            RData::NameServer(name) => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn owned_by(&self, name: &str) -> bool {
        trim_root(&self.name).eq_ignore_ascii_case(trim_root(name))
    }

    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self, DomainError> {
        let name = decode_name(reader)?;
        let rtype = reader.read_u16()?;
        let class = reader.read_u16()?;
        let ttl = reader.read_u32()?;
        let len = usize::from(reader.read_u16()?);
        let data = RData::decode(rtype, reader, len)?;

        Ok(Self {
            name,
            rtype,
            class,
            ttl,
            data,
        })
    }

    /// Writes the record without name compression; the data length is computed from the
    /// encoded payload.
    pub fn encode(&self, buf: &mut Vec<u8>) -> Result<(), DomainError> {
        encode_name(buf, &self.name)?;
        buf.extend_from_slice(&self.rtype.to_be_bytes());
        buf.extend_from_slice(&self.class.to_be_bytes());
        buf.extend_from_slice(&self.ttl.to_be_bytes());

        let mut data = Vec::new();
        self.data.encode(&mut data)?;
        let len = u16::try_from(data.len()).map_err(|_| {
            DomainError::MalformedMessage(format!("record data of {} bytes", data.len()))
        })?;
        buf.extend_from_slice(&len.to_be_bytes());
        buf.extend_from_slice(&data);
        Ok(())
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = if self.class == CLASS_IN { "IN" } else { "??" };
        write!(
            f,
            "{} {} {} {} {}",
            self.name,
            self.ttl,
            class,
            RecordType::describe(self.rtype),
            self.data
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_bytes(rtype: u16, rdata: &[u8]) -> Vec<u8> {
        let mut buf = b"\x07example\x03com\x00".to_vec();
        buf.extend_from_slice(&rtype.to_be_bytes());
        buf.extend_from_slice(&CLASS_IN.to_be_bytes());
        buf.extend_from_slice(&300u32.to_be_bytes());
        buf.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        buf.extend_from_slice(rdata);
        buf
    }

    #[test]
    fn test_a_record_dotted_decimal() {
        let buf = record_bytes(1, &[93, 184, 216, 34]);
        let record = ResourceRecord::decode(&mut WireReader::new(&buf)).unwrap();
        assert_eq!(record.name, "example.com");
        assert_eq!(record.ttl, 300);
        assert_eq!(record.data.to_string(), "93.184.216.34");
        assert_eq!(record.ipv4(), Some(Ipv4Addr::new(93, 184, 216, 34)));
    }

    #[test]
    fn test_a_record_wrong_length() {
        let buf = record_bytes(1, &[1, 2, 3]);
        assert!(ResourceRecord::decode(&mut WireReader::new(&buf)).is_err());
    }

    #[test]
    fn test_ns_record_decodes_to_name() {
        let buf = record_bytes(2, b"\x01a\x0cgtld-servers\x03net\x00");
        let record = ResourceRecord::decode(&mut WireReader::new(&buf)).unwrap();
        assert_eq!(
            record.data,
            RData::NameServer("a.gtld-servers.net".to_string())
        );
        assert_eq!(record.nameserver(), Some("a.gtld-servers.net"));
    }

    #[test]
    fn test_ns_record_length_mismatch() {
        let buf = record_bytes(2, b"\x02ns\x00\xff");
        assert!(ResourceRecord::decode(&mut WireReader::new(&buf)).is_err());
    }

    #[test]
    fn test_other_types_stay_opaque() {
        let buf = record_bytes(16, b"\x05hello");
        let record = ResourceRecord::decode(&mut WireReader::new(&buf)).unwrap();
        assert_eq!(record.data, RData::Opaque(b"\x05hello".to_vec()));
        assert_eq!(record.record_type(), Some(RecordType::TXT));
    }

    #[test]
    fn test_truncated_rdata() {
        let mut buf = record_bytes(1, &[1, 2, 3, 4]);
        buf.pop();
        assert!(matches!(
            ResourceRecord::decode(&mut WireReader::new(&buf)),
            Err(DomainError::MalformedMessage(_))
        ));
    }

    #[test]
    fn test_question_matching_ignores_case_and_root_dot() {
        let sent = Question::new("Example.COM", RecordType::A);
        let echoed = Question::new("example.com.", RecordType::A);
        assert!(sent.matches(&echoed));
        assert!(!sent.matches(&Question::new("example.com", RecordType::NS)));
    }

    #[test]
    fn test_display() {
        let record = ResourceRecord::ns("com", 172800, "a.gtld-servers.net");
        assert_eq!(record.to_string(), "com 172800 IN NS a.gtld-servers.net");
    }
}
