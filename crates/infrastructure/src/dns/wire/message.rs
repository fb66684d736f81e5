use super::header::Header;
use super::reader::WireReader;
use super::record::{Question, ResourceRecord};
use rootwalk_domain::{DomainError, RecordType};
use std::net::Ipv4Addr;

/// A fully decoded datagram. Sections are filled strictly from the header counts; there is
/// no delimiter on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl Message {
    pub fn decode(bytes: &[u8]) -> Result<Self, DomainError> {
        let mut reader = WireReader::new(bytes);
        let header = Header::decode(&mut reader)?;

        let questions = (0..header.question_count)
            .map(|_| Question::decode(&mut reader))
            .collect::<Result<Vec<_>, _>>()?;
        let answers = Self::decode_section(&mut reader, header.answer_count)?;
        let authorities = Self::decode_section(&mut reader, header.authority_count)?;
        let additionals = Self::decode_section(&mut reader, header.additional_count)?;

        Ok(Self {
            header,
            questions,
            answers,
            authorities,
            additionals,
        })
    }

    fn decode_section(
        reader: &mut WireReader<'_>,
        count: u16,
    ) -> Result<Vec<ResourceRecord>, DomainError> {
        (0..count).map(|_| ResourceRecord::decode(reader)).collect()
    }

    /// Serializes the message with section counts taken from the section lengths; the
    /// count fields of `self.header` are ignored.
    pub fn encode(&self) -> Result<Vec<u8>, DomainError> {
        let header = Header {
            question_count: section_count(self.questions.len())?,
            answer_count: section_count(self.answers.len())?,
            authority_count: section_count(self.authorities.len())?,
            additional_count: section_count(self.additionals.len())?,
            ..self.header
        };

        let mut buf = Vec::with_capacity(512);
        header.encode(&mut buf);
        for question in &self.questions {
            question.encode(&mut buf)?;
        }
        for record in self
            .answers
            .iter()
            .chain(&self.authorities)
            .chain(&self.additionals)
        {
            record.encode(&mut buf)?;
        }
        Ok(buf)
    }

    /// First address carried by an A record in the answer section.
    pub fn answer_address(&self) -> Option<Ipv4Addr> {
        self.answers
            .iter()
            .filter(|record| record.rtype == RecordType::A.to_u16())
            .find_map(ResourceRecord::ipv4)
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty() && self.authorities.is_empty() && self.additionals.is_empty()
    }
}

fn section_count(len: usize) -> Result<u16, DomainError> {
    u16::try_from(len)
        .map_err(|_| DomainError::MalformedMessage(format!("{} records in one section", len)))
}
