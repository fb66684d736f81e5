#![allow(dead_code)]
use async_trait::async_trait;
use rootwalk_domain::{DomainError, RecordType};
use rootwalk_infrastructure::dns::transport::{DatagramTransport, TransportResponse};
use rootwalk_infrastructure::dns::wire::{Header, Message, Question, ResourceRecord};
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Mutex;
use std::time::Duration;

/// Canned response for one (server, question name) pair.
#[derive(Debug, Clone, Default)]
pub struct Reply {
    pub rcode: u8,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
    pub corrupt_id: bool,
    pub echoed_name: Option<String>,
}

impl Reply {
    pub fn answer(name: &str, addr: Ipv4Addr) -> Self {
        Self {
            answers: vec![ResourceRecord::a(name, 300, addr)],
            ..Self::default()
        }
    }

    /// Referral for `zone`; each nameserver gets a glue record when an address is given.
    pub fn referral(zone: &str, nameservers: &[(&str, Option<Ipv4Addr>)]) -> Self {
        let mut reply = Self::default();
        for (name, glue) in nameservers {
            reply.authorities.push(ResourceRecord::ns(zone, 172800, *name));
            if let Some(addr) = glue {
                reply.additionals.push(ResourceRecord::a(*name, 172800, *addr));
            }
        }
        reply
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn nxdomain() -> Self {
        Self {
            rcode: 3,
            ..Self::default()
        }
    }

    pub fn with_rcode(mut self, rcode: u8) -> Self {
        self.rcode = rcode;
        self
    }

    pub fn with_answer(mut self, record: ResourceRecord) -> Self {
        self.answers.push(record);
        self
    }

    pub fn with_corrupt_id(mut self) -> Self {
        self.corrupt_id = true;
        self
    }

    pub fn with_echoed_name(mut self, name: &str) -> Self {
        self.echoed_name = Some(name.to_string());
        self
    }
}

/// In-memory transport answering from a script. Unscripted exchanges time out.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: HashMap<(Ipv4Addr, String), Reply>,
    sent: Mutex<Vec<(Ipv4Addr, String)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, server: Ipv4Addr, qname: &str, reply: Reply) -> Self {
        self.replies
            .insert((server, qname.to_ascii_lowercase()), reply);
        self
    }

    /// Every (server, question name) pair queried so far, in order.
    pub fn sent(&self) -> Vec<(Ipv4Addr, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn servers_queried(&self) -> Vec<Ipv4Addr> {
        self.sent().into_iter().map(|(server, _)| server).collect()
    }
}

#[async_trait]
impl DatagramTransport for ScriptedTransport {
    async fn exchange(
        &self,
        server: SocketAddr,
        message_bytes: &[u8],
        _timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let query = Message::decode(message_bytes)?;
        let question = query.questions[0].clone();
        let server_ip = match server {
            SocketAddr::V4(v4) => *v4.ip(),
            SocketAddr::V6(_) => panic!("resolver only queries IPv4 servers"),
        };

        self.sent
            .lock()
            .unwrap()
            .push((server_ip, question.name.clone()));

        let reply = self
            .replies
            .get(&(server_ip, question.name.to_ascii_lowercase()))
            .cloned()
            .ok_or_else(|| DomainError::TransportTimeout {
                server: server.to_string(),
            })?;

        let echoed = match &reply.echoed_name {
            Some(name) => Question::new(name.clone(), RecordType::A),
            None => question,
        };

        let id = if reply.corrupt_id {
            query.header.id.wrapping_add(1)
        } else {
            query.header.id
        };

        let response = Message {
            header: Header {
                id,
                flags: Header::FLAG_QR | u16::from(reply.rcode),
                ..Header::default()
            },
            questions: vec![echoed],
            answers: reply.answers,
            authorities: reply.authorities,
            additionals: reply.additionals,
        };

        Ok(TransportResponse {
            bytes: response.encode()?,
            from: server,
        })
    }

    fn protocol_name(&self) -> &'static str {
        "SCRIPTED"
    }
}
