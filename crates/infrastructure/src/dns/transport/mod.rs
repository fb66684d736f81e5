pub mod udp;

use async_trait::async_trait;
use rootwalk_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;

pub use udp::UdpTransport;

/// Well-known DNS port; every nameserver the resolver talks to listens here.
pub const DNS_PORT: u16 = 53;

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,

    /// Address the datagram actually came from.
    pub from: SocketAddr,
}

/// One request/response round trip with a nameserver.
///
/// Implementations own whatever sockets they need; nothing is shared process-wide, so two
/// resolvers (or two exchanges) never read each other's replies.
#[async_trait]
pub trait DatagramTransport: Send + Sync {
    async fn exchange(
        &self,
        server: SocketAddr,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    fn protocol_name(&self) -> &'static str;
}

#[async_trait]
impl<T: DatagramTransport + ?Sized> DatagramTransport for std::sync::Arc<T> {
    async fn exchange(
        &self,
        server: SocketAddr,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        (**self).exchange(server, message_bytes, timeout).await
    }

    fn protocol_name(&self) -> &'static str {
        (**self).protocol_name()
    }
}
