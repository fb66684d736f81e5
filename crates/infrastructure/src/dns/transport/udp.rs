//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is (no framing). Each exchange binds its own ephemeral socket and
//! waits on a single deadline; stray datagrams are dropped rather than handed to the caller.

use super::{DatagramTransport, TransportResponse};
use async_trait::async_trait;
use rootwalk_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Receive buffer when none is configured; large enough for EDNS(0)-sized replies.
const DEFAULT_BUFFER_SIZE: usize = 4096;

/// DNS over UDP transport
pub struct UdpTransport {
    buffer_size: usize,
}

impl UdpTransport {
    pub fn new() -> Self {
        Self::with_buffer_size(DEFAULT_BUFFER_SIZE)
    }

    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self { buffer_size }
    }

    async fn send_and_wait(
        &self,
        socket: &UdpSocket,
        server: SocketAddr,
        message_bytes: &[u8],
    ) -> Result<TransportResponse, DomainError> {
        let bytes_sent = socket
            .send_to(message_bytes, server)
            .await
            .map_err(|e| transport_error(server, format!("send failed: {}", e)))?;

        debug!(server = %server, bytes_sent = bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; self.buffer_size];

        loop {
            let (bytes_received, from_addr) = socket
                .recv_from(&mut recv_buf)
                .await
                .map_err(|e| transport_error(server, format!("receive failed: {}", e)))?;

            if from_addr != server {
                warn!(
                    expected = %server,
                    received_from = %from_addr,
                    "Dropping UDP response from unexpected source"
                );
                continue;
            }

            let response = &recv_buf[..bytes_received];
            if let Err(e) = validate_response_id(message_bytes, response, server) {
                warn!(server = %server, error = %e, "Dropping UDP response");
                continue;
            }

            debug!(
                server = %server,
                bytes_received = bytes_received,
                "UDP response received"
            );

            return Ok(TransportResponse {
                bytes: response.to_vec(),
                from: from_addr,
            });
        }
    }
}

impl Default for UdpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatagramTransport for UdpTransport {
    async fn exchange(
        &self,
        server: SocketAddr,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        // Bind to ephemeral port (0 = OS assigns)
        let bind_addr = if server.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| transport_error(server, format!("failed to bind UDP socket: {}", e)))?;

        tokio::time::timeout(timeout, self.send_and_wait(&socket, server, message_bytes))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: server.to_string(),
            })?
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}

/// The first two bytes of query and response carry the transaction id; anything else is
/// either a late reply to an earlier query or a spoofing attempt.
fn validate_response_id(
    query: &[u8],
    response: &[u8],
    server: SocketAddr,
) -> Result<(), DomainError> {
    if query.len() < 2 || response.len() < 2 {
        return Err(DomainError::MalformedMessage(format!(
            "datagram from {} too short to carry a transaction id",
            server
        )));
    }

    let sent = u16::from_be_bytes([query[0], query[1]]);
    let received = u16::from_be_bytes([response[0], response[1]]);
    if sent != received {
        return Err(DomainError::ResponseMismatch(format!(
            "transaction id mismatch from {}: sent {:#06x}, received {:#06x}",
            server, sent, received
        )));
    }

    Ok(())
}

fn transport_error(server: SocketAddr, reason: String) -> DomainError {
    DomainError::Transport {
        server: server.to_string(),
        reason,
    }
}

#[cfg(test)]
#[path = "udp_test.rs"]
mod udp_test;
