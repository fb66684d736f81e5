use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Seconds to wait for a single nameserver to answer.
    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,

    /// Upper bound on queries sent for one resolution, nested NS lookups included.
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,

    /// Candidate nameservers tried at one delegation level before giving up on it.
    #[serde(default = "default_max_servers_per_step")]
    pub max_servers_per_step: usize,

    #[serde(default = "default_udp_buffer_size")]
    pub udp_buffer_size: usize,

    /// Reject responses whose transaction id or echoed question differ from the query.
    #[serde(default = "default_true")]
    pub verify_responses: bool,
}

impl ResolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            query_timeout: default_query_timeout(),
            max_hops: default_max_hops(),
            max_servers_per_step: default_max_servers_per_step(),
            udp_buffer_size: default_udp_buffer_size(),
            verify_responses: default_true(),
        }
    }
}

fn default_query_timeout() -> u64 {
    5
}

fn default_max_hops() -> usize {
    20
}

fn default_max_servers_per_step() -> usize {
    3
}

fn default_udp_buffer_size() -> usize {
    4096
}

fn default_true() -> bool {
    true
}
