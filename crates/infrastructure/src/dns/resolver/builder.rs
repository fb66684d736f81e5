use super::iterative::IterativeResolver;
use super::referral::Nameserver;
use crate::dns::transport::{DatagramTransport, DNS_PORT};
use rootwalk_domain::{root_hints, ResolverConfig};
use tracing::info;

pub struct ResolverBuilder<T> {
    transport: T,
    config: ResolverConfig,
    port: u16,
    root_servers: Option<Vec<Nameserver>>,
}

impl<T: DatagramTransport> ResolverBuilder<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            config: ResolverConfig::default(),
            port: DNS_PORT,
            root_servers: None,
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Destination port for every query. Only test setups use anything but 53.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Replace the compiled-in root hints.
    pub fn with_root_servers(mut self, root_servers: Vec<Nameserver>) -> Self {
        self.root_servers = Some(root_servers);
        self
    }

    pub fn build(self) -> IterativeResolver<T> {
        let root_servers = self
            .root_servers
            .unwrap_or_else(|| root_hints::all().iter().copied().map(Nameserver::from).collect());

        info!(
            protocol = self.transport.protocol_name(),
            roots = root_servers.len(),
            max_hops = self.config.max_hops,
            timeout_secs = self.config.query_timeout,
            "Building iterative resolver"
        );

        IterativeResolver::new(self.transport, self.config, self.port, root_servers)
    }
}
