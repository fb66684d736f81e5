//! Iterative resolution from the root down to an authoritative answer.
//!
//! Each walk starts at a uniformly chosen root server and follows referrals until a server
//! answers with an A record. Referrals that name nameservers without glue trigger a nested
//! walk for the nameserver's own address. Every query, nested or not, is charged against one
//! hop budget, and names already being resolved further up the stack are never re-entered.

use super::referral::{classify, Nameserver, StepOutcome};
use super::trace::{Resolution, ResolutionStep};
use crate::dns::transport::DatagramTransport;
use crate::dns::wire::{trim_root, Message, MessageBuilder, Question};
use futures::future::{BoxFuture, FutureExt};
use rootwalk_domain::{DnsQuery, DomainError, RecordType, ResolverConfig};
use std::net::{Ipv4Addr, SocketAddr};
use tracing::{debug, info, warn};

/// Per-call mutable state, threaded through nested walks.
#[derive(Debug, Default)]
struct WalkState {
    queries_sent: usize,
    in_progress: Vec<String>,
    steps: Vec<ResolutionStep>,
}

impl WalkState {
    fn is_in_progress(&self, name: &str) -> bool {
        let name = trim_root(name);
        self.in_progress.iter().any(|n| n.eq_ignore_ascii_case(name))
    }
}

pub struct IterativeResolver<T> {
    transport: T,
    config: ResolverConfig,
    port: u16,
    root_servers: Vec<Nameserver>,
}

impl<T: DatagramTransport> IterativeResolver<T> {
    pub fn new(
        transport: T,
        config: ResolverConfig,
        port: u16,
        root_servers: Vec<Nameserver>,
    ) -> Self {
        Self {
            transport,
            config,
            port,
            root_servers,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `domain` to an IPv4 address.
    pub async fn resolve(&self, domain: &str) -> Result<Ipv4Addr, DomainError> {
        self.resolve_traced(domain).await.result
    }

    /// Resolve an A query; any other type is refused up front.
    pub async fn resolve_query(&self, query: &DnsQuery) -> Result<Ipv4Addr, DomainError> {
        if query.record_type != RecordType::A {
            return Err(DomainError::UnsupportedQueryType(
                query.record_type.to_string(),
            ));
        }
        self.resolve(query.normalized_domain()).await
    }

    /// Resolve `domain` and keep every step taken on the way.
    pub async fn resolve_traced(&self, domain: &str) -> Resolution {
        let mut state = WalkState::default();
        let domain = trim_root(domain);

        let result = if domain.is_empty() {
            Err(DomainError::InvalidDomainName(
                "cannot resolve an empty name".to_string(),
            ))
        } else {
            self.walk(domain, &mut state, 0).await
        };

        match &result {
            Ok(addr) => info!(
                domain = %domain,
                address = %addr,
                queries = state.queries_sent,
                "Resolution complete"
            ),
            Err(e) => warn!(
                domain = %domain,
                error = %e,
                queries = state.queries_sent,
                "Resolution failed"
            ),
        }

        Resolution {
            result,
            steps: state.steps,
            queries_sent: state.queries_sent,
        }
    }

    fn walk<'a>(
        &'a self,
        domain: &'a str,
        state: &'a mut WalkState,
        depth: usize,
    ) -> BoxFuture<'a, Result<Ipv4Addr, DomainError>> {
        async move {
            state.in_progress.push(domain.to_string());
            let result = self.walk_from_roots(domain, state, depth).await;
            state.in_progress.pop();
            result
        }
        .boxed()
    }

    async fn walk_from_roots(
        &self,
        domain: &str,
        state: &mut WalkState,
        depth: usize,
    ) -> Result<Ipv4Addr, DomainError> {
        let mut roots = self.root_servers.clone();
        fastrand::shuffle(&mut roots);

        let mut outcome = self.query_candidates(domain, &roots, state, depth).await?;

        loop {
            outcome = match outcome {
                StepOutcome::Answered(addr) => return Ok(addr),
                StepOutcome::Delegated(servers) => {
                    debug!(
                        domain = %domain,
                        candidates = servers.len(),
                        "Following referral with glue"
                    );
                    self.query_candidates(domain, &servers, state, depth).await?
                }
                StepOutcome::ReferralWithoutGlue(targets) => {
                    debug!(
                        domain = %domain,
                        nameservers = ?targets,
                        "Referral without glue, resolving nameserver addresses"
                    );
                    self.query_unglued(domain, &targets, state, depth).await?
                }
                StepOutcome::UnexpectedRecordType(_) => {
                    return Err(DomainError::UnexpectedRecordType {
                        domain: domain.to_string(),
                        expected: RecordType::A.to_string(),
                    });
                }
                StepOutcome::Unresolvable(reason) => {
                    return Err(DomainError::Unresolvable(format!("{}: {}", domain, reason)));
                }
            };
        }
    }

    /// Asks the candidates in order until one gives a usable response. Server-specific
    /// failures move on to the next sibling; at most `max_servers_per_step` are tried.
    async fn query_candidates(
        &self,
        domain: &str,
        candidates: &[Nameserver],
        state: &mut WalkState,
        depth: usize,
    ) -> Result<StepOutcome, DomainError> {
        let mut last_error = None;

        for server in candidates.iter().take(self.config.max_servers_per_step) {
            match self.query_step(domain, server, state, depth).await {
                Ok(outcome) => return Ok(outcome),
                Err(e) if e.is_server_specific() => last_error = Some(e),
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DomainError::Unresolvable(format!("{}: no nameserver to ask", domain))
        }))
    }

    /// Like `query_candidates` for a referral without glue: each nameserver name is resolved
    /// only when the previous one could not be used, so a dead first nameserver still leaves
    /// its siblings.
    async fn query_unglued(
        &self,
        domain: &str,
        targets: &[String],
        state: &mut WalkState,
        depth: usize,
    ) -> Result<StepOutcome, DomainError> {
        let mut last_error = None;

        for target in targets.iter().take(self.config.max_servers_per_step) {
            let server = match self.nameserver_address(target, state, depth).await {
                Ok(Some(server)) => server,
                Ok(None) => continue,
                Err(e @ DomainError::HopLimitExceeded { .. }) => return Err(e),
                Err(e) => {
                    debug!(nameserver = %target, error = %e, "Nameserver lookup failed");
                    last_error = Some(e);
                    continue;
                }
            };

            match self.query_step(domain, &server, state, depth).await {
                Ok(outcome) => return Ok(outcome),
                Err(e) if e.is_server_specific() => last_error = Some(e),
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::Unresolvable(match last_error {
            Some(e) => format!("{}: no usable nameserver ({})", domain, e),
            None => format!(
                "{}: delegation cycle, every nameserver depends on a name being resolved",
                domain
            ),
        }))
    }

    /// Address of a glue-less nameserver: taken from the configured roots when the name is
    /// one of them, otherwise found by a nested walk. `None` when the name is already being
    /// resolved further up.
    async fn nameserver_address(
        &self,
        target: &str,
        state: &mut WalkState,
        depth: usize,
    ) -> Result<Option<Nameserver>, DomainError> {
        let target = trim_root(target);

        if let Some(root) = self
            .root_servers
            .iter()
            .find(|root| trim_root(&root.name).eq_ignore_ascii_case(target))
        {
            return Ok(Some(root.clone()));
        }

        if state.is_in_progress(target) {
            debug!(nameserver = %target, "Nameserver is already being resolved, skipping");
            return Ok(None);
        }

        let addr = self.walk(target, state, depth + 1).await?;
        Ok(Some(Nameserver::new(target, addr)))
    }

    /// Sends one query to `server` and records the step. Locally rejected queries are not
    /// charged against the hop budget.
    async fn query_step(
        &self,
        domain: &str,
        server: &Nameserver,
        state: &mut WalkState,
        depth: usize,
    ) -> Result<StepOutcome, DomainError> {
        let (id, query) = MessageBuilder::build_query_with_id(domain, &RecordType::A)?;

        if state.queries_sent >= self.config.max_hops {
            return Err(DomainError::HopLimitExceeded {
                limit: self.config.max_hops,
            });
        }
        state.queries_sent += 1;

        let outcome = self
            .query_server(domain, server, id, &query)
            .await
            .map(|message| classify(&message));

        match &outcome {
            Ok(outcome) => debug!(
                domain = %domain,
                server = %server,
                depth = depth,
                outcome = %outcome,
                "Step complete"
            ),
            Err(e) => warn!(
                domain = %domain,
                server = %server,
                error = %e,
                "Nameserver failed"
            ),
        }

        state.steps.push(ResolutionStep {
            depth,
            domain: domain.to_string(),
            server: server.clone(),
            outcome: outcome.clone(),
        });
        outcome
    }

    /// Sends one iterative query and decodes the reply.
    async fn query_server(
        &self,
        domain: &str,
        server: &Nameserver,
        id: u16,
        query: &[u8],
    ) -> Result<Message, DomainError> {
        let server_addr = SocketAddr::from((server.addr, self.port));

        let response = self
            .transport
            .exchange(server_addr, query, self.config.timeout())
            .await?;
        let message = Message::decode(&response.bytes)?;

        if self.config.verify_responses {
            verify_response(&message, id, &Question::new(domain, RecordType::A), server_addr)?;
        }

        match message.header.rcode() {
            0 | 3 => Ok(message),
            _ => Err(DomainError::ServerFailure {
                server: server_addr.to_string(),
                rcode: message.header.rcode_name(),
            }),
        }
    }
}

fn verify_response(
    message: &Message,
    id: u16,
    question: &Question,
    server: SocketAddr,
) -> Result<(), DomainError> {
    if message.header.id != id {
        return Err(DomainError::ResponseMismatch(format!(
            "{} answered id {:#06x}, expected {:#06x}",
            server, message.header.id, id
        )));
    }

    if !message.header.is_response() {
        return Err(DomainError::ResponseMismatch(format!(
            "{} sent a message without the response bit",
            server
        )));
    }

    if let Some(echoed) = message.questions.first() {
        if !echoed.matches(question) {
            return Err(DomainError::ResponseMismatch(format!(
                "{} echoed question {} instead of {}",
                server, echoed.name, question.name
            )));
        }
    }

    Ok(())
}
