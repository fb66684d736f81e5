//! rootwalk domain layer: record types, errors, configuration and root hints.
pub mod config;
pub mod dns_query;
pub mod errors;
pub mod record_type;
pub mod root_hints;

pub use config::{CliOverrides, Config, ConfigError, LoggingConfig, ResolverConfig};
pub use dns_query::DnsQuery;
pub use errors::DomainError;
pub use record_type::{RecordType, CLASS_IN};
pub use root_hints::RootServer;
