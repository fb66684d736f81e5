use anyhow::Context;
use clap::Parser;
use rootwalk_domain::CliOverrides;
use rootwalk_infrastructure::dns::resolver::ResolverBuilder;
use rootwalk_infrastructure::dns::transport::UdpTransport;
use tracing::debug;

mod bootstrap;

#[derive(Parser)]
#[command(name = "rootwalk")]
#[command(version)]
#[command(about = "Resolve a domain name to an IPv4 address by walking down from the root servers")]
struct Cli {
    /// Domain name to resolve
    domain: String,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Per-query timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Maximum number of queries for one resolution
    #[arg(long, value_name = "N")]
    max_hops: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Print every query sent before the answer
    #[arg(long)]
    trace: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        query_timeout: cli.timeout,
        max_hops: cli.max_hops,
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    debug!(
        config = %bootstrap::config_source(cli.config.as_deref()),
        "Starting rootwalk v{}",
        env!("CARGO_PKG_VERSION")
    );

    let transport = UdpTransport::with_buffer_size(config.resolver.udp_buffer_size);
    let resolver = ResolverBuilder::new(transport)
        .with_config(config.resolver.clone())
        .build();

    let resolution = resolver.resolve_traced(&cli.domain).await;

    if cli.trace {
        for step in &resolution.steps {
            println!("{}", step);
        }
    }

    let addr = resolution
        .result
        .with_context(|| format!("failed to resolve {}", cli.domain))?;
    println!("{}", addr);

    Ok(())
}
