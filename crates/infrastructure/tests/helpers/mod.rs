pub mod dns_server_mock;
pub mod scripted_transport;

#[allow(unused_imports)]
pub use dns_server_mock::{MockBehavior, MockDnsServer};
#[allow(unused_imports)]
pub use scripted_transport::{Reply, ScriptedTransport};
