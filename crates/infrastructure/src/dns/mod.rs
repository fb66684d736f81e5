pub mod resolver;
pub mod transport;
pub mod wire;

pub use resolver::{IterativeResolver, Resolution, ResolutionStep, StepOutcome};
pub use transport::{DatagramTransport, TransportResponse, UdpTransport};
pub use wire::{Header, Message, MessageBuilder, Question, RData, ResourceRecord};
