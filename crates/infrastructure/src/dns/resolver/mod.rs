pub mod builder;
pub mod iterative;
pub mod referral;
pub mod trace;

pub use builder::ResolverBuilder;
pub use iterative::IterativeResolver;
pub use referral::{classify, Nameserver, StepOutcome};
pub use trace::{Resolution, ResolutionStep};
