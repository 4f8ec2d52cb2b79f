// Domain models: agent stat samples and query ranges

mod range;
mod stat;

pub use range::Range;
pub use stat::{AgentStat, StatPayload};
