//! Entity structs for the uxlens domain.
//!
//! Every entity derives `Serialize`, `Deserialize`, and `JsonSchema` so the
//! analysis payload can be decoded straight off the wire and its schema
//! published for the service side.

mod insight;
mod message;
mod metrics;

pub use insight::Insight;
pub use message::Message;
pub use metrics::AnalysisMetrics;
