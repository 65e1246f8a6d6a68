// Port Layer - Interfaces for external dependencies

pub mod id_provider; // For deterministic testing
pub mod message_dispatcher;
pub mod queue_depth_probe;
pub mod time_provider;

// Re-exports
pub use id_provider::IdProvider;
pub use message_dispatcher::{DispatchError, DispatchResult, MessageDispatcher};
pub use queue_depth_probe::QueueDepthProbe;
pub use time_provider::TimeProvider;
