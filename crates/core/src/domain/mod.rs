// Domain Layer - Pure business logic and entities

pub mod burst;
pub mod error;
pub mod queue;
pub mod report;
pub mod target;

// Re-exports
pub use burst::{BurstPlan, EndpointPort, MessageCount, QueueName};
pub use error::DomainError;
pub use queue::QueueDepth;
pub use report::{BurstReport, SendOutcome, SendStatus};
pub use target::{SendDefaults, SendTarget};
