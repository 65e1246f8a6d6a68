// Application Layer - Use Cases

pub mod burst;

// Re-exports
pub use burst::{Burst, BurstGenerator, BurstOptions, CompletionMode};
