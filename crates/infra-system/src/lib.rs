// Queue Burst Infrastructure - System Adapters
// Implements: MessageDispatcher, QueueDepthProbe on top of the aws CLI

pub mod aws_cli;
pub mod queue_attributes;
pub mod send_message;

pub use aws_cli::AwsCli;
pub use queue_attributes::AwsCliQueueDepthProbe;
pub use send_message::AwsCliDispatcher;
