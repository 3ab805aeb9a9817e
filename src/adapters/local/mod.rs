//! Local adapters for single-process deployment.

pub mod channel;

pub use channel::{ChannelQueue, MAX_QUEUE_SIZE};
