//! Application layer - Generic services that use ports.

pub mod grabber;
pub mod jobs;
pub mod store;
pub mod worker;
