//! Ports - Trait definitions for the outer world.

pub mod muxer;
pub mod queue;
