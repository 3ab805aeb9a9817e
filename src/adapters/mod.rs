//! Adapters - Concrete implementations of ports.

pub mod fetch;
pub mod ffmpeg;
pub mod http;
pub mod local;
