//! Domain layer - Pure business logic.

pub mod humanize;
pub mod jobs;
pub mod manifest;
pub mod selection;
