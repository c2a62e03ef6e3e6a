//! CLI subcommand implementations

pub mod compute;
pub mod play;
pub mod stats;
