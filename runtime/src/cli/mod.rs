//! CLI subcommand implementations for the `faqharvest` binary.

pub mod cache_cmd;
pub mod doctor;
pub mod export_cmd;
pub mod extract_cmd;
pub mod output;
