//! Inbound/outbound flat-file interfaces used by the CLI.

pub mod csv;
