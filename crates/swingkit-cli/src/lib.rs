//! Library surface of the swingkit CLI.
//!
//! Command implementations live in [`commands`]; the binary in
//! `main.rs` only parses arguments and dispatches.

pub mod commands;
