//! Argument parsing and subcommand runners for the `konteksto` binary.
pub mod args;
pub mod commands;
