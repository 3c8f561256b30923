//! Command implementations for the ghm CLI.
//!
//! The `secret`, `workflow` and `config` modules hold the clap command
//! groups. They collect input and hand a [`strategy::Strategy`] to
//! [`strategy::dispatch`].

pub mod bootstrap;
pub mod config;
pub mod factory;
pub mod input;
pub mod secret;
pub mod strategy;
pub mod workflow;

#[cfg(test)]
pub mod test_helpers;
