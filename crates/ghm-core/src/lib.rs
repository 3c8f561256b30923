//! Core types, traits, and utilities for the ghm CLI.
//!
//! This crate provides the foundational abstractions used across all ghm crates:
//! - [`IOStreams`] for terminal I/O handling
//! - [`state::StateStore`] and [`state::Documents`] for the persisted JSON documents
//! - [`prompter::Prompter`] for interactive prompts
//! - [`Repo`] for `OWNER/REPO` references

pub mod cmdutil;
pub mod errors;
pub mod iostreams;
pub mod prompter;
pub mod repo;
pub mod state;

pub use errors::StateError;
pub use iostreams::IOStreams;
pub use repo::Repo;
