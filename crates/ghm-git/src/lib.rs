//! Process gateway for ghm: runs the `gh` and `git` command-line tools.
//!
//! All remote effects go through these binaries. The [`runner`] module
//! executes processes and classifies their outcome; [`gh`] and [`client`]
//! build the argument vectors for each call site.

pub mod client;
pub mod errors;
pub mod gh;
pub mod runner;

pub use errors::GatewayError;
