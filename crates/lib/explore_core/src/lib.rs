//! # explore_core
//!
//! Core chat relay logic for ExploreMore: the chat wire model, the incremental
//! upstream record parser, the completion client, credential lookup and the
//! client-side transcript controller.

pub mod client;
pub mod credentials;
pub mod decode;
pub mod models;
pub mod prompt;
pub mod records;
pub mod transcript;
pub mod upstream;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
