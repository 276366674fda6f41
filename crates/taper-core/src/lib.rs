//! Core types, derived taper metrics, and the vote reconciliation protocol for
//! TaperCommunity.
//!
//! The analytics modules (`streak`, `trend`, `dose`, `schedule`, `milestone`)
//! are pure functions over in-memory entries. The `protocol` module talks to a
//! [`store::CommunityStore`] and is the only part of this crate that performs
//! I/O.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod cache;
pub mod dashboard;
pub mod dose;
pub mod entry;
pub mod error;
pub mod forum;
pub mod milestone;
pub mod profile;
pub mod protocol;
pub mod schedule;
pub mod store;
pub mod streak;
pub mod trend;
pub mod vote;

pub use error::{Error, Result};
