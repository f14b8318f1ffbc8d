//! Typed access to the poll service's HTTP API.
//!
//! `client` owns the transport and auth plumbing; the sibling modules add
//! one wrapper per server endpoint, grouped the way the server groups them.

pub mod client;
pub mod polls;
pub mod users;
pub mod votes;
