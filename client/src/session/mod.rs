//! Session state shared across the client.
//!
//! This module holds the tab-scoped identity store and the durable
//! persist-login flag that together decide whether a reloaded client
//! tries to recover its session.

pub mod persist;
pub mod store;
