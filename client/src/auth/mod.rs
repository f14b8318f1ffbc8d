//! Authentication module for managing the client-side session lifecycle.
//!
//! This module provides the public interface for authentication-related
//! functionality: login, registration, token refresh, logout, the startup
//! persist-login guard, and role-based access decisions.

pub mod access;
pub mod bootstrap;
pub mod models;
pub mod service;
