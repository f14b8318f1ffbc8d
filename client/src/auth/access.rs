//! Role-based gate for protected navigation targets.
//!
//! A pure function of the current session snapshot: no network calls, no
//! clock. Role normalization already happened at the wire boundary, so the
//! gate only ever sees canonical role sets.

use crate::auth::models::Role;
use crate::session::store::SessionIdentity;

/// Outcome of evaluating a guarded navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Render the guarded subtree.
    Permit,
    /// Not signed in at all; the attempted path is kept for after login.
    RedirectToLogin { attempted: String },
    /// Signed in but lacking every allowed role.
    RedirectToUnauthorized { attempted: String },
}

/// Decides whether the current session may enter a subtree that requires one
/// of `allowed`. An empty access token never permits, whatever the roles
/// claim.
pub fn evaluate(identity: &SessionIdentity, allowed: &[Role], attempted: &str) -> AccessDecision {
    let granted = identity
        .roles
        .iter()
        .any(|role| allowed.contains(role));

    if identity.is_authenticated() && granted {
        AccessDecision::Permit
    } else if !identity.username.is_empty() {
        AccessDecision::RedirectToUnauthorized {
            attempted: attempted.to_string(),
        }
    } else {
        AccessDecision::RedirectToLogin {
            attempted: attempted.to_string(),
        }
    }
}
