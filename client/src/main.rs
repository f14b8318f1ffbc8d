//! Main entry point for the sports-voting client.
//!
//! This file wires the session store, the persist-login bootstrap guard, and
//! the API client together, then resolves the requested page the way the
//! browser app would on a full reload: recover the session first, decide
//! access second, fetch data last.

mod api;
mod auth;
mod config;
mod errors;
mod router;
mod session;

use crate::api::client::{ApiClient, http_client};
use crate::auth::bootstrap::PersistLogin;
use crate::auth::service::AuthService;
use crate::config::Config;
use crate::router::{Navigation, RouteTable};
use crate::session::persist::PersistFlag;
use crate::session::store::SessionStore;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() {
    init();

    let config = Config::from_env().unwrap();
    let store = SessionStore::new();
    let persist = PersistFlag::new(config.persist_file().unwrap());
    let http = http_client(&config).unwrap();
    let auth = Arc::new(AuthService::new(http.clone(), config.clone(), store.clone()));

    info!("starting client against {}", config.api_base_url);

    // Recover the persisted session, if any, before touching guarded pages.
    let bootstrap = PersistLogin::new(store.clone(), auth.clone(), persist.load());
    bootstrap.run().await;

    let identity = store.read();
    if identity.is_authenticated() {
        info!("session restored for {}", identity.username);
    } else {
        info!("no session to restore");
    }

    let api = ApiClient::new(http, config, store.clone(), auth);
    let routes = RouteTable::standard();
    let target = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());

    match routes.resolve(&target, &store.read()) {
        Navigation::Render { path } => {
            info!("rendering {}", path);
            if path == "/" {
                match api.get_polls().await {
                    Ok(polls) => {
                        for poll in polls {
                            info!("poll {}: {} ({})", poll.id, poll.name, poll.season);
                        }
                    }
                    Err(err) => error!("unable to fetch polls: {}", err),
                }
            }
        }
        Navigation::Login { attempted } => {
            info!("{} requires login, redirecting to /login", attempted);
        }
        Navigation::Unauthorized { attempted } => {
            info!("{} is above this session's roles, redirecting to /unauthorized", attempted);
        }
        Navigation::NotFound { attempted } => {
            error!("no such page: {}", attempted);
        }
    }
}
