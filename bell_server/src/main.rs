mod background_job;
mod error;
mod payload;
mod router;
mod state;
mod util;

use axum::Router;
use dotenvy::dotenv;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use std::env;
use std::sync::Arc;
use std::time::Duration;

use bell_core::{
    settings::JsonFileStore, update::PoolUpdateDefinition, PoolSubscriptions, SubscriptionManager,
};
use e621_client::{Credential, E621Client};

use crate::state::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();

    // 1. Initialize logger
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::DEBUG.into())
        .from_env()
        .expect("invalid RUST_LOG")
        .add_directive("hyper::proto=info".parse().unwrap())
        .add_directive("hyper::client=info".parse().unwrap())
        .add_directive("reqwest=info".parse().unwrap());
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    // 2. Initialize settings store
    let settings_path = env::var("SETTINGS_PATH").expect("SETTINGS_PATH must be set");
    let store = Arc::new(JsonFileStore::new(settings_path));
    tracing::info!("Using settings at {}", store.path().display());

    // 3. Initialize API client
    let base_url = env::var("E621_BASE_URL").unwrap_or_else(|_| e621_client::BASE_URL.to_string());
    let user_agent = env::var("E621_USER_AGENT").unwrap_or_else(|_| format!("bell/{}", env!("CARGO_PKG_VERSION")));
    let mut client = E621Client::with_base_url(&base_url, &user_agent).expect("cannot build e621 client");
    if let (Ok(login), Ok(api_key)) = (env::var("E621_LOGIN"), env::var("E621_API_KEY")) {
        tracing::info!("Authenticating as {}", login);
        client = client.with_credential(Credential { login, api_key });
    }

    // 4. Initialize subscriptions
    let pools = Arc::new(
        PoolSubscriptions::new(store.clone(), Arc::new(client))
            .with_definition(PoolUpdateDefinition::new(&base_url)),
    );
    let manager = Arc::new(SubscriptionManager::new(store).register(pools.clone()));

    // 5. Initialize background jobs
    let notifications = Arc::new(RwLock::new(Vec::new()));
    let (update_check_queue, update_check_state) =
        background_job::listen_update_check(manager.clone(), notifications.clone());
    let interval = env::var("UPDATE_INTERVAL_SECS")
        .ok()
        .map(|s| s.parse::<u64>().expect("UPDATE_INTERVAL_SECS must be an integer"))
        .unwrap_or(util::DEFAULT_UPDATE_INTERVAL_SECS);
    background_job::schedule_update_check(update_check_queue.clone(), Duration::from_secs(interval));

    // 6. Setup state and router
    let app_state = AppState {
        pools,
        manager,
        notifications,
        update_check_queue,
        update_check_state,
    };

    let app = Router::new()
        .merge(router::pool::pool_router())
        .merge(router::update::update_router())
        .layer(TraceLayer::new_for_http().on_request(()))
        .with_state(app_state);

    // 7. Start server
    let addr = env::var("SERVER_ADDRESS").expect("SERVER_ADDRESS must be set");
    tracing::info!("Server starting at {}", addr);
    axum::Server::bind(&addr.parse().expect("SERVER_ADDRESS must be a socket address"))
        .serve(app.into_make_service())
        .await
        .unwrap();
}
