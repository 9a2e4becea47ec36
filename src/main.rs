use std::sync::Arc;

use socialhub::config::load_config;
use socialhub::hub::Router;
use socialhub::notifications::SledNotificationStore;
use socialhub::notify::Notifier;
use socialhub::transport::start_websocket_server;
use socialhub::utils::{Result, logging};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    if let Err(e) = run().await {
        // no-op when run() already installed the subscriber
        logging::init("info");
        error!("Server failed: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = load_config()?;
    logging::init(&config.logging.level);

    let store = Arc::new(SledNotificationStore::open(&config.storage.path)?);
    let router = Arc::new(Router::new());
    // handed to the REST layer, which lives outside this binary
    let _notifier = Notifier::new(store.clone(), router.clone());

    let addr = config.bind_addr();
    tokio::select! {
        res = start_websocket_server(&addr, router, config.clone()) => {
            if let Err(e) = res {
                error!("WebSocket server exited: {e}");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }

    store.flush()
}
