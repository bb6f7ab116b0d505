//! Sanmoku store server.
//!
//! Hosts lobby rows in memory and pushes every write to WebSocket subscribers.
//! Game rules run in the clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin sanmoku-server
//! cargo run --bin sanmoku-server -- --host 0.0.0.0 --port 3000 --api-key secret
//! ```

use std::sync::Arc;

use clap::Parser;
use sanmoku_server::{
    infrastructure::{change_feed::ChannelChangeFeed, store::InMemoryGameStateStore},
    ui::Server,
};
use sanmoku_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "sanmoku-server")]
#[command(about = "Lobby store with a WebSocket change feed for Sanmoku", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// API key clients must present (unset accepts every request)
    #[arg(long, env = "SANMOKU_API_KEY")]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // 1. ChangeFeed → 2. Store → 3. Server
    let change_feed = Arc::new(ChannelChangeFeed::new());
    let store = Arc::new(InMemoryGameStateStore::new(change_feed));
    let server = Server::new(store, args.api_key);

    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
