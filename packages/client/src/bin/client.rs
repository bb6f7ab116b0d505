//! Sanmoku terminal client.
//!
//! Opens (or creates) a lobby on the store server, follows its change feed and
//! reads commands from stdin. Type `help` for the command list.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin sanmoku-client
//! cargo run --bin sanmoku-client -- --url http://127.0.0.1:3000 --lobby friday --api-key secret
//! ```

use clap::Parser;

use sanmoku_client::{ClientConfig, error::ClientError, run_client};
use sanmoku_server::domain::{LobbyConfig, LobbyId, WriteMode};
use sanmoku_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "sanmoku-client")]
#[command(about = "Play Tic Tac Toe in a shared lobby", long_about = None)]
struct Args {
    /// Store server base URL
    #[arg(short = 'u', long, env = "SANMOKU_URL", default_value = "http://127.0.0.1:8080")]
    url: String,

    /// API key sent with every request
    #[arg(long, env = "SANMOKU_API_KEY")]
    api_key: Option<String>,

    /// Lobby to open
    #[arg(short = 'l', long, default_value = "mainroom")]
    lobby: String,

    /// Reject writes based on a stale row instead of overwriting
    #[arg(long)]
    version_checked: bool,

    /// Log at info level instead of warn
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn build_config(args: Args) -> Result<ClientConfig, ClientError> {
    let lobby_id = LobbyId::new(args.lobby)?;
    let write_mode = if args.version_checked {
        WriteMode::VersionChecked
    } else {
        WriteMode::LastWriterWins
    };
    Ok(ClientConfig {
        url: args.url,
        api_key: args.api_key,
        lobby: LobbyConfig::new(lobby_id, write_mode),
    })
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // ログは画面の再描画と混ざるので既定では warn 以上のみ
    let level = if args.verbose { "info" } else { "warn" };
    setup_logger(env!("CARGO_BIN_NAME"), level);

    let result = match build_config(args) {
        Ok(config) => run_client(config).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
