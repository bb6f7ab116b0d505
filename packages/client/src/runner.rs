//! Client execution logic.
//!
//! Input is read on a blocking rustyline thread and forwarded over a channel;
//! the async side waits on that channel and on the change feed at the same time.

use std::{io::Write, sync::Arc};

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use sanmoku_server::{
    domain::{GameStateStore, LobbyConfig},
    usecase::LobbyError,
};
use sanmoku_shared::time::SystemClock;

use crate::{
    command::Command,
    error::ClientError,
    formatter::GameFormatter,
    remote_store::RemoteGameStateStore,
    session::{LobbySession, Step},
};

const PROMPT: &str = "sanmoku> ";

/// Connection settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Store service base URL
    pub url: String,
    pub api_key: Option<String>,
    pub lobby: LobbyConfig,
}

/// Redisplay the prompt after printing pushed output
fn redisplay_prompt() {
    print!("{}", PROMPT);
    std::io::stdout().flush().ok();
}

fn spawn_readline(input_tx: mpsc::UnboundedSender<String>) {
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
        // input_tx が drop され、非同期側は入力の終了として扱う
    });
}

/// Run the terminal client until the user quits
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let store: Arc<dyn GameStateStore> =
        Arc::new(RemoteGameStateStore::new(&config.url, config.api_key.clone())?);
    let lobby_id = config.lobby.lobby_id.clone();
    let mut session = LobbySession::new(store.clone(), config.lobby, Arc::new(SystemClock));

    // 1. 購読してから行を読む（読み込み後の書き込みを取りこぼさない）
    let mut subscription = store
        .subscribe(&lobby_id)
        .await
        .map_err(LobbyError::from)?;
    session.load().await?;
    tracing::info!("Connected to {} (lobby '{}')", config.url, lobby_id);

    println!("{}", GameFormatter::format_lobby(session.view()));
    println!("Type 'help' for commands.\n");

    // 2. 入力スレッド
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    spawn_readline(input_tx);

    // 3. push と入力を待つ
    let result = loop {
        tokio::select! {
            row = subscription.recv() => match row {
                Some(row) => {
                    if let Some(screen) = session.on_row_pushed(row) {
                        print!("\n{}", screen);
                        redisplay_prompt();
                    }
                }
                None => {
                    // 再接続はしない。退出を試みてから終了する
                    tracing::warn!("Change feed closed");
                    session.leave_best_effort().await;
                    break Err(ClientError::ConnectionError(
                        "the store closed the change feed".to_string(),
                    ));
                }
            },
            line = input_rx.recv() => match line {
                Some(line) => match Command::parse(&line) {
                    Ok(command) => match session.handle(command).await {
                        Step::Continue(output) => println!("{}", output),
                        Step::Quit => break Ok(()),
                    },
                    Err(e) => println!("{}", e),
                },
                None => {
                    // EOF / Ctrl+C
                    session.leave_best_effort().await;
                    break Ok(());
                }
            },
        }
    };

    if let Err(e) = store.unsubscribe(subscription).await {
        tracing::warn!("Failed to unsubscribe: {}", e);
    }
    println!("Bye!");
    result
}
