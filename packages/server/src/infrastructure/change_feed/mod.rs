//! 変更通知（ChangeFeed）の実装
//!
//! - `channel`: tokio の mpsc チャンネルを使った実装

pub mod channel;

pub use channel::ChannelChangeFeed;
