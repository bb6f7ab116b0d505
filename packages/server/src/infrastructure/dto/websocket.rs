//! Change-feed messages pushed over the WebSocket.

use serde::{Deserialize, Serialize};

use super::row::GameRowDto;

/// Message type discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    Subscribed,
    RowUpdated,
}

/// Sent once when the subscription is registered on the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscribedMessage {
    pub r#type: MessageType,
    pub lobby_id: String,
    pub subscription_id: String,
}

/// Sent after every successful write to the subscribed lobby
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowUpdatedMessage {
    pub r#type: MessageType,
    pub row: GameRowDto,
}
