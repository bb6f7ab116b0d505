//! Server state shared by all handlers.

use std::sync::Arc;

use crate::domain::GameStateStore;

/// Shared application state
pub struct AppState {
    /// Store（ゲーム行の保存先）
    pub store: Arc<dyn GameStateStore>,
    /// 設定されている場合、全リクエストで `apikey` の一致を要求する
    pub api_key: Option<String>,
}

impl AppState {
    pub fn new(store: Arc<dyn GameStateStore>, api_key: Option<String>) -> Self {
        Self { store, api_key }
    }

    /// 渡されたキーが設定と一致するか（未設定なら常に許可）
    pub fn is_authorized(&self, presented: Option<&str>) -> bool {
        match &self.api_key {
            Some(expected) => presented == Some(expected.as_str()),
            None => true,
        }
    }
}
