//! Value Object 定義
//!
//! 生成時に検証を行い、不正な値を持つインスタンスが存在しないことを保証します。

use std::fmt;

use sanmoku_shared::time::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// ロビー ID の最大長
pub const LOBBY_ID_MAX_LEN: usize = 64;

/// 表示名の最大文字数（参加フォームの入力上限と同じ）
pub const DISPLAY_NAME_MAX_CHARS: usize = 22;

/// 全クライアントが共有する既定のロビー
pub const DEFAULT_LOBBY_ID: &str = "mainroom";

// ========================================
// LobbyId
// ========================================

/// ロビー（共有されるゲーム行）の ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LobbyId(String);

impl LobbyId {
    /// 新しい LobbyId を作成
    ///
    /// 空文字列、64 文字超、`[A-Za-z0-9_-]` 以外の文字を含む場合はエラー。
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::LobbyIdEmpty);
        }
        if value.len() > LOBBY_ID_MAX_LEN {
            return Err(ValueObjectError::LobbyIdTooLong(value.len()));
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ValueObjectError::LobbyIdInvalidChars(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for LobbyId {
    fn default() -> Self {
        Self(DEFAULT_LOBBY_ID.to_string())
    }
}

impl TryFrom<String> for LobbyId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LobbyId> for String {
    fn from(value: LobbyId) -> Self {
        value.0
    }
}

impl fmt::Display for LobbyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ========================================
// SessionId
// ========================================

/// クライアントごとのセッション ID（プレイヤー ID）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::SessionIdEmpty);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 表示用の短縮 ID（末尾 10 文字）
    pub fn short(&self) -> &str {
        let start = self
            .0
            .char_indices()
            .rev()
            .nth(9)
            .map(|(i, _)| i)
            .unwrap_or(0);
        &self.0[start..]
    }
}

impl TryFrom<String> for SessionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionId> for String {
    fn from(value: SessionId) -> Self {
        value.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// SessionId の生成
///
/// `player_<ランダム 8 桁>_<Unix ミリ秒>` の形式。
/// ランダム部分は UUID v4 由来だが、衝突しないことは保証しない。
pub struct SessionIdFactory;

impl SessionIdFactory {
    pub fn generate(clock: &dyn Clock) -> SessionId {
        let random = Uuid::new_v4().simple().to_string();
        SessionId(format!("player_{}_{}", &random[..8], clock.now_millis()))
    }
}

// ========================================
// DisplayName
// ========================================

/// プレイヤーの表示名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// 前後の空白を取り除いて作成する。空、または 22 文字超はエラー。
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::DisplayNameEmpty);
        }
        let chars = trimmed.chars().count();
        if chars > DISPLAY_NAME_MAX_CHARS {
            return Err(ValueObjectError::DisplayNameTooLong(chars));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ========================================
// CellPosition
// ========================================

/// 盤面上のマス（0 始まりの行・列）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPosition {
    row: usize,
    col: usize,
}

impl CellPosition {
    pub fn new(row: usize, col: usize) -> Result<Self, ValueObjectError> {
        if row >= 3 || col >= 3 {
            return Err(ValueObjectError::CellOutOfRange { row, col });
        }
        Ok(Self { row, col })
    }

    /// テンキー風の 1〜9 番号（左上が 1、右下が 9）から作成
    pub fn from_index(index: usize) -> Result<Self, ValueObjectError> {
        if !(1..=9).contains(&index) {
            return Err(ValueObjectError::CellIndexOutOfRange(index));
        }
        Self::new((index - 1) / 3, (index - 1) % 3)
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }
}

impl fmt::Display for CellPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanmoku_shared::time::FixedClock;

    #[test]
    fn test_lobby_id_validation() {
        // テスト項目: LobbyId は空文字・長すぎる値・不正な文字を拒否する
        // given (前提条件):
        let too_long = "a".repeat(LOBBY_ID_MAX_LEN + 1);

        // when (操作):
        let ok = LobbyId::new("mainroom".to_string());
        let empty = LobbyId::new(String::new());
        let long = LobbyId::new(too_long);
        let invalid = LobbyId::new("main room".to_string());

        // then (期待する結果):
        assert_eq!(ok.unwrap().as_str(), "mainroom");
        assert_eq!(empty, Err(ValueObjectError::LobbyIdEmpty));
        assert_eq!(
            long,
            Err(ValueObjectError::LobbyIdTooLong(LOBBY_ID_MAX_LEN + 1))
        );
        assert!(matches!(
            invalid,
            Err(ValueObjectError::LobbyIdInvalidChars(_))
        ));
    }

    #[test]
    fn test_default_lobby_id_is_mainroom() {
        // テスト項目: 既定のロビー ID は mainroom
        assert_eq!(LobbyId::default().as_str(), DEFAULT_LOBBY_ID);
    }

    #[test]
    fn test_display_name_is_trimmed_and_bounded() {
        // テスト項目: 表示名は前後の空白が除去され、22 文字まで許容される
        // given (前提条件):
        let max = "あ".repeat(DISPLAY_NAME_MAX_CHARS);
        let over = "a".repeat(DISPLAY_NAME_MAX_CHARS + 1);

        // when (操作):
        let trimmed = DisplayName::new("  alice  ".to_string()).unwrap();
        let at_limit = DisplayName::new(max.clone());
        let blank = DisplayName::new("   ".to_string());
        let too_long = DisplayName::new(over);

        // then (期待する結果):
        assert_eq!(trimmed.as_str(), "alice");
        assert_eq!(at_limit.unwrap().as_str(), max);
        assert_eq!(blank, Err(ValueObjectError::DisplayNameEmpty));
        assert_eq!(
            too_long,
            Err(ValueObjectError::DisplayNameTooLong(DISPLAY_NAME_MAX_CHARS + 1))
        );
    }

    #[test]
    fn test_session_id_factory_format() {
        // テスト項目: 生成される SessionId は player_<8 桁>_<ミリ秒> 形式
        // given (前提条件):
        let clock = FixedClock::new(1_700_000_000_000);

        // when (操作):
        let id = SessionIdFactory::generate(&clock);

        // then (期待する結果):
        let parts: Vec<&str> = id.as_str().split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "player");
        assert_eq!(parts[1].len(), 8);
        assert!(parts[1].chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(parts[2], "1700000000000");
    }

    #[test]
    fn test_session_id_factory_generates_distinct_ids() {
        // テスト項目: 同じ時刻でもランダム部分により異なる ID が生成される
        // given (前提条件):
        let clock = FixedClock::new(42);

        // when (操作):
        let first = SessionIdFactory::generate(&clock);
        let second = SessionIdFactory::generate(&clock);

        // then (期待する結果):
        assert_ne!(first, second);
    }

    #[test]
    fn test_session_id_short_form() {
        // テスト項目: 短縮表示は末尾 10 文字、短い ID はそのまま
        // given (前提条件):
        let long = SessionId::new("player_abcdef12_1700000000000".to_string()).unwrap();
        let short = SessionId::new("p1".to_string()).unwrap();

        // when (操作) / then (期待する結果):
        assert_eq!(long.short(), "0000000000");
        assert_eq!(short.short(), "p1");
    }

    #[test]
    fn test_cell_position_bounds() {
        // テスト項目: マスの位置は 0..3 の範囲のみ許容され、1〜9 番号から変換できる
        // given (前提条件) / when (操作):
        let center = CellPosition::from_index(5).unwrap();
        let bottom_right = CellPosition::from_index(9).unwrap();

        // then (期待する結果):
        assert_eq!((center.row(), center.col()), (1, 1));
        assert_eq!((bottom_right.row(), bottom_right.col()), (2, 2));
        assert_eq!(
            CellPosition::new(3, 0),
            Err(ValueObjectError::CellOutOfRange { row: 3, col: 0 })
        );
        assert_eq!(
            CellPosition::from_index(0),
            Err(ValueObjectError::CellIndexOutOfRange(0))
        );
    }
}
