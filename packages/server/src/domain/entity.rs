//! Entity 定義
//!
//! ロビーごとに 1 行だけ存在する `GameState` と、その構成要素。

use serde::{Deserialize, Serialize};

use super::{
    board::{Board, Mark},
    error::StoreError,
    evaluator::{evaluate_winner, is_full},
    value_object::{DisplayName, LobbyId, SessionId},
};

/// 対戦に必要な人数
pub const PLAYERS_PER_GAME: usize = 2;

/// ゲーム行の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// プレイヤーが 2 人未満
    Waiting,
    Ongoing,
    /// 勝者が決まった、または引き分け
    Finished,
}

impl GameStatus {
    /// 人数だけから決まる状態（再開時に使う）
    pub fn for_player_count(count: usize) -> Self {
        if count < PLAYERS_PER_GAME {
            GameStatus::Waiting
        } else {
            GameStatus::Ongoing
        }
    }
}

/// マークごとの勝利数。リスタートしてもリセットされない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scores {
    #[serde(rename = "X")]
    pub x: u32,
    #[serde(rename = "O")]
    pub o: u32,
}

impl Scores {
    /// `mark` の勝利数を 1 増やした値を返す
    pub fn incremented(self, mark: Mark) -> Self {
        match mark {
            Mark::X => Self {
                x: self.x.saturating_add(1),
                ..self
            },
            Mark::O => Self {
                o: self.o.saturating_add(1),
                ..self
            },
        }
    }
}

/// ロビーに登録されたプレイヤー
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: SessionId,
    pub mark: Mark,
    pub name: DisplayName,
}

/// クライアント側だけが保持するセッション
///
/// 参加に成功すると作られ、退出すると行の `players` から取り除かれる。永続化はしない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSession {
    pub session_id: SessionId,
    pub display_name: DisplayName,
    pub mark: Mark,
}

impl PlayerSession {
    pub fn as_player(&self) -> Player {
        Player {
            id: self.session_id.clone(),
            mark: self.mark,
            name: self.display_name.clone(),
        }
    }
}

/// ロビーの共有状態（ゲーム行）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub id: LobbyId,
    pub board: Board,
    pub next_player: Mark,
    pub winner: Option<Mark>,
    pub is_draw: bool,
    pub scores: Scores,
    pub status: GameStatus,
    pub players: Vec<Player>,
    /// 予約フィールド。常に `None` で書き込まれ、手番の判定には使わない。
    pub current_turn_player_id: Option<SessionId>,
    /// Store が書き込みごとに増やす版番号
    pub version: u64,
    /// 作成時刻（Unix ミリ秒）
    pub created_at: i64,
}

/// ゲーム行の部分更新
///
/// `None` のフィールドは変更しない。`expected_version` を指定すると、
/// Store 側の版が一致する場合だけ書き込まれる。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameStatePatch {
    pub board: Option<Board>,
    pub next_player: Option<Mark>,
    pub winner: Option<Option<Mark>>,
    pub is_draw: Option<bool>,
    pub scores: Option<Scores>,
    pub status: Option<GameStatus>,
    pub players: Option<Vec<Player>>,
    pub current_turn_player_id: Option<Option<SessionId>>,
    pub expected_version: Option<u64>,
}

impl GameState {
    /// 新しいロビー行（空の盤面、X の手番、待機中）
    pub fn new_lobby(id: LobbyId, created_at: i64) -> Self {
        Self {
            id,
            board: Board::empty(),
            next_player: Mark::X,
            winner: None,
            is_draw: false,
            scores: Scores::default(),
            status: GameStatus::Waiting,
            players: Vec::new(),
            current_turn_player_id: None,
            version: 0,
            created_at,
        }
    }

    /// 行の不変条件を検証する
    pub fn validate(&self) -> Result<(), StoreError> {
        for (i, player) in self.players.iter().enumerate() {
            if self.players[..i].iter().any(|p| p.mark == player.mark) {
                return Err(StoreError::InvalidRow(format!(
                    "mark {} is held by more than one player",
                    player.mark
                )));
            }
        }

        if self.winner.is_some() && self.is_draw {
            return Err(StoreError::InvalidRow(
                "winner and is_draw are both set".to_string(),
            ));
        }

        let expected_winner = evaluate_winner(&self.board);
        if self.winner != expected_winner {
            return Err(StoreError::InvalidRow(format!(
                "winner {:?} does not match board (expected {:?})",
                self.winner, expected_winner
            )));
        }

        let expected_draw = expected_winner.is_none() && is_full(&self.board);
        if self.is_draw != expected_draw {
            return Err(StoreError::InvalidRow(format!(
                "is_draw {} does not match board (expected {})",
                self.is_draw, expected_draw
            )));
        }

        Ok(())
    }

    /// 部分更新を適用した新しい行を返す
    ///
    /// 版番号の確認、スコアが減っていないことの確認、不変条件の検証を行い、
    /// 成功すれば版番号を 1 つ進める。
    pub fn apply_patch(&self, patch: GameStatePatch) -> Result<GameState, StoreError> {
        if let Some(expected) = patch.expected_version
            && expected != self.version
        {
            return Err(StoreError::VersionConflict {
                expected,
                actual: self.version,
            });
        }

        let mut next = self.clone();
        if let Some(board) = patch.board {
            next.board = board;
        }
        if let Some(next_player) = patch.next_player {
            next.next_player = next_player;
        }
        if let Some(winner) = patch.winner {
            next.winner = winner;
        }
        if let Some(is_draw) = patch.is_draw {
            next.is_draw = is_draw;
        }
        if let Some(scores) = patch.scores {
            if scores.x < self.scores.x || scores.o < self.scores.o {
                return Err(StoreError::InvalidRow(
                    "scores must never decrease".to_string(),
                ));
            }
            next.scores = scores;
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        if let Some(players) = patch.players {
            next.players = players;
        }
        if let Some(current_turn_player_id) = patch.current_turn_player_id {
            next.current_turn_player_id = current_turn_player_id;
        }

        next.validate()?;
        next.version = self.version + 1;
        Ok(next)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player_with_mark(&self, mark: Mark) -> Option<&Player> {
        self.players.iter().find(|p| p.mark == mark)
    }

    /// まだ誰も選んでいないマーク
    pub fn available_marks(&self) -> Vec<Mark> {
        Mark::ALL
            .into_iter()
            .filter(|mark| self.player_with_mark(*mark).is_none())
            .collect()
    }

    /// 勝者または引き分けが決まっている
    pub fn is_over(&self) -> bool {
        self.winner.is_some() || self.is_draw
    }

    /// 手番の表示用ラベル
    ///
    /// `next_player` のマークを持つプレイヤー、次に `current_turn_player_id` の
    /// プレイヤーを探し、見つからなければマークだけを返す。
    pub fn turn_label(&self) -> String {
        self.player_with_mark(self.next_player)
            .or_else(|| {
                self.current_turn_player_id
                    .as_ref()
                    .and_then(|id| self.players.iter().find(|p| &p.id == id))
            })
            .map(|p| format!("{} ({})", p.name, p.mark))
            .unwrap_or_else(|| self.next_player.to_string())
    }

    /// このセッションが今マスを選べるか
    pub fn can_play(&self, session: &PlayerSession) -> bool {
        !self.is_over() && self.next_player == session.mark
    }
}
