//! Pure state transitions.
//!
//! Each function looks at a row the caller has read (possibly stale) and returns
//! the patch the caller should write. Nothing here touches the store.

use thiserror::Error;

use super::{
    board::{Board, Mark},
    entity::{GameState, GameStatePatch, GameStatus, Player, PLAYERS_PER_GAME},
    evaluator::{evaluate_winner, is_full},
    value_object::{CellPosition, SessionId},
};

/// Why a move was ignored. Never surfaced to the user as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveRejection {
    #[error("no player session")]
    NoSession,

    #[error("no game row loaded")]
    NoGame,

    #[error("game is already over")]
    GameOver,

    #[error("it is {expected}'s turn")]
    NotYourTurn { expected: Mark },

    #[error("cell {0} is already taken")]
    CellOccupied(CellPosition),
}

impl GameState {
    /// Patch appending `player`, or `Err(mark)` when the mark is already held.
    pub fn join_patch(&self, player: Player) -> Result<GameStatePatch, Mark> {
        if self.player_with_mark(player.mark).is_some() {
            return Err(player.mark);
        }

        let status = if self.players.is_empty() {
            GameStatus::Waiting
        } else {
            GameStatus::Ongoing
        };
        let mut players = self.players.clone();
        players.push(player);

        Ok(GameStatePatch {
            players: Some(players),
            status: Some(status),
            ..Default::default()
        })
    }

    /// Patch removing `session_id`; `None` when that session is not registered.
    pub fn leave_patch(&self, session_id: &SessionId) -> Option<GameStatePatch> {
        if !self.players.iter().any(|p| &p.id == session_id) {
            return None;
        }

        let players: Vec<Player> = self
            .players
            .iter()
            .filter(|p| &p.id != session_id)
            .cloned()
            .collect();
        let status = if players.len() < PLAYERS_PER_GAME {
            GameStatus::Waiting
        } else {
            self.status
        };

        Some(GameStatePatch {
            players: Some(players),
            status: Some(status),
            ..Default::default()
        })
    }

    /// Patch placing `mark` at `pos`.
    ///
    /// Checks, in order: game not over, `mark` is `next_player`, cell empty.
    pub fn move_patch(&self, mark: Mark, pos: CellPosition) -> Result<GameStatePatch, MoveRejection> {
        if self.is_over() {
            return Err(MoveRejection::GameOver);
        }
        if self.next_player != mark {
            return Err(MoveRejection::NotYourTurn {
                expected: self.next_player,
            });
        }
        if !self.board.is_cell_empty(pos) {
            return Err(MoveRejection::CellOccupied(pos));
        }

        let board = self.board.with_mark(pos, mark);
        let winner = evaluate_winner(&board);
        let is_draw = winner.is_none() && is_full(&board);
        let scores = match winner {
            Some(w) => self.scores.incremented(w),
            None => self.scores,
        };
        let status = if winner.is_some() || is_draw {
            GameStatus::Finished
        } else {
            GameStatus::Ongoing
        };

        Ok(GameStatePatch {
            board: Some(board),
            next_player: Some(mark.other()),
            winner: Some(winner),
            is_draw: Some(is_draw),
            scores: Some(scores),
            status: Some(status),
            current_turn_player_id: Some(None),
            ..Default::default()
        })
    }

    /// Patch clearing the board. Scores and players are left alone.
    pub fn restart_patch(&self) -> GameStatePatch {
        GameStatePatch {
            board: Some(Board::empty()),
            next_player: Some(Mark::X),
            winner: Some(None),
            is_draw: Some(false),
            status: Some(GameStatus::for_player_count(self.player_count())),
            current_turn_player_id: Some(None),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entity::Scores,
        value_object::{DisplayName, LobbyId},
    };

    fn player(id: &str, mark: Mark) -> Player {
        Player {
            id: SessionId::new(id.to_string()).unwrap(),
            mark,
            name: DisplayName::new(id.to_string()).unwrap(),
        }
    }

    fn pos(row: usize, col: usize) -> CellPosition {
        CellPosition::new(row, col).unwrap()
    }

    fn lobby() -> GameState {
        GameState::new_lobby(LobbyId::default(), 0)
    }

    fn two_player_game() -> GameState {
        let mut state = lobby();
        state.players = vec![player("alice", Mark::X), player("bob", Mark::O)];
        state.status = GameStatus::Ongoing;
        state
    }

    /// Applies a sequence of moves, alternating from X.
    fn play(state: GameState, cells: &[(usize, usize)]) -> GameState {
        cells.iter().fold(state, |s, &(r, c)| {
            let patch = s.move_patch(s.next_player, pos(r, c)).unwrap();
            s.apply_patch(patch).unwrap()
        })
    }

    #[test]
    fn test_join_first_player_waits_second_starts() {
        // テスト項目: 1 人目の参加では待機中、2 人目で対戦中になる
        // given (前提条件):
        let state = lobby();

        // when (操作):
        let first = state
            .apply_patch(state.join_patch(player("alice", Mark::X)).unwrap())
            .unwrap();
        let second = first
            .apply_patch(first.join_patch(player("bob", Mark::O)).unwrap())
            .unwrap();

        // then (期待する結果):
        assert_eq!(first.status, GameStatus::Waiting);
        assert_eq!(second.status, GameStatus::Ongoing);
        assert_eq!(second.players.len(), 2);
    }

    #[test]
    fn test_join_taken_mark_is_rejected() {
        // テスト項目: 既に使われているマークでは参加できない
        // given (前提条件):
        let mut state = lobby();
        state.players.push(player("alice", Mark::X));

        // when (操作):
        let result = state.join_patch(player("carol", Mark::X));

        // then (期待する結果):
        assert_eq!(result, Err(Mark::X));
    }

    #[test]
    fn test_leave_drops_to_waiting_and_ignores_unknown() {
        // テスト項目: 退出で 2 人未満になると待機中に戻り、未登録セッションは変更なし
        // given (前提条件):
        let state = two_player_game();

        // when (操作):
        let patch = state
            .leave_patch(&SessionId::new("bob".to_string()).unwrap())
            .unwrap();
        let unknown = state.leave_patch(&SessionId::new("nobody".to_string()).unwrap());

        // then (期待する結果):
        assert_eq!(patch.status, Some(GameStatus::Waiting));
        assert_eq!(patch.players.as_ref().map(Vec::len), Some(1));
        assert_eq!(unknown, None);
    }

    #[test]
    fn test_move_flips_turn_and_keeps_previous_board() {
        // テスト項目: 着手で手番が入れ替わり、元の行の盤面は変わらない
        // given (前提条件):
        let state = two_player_game();

        // when (操作):
        let patch = state.move_patch(Mark::X, pos(1, 1)).unwrap();

        // then (期待する結果):
        assert_eq!(patch.next_player, Some(Mark::O));
        assert_eq!(patch.status, Some(GameStatus::Ongoing));
        assert_eq!(patch.winner, Some(None));
        assert_eq!(patch.board.unwrap().get(pos(1, 1)), Some(Mark::X));
        assert_eq!(state.board, Board::empty());
    }

    #[test]
    fn test_move_preconditions() {
        // テスト項目: 手番違い・埋まったマス・決着後の着手は拒否される
        // given (前提条件):
        let state = play(two_player_game(), &[(0, 0)]);

        // then (期待する結果):
        assert_eq!(
            state.move_patch(Mark::X, pos(1, 1)),
            Err(MoveRejection::NotYourTurn { expected: Mark::O })
        );
        assert_eq!(
            state.move_patch(Mark::O, pos(0, 0)),
            Err(MoveRejection::CellOccupied(pos(0, 0)))
        );

        // X: (0,0) (0,1) (0,2) / O: (1,0) (1,1)
        let won = play(two_player_game(), &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        assert_eq!(
            won.move_patch(Mark::O, pos(2, 2)),
            Err(MoveRejection::GameOver)
        );
    }

    #[test]
    fn test_winning_move_increments_score_and_finishes() {
        // テスト項目: 勝利手でスコアがちょうど 1 増え、終了状態になる
        // given (前提条件):
        let mut state = two_player_game();
        state.scores = Scores { x: 3, o: 5 };

        // when (操作):
        let won = play(state, &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);

        // then (期待する結果):
        assert_eq!(won.winner, Some(Mark::X));
        assert!(!won.is_draw);
        assert_eq!(won.scores, Scores { x: 4, o: 5 });
        assert_eq!(won.status, GameStatus::Finished);
    }

    #[test]
    fn test_last_move_draw() {
        // テスト項目: 勝者なしで盤面が埋まると引き分けで終了する
        // given (前提条件): [[X,O,X],[O,X,O],[O,X,O]] になる手順（最後は O）
        let cells = [
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 0),
            (1, 1),
            (1, 2),
            (2, 1),
            (2, 0),
            (2, 2),
        ];
        // 最後の (2,2) が X だと対角線が揃うので、先頭 8 手の後で O に打たせる
        let before_last = play(two_player_game(), &cells[..8]);
        let mut state = before_last.clone();
        state.next_player = Mark::O;

        // when (操作):
        let patch = state.move_patch(Mark::O, pos(2, 2)).unwrap();
        let drawn = state.apply_patch(patch).unwrap();

        // then (期待する結果):
        assert!(drawn.is_draw);
        assert_eq!(drawn.winner, None);
        assert_eq!(drawn.status, GameStatus::Finished);
        assert_eq!(drawn.scores, before_last.scores);
    }

    #[test]
    fn test_move_on_full_board_is_rejected() {
        // テスト項目: 引き分けで埋まった盤面への着手はパッチを作らない
        // given (前提条件): [[X,O,X],[O,X,O],[O,X,O]]
        let x = Some(Mark::X);
        let o = Some(Mark::O);
        let mut drawn = two_player_game();
        drawn.board = Board::from_rows([[x, o, x], [o, x, o], [o, x, o]]);
        drawn.is_draw = true;
        drawn.status = GameStatus::Finished;
        assert_eq!(drawn.validate(), Ok(()));

        // when (操作) / then (期待する結果):
        for mark in [Mark::X, Mark::O] {
            for index in 1..=9 {
                let cell = CellPosition::from_index(index).unwrap();
                assert_eq!(drawn.move_patch(mark, cell), Err(MoveRejection::GameOver));
            }
        }

        // is_draw が立っていない古い行でも、埋まったマスは選べない
        let mut stale = drawn.clone();
        stale.is_draw = false;
        stale.next_player = Mark::X;
        assert_eq!(
            stale.move_patch(Mark::X, pos(1, 1)),
            Err(MoveRejection::CellOccupied(pos(1, 1)))
        );
    }

    #[test]
    fn test_restart_clears_board_and_keeps_scores() {
        // テスト項目: リスタートで盤面がクリアされ、スコアは保持される
        // given (前提条件):
        let won = play(two_player_game(), &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);

        // when (操作):
        let restarted = won.apply_patch(won.restart_patch()).unwrap();

        // then (期待する結果):
        assert_eq!(restarted.board, Board::empty());
        assert_eq!(restarted.winner, None);
        assert!(!restarted.is_draw);
        assert_eq!(restarted.next_player, Mark::X);
        assert_eq!(restarted.scores, won.scores);
        assert_eq!(restarted.status, GameStatus::Ongoing);
    }

    #[test]
    fn test_restart_with_single_player_waits() {
        // テスト項目: プレイヤーが 1 人ならリスタート後は待機中
        let mut state = lobby();
        state.players.push(player("alice", Mark::X));
        assert_eq!(state.restart_patch().status, Some(GameStatus::Waiting));
    }
}
