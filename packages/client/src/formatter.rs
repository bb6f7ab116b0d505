//! Text rendering for the terminal client.

use sanmoku_server::domain::{Board, CellPosition, GameState, GameStatus, PlayerSession, Scores};
use sanmoku_shared::time::timestamp_to_rfc3339;

use crate::view::LobbyView;

const RULE: &str = "============================================================";

/// Formatter for the lobby display
pub struct GameFormatter;

impl GameFormatter {
    /// Render the board; empty cells show their cell number (1-9)
    ///
    /// ```text
    ///  X | 2 | O
    /// ---+---+---
    ///  4 | X | 6
    /// ---+---+---
    ///  7 | 8 | 9
    /// ```
    pub fn format_board(board: &Board) -> String {
        board
            .rows()
            .iter()
            .enumerate()
            .map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .map(|(c, cell)| match cell {
                        Some(mark) => format!(" {} ", mark),
                        None => format!(" {} ", r * 3 + c + 1),
                    })
                    .collect::<Vec<_>>()
                    .join("|")
            })
            .collect::<Vec<_>>()
            .join("\n---+---+---\n")
    }

    pub fn format_scores(scores: &Scores) -> String {
        format!("X Score: {} | O Score: {}", scores.x, scores.o)
    }

    /// Winner, draw, waiting, or whose turn it is (in that order)
    pub fn format_status(row: &GameState) -> String {
        if let Some(winner) = row.winner {
            format!("Winner: {}!", winner)
        } else if row.is_draw {
            "It's a Draw!".to_string()
        } else if row.status == GameStatus::Waiting {
            "Waiting for another player...".to_string()
        } else {
            format!("Current turn: {}", row.turn_label())
        }
    }

    pub fn format_players(row: &GameState) -> String {
        if row.players.is_empty() {
            return "Players: (none)".to_string();
        }
        let players = row
            .players
            .iter()
            .map(|p| format!("{} ({})", p.name, p.mark))
            .collect::<Vec<_>>()
            .join(", ");
        format!("Players: {}", players)
    }

    pub fn format_session(session: &PlayerSession) -> String {
        format!(
            "You are {} ({}) [session ...{}]",
            session.display_name,
            session.mark,
            session.session_id.short()
        )
    }

    /// The full lobby screen
    pub fn format_lobby(view: &LobbyView) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\n", RULE));

        let Some(row) = view.row() else {
            output.push_str(&format!("Lobby: {} (loading...)\n", view.lobby_id()));
            output.push_str(RULE);
            output.push('\n');
            return output;
        };

        match timestamp_to_rfc3339(row.created_at) {
            Some(created) => output.push_str(&format!("Lobby: {} (opened {})\n\n", row.id, created)),
            None => output.push_str(&format!("Lobby: {}\n\n", row.id)),
        }
        output.push_str(&Self::format_board(&row.board));
        output.push_str("\n\n");
        output.push_str(&Self::format_scores(&row.scores));
        output.push('\n');
        output.push_str(&Self::format_status(row));
        output.push('\n');
        output.push_str(&Self::format_players(row));
        output.push('\n');

        match view.session() {
            Some(session) => {
                output.push_str(&Self::format_session(session));
                if !view.is_registered() {
                    output.push_str(" (not in the player list)");
                } else if view.can_play() {
                    output.push_str(" - your move");
                }
            }
            None => {
                let marks = row
                    .available_marks()
                    .iter()
                    .map(|m| m.to_string())
                    .collect::<Vec<_>>();
                if marks.is_empty() {
                    output.push_str("Spectating (both marks are taken)");
                } else {
                    output.push_str(&format!(
                        "Not joined. Available marks: {} (join <name> <mark>)",
                        marks.join(", ")
                    ));
                }
            }
        }
        output.push_str(&format!("\n{}\n", RULE));
        output
    }

    pub fn format_move_ignored(pos: CellPosition, reason: &str) -> String {
        format!("Move {} ignored: {}", pos, reason)
    }

    pub fn format_help() -> String {
        [
            "Commands:",
            "  join <name> <X|O>   join the lobby with a mark",
            "  move <row> <col>    place your mark (rows and columns are 0-2)",
            "  1-9                 place your mark by cell number",
            "  restart             clear the board (scores are kept)",
            "  board               show the lobby again",
            "  leave               leave the lobby",
            "  quit                leave and exit",
            "  help                show this help",
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanmoku_server::domain::{DisplayName, LobbyId, Mark, Player, SessionId};

    fn pos(row: usize, col: usize) -> CellPosition {
        CellPosition::new(row, col).unwrap()
    }

    fn player(id: &str, mark: Mark, name: &str) -> Player {
        Player {
            id: SessionId::new(id.to_string()).unwrap(),
            mark,
            name: DisplayName::new(name.to_string()).unwrap(),
        }
    }

    #[test]
    fn test_format_board_shows_marks_and_cell_numbers() {
        // テスト項目: 空きマスには番号、埋まったマスにはマークが表示される
        // given (前提条件):
        let board = Board::empty()
            .with_mark(pos(0, 0), Mark::X)
            .with_mark(pos(1, 1), Mark::O);

        // when (操作):
        let result = GameFormatter::format_board(&board);

        // then (期待する結果):
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines[0], " X | 2 | 3 ");
        assert_eq!(lines[1], "---+---+---");
        assert_eq!(lines[2], " 4 | O | 6 ");
        assert_eq!(lines[4], " 7 | 8 | 9 ");
    }

    #[test]
    fn test_format_scores() {
        // テスト項目: スコア行の形式
        let scores = Scores { x: 2, o: 1 };
        assert_eq!(GameFormatter::format_scores(&scores), "X Score: 2 | O Score: 1");
    }

    #[test]
    fn test_format_status_variants() {
        // テスト項目: 勝者・引き分け・待機中・手番の順で状態行が決まる
        // given (前提条件):
        let mut row = GameState::new_lobby(LobbyId::default(), 0);

        // then (期待する結果): 待機中
        assert_eq!(
            GameFormatter::format_status(&row),
            "Waiting for another player..."
        );

        // 対戦中
        row.players = vec![player("a", Mark::X, "alice"), player("b", Mark::O, "bob")];
        row.status = GameStatus::Ongoing;
        assert_eq!(
            GameFormatter::format_status(&row),
            "Current turn: alice (X)"
        );

        // 勝者あり
        row.winner = Some(Mark::O);
        assert_eq!(GameFormatter::format_status(&row), "Winner: O!");

        // 引き分け
        row.winner = None;
        row.is_draw = true;
        assert_eq!(GameFormatter::format_status(&row), "It's a Draw!");
    }

    #[test]
    fn test_format_session_uses_short_id() {
        // テスト項目: セッション ID は末尾 10 文字だけ表示される
        let session = PlayerSession {
            session_id: SessionId::new("player_1a2b3c4d_1700000000000".to_string()).unwrap(),
            display_name: DisplayName::new("alice".to_string()).unwrap(),
            mark: Mark::X,
        };
        assert_eq!(
            GameFormatter::format_session(&session),
            "You are alice (X) [session ...0000000000]"
        );
    }

    #[test]
    fn test_format_lobby_without_session_lists_available_marks() {
        // テスト項目: 未参加なら空いているマークを案内する
        // given (前提条件):
        let mut view = LobbyView::new(LobbyId::default());
        let mut row = GameState::new_lobby(LobbyId::default(), 0);
        row.players.push(player("a", Mark::X, "alice"));
        view.replace_row(row);

        // when (操作):
        let result = GameFormatter::format_lobby(&view);

        // then (期待する結果):
        assert!(result.contains("Lobby: mainroom"));
        assert!(result.contains("Players: alice (X)"));
        assert!(result.contains("Available marks: O"));
    }
}
