//! Input line parsing.
//!
//! ```text
//! join <name> <X|O>     参加（名前は空白を含んでもよい。最後の語がマーク）
//! move <row> <col>      着手（0 始まり）
//! 1-9                   着手（左上が 1、右下が 9）
//! restart | board | leave | quit | help
//! ```

use thiserror::Error;

use sanmoku_server::domain::{CellPosition, DisplayName, Mark, ValueObjectError};

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Join { name: DisplayName, mark: Mark },
    Move(CellPosition),
    Restart,
    Board,
    Leave,
    Quit,
    Help,
}

/// Why a line could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for the list of commands.")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("{0}")]
    Invalid(#[from] ValueObjectError),
}

const JOIN_USAGE: &str = "join <name> <X|O>";
const MOVE_USAGE: &str = "move <row> <col> (0-2), or a single cell number 1-9";

impl Command {
    /// Parse one input line
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };

        match keyword.to_ascii_lowercase().as_str() {
            "join" => parse_join(rest),
            "move" | "m" => parse_move(rest),
            "restart" => Ok(Command::Restart),
            "board" => Ok(Command::Board),
            "leave" => Ok(Command::Leave),
            "quit" | "exit" => Ok(Command::Quit),
            "help" | "?" => Ok(Command::Help),
            digit if rest.is_empty() && digit.len() == 1 => {
                let index = digit
                    .parse::<usize>()
                    .map_err(|_| CommandError::Unknown(line.to_string()))?;
                Ok(Command::Move(CellPosition::from_index(index)?))
            }
            _ => Err(CommandError::Unknown(line.to_string())),
        }
    }
}

fn parse_join(rest: &str) -> Result<Command, CommandError> {
    let (name, mark) = rest
        .rsplit_once(char::is_whitespace)
        .ok_or(CommandError::Usage(JOIN_USAGE))?;
    let mark: Mark = mark.parse()?;
    let name = DisplayName::new(name.to_string())?;
    Ok(Command::Join { name, mark })
}

fn parse_move(rest: &str) -> Result<Command, CommandError> {
    let numbers: Vec<usize> = rest
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .map_err(|_| CommandError::Usage(MOVE_USAGE))?;

    let pos = match numbers.as_slice() {
        [index] => CellPosition::from_index(*index)?,
        [row, col] => CellPosition::new(*row, *col)?,
        _ => return Err(CommandError::Usage(MOVE_USAGE)),
    };
    Ok(Command::Move(pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_join_with_spaced_name() {
        // テスト項目: 名前に空白を含む join が解析でき、前後の空白は除かれる
        // given (前提条件):
        let line = "join  Ada Lovelace  o ";

        // when (操作):
        let command = Command::parse(line).unwrap();

        // then (期待する結果):
        assert_eq!(
            command,
            Command::Join {
                name: DisplayName::new("Ada Lovelace".to_string()).unwrap(),
                mark: Mark::O,
            }
        );
    }

    #[test]
    fn test_parse_join_rejects_missing_or_bad_parts() {
        // テスト項目: マーク無し・不明なマーク・長すぎる名前はエラー
        assert_eq!(
            Command::parse("join alice"),
            Err(CommandError::Usage(JOIN_USAGE))
        );
        assert!(matches!(
            Command::parse("join alice Z"),
            Err(CommandError::Invalid(ValueObjectError::UnknownMark(_)))
        ));
        assert!(matches!(
            Command::parse("join abcdefghijklmnopqrstuvwxyz X"),
            Err(CommandError::Invalid(ValueObjectError::DisplayNameTooLong(_)))
        ));
    }

    #[test]
    fn test_parse_move_forms() {
        // テスト項目: 行・列指定、セル番号指定、数字 1 文字の 3 形式で着手できる
        let center = CellPosition::new(1, 1).unwrap();
        assert_eq!(Command::parse("move 1 1"), Ok(Command::Move(center)));
        assert_eq!(Command::parse("m 5"), Ok(Command::Move(center)));
        assert_eq!(Command::parse("5"), Ok(Command::Move(center)));
        assert_eq!(
            Command::parse("9"),
            Ok(Command::Move(CellPosition::new(2, 2).unwrap()))
        );
    }

    #[test]
    fn test_parse_move_out_of_range() {
        // テスト項目: 盤面外のマスはエラー
        assert!(matches!(
            Command::parse("move 3 0"),
            Err(CommandError::Invalid(ValueObjectError::CellOutOfRange { .. }))
        ));
        assert!(matches!(
            Command::parse("0"),
            Err(CommandError::Invalid(ValueObjectError::CellIndexOutOfRange(0)))
        ));
        assert_eq!(
            Command::parse("move a b"),
            Err(CommandError::Usage(MOVE_USAGE))
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        // テスト項目: 引数の無いコマンドは大文字小文字を区別しない
        assert_eq!(Command::parse("Restart"), Ok(Command::Restart));
        assert_eq!(Command::parse("board"), Ok(Command::Board));
        assert_eq!(Command::parse("LEAVE"), Ok(Command::Leave));
        assert_eq!(Command::parse("quit"), Ok(Command::Quit));
        assert_eq!(Command::parse("help"), Ok(Command::Help));
        assert!(matches!(
            Command::parse("dance"),
            Err(CommandError::Unknown(_))
        ));
    }
}
