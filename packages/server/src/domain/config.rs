//! Lobby settings injected into every use case.

use super::value_object::LobbyId;

/// How use cases guard their writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Unconditional row writes; the later writer silently wins.
    #[default]
    LastWriterWins,
    /// Every patch carries the version the writer last read.
    VersionChecked,
}

impl WriteMode {
    /// The `expected_version` to stamp on a patch built from a row at `read_version`.
    pub fn expected_version(self, read_version: u64) -> Option<u64> {
        match self {
            WriteMode::LastWriterWins => None,
            WriteMode::VersionChecked => Some(read_version),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LobbyConfig {
    pub lobby_id: LobbyId,
    pub write_mode: WriteMode,
}

impl LobbyConfig {
    pub fn new(lobby_id: LobbyId, write_mode: WriteMode) -> Self {
        Self {
            lobby_id,
            write_mode,
        }
    }
}
