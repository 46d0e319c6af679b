//! Error types surfaced by the board, the engine and the supporting tools

use std::path::PathBuf;

/// Errors raised by board operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("column {column} is full")]
    ColumnFull { column: usize },

    #[error("column {column} out of range, the board has {columns} columns")]
    ColumnOutOfRange { column: usize, columns: usize },

    #[error("invalid cell '{0}' in board layout")]
    InvalidCell(char),

    #[error("board layout rows must all have {expected} cells, found {found}")]
    RaggedLayout { expected: usize, found: usize },

    #[error("board layout is empty")]
    EmptyLayout,

    #[error("token at column {column}, row {row} is floating above an empty cell")]
    FloatingToken { column: usize, row: usize },

    #[error("player {player} does not exist in a {num_players} player game")]
    UnknownPlayer { player: usize, num_players: usize },
}

/// Errors raised by the CPU decision engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("no legal move available, the board is full")]
    NoLegalMove,

    #[error("a game needs at least one controller")]
    NoControllers,

    #[error("board fault during simulation: {0}")]
    Board(#[from] BoardError),
}

/// Raised when a difficulty name cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty '{0}', expected easy, medium or hard")]
pub struct UnknownDifficulty(pub String);

/// Errors raised when loading or validating a game configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors raised when reading or replaying a saved game
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("not a game record (bad magic bytes)")]
    BadMagic,

    #[error("unsupported record version {0}")]
    UnsupportedVersion(u8),

    #[error("record holds an invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("move {index} of the record is illegal: {source}")]
    IllegalMove { index: usize, source: BoardError },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
