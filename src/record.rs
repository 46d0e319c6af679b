//! Binary game records, used to save games for later replay
//!
//! Layout, all integers big-endian:
//!
//! | field        | type          |
//! |--------------|---------------|
//! | magic        | `b"CNKG"`     |
//! | version      | u8            |
//! | rows         | u16           |
//! | columns      | u16           |
//! | k            | u16           |
//! | players      | u8            |
//! | move count   | u32           |
//! | moves        | u16 per move  |

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::board::Board;
use crate::config::GameConfig;
use crate::error::RecordError;
use crate::player::Player;

pub const RECORD_MAGIC: &[u8; 4] = b"CNKG";
pub const RECORD_VERSION: u8 = 1;

/// A finished or unfinished game: its rules and every column played, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub config: GameConfig,
    pub moves: Vec<usize>,
}

impl GameRecord {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            moves: Vec::new(),
        }
    }

    /// The player who made move number `index`
    pub fn player_of_move(&self, index: usize) -> Player {
        Player::new(index % self.config.players)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), RecordError> {
        writer.write_all(RECORD_MAGIC)?;
        writer.write_u8(RECORD_VERSION)?;
        writer.write_u16::<BigEndian>(self.config.rows as u16)?;
        writer.write_u16::<BigEndian>(self.config.columns as u16)?;
        writer.write_u16::<BigEndian>(self.config.k as u16)?;
        writer.write_u8(self.config.players as u8)?;
        writer.write_u32::<BigEndian>(self.moves.len() as u32)?;
        for &column in self.moves.iter() {
            writer.write_u16::<BigEndian>(column as u16)?;
        }
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, RecordError> {
        let mut magic = [0; 4];
        reader.read_exact(&mut magic)?;
        if &magic != RECORD_MAGIC {
            return Err(RecordError::BadMagic);
        }
        let version = reader.read_u8()?;
        if version != RECORD_VERSION {
            return Err(RecordError::UnsupportedVersion(version));
        }

        let rows = reader.read_u16::<BigEndian>()? as usize;
        let columns = reader.read_u16::<BigEndian>()? as usize;
        let k = reader.read_u16::<BigEndian>()? as usize;
        let players = reader.read_u8()? as usize;
        let config = GameConfig::new(rows, columns, k, players)?;

        let num_moves = reader.read_u32::<BigEndian>()? as usize;
        // a game never lasts longer than the board has cells
        let mut moves = Vec::with_capacity(num_moves.min(rows * columns));
        for _ in 0..num_moves {
            moves.push(reader.read_u16::<BigEndian>()? as usize);
        }
        Ok(Self { config, moves })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RecordError> {
        let mut file = BufWriter::new(
            OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)?,
        );
        self.write_to(&mut file)?;
        file.flush()?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RecordError> {
        let mut file = BufReader::new(File::open(path)?);
        Self::read_from(&mut file)
    }

    /// Every board position of the game, starting from the empty board
    pub fn positions(&self) -> Result<Vec<Board>, RecordError> {
        let mut board = Board::new(self.config.rows, self.config.columns);
        let mut positions = Vec::with_capacity(self.moves.len() + 1);
        positions.push(board.clone());
        for (index, &column) in self.moves.iter().enumerate() {
            board
                .play(column, self.player_of_move(index))
                .map_err(|source| RecordError::IllegalMove { index, source })?;
            positions.push(board.clone());
        }
        Ok(positions)
    }

    /// The board after the final move
    pub fn replay(&self) -> Result<Board, RecordError> {
        let mut board = Board::new(self.config.rows, self.config.columns);
        for (index, &column) in self.moves.iter().enumerate() {
            board
                .play(column, self.player_of_move(index))
                .map_err(|source| RecordError::IllegalMove { index, source })?;
        }
        Ok(board)
    }
}
